//! Business logic helpers for managing transactions.

use chrono::NaiveDate;
use tracing::debug;

use crate::core::services::{not_found, ServiceResult};
use crate::core::time::Clock;
use crate::core::validation::validate_transaction;
use crate::ledger::{
    recurring::{self, RecurringSnapshot},
    transaction::new_id,
    Category, Ledger, MonthPeriod, Transaction, TransactionType,
};

/// Criteria for listing transactions. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
    pub period: Option<MonthPeriod>,
}

impl TransactionFilter {
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn period(mut self, period: MonthPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self.category.map_or(true, |category| txn.category == category)
            && self.period.map_or(true, |period| period.contains(txn.date))
    }
}

/// Provides validated CRUD helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Adds a new transaction and returns its identifier. A blank or
    /// already-used identifier is replaced with a fresh one.
    pub fn add(
        ledger: &mut Ledger,
        mut transaction: Transaction,
        clock: &dyn Clock,
    ) -> ServiceResult<String> {
        validate_transaction(&transaction)?;
        if transaction.id.trim().is_empty() || ledger.transaction(&transaction.id).is_some() {
            transaction.id = new_id("txn");
        }
        transaction.touch(clock.now());
        let id = transaction.id.clone();
        ledger.transactions.push(transaction);
        Ok(id)
    }

    /// Updates the transaction identified by `id` via the provided mutator.
    /// The change is discarded when the result fails validation.
    pub fn update<F>(ledger: &mut Ledger, id: &str, clock: &dyn Clock, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Transaction),
    {
        let txn = ledger
            .transaction_mut(id)
            .ok_or_else(|| not_found("transaction", id))?;
        let mut draft = txn.clone();
        mutator(&mut draft);
        draft.id = txn.id.clone();
        validate_transaction(&draft)?;
        draft.touch(clock.now());
        *txn = draft;
        Ok(())
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(ledger: &mut Ledger, id: &str) -> ServiceResult<Transaction> {
        let index = ledger
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| not_found("transaction", id))?;
        Ok(ledger.transactions.remove(index))
    }

    pub fn get<'a>(ledger: &'a Ledger, id: &str) -> Option<&'a Transaction> {
        ledger.transaction(id)
    }

    /// Transactions matching `filter`, newest date first.
    pub fn list<'a>(ledger: &'a Ledger, filter: &TransactionFilter) -> Vec<&'a Transaction> {
        let mut matches: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches
    }

    /// Appends the recurring instances due in the month containing the
    /// clock's date and returns their identifiers.
    pub fn materialize_recurring(ledger: &mut Ledger, clock: &dyn Clock) -> Vec<String> {
        let mut created = recurring::materialize_due_instances(clock.today(), &ledger.transactions);
        let now = clock.now();
        let ids: Vec<String> = created
            .iter_mut()
            .map(|txn| {
                txn.touch(now);
                txn.id.clone()
            })
            .collect();
        ledger.transactions.extend(created);
        debug!(?ids, "recurring materialization finished");
        ids
    }

    pub fn recurring_status(ledger: &Ledger, today: NaiveDate) -> Vec<RecurringSnapshot> {
        recurring::snapshot_recurring(&ledger.transactions, today)
    }
}
