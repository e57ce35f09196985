//! Sums over transaction lists. Every other derived metric builds on these.
//!
//! An optional [`MonthPeriod`] restricts the input to one calendar month; a
//! month without a year (or the reverse) cannot be expressed.

use serde::Serialize;

use super::{
    category::Category,
    period::MonthPeriod,
    transaction::{Transaction, TransactionType},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthlyBalance {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Transactions that fall inside `period`, or all of them when `period` is `None`.
pub fn in_period<'a>(
    transactions: &'a [Transaction],
    period: Option<MonthPeriod>,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions
        .iter()
        .filter(move |txn| period.map_or(true, |p| p.contains(txn.date)))
}

pub fn sum_by_type(
    transactions: &[Transaction],
    kind: TransactionType,
    period: Option<MonthPeriod>,
) -> f64 {
    in_period(transactions, period)
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}

/// Sums every transaction filed under `category`, regardless of its type.
pub fn sum_by_category(
    transactions: &[Transaction],
    category: Category,
    period: Option<MonthPeriod>,
) -> f64 {
    in_period(transactions, period)
        .filter(|txn| txn.category == category)
        .map(|txn| txn.amount)
        .sum()
}

/// Totals per category present in the filtered set, in order of first
/// appearance. Categories with no matching transaction are omitted.
pub fn group_by_category(
    transactions: &[Transaction],
    period: Option<MonthPeriod>,
) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    for txn in in_period(transactions, period) {
        match groups.iter_mut().find(|group| group.category == txn.category) {
            Some(group) => {
                group.total += txn.amount;
                group.count += 1;
            }
            None => groups.push(CategoryTotal {
                category: txn.category,
                total: txn.amount,
                count: 1,
            }),
        }
    }
    groups
}

pub fn monthly_balance(transactions: &[Transaction], period: MonthPeriod) -> MonthlyBalance {
    let income = sum_by_type(transactions, TransactionType::Income, Some(period));
    let expenses = sum_by_type(transactions, TransactionType::Expense, Some(period));
    MonthlyBalance {
        income,
        expenses,
        balance: income - expenses,
    }
}
