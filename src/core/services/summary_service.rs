use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::{
    aggregate::{self, CategoryTotal, MonthlyBalance},
    time_series::{self, MonthlyPoint},
    Ledger, MonthPeriod, Transaction, TransactionType,
};

/// Headline figures for the month containing the reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub period: MonthPeriod,
    pub balance: MonthlyBalance,
    pub transaction_count: usize,
    /// Mean monthly income across the trend window.
    pub average_income: f64,
    pub average_expenses: f64,
    /// `balance / income * 100` for the month, or `0` without income.
    pub savings_rate: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn monthly_balance(ledger: &Ledger, period: MonthPeriod) -> MonthlyBalance {
        aggregate::monthly_balance(&ledger.transactions, period)
    }

    /// Per-category totals for `period`, optionally restricted to one
    /// transaction type, largest total first.
    pub fn category_breakdown(
        ledger: &Ledger,
        period: Option<MonthPeriod>,
        kind: Option<TransactionType>,
    ) -> Vec<CategoryTotal> {
        let mut groups = match kind {
            Some(kind) => {
                let subset: Vec<Transaction> = ledger
                    .transactions
                    .iter()
                    .filter(|txn| txn.kind == kind)
                    .cloned()
                    .collect();
                aggregate::group_by_category(&subset, period)
            }
            None => aggregate::group_by_category(&ledger.transactions, period),
        };
        groups.sort_by(|a, b| b.total.total_cmp(&a.total));
        groups
    }

    pub fn time_series(ledger: &Ledger, months: u32, reference: NaiveDate) -> Vec<MonthlyPoint> {
        time_series::build(
            &ledger.transactions,
            months,
            reference,
            time_series::short_month_label,
        )
    }

    pub fn time_series_with<F>(
        ledger: &Ledger,
        months: u32,
        reference: NaiveDate,
        label: F,
    ) -> Vec<MonthlyPoint>
    where
        F: Fn(MonthPeriod) -> String,
    {
        time_series::build(&ledger.transactions, months, reference, label)
    }

    pub fn kpis(ledger: &Ledger, trend_months: u32, reference: NaiveDate) -> DashboardKpis {
        let period = MonthPeriod::of(reference);
        let balance = Self::monthly_balance(ledger, period);
        let series = Self::time_series(ledger, trend_months, reference);
        let (average_income, average_expenses) = if series.is_empty() {
            (0.0, 0.0)
        } else {
            let count = series.len() as f64;
            (
                series.iter().map(|point| point.income).sum::<f64>() / count,
                series.iter().map(|point| point.expenses).sum::<f64>() / count,
            )
        };
        let savings_rate = if balance.income > 0.0 {
            balance.balance / balance.income * 100.0
        } else {
            0.0
        };
        DashboardKpis {
            period,
            balance,
            transaction_count: ledger.transactions.len(),
            average_income,
            average_expenses,
            savings_rate,
        }
    }
}
