use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::{
    aggregate::sum_by_type,
    period::MonthPeriod,
    transaction::{Transaction, TransactionType},
};

/// Widest window `build` will produce (one hundred years).
pub const MAX_MONTHS: u32 = 1200;

const SHORT_MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const SHORT_MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub label: String,
    pub period: MonthPeriod,
    pub income: f64,
    pub expenses: f64,
}

/// Default label: abbreviated Spanish month name followed by the year, e.g. `jun 2024`.
pub fn short_month_label(period: MonthPeriod) -> String {
    let name = SHORT_MONTHS_ES
        .get(period.month as usize)
        .copied()
        .unwrap_or("?");
    format!("{} {}", name, period.year)
}

pub fn english_month_label(period: MonthPeriod) -> String {
    let name = SHORT_MONTHS_EN
        .get(period.month as usize)
        .copied()
        .unwrap_or("?");
    format!("{} {}", name, period.year)
}

/// Labeler for a BCP 47 locale tag. Spanish tags (`es`, `es-AR`, ...) get
/// [`short_month_label`]; anything else gets English names.
pub fn label_for_locale(locale: &str) -> fn(MonthPeriod) -> String {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if language == "es" {
        short_month_label
    } else {
        english_month_label
    }
}

/// Builds exactly `months` monthly income/expense totals, oldest first, ending
/// with the month that contains `reference`. Windows wider than [`MAX_MONTHS`]
/// are capped.
pub fn build<F>(
    transactions: &[Transaction],
    months: u32,
    reference: NaiveDate,
    label: F,
) -> Vec<MonthlyPoint>
where
    F: Fn(MonthPeriod) -> String,
{
    let anchor = MonthPeriod::of(reference);
    if months > MAX_MONTHS {
        warn!(requested = months, cap = MAX_MONTHS, "trend window capped");
    }
    let window = i32::try_from(months.min(MAX_MONTHS)).unwrap_or(0);
    (0..window)
        .rev()
        .map(|offset| {
            let period = anchor.shift(-offset);
            MonthlyPoint {
                label: label(period),
                period,
                income: sum_by_type(transactions, TransactionType::Income, Some(period)),
                expenses: sum_by_type(transactions, TransactionType::Expense, Some(period)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::category::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn six_months_ending_in_june() {
        let txns = vec![
            Transaction::income(900.0, Category::Salary, date(2024, 1, 3), "pay"),
            Transaction::expense(120.0, Category::Food, date(2024, 3, 10), "market"),
            Transaction::income(950.0, Category::Salary, date(2024, 6, 3), "pay"),
            Transaction::expense(400.0, Category::Housing, date(2024, 6, 1), "rent"),
            Transaction::expense(999.0, Category::Housing, date(2023, 12, 1), "old"),
        ];
        let series = build(&txns, 6, date(2024, 6, 15), short_month_label);

        assert_eq!(series.len(), 6);
        let months: Vec<u32> = series.iter().map(|point| point.period.month).collect();
        assert_eq!(months, vec![0, 1, 2, 3, 4, 5]);
        assert!(series.iter().all(|point| point.period.year == 2024));
        assert_eq!(series[0].label, "ene 2024");
        assert_eq!(series[5].label, "jun 2024");

        for point in &series {
            assert_eq!(
                point.income,
                sum_by_type(&txns, TransactionType::Income, Some(point.period))
            );
            assert_eq!(
                point.expenses,
                sum_by_type(&txns, TransactionType::Expense, Some(point.period))
            );
        }
        assert_eq!(series[5].expenses, 400.0);
    }

    #[test]
    fn window_spans_previous_year() {
        let series = build(&[], 3, date(2024, 2, 1), |period| period.to_string());
        let labels: Vec<&str> = series.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
        assert!(series.iter().all(|point| point.income == 0.0));
    }

    #[test]
    fn huge_window_is_capped_and_stays_in_order() {
        let series = build(&[], u32::MAX, date(2024, 6, 1), |period| period.to_string());
        assert_eq!(series.len(), MAX_MONTHS as usize);
        assert_eq!(series.last().unwrap().label, "2024-06");
        assert_eq!(series[0].period, MonthPeriod::of(date(2024, 6, 1)).shift(-1199));
        assert!(series.windows(2).all(|pair| pair[0].period < pair[1].period));
    }

    #[test]
    fn locale_picks_month_names() {
        let june = MonthPeriod::of(date(2024, 6, 1));
        assert_eq!(label_for_locale("es-AR")(june), "jun 2024");
        assert_eq!(label_for_locale("ES")(june), "jun 2024");
        assert_eq!(label_for_locale("en-US")(june), "Jun 2024");
        assert_eq!(label_for_locale("")(june), "Jun 2024");
    }

    #[test]
    fn zero_months_is_empty() {
        assert!(build(&[], 0, date(2024, 2, 1), short_month_label).is_empty());
    }
}
