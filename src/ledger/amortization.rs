use serde::Serialize;
use tracing::warn;

use super::debt::Debt;

/// Longest schedule `project` will simulate (one hundred years).
pub const MAX_PERIODS: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmortizationRow {
    /// One-based period number.
    pub period: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

/// Monthly rate derived from the debt's annual percentage.
pub fn monthly_rate(debt: &Debt) -> f64 {
    debt.interest_rate / 100.0 / 12.0
}

/// Whether the fixed payment covers the first month's interest on the
/// remaining balance. Plans that fail this never reach a zero balance.
pub fn amortizes(debt: &Debt) -> bool {
    let balance = debt.remaining();
    balance <= 0.0 || debt.monthly_payment > balance * monthly_rate(debt)
}

/// Simulates up to `periods` fixed payments starting from the remaining
/// balance, stopping early once the balance reaches zero.
///
/// A payment that does not exceed the period's interest yields zero or
/// negative principal; the schedule then runs the full `periods` without
/// paying off.
pub fn project(debt: &Debt, periods: u32) -> Vec<AmortizationRow> {
    let rate = monthly_rate(debt);
    let mut balance = debt.remaining();
    let mut schedule = Vec::new();
    if periods > MAX_PERIODS {
        warn!(requested = periods, cap = MAX_PERIODS, "schedule length capped");
    }
    let periods = periods.min(MAX_PERIODS);

    if !amortizes(debt) {
        warn!(
            debt = %debt.id,
            payment = debt.monthly_payment,
            "monthly payment does not cover interest; schedule will not pay off"
        );
    }

    let mut period = 1;
    while period <= periods && balance > 0.0 {
        let interest = balance * rate;
        let principal = (debt.monthly_payment - interest).min(balance);
        let payment = principal + interest;
        balance -= principal;
        schedule.push(AmortizationRow {
            period,
            payment,
            principal,
            interest,
            balance: balance.max(0.0),
        });
        period += 1;
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn first_period_splits_interest_and_principal() {
        let debt = Debt::new("Loan", 1200.0, 12.0, 200.0);
        let schedule = project(&debt, 12);
        let first = schedule[0];
        assert_eq!(first.period, 1);
        assert!(close(first.interest, 12.0));
        assert!(close(first.principal, 188.0));
        assert!(close(first.payment, 200.0));
        assert!(close(first.balance, 1012.0));
    }

    #[test]
    fn schedule_stops_at_zero_before_the_period_limit() {
        let debt = Debt::new("Loan", 1200.0, 12.0, 200.0);
        let schedule = project(&debt, 12);
        let last = schedule.last().unwrap();
        assert_eq!(last.balance, 0.0);
        assert!(schedule.len() < 12);
        assert!(schedule.iter().all(|row| row.balance >= 0.0));
        assert!(last.payment < 200.0);
        let principal: f64 = schedule.iter().map(|row| row.principal).sum();
        assert!(close(principal, 1200.0));
    }

    #[test]
    fn schedule_starts_from_remaining_balance() {
        let debt = Debt::new("Card", 1000.0, 0.0, 250.0).with_paid(500.0);
        let schedule = project(&debt, 12);
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[1].balance, 0.0);
    }

    #[test]
    fn settled_debt_has_empty_schedule() {
        let debt = Debt::new("Done", 1000.0, 10.0, 100.0).with_paid(1000.0);
        assert!(project(&debt, 12).is_empty());
        assert!(amortizes(&debt));
    }

    #[test]
    fn non_amortizing_plan_runs_every_period() {
        let debt = Debt::new("Payday", 10_000.0, 120.0, 50.0);
        assert!(!amortizes(&debt));
        let schedule = project(&debt, 6);
        assert_eq!(schedule.len(), 6);
        assert!(schedule.iter().all(|row| row.principal < 0.0));
        assert!(schedule.last().unwrap().balance > 10_000.0);
    }

    #[test]
    fn oversized_period_count_is_capped() {
        let debt = Debt::new("Payday", 10_000.0, 120.0, 50.0);
        let schedule = project(&debt, u32::MAX);
        assert_eq!(schedule.len(), MAX_PERIODS as usize);
        assert_eq!(schedule.last().unwrap().period, MAX_PERIODS);
    }

    #[test]
    fn zero_periods_yield_nothing() {
        let debt = Debt::new("Loan", 1200.0, 12.0, 200.0);
        assert!(project(&debt, 0).is_empty());
    }
}
