//! Planned-versus-actual evaluators for budgets, savings goals, and debts.
//!
//! Percentages are `actual / planned * 100` when the planned figure is
//! positive and `0` otherwise, so none of these functions can divide by zero.

use chrono::NaiveDate;
use serde::Serialize;

use super::{debt::Debt, savings::SavingsGoal};

fn percentage(actual: f64, planned: f64) -> f64 {
    if planned > 0.0 {
        actual / planned * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetUtilization {
    pub percentage: f64,
    /// Negative once spending exceeds the plan.
    pub remaining: f64,
    pub overspent: bool,
}

impl BudgetUtilization {
    pub fn evaluate(planned: f64, actual: f64) -> Self {
        Self {
            percentage: percentage(actual, planned),
            remaining: planned - actual,
            overspent: actual > planned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub percentage: f64,
    pub remaining: f64,
    /// Whole days until the deadline; zero or negative once it has passed.
    pub days_left: i64,
}

impl GoalProgress {
    pub fn evaluate(goal: &SavingsGoal, today: NaiveDate) -> Self {
        Self {
            percentage: percentage(goal.current_amount, goal.target_amount),
            remaining: goal.target_amount - goal.current_amount,
            days_left: (goal.deadline - today).num_days(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.days_left <= 0
    }
}

/// Linear payoff estimate that ignores interest; see
/// [`amortization::project`](super::amortization::project) for the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebtProgress {
    pub percentage: f64,
    pub remaining: f64,
    pub months_left: i64,
}

impl DebtProgress {
    pub fn evaluate(debt: &Debt) -> Self {
        let remaining = debt.total_amount - debt.paid_amount;
        let months_left = if debt.monthly_payment > 0.0 {
            (remaining / debt.monthly_payment).ceil() as i64
        } else {
            0
        };
        Self {
            percentage: percentage(debt.paid_amount, debt.total_amount),
            remaining,
            months_left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn budget_under_plan() {
        let result = BudgetUtilization::evaluate(400.0, 100.0);
        assert_eq!(result.percentage, 25.0);
        assert_eq!(result.remaining, 300.0);
        assert!(!result.overspent);
    }

    #[test]
    fn budget_exactly_on_plan_is_not_overspent() {
        let result = BudgetUtilization::evaluate(250.0, 250.0);
        assert_eq!(result.percentage, 100.0);
        assert!(!result.overspent);
    }

    #[test]
    fn budget_scale_invariance() {
        for (planned, actual) in [(400.0, 100.0), (120.0, 180.0), (75.5, 75.5)] {
            let base = BudgetUtilization::evaluate(planned, actual);
            let doubled = BudgetUtilization::evaluate(planned * 2.0, actual * 2.0);
            assert!((base.percentage - doubled.percentage).abs() < 1e-9);
            assert_eq!(base.overspent, doubled.overspent);
            assert!((base.remaining * 2.0 - doubled.remaining).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_plan_with_spending() {
        let result = BudgetUtilization::evaluate(0.0, 40.0);
        assert_eq!(result.percentage, 0.0);
        assert!(result.overspent);
        assert!(result.remaining < 0.0);
    }

    #[test]
    fn goal_progress_counts_days_from_explicit_today() {
        let goal = SavingsGoal::new("Trip", 2000.0, date(2024, 7, 1)).with_current(500.0);
        let progress = GoalProgress::evaluate(&goal, date(2024, 6, 21));
        assert_eq!(progress.percentage, 25.0);
        assert_eq!(progress.remaining, 1500.0);
        assert_eq!(progress.days_left, 10);
        assert!(!progress.is_expired());
    }

    #[test]
    fn goal_past_deadline_is_expired() {
        let goal = SavingsGoal::new("Laptop", 0.0, date(2024, 1, 1)).with_current(10.0);
        let progress = GoalProgress::evaluate(&goal, date(2024, 1, 4));
        assert_eq!(progress.days_left, -3);
        assert!(progress.is_expired());
        assert_eq!(progress.percentage, 0.0);

        let due_today = GoalProgress::evaluate(&goal, date(2024, 1, 1));
        assert!(due_today.is_expired());
    }

    #[test]
    fn overfunded_goal_exceeds_hundred_percent() {
        let goal = SavingsGoal::new("Fund", 100.0, date(2025, 1, 1)).with_current(150.0);
        let progress = GoalProgress::evaluate(&goal, date(2024, 1, 1));
        assert_eq!(progress.percentage, 150.0);
        assert_eq!(progress.remaining, -50.0);
    }

    #[test]
    fn fully_paid_debt() {
        let debt = Debt::new("Phone", 1000.0, 0.0, 100.0).with_paid(1000.0);
        let progress = DebtProgress::evaluate(&debt);
        assert_eq!(progress.percentage, 100.0);
        assert_eq!(progress.remaining, 0.0);
        assert_eq!(progress.months_left, 0);
    }

    #[test]
    fn debt_months_left_rounds_up() {
        let debt = Debt::new("Loan", 1000.0, 30.0, 300.0).with_paid(100.0);
        let progress = DebtProgress::evaluate(&debt);
        assert_eq!(progress.percentage, 10.0);
        assert_eq!(progress.remaining, 900.0);
        assert_eq!(progress.months_left, 3);

        let no_payment = Debt::new("Family", 500.0, 0.0, 0.0);
        assert_eq!(DebtProgress::evaluate(&no_payment).months_left, 0);
    }
}
