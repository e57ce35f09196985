//! Boundary checks applied to records entering the ledger from callers,
//! storage or an imported snapshot.

use tracing::warn;

use crate::errors::{FinanceError, FinanceResult};
use crate::ledger::{
    AguinaldoProjection, Budget, Debt, HolidayBudget, Ledger, SavingsGoal, Transaction,
};

pub fn ensure_finite(field: &str, value: f64) -> FinanceResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FinanceError::Validation(format!(
            "{field} must be a finite number, got {value}"
        )))
    }
}

fn warn_if_negative(record: &str, id: &str, field: &str, value: f64) {
    if value < 0.0 {
        warn!(record, id, field, value, "negative amount accepted");
    }
}

pub fn validate_transaction(txn: &Transaction) -> FinanceResult<()> {
    ensure_finite("transaction amount", txn.amount)?;
    warn_if_negative("transaction", &txn.id, "amount", txn.amount);
    if txn.is_recurring {
        match txn.recurring_day {
            Some(day) if !(1..=31).contains(&day) => {
                return Err(FinanceError::Validation(format!(
                    "transaction {} has recurring day {day}; expected 1-31",
                    txn.id
                )));
            }
            None => warn!(id = %txn.id, "recurring transaction without a day is never materialized"),
            _ => {}
        }
    }
    Ok(())
}

pub fn validate_budget(budget: &Budget) -> FinanceResult<()> {
    ensure_finite("budget planned amount", budget.planned_amount)?;
    warn_if_negative("budget", &budget.id, "plannedAmount", budget.planned_amount);
    if budget.period().is_none() {
        return Err(FinanceError::Validation(format!(
            "budget {} has month {}; expected 0-11",
            budget.id, budget.month
        )));
    }
    Ok(())
}

pub fn validate_goal(goal: &SavingsGoal) -> FinanceResult<()> {
    ensure_finite("goal target amount", goal.target_amount)?;
    ensure_finite("goal current amount", goal.current_amount)?;
    warn_if_negative("goal", &goal.id, "targetAmount", goal.target_amount);
    Ok(())
}

pub fn validate_debt(debt: &Debt) -> FinanceResult<()> {
    ensure_finite("debt total amount", debt.total_amount)?;
    ensure_finite("debt paid amount", debt.paid_amount)?;
    ensure_finite("debt interest rate", debt.interest_rate)?;
    ensure_finite("debt monthly payment", debt.monthly_payment)?;
    warn_if_negative("debt", &debt.id, "totalAmount", debt.total_amount);
    warn_if_negative("debt", &debt.id, "monthlyPayment", debt.monthly_payment);
    Ok(())
}

pub fn validate_holiday_budget(budget: &HolidayBudget) -> FinanceResult<()> {
    ensure_finite("holiday budget amount", budget.budget_amount)?;
    ensure_finite("holiday spent amount", budget.spent_amount)?;
    for item in &budget.items {
        ensure_finite("holiday item estimated cost", item.estimated_cost)?;
        ensure_finite("holiday item actual cost", item.actual_cost)?;
    }
    Ok(())
}

pub fn validate_aguinaldo(projection: &AguinaldoProjection) -> FinanceResult<()> {
    ensure_finite("aguinaldo gross amount", projection.gross_amount)?;
    ensure_finite("aguinaldo tax rate", projection.tax_rate)?;
    ensure_finite("aguinaldo net amount", projection.net_amount)?;
    ensure_finite("aguinaldo allocations", projection.allocations.total())?;
    Ok(())
}

/// Validates every record in `ledger`, stopping at the first failure.
pub fn validate_ledger(ledger: &Ledger) -> FinanceResult<()> {
    ledger.transactions.iter().try_for_each(validate_transaction)?;
    ledger.budgets.iter().try_for_each(validate_budget)?;
    ledger.savings_goals.iter().try_for_each(validate_goal)?;
    ledger.debts.iter().try_for_each(validate_debt)?;
    ledger
        .holiday_budgets
        .iter()
        .try_for_each(validate_holiday_budget)?;
    if let Some(projection) = &ledger.aguinaldo {
        validate_aguinaldo(projection)?;
    }
    Ok(())
}
