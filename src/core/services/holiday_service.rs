//! Holiday spending plans and the aguinaldo (year-end bonus) projection.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::core::services::{not_found, ServiceError, ServiceResult};
use crate::core::time::Clock;
use crate::core::validation::{ensure_finite, validate_aguinaldo, validate_holiday_budget};
use crate::ledger::{
    transaction::new_id, AguinaldoProjection, AllocationKind, Allocations, HolidayBudget,
    HolidayItem, Ledger,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HolidayUtilization {
    pub percentage: f64,
    pub remaining: f64,
    pub estimated_total: f64,
}

pub struct HolidayService;

impl HolidayService {
    pub fn add_budget(
        ledger: &mut Ledger,
        mut budget: HolidayBudget,
        clock: &dyn Clock,
    ) -> ServiceResult<String> {
        validate_holiday_budget(&budget)?;
        if budget.id.trim().is_empty() || ledger.holiday_budget(&budget.id).is_some() {
            budget.id = new_id("holiday");
        }
        budget.touch(clock.now());
        let id = budget.id.clone();
        ledger.holiday_budgets.push(budget);
        Ok(id)
    }

    pub fn update_budget<F>(
        ledger: &mut Ledger,
        id: &str,
        clock: &dyn Clock,
        mutator: F,
    ) -> ServiceResult<()>
    where
        F: FnOnce(&mut HolidayBudget),
    {
        Self::edit_budget(ledger, id, clock, mutator)
    }

    pub fn remove_budget(ledger: &mut Ledger, id: &str) -> ServiceResult<HolidayBudget> {
        let index = ledger
            .holiday_budgets
            .iter()
            .position(|budget| budget.id == id)
            .ok_or_else(|| not_found("holiday budget", id))?;
        Ok(ledger.holiday_budgets.remove(index))
    }

    pub fn add_item(
        ledger: &mut Ledger,
        budget_id: &str,
        mut item: HolidayItem,
        clock: &dyn Clock,
    ) -> ServiceResult<String> {
        let budget = ledger
            .holiday_budget(budget_id)
            .ok_or_else(|| not_found("holiday budget", budget_id))?;
        if item.id.trim().is_empty() || budget.items.iter().any(|existing| existing.id == item.id) {
            item.id = new_id("item");
        }
        let item_id = item.id.clone();
        Self::edit_budget(ledger, budget_id, clock, |budget| budget.items.push(item))?;
        Ok(item_id)
    }

    pub fn update_item<F>(
        ledger: &mut Ledger,
        budget_id: &str,
        item_id: &str,
        clock: &dyn Clock,
        mutator: F,
    ) -> ServiceResult<()>
    where
        F: FnOnce(&mut HolidayItem),
    {
        Self::ensure_item(ledger, budget_id, item_id)?;
        Self::edit_budget(ledger, budget_id, clock, |budget| {
            if let Some(item) = budget.item_mut(item_id) {
                let id = item.id.clone();
                mutator(&mut *item);
                item.id = id;
            }
        })
    }

    pub fn remove_item(
        ledger: &mut Ledger,
        budget_id: &str,
        item_id: &str,
        clock: &dyn Clock,
    ) -> ServiceResult<()> {
        Self::ensure_item(ledger, budget_id, item_id)?;
        Self::edit_budget(ledger, budget_id, clock, |budget| {
            budget.items.retain(|item| item.id != item_id);
        })
    }

    /// Marks the item purchased at `actual_cost` and returns the budget's new
    /// spent amount.
    pub fn mark_item_purchased(
        ledger: &mut Ledger,
        budget_id: &str,
        item_id: &str,
        actual_cost: f64,
        clock: &dyn Clock,
    ) -> ServiceResult<f64> {
        ensure_finite("actual cost", actual_cost)?;
        Self::update_item(ledger, budget_id, item_id, clock, |item| {
            item.purchased = true;
            item.actual_cost = actual_cost;
        })?;
        let spent = ledger
            .holiday_budget(budget_id)
            .map(|budget| budget.spent_amount)
            .unwrap_or_default();
        info!(budget = budget_id, item = item_id, spent, "holiday item purchased");
        Ok(spent)
    }

    pub fn utilization(budget: &HolidayBudget) -> HolidayUtilization {
        let percentage = if budget.budget_amount > 0.0 {
            budget.spent_amount / budget.budget_amount * 100.0
        } else {
            0.0
        };
        HolidayUtilization {
            percentage,
            remaining: budget.budget_amount - budget.spent_amount,
            estimated_total: budget.estimated_total(),
        }
    }

    /// Computes and stores the aguinaldo projection.
    pub fn project_aguinaldo(
        ledger: &mut Ledger,
        gross_amount: f64,
        tax_rate: f64,
        expected_date: NaiveDate,
        plan: &Allocations,
    ) -> ServiceResult<AguinaldoProjection> {
        ensure_finite("gross amount", gross_amount)?;
        ensure_finite("tax rate", tax_rate)?;
        if !(0.0..=100.0).contains(&tax_rate) {
            return Err(ServiceError::Invalid(format!(
                "tax rate {tax_rate} must be between 0 and 100"
            )));
        }
        let projection = AguinaldoProjection::project(gross_amount, tax_rate, expected_date, plan);
        validate_aguinaldo(&projection)?;
        ledger.aguinaldo = Some(projection.clone());
        Ok(projection)
    }

    /// Overrides one allocation amount and returns what is left unallocated.
    pub fn update_allocation(
        ledger: &mut Ledger,
        kind: AllocationKind,
        amount: f64,
    ) -> ServiceResult<f64> {
        ensure_finite("allocation", amount)?;
        let projection = ledger
            .aguinaldo
            .as_mut()
            .ok_or_else(|| ServiceError::Invalid("no aguinaldo projection recorded".into()))?;
        projection.allocations.set(kind, amount);
        Ok(projection.unallocated())
    }

    fn ensure_item(ledger: &Ledger, budget_id: &str, item_id: &str) -> ServiceResult<()> {
        let budget = ledger
            .holiday_budget(budget_id)
            .ok_or_else(|| not_found("holiday budget", budget_id))?;
        if budget.items.iter().any(|item| item.id == item_id) {
            Ok(())
        } else {
            Err(not_found("holiday item", item_id))
        }
    }

    /// Applies `mutator` to a copy, recomputes the spent amount, validates,
    /// then commits.
    fn edit_budget<F>(ledger: &mut Ledger, id: &str, clock: &dyn Clock, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut HolidayBudget),
    {
        let budget = ledger
            .holiday_budget_mut(id)
            .ok_or_else(|| not_found("holiday budget", id))?;
        let mut draft = budget.clone();
        mutator(&mut draft);
        draft.id = budget.id.clone();
        draft.recompute_spent();
        validate_holiday_budget(&draft)?;
        draft.touch(clock.now());
        *budget = draft;
        Ok(())
    }
}
