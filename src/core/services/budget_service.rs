use serde::Serialize;

use crate::core::services::{not_found, ServiceResult};
use crate::core::time::Clock;
use crate::core::validation::validate_budget;
use crate::ledger::{
    aggregate::sum_by_category, transaction::new_id, Budget, BudgetUtilization, Category, Ledger,
    MonthPeriod,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub budget_id: String,
    pub category: Category,
    pub planned: f64,
    pub spent: f64,
    pub utilization: BudgetUtilization,
}

/// Planned-versus-actual view of every budget in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub period: MonthPeriod,
    pub total_planned: f64,
    /// Spending across the budgeted categories, each category counted once.
    pub total_spent: f64,
    pub lines: Vec<BudgetLine>,
}

impl BudgetOverview {
    pub fn utilization(&self) -> BudgetUtilization {
        BudgetUtilization::evaluate(self.total_planned, self.total_spent)
    }
}

pub struct BudgetService;

impl BudgetService {
    pub fn add(ledger: &mut Ledger, mut budget: Budget, clock: &dyn Clock) -> ServiceResult<String> {
        validate_budget(&budget)?;
        if budget.id.trim().is_empty() || ledger.budget(&budget.id).is_some() {
            budget.id = new_id("budget");
        }
        budget.touch(clock.now());
        let id = budget.id.clone();
        ledger.budgets.push(budget);
        Ok(id)
    }

    pub fn update<F>(ledger: &mut Ledger, id: &str, clock: &dyn Clock, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Budget),
    {
        let budget = ledger
            .budget_mut(id)
            .ok_or_else(|| not_found("budget", id))?;
        let mut draft = budget.clone();
        mutator(&mut draft);
        draft.id = budget.id.clone();
        validate_budget(&draft)?;
        draft.touch(clock.now());
        *budget = draft;
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: &str) -> ServiceResult<Budget> {
        let index = ledger
            .budgets
            .iter()
            .position(|budget| budget.id == id)
            .ok_or_else(|| not_found("budget", id))?;
        Ok(ledger.budgets.remove(index))
    }

    /// First budget recorded for `category` in `period`.
    pub fn find<'a>(ledger: &'a Ledger, category: Category, period: MonthPeriod) -> Option<&'a Budget> {
        ledger
            .budgets
            .iter()
            .find(|budget| budget.matches(category, period))
    }

    pub fn list_for(ledger: &Ledger, period: MonthPeriod) -> Vec<&Budget> {
        ledger
            .budgets
            .iter()
            .filter(|budget| budget.period() == Some(period))
            .collect()
    }

    /// Total planned for `category` in `period`. Duplicate budgets add up.
    pub fn planned_for(ledger: &Ledger, category: Category, period: MonthPeriod) -> f64 {
        ledger
            .budgets
            .iter()
            .filter(|budget| budget.matches(category, period))
            .map(|budget| budget.planned_amount)
            .sum()
    }

    /// Spending recorded under the budget's category in the budget's own month.
    pub fn spent_for(ledger: &Ledger, budget: &Budget) -> f64 {
        match budget.period() {
            Some(period) => sum_by_category(&ledger.transactions, budget.category, Some(period)),
            None => 0.0,
        }
    }

    pub fn evaluate(ledger: &Ledger, budget: &Budget) -> BudgetUtilization {
        BudgetUtilization::evaluate(budget.planned_amount, Self::spent_for(ledger, budget))
    }

    pub fn month_overview(ledger: &Ledger, period: MonthPeriod) -> BudgetOverview {
        let budgets = Self::list_for(ledger, period);
        let lines: Vec<BudgetLine> = budgets
            .iter()
            .map(|budget| {
                let spent = Self::spent_for(ledger, budget);
                BudgetLine {
                    budget_id: budget.id.clone(),
                    category: budget.category,
                    planned: budget.planned_amount,
                    spent,
                    utilization: BudgetUtilization::evaluate(budget.planned_amount, spent),
                }
            })
            .collect();

        let mut categories: Vec<Category> = lines.iter().map(|line| line.category).collect();
        categories.sort();
        categories.dedup();
        let total_spent = categories
            .into_iter()
            .map(|category| sum_by_category(&ledger.transactions, category, Some(period)))
            .sum();

        BudgetOverview {
            period,
            total_planned: lines.iter().map(|line| line.planned).sum(),
            total_spent,
            lines,
        }
    }
}
