use serde::{Deserialize, Serialize};

use super::{
    budget::Budget,
    debt::Debt,
    holiday::{AguinaldoProjection, HolidayBudget, HolidayState},
    savings::SavingsGoal,
    transaction::Transaction,
};

/// In-memory state of the dashboard: every record collection, passed
/// explicitly to the services that read or change it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub holiday_budgets: Vec<HolidayBudget>,
    #[serde(default)]
    pub aguinaldo: Option<AguinaldoProjection>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.budgets.is_empty()
            && self.savings_goals.is_empty()
            && self.debts.is_empty()
            && self.holiday_budgets.is_empty()
            && self.aguinaldo.is_none()
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: &str) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: &str) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&SavingsGoal> {
        self.savings_goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: &str) -> Option<&mut SavingsGoal> {
        self.savings_goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn debt(&self, id: &str) -> Option<&Debt> {
        self.debts.iter().find(|debt| debt.id == id)
    }

    pub fn debt_mut(&mut self, id: &str) -> Option<&mut Debt> {
        self.debts.iter_mut().find(|debt| debt.id == id)
    }

    pub fn holiday_budget(&self, id: &str) -> Option<&HolidayBudget> {
        self.holiday_budgets.iter().find(|budget| budget.id == id)
    }

    pub fn holiday_budget_mut(&mut self, id: &str) -> Option<&mut HolidayBudget> {
        self.holiday_budgets.iter_mut().find(|budget| budget.id == id)
    }

    /// The holiday budgets and aguinaldo projection as they are persisted together.
    pub fn holiday_state(&self) -> HolidayState {
        HolidayState {
            budgets: self.holiday_budgets.clone(),
            aguinaldo: self.aguinaldo.clone(),
        }
    }

    pub fn set_holiday_state(&mut self, state: HolidayState) {
        self.holiday_budgets = state.budgets;
        self.aguinaldo = state.aguinaldo;
    }
}
