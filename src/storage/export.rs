//! Bulk export and import of the whole ledger as a single JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::validation::{
    validate_aguinaldo, validate_budget, validate_debt, validate_goal, validate_holiday_budget,
    validate_transaction,
};
use crate::errors::{FinanceError, FinanceResult};
use crate::ledger::{Budget, Debt, HolidayState, Ledger, SavingsGoal, Transaction};

pub const EXPORT_VERSION: &str = "1.0";

/// Export document. Every collection is optional on import; only the ones
/// present replace the current state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    pub budgets: Option<Vec<Budget>>,
    #[serde(default)]
    pub savings: Option<Vec<SavingsGoal>>,
    #[serde(default)]
    pub debts: Option<Vec<Debt>>,
    #[serde(default)]
    pub holiday: Option<HolidayState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ExportSnapshot {
    pub fn from_ledger(ledger: &Ledger, exported_at: DateTime<Utc>) -> Self {
        Self {
            transactions: Some(ledger.transactions.clone()),
            budgets: Some(ledger.budgets.clone()),
            savings: Some(ledger.savings_goals.clone()),
            debts: Some(ledger.debts.clone()),
            holiday: Some(ledger.holiday_state()),
            export_date: Some(exported_at),
            version: Some(EXPORT_VERSION.to_string()),
        }
    }

    pub fn to_json_pretty(&self) -> FinanceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates an export document. Fails when neither
    /// transactions nor budgets are present or any record is invalid.
    pub fn parse(json: &str) -> FinanceResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.transactions.is_none() && self.budgets.is_none() {
            return Err(FinanceError::Validation(
                "import must contain transactions or budgets".into(),
            ));
        }
        for txn in self.transactions.iter().flatten() {
            validate_transaction(txn)?;
        }
        for budget in self.budgets.iter().flatten() {
            validate_budget(budget)?;
        }
        for goal in self.savings.iter().flatten() {
            validate_goal(goal)?;
        }
        for debt in self.debts.iter().flatten() {
            validate_debt(debt)?;
        }
        if let Some(holiday) = &self.holiday {
            holiday.budgets.iter().try_for_each(validate_holiday_budget)?;
            if let Some(projection) = &holiday.aguinaldo {
                validate_aguinaldo(projection)?;
            }
        }
        Ok(())
    }

    /// Replaces the collections present in the snapshot, leaving the rest.
    pub fn apply_to(self, ledger: &mut Ledger) {
        let mut replaced = Vec::new();
        if let Some(transactions) = self.transactions {
            ledger.transactions = transactions;
            replaced.push("transactions");
        }
        if let Some(budgets) = self.budgets {
            ledger.budgets = budgets;
            replaced.push("budgets");
        }
        if let Some(savings) = self.savings {
            ledger.savings_goals = savings;
            replaced.push("savings");
        }
        if let Some(debts) = self.debts {
            ledger.debts = debts;
            replaced.push("debts");
        }
        if let Some(holiday) = self.holiday {
            ledger.set_holiday_state(holiday);
            replaced.push("holiday");
        }
        info!(?replaced, "snapshot imported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Category;
    use chrono::NaiveDate;

    #[test]
    fn import_requires_transactions_or_budgets() {
        let err = ExportSnapshot::parse(r#"{"savings": []}"#).unwrap_err();
        assert!(matches!(err, FinanceError::Validation(_)));
        assert!(ExportSnapshot::parse(r#"{"budgets": []}"#).is_ok());
    }

    #[test]
    fn invalid_record_rejects_whole_snapshot() {
        let json = r#"{
            "transactions": [],
            "budgets": [{"id": "b1", "category": "food", "plannedAmount": 10, "month": 14, "year": 2024}]
        }"#;
        assert!(ExportSnapshot::parse(json).is_err());
    }

    #[test]
    fn apply_replaces_only_present_collections() {
        let mut ledger = Ledger::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        ledger
            .transactions
            .push(Transaction::expense(5.0, Category::Food, date, "old"));
        ledger
            .savings_goals
            .push(SavingsGoal::new("Keep", 100.0, date));

        let snapshot = ExportSnapshot::parse(r#"{"transactions": []}"#).unwrap();
        snapshot.apply_to(&mut ledger);
        assert!(ledger.transactions.is_empty());
        assert_eq!(ledger.savings_goals.len(), 1);
    }

    #[test]
    fn export_carries_version_and_date() {
        let now = Utc::now();
        let snapshot = ExportSnapshot::from_ledger(&Ledger::new(), now);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["version"], "1.0");
        assert!(value["exportDate"].is_string());
        assert!(value["holiday"]["budgets"].is_array());
    }
}
