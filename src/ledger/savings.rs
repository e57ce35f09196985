use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{period::flexible_date, transaction::new_id};

/// A savings target with a deadline. `current_amount` is not capped at the target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(with = "flexible_date")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: f64, deadline: NaiveDate) -> Self {
        Self {
            id: new_id("goal"),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline,
            color: "#10b981".into(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_current(mut self, current_amount: f64) -> Self {
        self.current_amount = current_amount;
        self
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}
