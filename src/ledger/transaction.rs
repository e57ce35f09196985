use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category::Category, period::flexible_date};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A single income or expense entry. Entries flagged `is_recurring` act as
/// monthly templates for the recurring materializer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Category,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_day: Option<u32>,
    /// Set on instances generated from a recurring template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        amount: f64,
        category: Category,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id("txn"),
            kind,
            amount,
            category,
            date,
            note: note.into(),
            is_recurring: false,
            recurring_day: None,
            template_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn income(amount: f64, category: Category, date: NaiveDate, note: &str) -> Self {
        Self::new(TransactionType::Income, amount, category, date, note)
    }

    pub fn expense(amount: f64, category: Category, date: NaiveDate, note: &str) -> Self {
        Self::new(TransactionType::Expense, amount, category, date, note)
    }

    /// Marks the transaction as a monthly template due on `day`.
    pub fn recurring_on(mut self, day: u32) -> Self {
        self.is_recurring = true;
        self.recurring_day = Some(day);
        self
    }

    /// Returns the template's due day when this entry is a usable recurring
    /// template.
    pub fn template_day(&self) -> Option<u32> {
        if !self.is_recurring {
            return None;
        }
        self.recurring_day.filter(|day| (1..=31).contains(day))
    }

    pub fn is_template(&self) -> bool {
        self.template_day().is_some()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}

/// Generates a fresh record identifier with a readable prefix.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
