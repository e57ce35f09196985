use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{category::Category, period::MonthPeriod, transaction::new_id};

/// A planned spending amount for one category in one calendar month.
///
/// Nothing prevents two budgets for the same `(category, month, year)`; the
/// services treat duplicates additively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: Category,
    pub planned_amount: f64,
    /// Zero-based month (0 = January).
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn new(category: Category, planned_amount: f64, period: MonthPeriod) -> Self {
        Self {
            id: new_id("budget"),
            category,
            planned_amount,
            month: period.month,
            year: period.year,
            created_at: None,
            updated_at: None,
        }
    }

    /// The budget's month, or `None` when the stored month index is out of range.
    pub fn period(&self) -> Option<MonthPeriod> {
        MonthPeriod::new(self.month, self.year)
    }

    pub fn matches(&self, category: Category, period: MonthPeriod) -> bool {
        self.category == category && self.month == period.month && self.year == period.year
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}
