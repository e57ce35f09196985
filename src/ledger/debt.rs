use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{period::flexible_date, transaction::new_id};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    #[default]
    Active,
    Paid,
    /// Only ever set explicitly; nothing derives it.
    Overdue,
}

/// An outstanding debt with a fixed monthly payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub name: String,
    pub total_amount: f64,
    pub paid_amount: f64,
    /// Annual percentage, e.g. `12.0` for 12%.
    pub interest_rate: f64,
    pub monthly_payment: f64,
    #[serde(default)]
    pub status: DebtStatus,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Debt {
    pub fn new(
        name: impl Into<String>,
        total_amount: f64,
        interest_rate: f64,
        monthly_payment: f64,
    ) -> Self {
        Self {
            id: new_id("debt"),
            name: name.into(),
            total_amount,
            paid_amount: 0.0,
            interest_rate,
            monthly_payment,
            status: DebtStatus::Active,
            start_date: None,
            end_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_paid(mut self, paid_amount: f64) -> Self {
        self.paid_amount = paid_amount;
        self
    }

    pub fn remaining(&self) -> f64 {
        self.total_amount - self.paid_amount
    }

    /// Records a payment and flips the status to `Paid` once the total is covered.
    pub fn apply_payment(&mut self, amount: f64) {
        self.paid_amount += amount;
        if self.paid_amount >= self.total_amount {
            self.status = DebtStatus::Paid;
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}
