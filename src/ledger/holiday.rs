//! Seasonal planning records: the holiday shopping budget and the aguinaldo
//! (mid/end-of-year bonus) projection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{period::flexible_date, transaction::new_id};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HolidayItem {
    pub id: String,
    pub name: String,
    pub estimated_cost: f64,
    #[serde(default)]
    pub actual_cost: f64,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default)]
    pub category: String,
}

impl HolidayItem {
    pub fn new(name: impl Into<String>, estimated_cost: f64, category: impl Into<String>) -> Self {
        Self {
            id: new_id("item"),
            name: name.into(),
            estimated_cost,
            actual_cost: 0.0,
            purchased: false,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HolidayBudget {
    pub id: String,
    pub name: String,
    pub budget_amount: f64,
    #[serde(default)]
    pub spent_amount: f64,
    #[serde(default)]
    pub items: Vec<HolidayItem>,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HolidayBudget {
    pub fn new(name: impl Into<String>, budget_amount: f64, year: i32) -> Self {
        Self {
            id: new_id("holiday"),
            name: name.into(),
            budget_amount,
            spent_amount: 0.0,
            items: Vec::new(),
            year,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut HolidayItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Recomputes `spent_amount` from the purchased items' actual cost.
    pub fn recompute_spent(&mut self) {
        self.spent_amount = self
            .items
            .iter()
            .filter(|item| item.purchased)
            .map(|item| item.actual_cost)
            .sum();
    }

    pub fn estimated_total(&self) -> f64 {
        self.items.iter().map(|item| item.estimated_cost).sum()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}

/// Spending buckets the net aguinaldo is split into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllocationKind {
    Savings,
    Debts,
    Shopping,
    Emergency,
    Other,
}

impl AllocationKind {
    pub const ALL: [AllocationKind; 5] = [
        AllocationKind::Savings,
        AllocationKind::Debts,
        AllocationKind::Shopping,
        AllocationKind::Emergency,
        AllocationKind::Other,
    ];
}

/// Per-bucket amounts (or shares, when used as a plan).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Allocations {
    pub savings: f64,
    pub debts: f64,
    pub shopping: f64,
    pub emergency: f64,
    pub other: f64,
}

impl Allocations {
    pub fn get(&self, kind: AllocationKind) -> f64 {
        match kind {
            AllocationKind::Savings => self.savings,
            AllocationKind::Debts => self.debts,
            AllocationKind::Shopping => self.shopping,
            AllocationKind::Emergency => self.emergency,
            AllocationKind::Other => self.other,
        }
    }

    pub fn set(&mut self, kind: AllocationKind, amount: f64) {
        match kind {
            AllocationKind::Savings => self.savings = amount,
            AllocationKind::Debts => self.debts = amount,
            AllocationKind::Shopping => self.shopping = amount,
            AllocationKind::Emergency => self.emergency = amount,
            AllocationKind::Other => self.other = amount,
        }
    }

    pub fn total(&self) -> f64 {
        AllocationKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }

    /// Scales every share by `amount`.
    pub fn scaled(&self, amount: f64) -> Self {
        let mut scaled = Self::default();
        for kind in AllocationKind::ALL {
            scaled.set(kind, amount * self.get(kind));
        }
        scaled
    }

    /// The split used when the user has not configured one.
    pub fn default_plan() -> Self {
        Self {
            savings: 0.3,
            debts: 0.2,
            shopping: 0.3,
            emergency: 0.1,
            other: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AguinaldoProjection {
    pub gross_amount: f64,
    /// Percentage withheld, e.g. `13.0`.
    pub tax_rate: f64,
    pub net_amount: f64,
    #[serde(with = "flexible_date")]
    pub expected_date: NaiveDate,
    pub allocations: Allocations,
}

impl AguinaldoProjection {
    /// Applies the tax rate to `gross_amount` and splits the net by `plan` shares.
    pub fn project(
        gross_amount: f64,
        tax_rate: f64,
        expected_date: NaiveDate,
        plan: &Allocations,
    ) -> Self {
        let net_amount = gross_amount * (1.0 - tax_rate / 100.0);
        Self {
            gross_amount,
            tax_rate,
            net_amount,
            expected_date,
            allocations: plan.scaled(net_amount),
        }
    }

    pub fn tax_amount(&self) -> f64 {
        self.gross_amount - self.net_amount
    }

    /// Net amount not assigned to any bucket; negative when over-allocated.
    pub fn unallocated(&self) -> f64 {
        self.net_amount - self.allocations.total()
    }
}

/// Persisted shape of the holiday storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HolidayState {
    #[serde(default)]
    pub budgets: Vec<HolidayBudget>,
    #[serde(default)]
    pub aguinaldo: Option<AguinaldoProjection>,
}
