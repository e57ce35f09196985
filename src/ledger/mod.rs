//! Ledger records and the pure derivation engine built on top of them.
//!
//! Nothing in this module touches storage or reads the clock; callers pass
//! `today` explicitly wherever a result depends on it.

pub mod aggregate;
pub mod amortization;
pub mod budget;
pub mod category;
pub mod debt;
pub mod holiday;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod progress;
pub mod recurring;
pub mod savings;
pub mod time_series;
pub mod transaction;

pub use aggregate::{CategoryTotal, MonthlyBalance};
pub use amortization::AmortizationRow;
pub use budget::Budget;
pub use category::{Category, CategoryKind};
pub use debt::{Debt, DebtStatus};
pub use holiday::{
    AguinaldoProjection, AllocationKind, Allocations, HolidayBudget, HolidayItem, HolidayState,
};
pub use ledger::Ledger;
pub use period::MonthPeriod;
pub use progress::{BudgetUtilization, DebtProgress, GoalProgress};
pub use recurring::{RecurringSnapshot, RecurringState};
pub use savings::SavingsGoal;
pub use time_series::MonthlyPoint;
pub use transaction::{Transaction, TransactionType};
