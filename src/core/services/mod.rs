pub mod budget_service;
pub mod debt_service;
pub mod holiday_service;
pub mod savings_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::{BudgetOverview, BudgetService};
pub use debt_service::DebtService;
pub use holiday_service::{HolidayService, HolidayUtilization};
pub use savings_service::SavingsService;
pub use summary_service::{DashboardKpis, SummaryService};
pub use transaction_service::{TransactionFilter, TransactionService};

use crate::errors::FinanceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("{0}")]
    Invalid(String),
}

pub(crate) fn not_found(kind: &str, id: &str) -> ServiceError {
    ServiceError::Invalid(format!("{kind} `{id}` not found"))
}
