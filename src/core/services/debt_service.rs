use tracing::info;

use crate::core::services::{not_found, ServiceError, ServiceResult};
use crate::core::time::Clock;
use crate::core::validation::{ensure_finite, validate_debt};
use crate::ledger::{
    amortization, transaction::new_id, AmortizationRow, Debt, DebtProgress, DebtStatus, Ledger,
};

pub struct DebtService;

impl DebtService {
    pub fn add(ledger: &mut Ledger, mut debt: Debt, clock: &dyn Clock) -> ServiceResult<String> {
        validate_debt(&debt)?;
        if debt.id.trim().is_empty() || ledger.debt(&debt.id).is_some() {
            debt.id = new_id("debt");
        }
        debt.touch(clock.now());
        let id = debt.id.clone();
        ledger.debts.push(debt);
        Ok(id)
    }

    pub fn update<F>(ledger: &mut Ledger, id: &str, clock: &dyn Clock, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Debt),
    {
        let debt = ledger.debt_mut(id).ok_or_else(|| not_found("debt", id))?;
        let mut draft = debt.clone();
        mutator(&mut draft);
        draft.id = debt.id.clone();
        validate_debt(&draft)?;
        draft.touch(clock.now());
        *debt = draft;
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: &str) -> ServiceResult<Debt> {
        let index = ledger
            .debts
            .iter()
            .position(|debt| debt.id == id)
            .ok_or_else(|| not_found("debt", id))?;
        Ok(ledger.debts.remove(index))
    }

    /// Records a payment and returns the resulting status, which becomes
    /// [`DebtStatus::Paid`] once the paid amount reaches the total.
    pub fn add_payment(
        ledger: &mut Ledger,
        id: &str,
        amount: f64,
        clock: &dyn Clock,
    ) -> ServiceResult<DebtStatus> {
        ensure_finite("payment", amount)?;
        if amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "payment must be greater than zero".into(),
            ));
        }
        let debt = ledger.debt_mut(id).ok_or_else(|| not_found("debt", id))?;
        let before = debt.status;
        debt.apply_payment(amount);
        debt.touch(clock.now());
        if before != debt.status {
            info!(debt = %debt.id, status = ?debt.status, "debt status changed");
        }
        Ok(debt.status)
    }

    pub fn active(ledger: &Ledger) -> Vec<&Debt> {
        ledger
            .debts
            .iter()
            .filter(|debt| debt.status == DebtStatus::Active)
            .collect()
    }

    /// Remaining balance across debts that are not yet paid.
    pub fn outstanding(ledger: &Ledger) -> f64 {
        ledger
            .debts
            .iter()
            .filter(|debt| debt.status != DebtStatus::Paid)
            .map(Debt::remaining)
            .sum()
    }

    pub fn progress(debt: &Debt) -> DebtProgress {
        DebtProgress::evaluate(debt)
    }

    pub fn schedule(ledger: &Ledger, id: &str, periods: u32) -> ServiceResult<Vec<AmortizationRow>> {
        let debt = ledger.debt(id).ok_or_else(|| not_found("debt", id))?;
        Ok(amortization::project(debt, periods))
    }
}
