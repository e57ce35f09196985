//! Monthly materialization of recurring transaction templates.
//!
//! Each template is, for the month containing `today`, either pending (its
//! due day has not arrived and no instance exists) or materialized (an
//! instance exists). Materializing appends one concrete instance dated on the
//! due day; running it again in the same month finds that instance and emits
//! nothing, so it is safe to call on every load.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use super::{
    period::MonthPeriod,
    transaction::{new_id, Transaction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecurringState {
    /// Due day not reached yet and nothing generated this month.
    Pending,
    /// An instance already exists for this month.
    Materialized,
    /// Due day reached but no instance exists yet.
    Due,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringSnapshot {
    pub template_id: String,
    pub note: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub state: RecurringState,
}

/// Date the template falls due within `period`. Due days past the end of a
/// short month fall on its last day.
pub fn due_date(day: u32, period: MonthPeriod) -> NaiveDate {
    period.day_clamped(day)
}

/// Whether `candidate` is the instance generated from `template` in `period`.
///
/// Instances carrying a `template_id` match by identifier only. Older
/// instances without one match on note, amount and type, which cannot tell
/// apart two templates that share all three.
pub fn is_instance_of(candidate: &Transaction, template: &Transaction, period: MonthPeriod) -> bool {
    if candidate.id == template.id || candidate.is_template() {
        return false;
    }
    if !period.contains(candidate.date) {
        return false;
    }
    match candidate.template_id.as_deref() {
        Some(template_id) => template_id == template.id,
        None => {
            candidate.note == template.note
                && candidate.amount == template.amount
                && candidate.kind == template.kind
        }
    }
}

pub fn template_state(
    template: &Transaction,
    transactions: &[Transaction],
    today: NaiveDate,
) -> Option<RecurringState> {
    let day = template.template_day()?;
    let period = MonthPeriod::of(today);
    let exists = transactions
        .iter()
        .any(|candidate| is_instance_of(candidate, template, period));
    let state = if exists {
        RecurringState::Materialized
    } else if today.day() >= due_date(day, period).day() {
        RecurringState::Due
    } else {
        RecurringState::Pending
    };
    Some(state)
}

/// Reports every template's state for the month containing `today`.
pub fn snapshot_recurring(transactions: &[Transaction], today: NaiveDate) -> Vec<RecurringSnapshot> {
    let period = MonthPeriod::of(today);
    let mut snapshots: Vec<RecurringSnapshot> = transactions
        .iter()
        .filter_map(|template| {
            let day = template.template_day()?;
            let state = template_state(template, transactions, today)?;
            Some(RecurringSnapshot {
                template_id: template.id.clone(),
                note: template.note.clone(),
                amount: template.amount,
                due_date: due_date(day, period),
                state,
            })
        })
        .collect();
    snapshots.sort_by_key(|snap| (snap.due_date, snap.template_id.clone()));
    snapshots
}

/// Builds the instances that are due in the month containing `today` but are
/// missing from `transactions`. The input is not modified; callers append the
/// returned instances.
pub fn materialize_due_instances(today: NaiveDate, transactions: &[Transaction]) -> Vec<Transaction> {
    let period = MonthPeriod::of(today);
    let mut creations = Vec::new();

    for template in transactions.iter().filter(|txn| txn.is_template()) {
        match template_state(template, transactions, today) {
            Some(RecurringState::Due) => {}
            state => {
                debug!(template = %template.id, ?state, "recurring template skipped");
                continue;
            }
        }
        let Some(day) = template.template_day() else {
            continue;
        };
        let mut instance = template.clone();
        instance.id = new_id("txn_rec");
        instance.date = due_date(day, period);
        instance.is_recurring = false;
        instance.recurring_day = None;
        instance.template_id = Some(template.id.clone());
        instance.created_at = None;
        instance.updated_at = None;
        debug!(template = %template.id, date = %instance.date, "recurring instance generated");
        creations.push(instance);
    }

    if !creations.is_empty() {
        info!(count = creations.len(), month = %period, "materialized recurring transactions");
    }
    creations
}
