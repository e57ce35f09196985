use chrono::NaiveDate;
use tracing::info;

use crate::core::services::{not_found, ServiceError, ServiceResult};
use crate::core::time::Clock;
use crate::core::validation::{ensure_finite, validate_goal};
use crate::ledger::{transaction::new_id, GoalProgress, Ledger, SavingsGoal};

pub struct SavingsService;

impl SavingsService {
    pub fn add(ledger: &mut Ledger, mut goal: SavingsGoal, clock: &dyn Clock) -> ServiceResult<String> {
        validate_goal(&goal)?;
        if goal.id.trim().is_empty() || ledger.goal(&goal.id).is_some() {
            goal.id = new_id("goal");
        }
        goal.touch(clock.now());
        let id = goal.id.clone();
        ledger.savings_goals.push(goal);
        Ok(id)
    }

    pub fn update<F>(ledger: &mut Ledger, id: &str, clock: &dyn Clock, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut SavingsGoal),
    {
        let goal = ledger.goal_mut(id).ok_or_else(|| not_found("goal", id))?;
        let mut draft = goal.clone();
        mutator(&mut draft);
        draft.id = goal.id.clone();
        validate_goal(&draft)?;
        draft.touch(clock.now());
        *goal = draft;
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: &str) -> ServiceResult<SavingsGoal> {
        let index = ledger
            .savings_goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or_else(|| not_found("goal", id))?;
        Ok(ledger.savings_goals.remove(index))
    }

    /// Adds `amount` to the goal's current amount. The total may exceed the target.
    pub fn contribute(
        ledger: &mut Ledger,
        id: &str,
        amount: f64,
        clock: &dyn Clock,
    ) -> ServiceResult<f64> {
        ensure_finite("contribution", amount)?;
        if amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "contribution must be greater than zero".into(),
            ));
        }
        let goal = ledger.goal_mut(id).ok_or_else(|| not_found("goal", id))?;
        goal.current_amount += amount;
        goal.touch(clock.now());
        info!(goal = %goal.id, amount, current = goal.current_amount, "savings contribution recorded");
        Ok(goal.current_amount)
    }

    pub fn progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
        GoalProgress::evaluate(goal, today)
    }

    /// Goals paired with their progress, soonest deadline first.
    pub fn overview(ledger: &Ledger, today: NaiveDate) -> Vec<(&SavingsGoal, GoalProgress)> {
        let mut rows: Vec<(&SavingsGoal, GoalProgress)> = ledger
            .savings_goals
            .iter()
            .map(|goal| (goal, GoalProgress::evaluate(goal, today)))
            .collect();
        rows.sort_by_key(|(goal, _)| goal.deadline);
        rows
    }
}
