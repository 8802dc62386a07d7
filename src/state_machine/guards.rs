use super::errors::{business_rule_violation, GuardError, GuardResult};
use crate::workflow::navigation::{blocking_step, is_reachable, NavigationMode};
use crate::workflow::WorkflowStep;

/// Facts about the surrounding workflow a guard may need
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    pub steps: &'a [WorkflowStep],
    pub save_in_flight: bool,
    pub navigation: NavigationMode,
}

/// Trait for implementing state transition guards
pub trait StateGuard<T> {
    /// Check if a transition is allowed
    fn check(&self, entity: &T, context: &GuardContext<'_>) -> GuardResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Guard to keep at most one save per step in flight
pub struct SaveNotInFlightGuard;

impl StateGuard<WorkflowStep> for SaveNotInFlightGuard {
    fn check(&self, step: &WorkflowStep, context: &GuardContext<'_>) -> GuardResult<()> {
        if context.save_in_flight {
            return Err(GuardError::SaveInFlight {
                step_id: step.id.value(),
            });
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Step must not have a pending save"
    }
}

/// Guard to enforce sequential navigation when configured
pub struct StepReachableGuard;

impl StateGuard<WorkflowStep> for StepReachableGuard {
    fn check(&self, step: &WorkflowStep, context: &GuardContext<'_>) -> GuardResult<()> {
        if context.navigation == NavigationMode::Free {
            return Ok(());
        }

        if !context.steps.iter().any(|s| s.id == step.id) {
            return Err(business_rule_violation(format!(
                "Step {} does not belong to this workflow",
                step.id
            )));
        }

        if is_reachable(context.steps, step.id) {
            return Ok(());
        }

        let blocking = blocking_step(context.steps).map_or(step.id.value(), |s| s.id.value());
        Err(GuardError::StepUnreachable {
            step_id: step.id.value(),
            blocking_step: blocking,
        })
    }

    fn description(&self) -> &'static str {
        "Step must be reachable from the first incomplete step"
    }
}
