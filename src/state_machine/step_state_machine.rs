use tracing::{debug, error};

use super::{
    actions::{LogTransitionAction, PublishTransitionEventAction, StateAction},
    errors::{StateMachineError, StateMachineResult},
    events::StepEvent,
    guards::{GuardContext, SaveNotInFlightGuard, StateGuard, StepReachableGuard},
    states::StepStatus,
};
use crate::events::EventPublisher;
use crate::workflow::{StepId, WorkflowStep};

/// Record of an applied transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub step_id: StepId,
    pub from: StepStatus,
    pub to: StepStatus,
    pub event_type: &'static str,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Step status state machine
///
/// Holds no step state itself; the owning workflow hands in the step to
/// transition so that updates are always keyed by step, never by "whatever is
/// currently displayed".
pub struct StepStateMachine {
    actions: Vec<Box<dyn StateAction<WorkflowStep> + Send + Sync>>,
}

impl std::fmt::Debug for StepStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepStateMachine")
            .field(
                "actions",
                &self.actions.iter().map(|a| a.description()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for StepStateMachine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StepStateMachine {
    /// Create a state machine; with a publisher, transitions are broadcast
    pub fn new(event_publisher: Option<EventPublisher>) -> Self {
        let mut actions: Vec<Box<dyn StateAction<WorkflowStep> + Send + Sync>> =
            vec![Box::new(LogTransitionAction)];
        if let Some(publisher) = event_publisher {
            actions.push(Box::new(PublishTransitionEventAction::new(publisher)));
        }
        Self { actions }
    }

    /// Determine the target status for `event` from `current_state`
    pub fn determine_target_state(
        current_state: StepStatus,
        event: &StepEvent,
    ) -> StateMachineResult<StepStatus> {
        let target = match (current_state, event) {
            // Navigation only starts fresh steps
            (StepStatus::New, StepEvent::Open) => StepStatus::InProgress,
            (status, StepEvent::Open) => status,

            // Editing or saving always puts the step back into progress
            (_, StepEvent::Edit) => StepStatus::InProgress,
            (_, StepEvent::BeginSave) => StepStatus::InProgress,

            // Save results
            (StepStatus::InProgress, StepEvent::SaveSucceeded) => StepStatus::Completed,
            (StepStatus::InProgress, StepEvent::SaveFailed(_)) => StepStatus::Error,
            (StepStatus::InProgress, StepEvent::SaveAborted { previous }) => *previous,

            // Out-of-band reviewer rejection skips inprogress
            (_, StepEvent::Reject(_)) => StepStatus::Error,

            (_, StepEvent::Reset) => StepStatus::New,

            (from, event) => {
                return Err(StateMachineError::InvalidTransition {
                    from,
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(target)
    }

    /// Check guard conditions for applying `event` to `step`
    pub fn check_guards(
        &self,
        step: &WorkflowStep,
        event: &StepEvent,
        context: &GuardContext<'_>,
    ) -> StateMachineResult<()> {
        match event {
            StepEvent::Open => StepReachableGuard.check(step, context)?,
            StepEvent::BeginSave => SaveNotInFlightGuard.check(step, context)?,
            _ => {}
        }
        Ok(())
    }

    /// Apply `event` to `step` and run post-transition actions
    ///
    /// Actions only run when the status actually changes. Action failures are
    /// logged; the applied status is kept.
    pub fn transition(
        &self,
        step: &mut WorkflowStep,
        event: &StepEvent,
    ) -> StateMachineResult<Transition> {
        let from = step.status;
        let to = Self::determine_target_state(from, event)?;

        let transition = Transition {
            step_id: step.id,
            from,
            to,
            event_type: event.event_type(),
        };

        if !transition.changed() {
            debug!(
                step_id = step.id.value(),
                status = %from,
                event = event.event_type(),
                "Event left step status unchanged"
            );
            return Ok(transition);
        }

        step.status = to;

        for action in &self.actions {
            if let Err(e) = action.execute(step, from, to, event) {
                error!(
                    step_id = step.id.value(),
                    action = action.description(),
                    error = %e,
                    "Post-transition action failed"
                );
            }
        }

        Ok(transition)
    }
}
