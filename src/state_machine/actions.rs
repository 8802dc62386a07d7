use serde_json::json;

use super::errors::{ActionError, ActionResult};
use super::events::StepEvent;
use super::states::StepStatus;
use crate::constants::events;
use crate::events::{EventPublisher, StepLifecycleEvent};
use crate::logging::log_step_operation;
use crate::workflow::WorkflowStep;

/// Trait for implementing state transition actions
pub trait StateAction<T> {
    /// Execute the action after the transition has been applied
    fn execute(
        &self,
        entity: &T,
        from_state: StepStatus,
        to_state: StepStatus,
        event: &StepEvent,
    ) -> ActionResult<()>;

    /// Get a description of this action for logging
    fn description(&self) -> &'static str;
}

/// Action to write a structured log line for every transition
pub struct LogTransitionAction;

impl StateAction<WorkflowStep> for LogTransitionAction {
    fn execute(
        &self,
        step: &WorkflowStep,
        from_state: StepStatus,
        to_state: StepStatus,
        event: &StepEvent,
    ) -> ActionResult<()> {
        let details = format!("{from_state} -> {to_state}");
        log_step_operation(
            event.event_type(),
            step.entity_id.value(),
            step.id.value(),
            Some(&step.label),
            &to_state.to_string(),
            Some(&details),
        );
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Log step transition"
    }
}

/// Action to publish lifecycle events so navigators can refresh badges
pub struct PublishTransitionEventAction {
    event_publisher: EventPublisher,
}

impl PublishTransitionEventAction {
    pub fn new(event_publisher: EventPublisher) -> Self {
        Self { event_publisher }
    }
}

impl StateAction<WorkflowStep> for PublishTransitionEventAction {
    fn execute(
        &self,
        step: &WorkflowStep,
        from_state: StepStatus,
        to_state: StepStatus,
        event: &StepEvent,
    ) -> ActionResult<()> {
        let event_name = determine_step_event_name(event);
        let context = json!({
            "label": step.label,
            "order": step.order,
            "event_type": event.event_type(),
            "error_fields": event
                .error_map()
                .map(|map| map.paths().map(str::to_string).collect::<Vec<_>>())
                .unwrap_or_default(),
        });

        self.event_publisher
            .publish(StepLifecycleEvent::new(
                event_name,
                step.entity_id,
                step.id,
                from_state,
                to_state,
                context,
            ))
            .map_err(|_| ActionError::EventPublishFailed {
                event_name: event_name.to_string(),
            })
    }

    fn description(&self) -> &'static str {
        "Publish lifecycle event for step transition"
    }
}

/// Map a step event to its lifecycle event name
pub fn determine_step_event_name(event: &StepEvent) -> &'static str {
    match event {
        StepEvent::Open => events::STEP_OPENED,
        StepEvent::Edit => events::STEP_EDITED,
        StepEvent::BeginSave => events::STEP_SAVE_STARTED,
        StepEvent::SaveSucceeded => events::STEP_COMPLETED,
        StepEvent::SaveFailed(_) => events::STEP_FAILED,
        StepEvent::SaveAborted { .. } => events::STEP_SAVE_ROLLED_BACK,
        StepEvent::Reject(_) => events::STEP_REJECTED,
        StepEvent::Reset => events::STEP_RESET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ErrorMap;

    #[test]
    fn test_event_names() {
        assert_eq!(determine_step_event_name(&StepEvent::SaveSucceeded), "step.completed");
        assert_eq!(
            determine_step_event_name(&StepEvent::Reject(ErrorMap::new())),
            "step.rejected"
        );
    }

    #[test]
    fn test_action_descriptions() {
        assert_eq!(LogTransitionAction.description(), "Log step transition");
        let action = PublishTransitionEventAction::new(EventPublisher::default());
        assert_eq!(
            action.description(),
            "Publish lifecycle event for step transition"
        );
    }
}
