use thiserror::Error;

use super::states::StepStatus;

/// Error types for step state machine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateMachineError {
    #[error("Guard condition failed: {0}")]
    GuardFailed(#[from] GuardError),

    #[error("Invalid transition from {from} on event {event}")]
    InvalidTransition { from: StepStatus, event: String },

    #[error("Unknown workflow step {0}")]
    UnknownStep(u32),

    #[error("Workflow configuration error: {0}")]
    Configuration(String),
}

/// Specific error type for guard condition failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardError {
    #[error("A save for step {step_id} is already in flight")]
    SaveInFlight { step_id: u32 },

    #[error("Step {step_id} is not reachable until step {blocking_step} is completed")]
    StepUnreachable { step_id: u32, blocking_step: u32 },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}

/// Specific error type for post-transition action failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Event publishing failed: {event_name}")]
    EventPublishFailed { event_name: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
pub type GuardResult<T> = Result<T, GuardError>;
pub type ActionResult<T> = Result<T, ActionError>;

/// Helper function to create business rule violations
pub fn business_rule_violation(rule: impl Into<String>) -> GuardError {
    GuardError::BusinessRuleViolation { rule: rule.into() }
}
