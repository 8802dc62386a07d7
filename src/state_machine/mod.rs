//! Workflow step status state machine
//!
//! Every step of an onboarding workflow carries a [`StepStatus`]. Status only
//! changes by applying a [`StepEvent`] through [`StepStateMachine`], which
//! checks guards, resolves the target status and runs post-transition actions.

pub mod actions;
pub mod errors;
pub mod events;
pub mod guards;
pub mod states;
pub mod step_state_machine;

// Re-export main types for convenient access
pub use errors::{ActionError, GuardError, StateMachineError, StateMachineResult};
pub use events::StepEvent;
pub use states::StepStatus;
pub use step_state_machine::{StepStateMachine, Transition};

// Common traits and utilities
pub use actions::StateAction;
pub use guards::{GuardContext, StateGuard};
