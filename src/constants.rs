//! # System Constants
//!
//! Event names, status groups and engine limits shared across the form and
//! workflow layers.

// Re-export state types for convenience
pub use crate::state_machine::StepStatus;

/// Lifecycle events published whenever a workflow step changes status
pub mod events {
    pub const STEP_OPENED: &str = "step.opened";
    pub const STEP_EDITED: &str = "step.edited";
    pub const STEP_SAVE_STARTED: &str = "step.save_started";
    pub const STEP_COMPLETED: &str = "step.completed";
    pub const STEP_FAILED: &str = "step.failed";
    pub const STEP_SAVE_ROLLED_BACK: &str = "step.save_rolled_back";
    pub const STEP_REJECTED: &str = "step.rejected";
    pub const STEP_RESET: &str = "step.reset";
}

/// Groupings of step statuses used by navigation and badges
pub mod status_groups {
    use super::StepStatus;

    /// Statuses that hold back sequential navigation
    pub const BLOCKING_STATUSES: &[StepStatus] =
        &[StepStatus::New, StepStatus::InProgress, StepStatus::Error];

    /// Statuses that need the user's attention in the navigator
    pub const ATTENTION_STATUSES: &[StepStatus] = &[StepStatus::Error];
}

/// Override engine limits
pub mod engine {
    /// Re-entrant passes allowed per user action before a rule cycle is reported
    pub const DEFAULT_MAX_REENTRANT_PASSES: u32 = 5;

    /// Upper bound accepted from configuration
    pub const MAX_CONFIGURABLE_REENTRANT_PASSES: u32 = 50;
}

/// URL contract shared with the hosting pages
pub mod routing {
    /// Query parameter carrying the active workflow step number
    pub const WFI_QUERY_PARAM: &str = "wfi";

    /// Path segment between entity kind and entity id
    pub const ONBOARDING_SEGMENT: &str = "onboarding";
}

/// Keys in the save collaborator's response element
pub mod response_keys {
    pub const ERRORS: &str = "errors";
    pub const ERRORS_MAP: &str = "errorsMap";
}
