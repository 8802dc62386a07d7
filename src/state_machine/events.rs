use serde::{Deserialize, Serialize};

use super::states::StepStatus;
use crate::form::ErrorMap;

/// Events that can trigger workflow step status transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StepEvent {
    /// The user navigated to the step
    Open,
    /// The user changed a value in the step's form
    Edit,
    /// A save request is about to be dispatched
    BeginSave,
    /// The save collaborator accepted the section
    SaveSucceeded,
    /// The save collaborator returned validation errors
    SaveFailed(ErrorMap),
    /// The save never produced a result; restore the status held before it
    SaveAborted { previous: StepStatus },
    /// A later review step rejected this section out of band
    Reject(ErrorMap),
    /// Administrative reset ("zurücksetzen")
    Reset,
}

impl StepEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Edit => "edit",
            Self::BeginSave => "begin_save",
            Self::SaveSucceeded => "save_succeeded",
            Self::SaveFailed(_) => "save_failed",
            Self::SaveAborted { .. } => "save_aborted",
            Self::Reject(_) => "reject",
            Self::Reset => "reset",
        }
    }

    /// Extract the error map carried by failure and rejection events
    pub fn error_map(&self) -> Option<&ErrorMap> {
        match self {
            Self::SaveFailed(map) | Self::Reject(map) => Some(map),
            _ => None,
        }
    }

    /// Check if this event originates outside the step's own form
    pub fn is_out_of_band(&self) -> bool {
        matches!(self, Self::Reject(_) | Self::Reset)
    }

    /// Check if this event concludes a pending save
    pub fn concludes_save(&self) -> bool {
        matches!(
            self,
            Self::SaveSucceeded | Self::SaveFailed(_) | Self::SaveAborted { .. }
        )
    }
}
