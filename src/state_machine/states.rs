use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::status_groups;

/// Status of one workflow step (WFI)
///
/// There is no terminal status: a completed step can always be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Initial status when the entity enters the workflow
    #[default]
    New,
    /// Step has been opened, edited, or a save is pending
    InProgress,
    /// Last save or a later review reported validation errors
    Error,
    /// Last save succeeded without errors
    Completed,
}

impl StepStatus {
    /// Check if this status holds back sequential navigation
    pub fn is_blocking(&self) -> bool {
        status_groups::BLOCKING_STATUSES.contains(self)
    }

    /// Check if this is an error status that needs a correction
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Check if the user is currently working on the step
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::InProgress => write!(f, "inprogress"),
            Self::Error => write!(f, "error"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "inprogress" => Ok(Self::InProgress),
            "error" => Ok(Self::Error),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid workflow step status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_completed_unblocks_navigation() {
        assert!(StepStatus::New.is_blocking());
        assert!(StepStatus::InProgress.is_blocking());
        assert!(StepStatus::Error.is_blocking());
        assert!(!StepStatus::Completed.is_blocking());
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(StepStatus::InProgress.to_string(), "inprogress");
        assert_eq!(
            "completed".parse::<StepStatus>().unwrap(),
            StepStatus::Completed
        );
        assert!("complete".parse::<StepStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&StepStatus::InProgress).unwrap();
        assert_eq!(json, "\"inprogress\"");

        let parsed: StepStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, StepStatus::Error);
        assert_eq!(StepStatus::default(), StepStatus::New);
    }
}
