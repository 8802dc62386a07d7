//! Error types for the onboarding core.
//!
//! Each layer owns a narrow error enum (`FormError`, `StateMachineError`,
//! `GatewayError`, `ConfigurationError`); they all convert into [`PortalError`]
//! so callers at the UI boundary deal with a single type.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::form::FormError;
use crate::gateway::GatewayError;
use crate::state_machine::{GuardError, StateMachineError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortalError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Rule configuration error: {0}")]
    RuleConfigurationError(String),
    #[error("State transition error: {0}")]
    StateTransitionError(String),
    #[error("Navigation blocked: {0}")]
    NavigationBlocked(String),
    #[error("Save already in flight for step {0}")]
    SaveInFlight(u32),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Event error: {0}")]
    EventError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Transport errors are transient: the caller shows a toast and may save again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Configuration errors indicate a wiring defect, not bad user input.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError(_) | Self::RuleConfigurationError(_)
        )
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(error: serde_json::Error) -> Self {
        PortalError::ValidationError(format!("JSON serialization error: {error}"))
    }
}

impl From<ConfigurationError> for PortalError {
    fn from(error: ConfigurationError) -> Self {
        PortalError::ConfigurationError(error.to_string())
    }
}

impl From<FormError> for PortalError {
    fn from(error: FormError) -> Self {
        match error {
            FormError::RuleCycle { .. } | FormError::UnknownField { .. } => {
                PortalError::RuleConfigurationError(error.to_string())
            }
            FormError::Serialization(_) => PortalError::ValidationError(error.to_string()),
        }
    }
}

impl From<StateMachineError> for PortalError {
    fn from(error: StateMachineError) -> Self {
        match error {
            StateMachineError::GuardFailed(GuardError::SaveInFlight { step_id }) => {
                PortalError::SaveInFlight(step_id)
            }
            StateMachineError::GuardFailed(guard @ GuardError::StepUnreachable { .. }) => {
                PortalError::NavigationBlocked(guard.to_string())
            }
            StateMachineError::Configuration(msg) => PortalError::ConfigurationError(msg),
            other => PortalError::StateTransitionError(other.to_string()),
        }
    }
}

impl From<GatewayError> for PortalError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Transport(msg) => PortalError::Transport(msg),
            GatewayError::Http { status, body } => {
                PortalError::Transport(format!("HTTP {status}: {body}"))
            }
            GatewayError::MalformedResponse(msg) => PortalError::Protocol(msg),
            GatewayError::InvalidUrl(msg) => PortalError::ConfigurationError(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
