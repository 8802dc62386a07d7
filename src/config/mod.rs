//! # Portal Configuration
//!
//! Configuration for the onboarding core, loaded from YAML with
//! environment-specific override blocks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use onboarding_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let passes = manager.config().overrides.max_reentrant_passes;
//! let base_url = &manager.config().gateway.base_url;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::engine::{DEFAULT_MAX_REENTRANT_PASSES, MAX_CONFIGURABLE_REENTRANT_PASSES};
use crate::workflow::NavigationMode;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring onboarding.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Remote gateway settings
    pub gateway: GatewayConfig,

    /// Override engine limits
    pub overrides: OverrideEngineConfig,

    /// Navigator behaviour
    pub navigation: NavigationConfig,

    /// Environment this configuration was resolved for
    pub environment: String,
}

/// Remote gateway connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the gateway API (e.g. "https://gateway.example.com/api")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Optional bearer token sent with every request
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 30_000,
            bearer_token: None,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverrideEngineConfig {
    /// Re-entrant passes caused by direct writes allowed per user action
    pub max_reentrant_passes: u32,
}

impl Default for OverrideEngineConfig {
    fn default() -> Self {
        Self {
            max_reentrant_passes: DEFAULT_MAX_REENTRANT_PASSES,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub mode: NavigationMode,
}

impl PortalConfig {
    /// Validate cross-field constraints that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "base_url",
                "gateway",
            ));
        }

        url::Url::parse(&self.gateway.base_url).map_err(|e| {
            ConfigurationError::invalid_value(
                "gateway.base_url",
                self.gateway.base_url.clone(),
                e.to_string(),
            )
        })?;

        if self.gateway.timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "gateway.timeout_ms",
                "0",
                "timeout must be greater than zero",
            ));
        }

        let passes = self.overrides.max_reentrant_passes;
        if passes == 0 || passes > MAX_CONFIGURABLE_REENTRANT_PASSES {
            return Err(ConfigurationError::invalid_value(
                "overrides.max_reentrant_passes",
                passes.to_string(),
                format!("must be between 1 and {MAX_CONFIGURABLE_REENTRANT_PASSES}"),
            ));
        }

        Ok(())
    }
}
