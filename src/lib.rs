#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Onboarding Core
//!
//! Field override engine and workflow step state machine behind the
//! multi-step HR onboarding forms (employee and participant funnels).
//!
//! ## Overview
//!
//! Two cooperating components form the core:
//!
//! - **Field Override Engine** ([`form`]): watches a form's live values and,
//!   whenever a field changes, recomputes per-field overrides (required,
//!   disabled, visible, bounds) and applies derived values to other fields.
//! - **Workflow Step State Machine** ([`state_machine`], [`workflow`]): each
//!   onboarding step carries a status (`new | inprogress | error | completed`)
//!   driven by navigation, save outcomes and out-of-band reviewer actions.
//!
//! The backend owns validation and persistence; [`gateway`] speaks its save,
//! list, delete and file endpoints.
//!
//! ## Module Organization
//!
//! - [`form`] - Field identifiers, snapshots, override rules and the form controller
//! - [`state_machine`] - Step statuses, events, guards and transition actions
//! - [`workflow`] - Step list, navigation, page locations and the section save flow
//! - [`gateway`] - Backend boundary and its HTTP implementation
//! - [`sections`] - Reference rule tables for `stammdaten` and `vertragsdaten`
//! - [`config`] - YAML configuration with per-environment overrides
//! - [`events`] - Step lifecycle event broadcasting
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use onboarding_core::config::PortalConfig;
//! use onboarding_core::sections::vertragsdaten::{self, VertragsdatenField};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PortalConfig::default();
//! let mut form = vertragsdaten::controller(&config.overrides, None);
//!
//! form.on_field_change(VertragsdatenField::Eintritt, json!("01.03.2026"))?;
//! let bound = &form.get_override(VertragsdatenField::ArbeitszeitmodellBis).min_bound;
//! assert_eq!(bound, &Some(json!("08.03.2026")));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod form;
pub mod gateway;
pub mod logging;
pub mod sections;
pub mod state_machine;
pub mod workflow;

pub use config::{ConfigManager, GatewayConfig, NavigationConfig, OverrideEngineConfig, PortalConfig};
pub use constants::status_groups;
pub use error::{PortalError, Result};
pub use events::{EventPublisher, StepLifecycleEvent};
pub use form::{
    ErrorMap, FormController, FormField, FormSnapshot, OverrideEngine, OverrideSpec, OverrideStore,
};
pub use gateway::{HttpGateway, SaveOutcome, SectionGateway, SectionTarget};
pub use state_machine::{StepEvent, StepStateMachine, StepStatus};
pub use workflow::{
    next_reachable_step, EntityId, EntityKind, NavigationMode, SectionSession, StepId,
    WorkflowHandle, WorkflowLocation, WorkflowProcess, WorkflowStep,
};
