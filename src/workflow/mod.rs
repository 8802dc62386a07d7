//! # Onboarding workflow
//!
//! The ordered steps of one entity's onboarding, which step is active, how
//! far the user may navigate, and how a section save drives its step status.

pub mod location;
pub mod navigation;
pub mod navigator;
pub mod process;
pub mod session;
pub mod step;

pub use location::WorkflowLocation;
pub use navigation::{is_reachable, next_reachable_step, reachable_steps, NavigationMode};
pub use navigator::{build_navigator, BadgeColor, NavigatorEntry};
pub use process::{SaveTicket, WorkflowHandle, WorkflowProcess};
pub use session::{SaveReport, SaveRequest, SaveResponse, SectionSession};
pub use step::{EntityId, EntityKind, StepId, WorkflowStep};
