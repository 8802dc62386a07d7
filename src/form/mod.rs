//! # Field Override Engine
//!
//! Reactive rule evaluation for data-entry forms. Every form owns a
//! [`FormController`] which holds the live [`FormSnapshot`], an
//! [`OverrideEngine`] with the form's rule table, and the [`OverrideStore`]
//! that field renderers read `required` / `disabled` / `visible` / bounds from.
//!
//! Field identifiers are closed enums declared with [`form_fields!`](crate::form_fields),
//! so rule triggers and targets are checked at compile time and unknown
//! field paths are rejected at registration.

pub mod controller;
pub mod dates;
pub mod engine;
pub mod error_map;
pub mod errors;
pub mod field;
pub mod overrides;
pub mod rule;
pub mod snapshot;

pub use controller::{ErrorReconciliation, FieldErrors, FormController};
pub use engine::{ChangeOutcome, Evaluation, OverrideEngine};
pub use error_map::ErrorMap;
pub use errors::{FormError, FormResult};
pub use field::FormField;
pub use overrides::{OverrideSpec, OverrideStore, OverrideTable};
pub use rule::{rule_fn, FieldRule, FieldWrite, FnRule, RuleEffect};
pub use snapshot::FormSnapshot;
