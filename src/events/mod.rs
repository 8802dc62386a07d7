//! Step lifecycle events
//!
//! Every status change is broadcast so navigators and other listeners can
//! refresh without polling the workflow.

pub mod publisher;

pub use publisher::{EventPublisher, PublishError, StepLifecycleEvent};
