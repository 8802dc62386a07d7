//! # Step Lifecycle Events
//!
//! Status changes are broadcast to any number of subscribers, such as a
//! toast layer or an audit log.
//!
//! ```rust
//! use onboarding_core::events::{EventPublisher, StepLifecycleEvent};
//! use onboarding_core::state_machine::StepStatus;
//! use onboarding_core::workflow::{EntityId, StepId};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let publisher = EventPublisher::default();
//! let mut receiver = publisher.subscribe();
//!
//! publisher
//!     .publish(StepLifecycleEvent::new(
//!         "step.completed",
//!         EntityId::new(42),
//!         StepId::new(2),
//!         StepStatus::InProgress,
//!         StepStatus::Completed,
//!         json!({}),
//!     ))
//!     .unwrap();
//!
//! let event = receiver.recv().await.unwrap();
//! assert_eq!(event.to, StepStatus::Completed);
//! # });
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::state_machine::StepStatus;
use crate::workflow::{EntityId, StepId};

/// Broadcast publisher for step lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<StepLifecycleEvent>,
}

/// Event emitted after a step changed status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLifecycleEvent {
    pub name: String,
    pub entity_id: EntityId,
    pub step_id: StepId,
    pub from: StepStatus,
    pub to: StepStatus,
    pub context: Value,
    pub published_at: DateTime<Utc>,
}

impl StepLifecycleEvent {
    pub fn new(
        name: impl Into<String>,
        entity_id: EntityId,
        step_id: StepId,
        from: StepStatus,
        to: StepStatus,
        context: Value,
    ) -> Self {
        Self {
            name: name.into(),
            entity_id,
            step_id,
            from,
            to,
            context,
            published_at: Utc::now(),
        }
    }
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers
    pub fn publish(&self, event: StepLifecycleEvent) -> Result<(), PublishError> {
        // send() only fails when nobody is subscribed, which is fine here
        match self.sender.send(event) {
            Ok(_) => Ok(()),
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<StepLifecycleEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000) // Default capacity of 1000 events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(name: &str) -> StepLifecycleEvent {
        StepLifecycleEvent::new(
            name,
            EntityId::new(9),
            StepId::new(2),
            StepStatus::InProgress,
            StepStatus::Completed,
            json!({"label": "Vertragsdaten"}),
        )
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::default();
        assert_eq!(publisher.subscriber_count(), 0);
        assert!(publisher.publish(event("step.completed")).is_ok());
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let publisher = EventPublisher::new(8);
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 2);

        publisher.publish(event("step.completed")).unwrap();

        let received = first.recv().await.unwrap();
        assert_eq!(received.name, "step.completed");
        assert_eq!(received.to, StepStatus::Completed);
        assert_eq!(second.recv().await.unwrap(), received);
    }

    #[test]
    fn test_event_serializes_status_lowercase() {
        let value = serde_json::to_value(event("step.completed")).unwrap();
        assert_eq!(value["from"], "inprogress");
        assert_eq!(value["to"], "completed");
        assert_eq!(value["step_id"], 2);
    }
}
