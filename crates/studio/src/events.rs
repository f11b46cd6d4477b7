//! In-process studio event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`StudioEvent`]s. It is
//! shared via `Arc<EventBus>`; any number of subscribers independently
//! receive every published event.

use chrono::Utc;
use manaforge_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// A generation request settled successfully.
pub const GENERATION_COMPLETED: &str = "generation.completed";
/// Energy was deducted from a balance.
pub const ENERGY_DEBITED: &str = "energy.debited";
/// Energy was added to a balance.
pub const ENERGY_RECHARGED: &str = "energy.recharged";
/// A debit left the balance below the alert threshold.
pub const ENERGY_LOW: &str = "energy.low";

// ---------------------------------------------------------------------------
// StudioEvent
// ---------------------------------------------------------------------------

/// A domain event emitted by the studio.
///
/// Constructed via [`StudioEvent::new`] and enriched with the builder
/// methods [`with_user`](StudioEvent::with_user) and
/// [`with_payload`](StudioEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioEvent {
    /// Dot-separated event name, e.g. `"generation.completed"`.
    pub event_type: String,

    /// Id of the user the event concerns, when there is one.
    pub user_id: Option<String>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl StudioEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the user the event concerns.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// Silently dropped when there are no receivers.
    pub fn publish(&self, event: StudioEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            StudioEvent::new(ENERGY_LOW)
                .with_user("u_1")
                .with_payload(serde_json::json!({"balance": 4})),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, ENERGY_LOW);
        assert_eq!(event.user_id.as_deref(), Some("u_1"));
        assert_eq!(event.payload["balance"], 4);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(StudioEvent::new(GENERATION_COMPLETED));
    }
}
