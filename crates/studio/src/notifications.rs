//! Low-energy alerting.
//!
//! [`NotificationWriter`] subscribes to the event bus and turns
//! `energy.low` events into alert notifications. It runs as a long-lived
//! background task and shuts down when the bus sender is dropped.

use std::sync::Arc;

use tokio::sync::broadcast;

use manaforge_store::error::StoreError;
use manaforge_store::models::notification::NotificationKind;
use manaforge_store::repositories::NotificationRepo;
use manaforge_store::JsonStore;

use crate::events::{StudioEvent, ENERGY_LOW};

/// Balance threshold below which a debit triggers an alert.
pub const LOW_ENERGY_THRESHOLD: u32 = 10;

/// Background service that writes low-energy alert notifications.
pub struct NotificationWriter;

impl NotificationWriter {
    /// Run the subscriber loop until the event bus is closed.
    pub async fn run(store: Arc<JsonStore>, mut receiver: broadcast::Receiver<StudioEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) if event.event_type == ENERGY_LOW => {
                    if let Err(err) = Self::write_alert(&store, &event).await {
                        tracing::error!(error = %err, "Failed to write low-energy notification");
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification writer lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification writer shutting down");
                    break;
                }
            }
        }
    }

    async fn write_alert(store: &JsonStore, event: &StudioEvent) -> Result<(), StoreError> {
        let balance = event
            .payload
            .get("balance")
            .and_then(|value| value.as_u64())
            .unwrap_or(0);

        NotificationRepo::create(
            store,
            "Magic energy running low",
            &format!("Only {balance} energy left. Top up to keep generating."),
            NotificationKind::Alert,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::events::EventBus;

    #[tokio::test]
    async fn low_energy_event_creates_alert() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::open(dir.path()).await.unwrap());
        let bus = EventBus::default();

        let writer = tokio::spawn(NotificationWriter::run(store.clone(), bus.subscribe()));

        bus.publish(
            StudioEvent::new(ENERGY_LOW)
                .with_user("u_1")
                .with_payload(serde_json::json!({"balance": 4})),
        );
        drop(bus);
        writer.await.unwrap();

        let notifications = NotificationRepo::list(&store, false).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Alert);
        assert!(notifications[0].description.contains("Only 4 energy left"));
    }

    #[tokio::test]
    async fn other_events_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::open(dir.path()).await.unwrap());
        let bus = EventBus::default();

        let writer = tokio::spawn(NotificationWriter::run(store.clone(), bus.subscribe()));

        bus.publish(StudioEvent::new(crate::events::ENERGY_RECHARGED).with_user("u_1"));
        drop(bus);
        writer.await.unwrap();

        assert_eq!(NotificationRepo::unread_count(&store).await.unwrap(), 0);
    }
}
