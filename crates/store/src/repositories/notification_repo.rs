//! Repository for system notifications.

use chrono::Utc;

use crate::error::StoreError;
use crate::models::notification::{Notification, NotificationKind};
use crate::repositories::unique_time_id;
use crate::{JsonStore, NOTIFICATIONS_KEY};

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification, returning the stored record.
    pub async fn create(
        store: &JsonStore,
        title: &str,
        description: &str,
        kind: NotificationKind,
    ) -> Result<Notification, StoreError> {
        let now = Utc::now();
        let title = title.to_string();
        let description = description.to_string();

        store
            .update_collection(NOTIFICATIONS_KEY, move |items: &mut Vec<Notification>| {
                let notification = Notification {
                    id: unique_time_id("n", now, |candidate| {
                        items.iter().any(|n| n.id == candidate)
                    }),
                    title,
                    description,
                    kind,
                    timestamp: now,
                    read: false,
                };
                items.insert(0, notification.clone());
                Ok(notification)
            })
            .await
    }

    /// List notifications, newest first.
    ///
    /// When `unread_only` is `true`, only unread notifications are returned.
    pub async fn list(
        store: &JsonStore,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StoreError> {
        let items = store
            .read_collection::<Notification>(NOTIFICATIONS_KEY)
            .await?;
        if unread_only {
            Ok(items.into_iter().filter(|n| !n.read).collect())
        } else {
            Ok(items)
        }
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found unread and updated,
    /// `false` otherwise.
    pub async fn mark_read(store: &JsonStore, id: &str) -> Result<bool, StoreError> {
        store
            .update_collection(NOTIFICATIONS_KEY, |items: &mut Vec<Notification>| {
                match items.iter_mut().find(|n| n.id == id && !n.read) {
                    Some(notification) => {
                        notification.read = true;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .await
    }

    /// Mark all unread notifications as read.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(store: &JsonStore) -> Result<u64, StoreError> {
        store
            .update_collection(NOTIFICATIONS_KEY, |items: &mut Vec<Notification>| {
                let mut changed = 0u64;
                for notification in items.iter_mut().filter(|n| !n.read) {
                    notification.read = true;
                    changed += 1;
                }
                Ok(changed)
            })
            .await
    }

    /// Number of unread notifications.
    pub async fn unread_count(store: &JsonStore) -> Result<u64, StoreError> {
        Ok(store
            .read_collection::<Notification>(NOTIFICATIONS_KEY)
            .await?
            .iter()
            .filter(|n| !n.read)
            .count() as u64)
    }
}
