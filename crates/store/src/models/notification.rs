//! System notification model.

use manaforge_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Category of a notification, driving its badge in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    System,
    Update,
    Feature,
    Alert,
}

/// One system message shown in the notification tray.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Time-derived id, `n_<unix-millis>`.
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: Timestamp,
    pub read: bool,
}
