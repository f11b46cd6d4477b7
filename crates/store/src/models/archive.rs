//! Archived generation artifacts ("magic deeds").

use manaforge_core::model::ArtifactKind;
use manaforge_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Preview image used for text entries, which have no visual of their own.
pub const TEXT_PREVIEW_PLACEHOLDER: &str =
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?auto=format&fit=crop&q=80&w=600";

/// Tags attached to every generated artifact.
pub const DEFAULT_TAGS: &[&str] = &["AI-Generated", "Commercial"];

/// One archived artifact.
///
/// Append-only from the generation flows; deletion is a separate explicit
/// user action. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Time-derived id, `m_<unix-millis>`.
    pub id: String,
    /// Derived from the prompt prefix.
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub timestamp: Timestamp,
    /// Same as `content` for visual kinds, a fixed placeholder for text.
    pub preview: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Input for archiving one artifact.
#[derive(Debug, Clone)]
pub struct NewArchiveEntry {
    pub title: String,
    pub kind: ArtifactKind,
    pub content: String,
}
