//! Repository for the generation archive ("magic deeds").

use chrono::Utc;

use manaforge_core::model::ArtifactKind;

use crate::error::StoreError;
use crate::models::archive::{ArchiveEntry, NewArchiveEntry, DEFAULT_TAGS, TEXT_PREVIEW_PLACEHOLDER};
use crate::repositories::unique_time_id;
use crate::{JsonStore, ARCHIVE_KEY};

/// Provides append, listing, and explicit deletion for archive entries.
pub struct ArchiveRepo;

impl ArchiveRepo {
    /// Archive one artifact, newest first, returning the stored entry.
    ///
    /// Visual kinds preview their own content; text entries get the fixed
    /// placeholder image.
    pub async fn append(
        store: &JsonStore,
        input: NewArchiveEntry,
    ) -> Result<ArchiveEntry, StoreError> {
        let now = Utc::now();
        let preview = match input.kind {
            ArtifactKind::Text => TEXT_PREVIEW_PLACEHOLDER.to_string(),
            ArtifactKind::Image | ArtifactKind::Video => input.content.clone(),
        };

        store
            .update_collection(ARCHIVE_KEY, move |entries: &mut Vec<ArchiveEntry>| {
                let entry = ArchiveEntry {
                    id: unique_time_id("m", now, |candidate| {
                        entries.iter().any(|e| e.id == candidate)
                    }),
                    title: input.title,
                    kind: input.kind,
                    timestamp: now,
                    preview,
                    content: input.content,
                    tags: DEFAULT_TAGS.iter().map(|tag| tag.to_string()).collect(),
                };
                entries.insert(0, entry.clone());
                Ok(entry)
            })
            .await
    }

    /// List all entries, newest first (storage order).
    pub async fn list(store: &JsonStore) -> Result<Vec<ArchiveEntry>, StoreError> {
        store.read_collection(ARCHIVE_KEY).await
    }

    /// List entries of one artifact kind, newest first.
    pub async fn list_by_kind(
        store: &JsonStore,
        kind: ArtifactKind,
    ) -> Result<Vec<ArchiveEntry>, StoreError> {
        Ok(Self::list(store)
            .await?
            .into_iter()
            .filter(|entry| entry.kind == kind)
            .collect())
    }

    /// Delete an entry by id. Returns `true` if it existed.
    pub async fn delete(store: &JsonStore, id: &str) -> Result<bool, StoreError> {
        store
            .update_collection(ARCHIVE_KEY, |entries: &mut Vec<ArchiveEntry>| {
                let before = entries.len();
                entries.retain(|entry| entry.id != id);
                Ok(entries.len() < before)
            })
            .await
    }
}
