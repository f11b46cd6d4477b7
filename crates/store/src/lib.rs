//! Local persistence for users, archive entries, and notifications.
//!
//! Storage is a directory of JSON documents, one per collection key, read
//! and written wholesale on each access (the same shape the original
//! client kept in browser storage). All mutations run inside a store-level
//! lock so concurrent check-and-modify sequences, energy debits in
//! particular, are atomic.

pub mod error;
pub mod models;
pub mod repositories;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Collection key for user records.
pub const USERS_KEY: &str = "magic_users";
/// Collection key for archived generation artifacts.
pub const ARCHIVE_KEY: &str = "magic_deeds";
/// Collection key for system notifications.
pub const NOTIFICATIONS_KEY: &str = "magic_notifications";

/// Directory-backed JSON document store.
///
/// Each collection key maps to `<root>/<key>.json` holding one JSON array.
/// Reading a missing file yields an empty collection. Writes land in a
/// temporary file first and are renamed into place so a crash never leaves
/// a half-written collection behind.
pub struct JsonStore {
    root: PathBuf,
    /// Serializes all read-modify-write cycles across collections.
    lock: Mutex<()>,
}

impl JsonStore {
    /// Open (creating if necessary) a store rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(root = %root.display(), "Opened JSON store");
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    /// Directory the collections live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a whole collection. A missing file is an empty collection.
    pub async fn read_collection<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_unlocked(key).await
    }

    /// Read a collection, apply `mutate`, and write the result back, all
    /// under the store lock. This is the atomic critical section every
    /// repository mutation goes through; when `mutate` rejects, nothing is
    /// written.
    pub async fn update_collection<T, R, F>(&self, key: &str, mutate: F) -> Result<R, StoreError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut items = self.read_unlocked(key).await?;
        let result = mutate(&mut items)?;
        self.write_unlocked(key, &items).await?;
        Ok(result)
    }

    // ---- private helpers ----

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    async fn read_unlocked<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_unlocked<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
