//! Repository layer over the JSON document store.

mod archive_repo;
mod notification_repo;
mod user_repo;

pub use archive_repo::ArchiveRepo;
pub use notification_repo::NotificationRepo;
pub use user_repo::UserRepo;

use manaforge_core::types::{time_id, Timestamp};

/// Disambiguate a time-derived id against ids already in the collection.
///
/// Same-millisecond writes (a batch archive, for instance) get a `-<n>`
/// suffix so ids stay unique while keeping the time-derived format.
pub(crate) fn unique_time_id<F>(prefix: &str, at: Timestamp, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = time_id(prefix, at);
    if !taken(&base) {
        return base;
    }
    let mut seq = 1u32;
    loop {
        let candidate = format!("{base}-{seq}");
        if !taken(&candidate) {
            return candidate;
        }
        seq += 1;
    }
}
