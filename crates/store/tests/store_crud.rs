//! Integration tests for the JSON store repository layer.
//!
//! Exercises the repositories against a real on-disk store:
//! - User creation, lookup, and duplicate-email conflicts
//! - Atomic energy debit and credit
//! - Archive append ordering, previews, and deletion
//! - Notification read-flag transitions
//! - The wholesale on-disk collection format

use manaforge_core::model::ArtifactKind;
use manaforge_store::error::StoreError;
use manaforge_store::models::archive::{NewArchiveEntry, TEXT_PREVIEW_PLACEHOLDER};
use manaforge_store::models::notification::NotificationKind;
use manaforge_store::models::user::{CreateUser, Tier, STARTING_ENERGY};
use manaforge_store::repositories::{ArchiveRepo, NotificationRepo, UserRepo};
use manaforge_store::{JsonStore, USERS_KEY};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn open_store() -> (JsonStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonStore::open(dir.path()).await.expect("open store");
    (store, dir)
}

fn new_user(name: &str, email: Option<&str>) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.map(str::to_string),
        password_hash: None,
        tier: Tier::Free,
        is_guest: false,
        magic_energy: STARTING_ENERGY,
    }
}

fn new_entry(title: &str, kind: ArtifactKind, content: &str) -> NewArchiveEntry {
    NewArchiveEntry {
        title: title.to_string(),
        kind,
        content: content.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_find_user() {
    let (store, _dir) = open_store().await;

    let created = UserRepo::create(&store, new_user("Wizard", Some("w@example.com")))
        .await
        .unwrap();
    assert!(created.id.starts_with("u_"));
    assert_eq!(created.magic_energy, STARTING_ENERGY);

    let found = UserRepo::get(&store, &created.id).await.unwrap();
    assert_eq!(found.name, "Wizard");
    assert_eq!(found.email.as_deref(), Some("w@example.com"));

    let by_email = UserRepo::find_by_email(&store, "w@example.com")
        .await
        .unwrap();
    assert_eq!(by_email.unwrap().id, created.id);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let (store, _dir) = open_store().await;

    UserRepo::create(&store, new_user("First", Some("dup@example.com")))
        .await
        .unwrap();
    let result = UserRepo::create(&store, new_user("Second", Some("dup@example.com"))).await;

    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(UserRepo::list(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let (store, _dir) = open_store().await;
    let result = UserRepo::get(&store, "u_0").await;
    assert!(matches!(
        result,
        Err(StoreError::NotFound { entity: "user", .. })
    ));
}

// ---------------------------------------------------------------------------
// Energy ledger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn debit_and_credit_round_trip() {
    let (store, _dir) = open_store().await;
    let user = UserRepo::create(&store, new_user("Spender", None))
        .await
        .unwrap();

    let balance = UserRepo::debit_energy(&store, &user.id, 3).await.unwrap();
    assert_eq!(balance, STARTING_ENERGY - 3);

    let balance = UserRepo::credit_energy(&store, &user.id, 100).await.unwrap();
    assert_eq!(balance, STARTING_ENERGY - 3 + 100);
}

#[tokio::test]
async fn overdraw_is_rejected_and_balance_unchanged() {
    let (store, _dir) = open_store().await;
    let user = UserRepo::create(&store, new_user("Broke", None)).await.unwrap();

    let result = UserRepo::debit_energy(&store, &user.id, STARTING_ENERGY + 1).await;
    assert!(matches!(
        result,
        Err(StoreError::InsufficientEnergy {
            required,
            available
        }) if required == STARTING_ENERGY + 1 && available == STARTING_ENERGY
    ));

    let user = UserRepo::get(&store, &user.id).await.unwrap();
    assert_eq!(user.magic_energy, STARTING_ENERGY);
}

#[tokio::test]
async fn concurrent_debits_cannot_both_pass() {
    let (store, _dir) = open_store().await;
    let mut input = new_user("Racer", None);
    input.magic_energy = 5;
    let user = UserRepo::create(&store, input).await.unwrap();

    // Both debits would individually pass the pre-check; only one may win.
    let (a, b) = tokio::join!(
        UserRepo::debit_energy(&store, &user.id, 3),
        UserRepo::debit_energy(&store, &user.id, 3),
    );

    assert_eq!(
        a.is_ok() as u8 + b.is_ok() as u8,
        1,
        "exactly one debit must succeed"
    );
    let user = UserRepo::get(&store, &user.id).await.unwrap();
    assert_eq!(user.magic_energy, 2);
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archive_prepends_newest_first() {
    let (store, _dir) = open_store().await;

    ArchiveRepo::append(&store, new_entry("first", ArtifactKind::Text, "copy"))
        .await
        .unwrap();
    ArchiveRepo::append(&store, new_entry("second", ArtifactKind::Image, "data:image/png;base64,QUJD"))
        .await
        .unwrap();

    let entries = ArchiveRepo::list(&store).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "second");
    assert_eq!(entries[1].title, "first");
}

#[tokio::test]
async fn text_entries_get_placeholder_preview() {
    let (store, _dir) = open_store().await;

    let text = ArchiveRepo::append(&store, new_entry("copy", ArtifactKind::Text, "Buy now!"))
        .await
        .unwrap();
    assert_eq!(text.preview, TEXT_PREVIEW_PLACEHOLDER);
    assert_eq!(text.content, "Buy now!");

    let image = ArchiveRepo::append(
        &store,
        new_entry("shot", ArtifactKind::Image, "data:image/png;base64,QUJD"),
    )
    .await
    .unwrap();
    assert_eq!(image.preview, image.content);
}

#[tokio::test]
async fn rapid_appends_get_unique_ids() {
    let (store, _dir) = open_store().await;

    for i in 0..4 {
        ArchiveRepo::append(
            &store,
            new_entry(&format!("batch {i}"), ArtifactKind::Image, "data:image/png;base64,QUJD"),
        )
        .await
        .unwrap();
    }

    let entries = ArchiveRepo::list(&store).await.unwrap();
    let mut ids: Vec<_> = entries.iter().map(|e| e.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4, "same-millisecond appends must not collide");
}

#[tokio::test]
async fn delete_removes_one_entry() {
    let (store, _dir) = open_store().await;

    let kept = ArchiveRepo::append(&store, new_entry("keep", ArtifactKind::Text, "a"))
        .await
        .unwrap();
    let dropped = ArchiveRepo::append(&store, new_entry("drop", ArtifactKind::Text, "b"))
        .await
        .unwrap();

    assert!(ArchiveRepo::delete(&store, &dropped.id).await.unwrap());
    assert!(!ArchiveRepo::delete(&store, &dropped.id).await.unwrap());

    let entries = ArchiveRepo::list(&store).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, kept.id);
}

#[tokio::test]
async fn list_by_kind_filters() {
    let (store, _dir) = open_store().await;

    ArchiveRepo::append(&store, new_entry("copy", ArtifactKind::Text, "a"))
        .await
        .unwrap();
    ArchiveRepo::append(&store, new_entry("shot", ArtifactKind::Image, "b"))
        .await
        .unwrap();

    let images = ArchiveRepo::list_by_kind(&store, ArtifactKind::Image)
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].title, "shot");
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notification_read_transitions() {
    let (store, _dir) = open_store().await;

    let first = NotificationRepo::create(&store, "Welcome", "Hello!", NotificationKind::System)
        .await
        .unwrap();
    NotificationRepo::create(&store, "Low energy", "Top up", NotificationKind::Alert)
        .await
        .unwrap();

    assert_eq!(NotificationRepo::unread_count(&store).await.unwrap(), 2);

    assert!(NotificationRepo::mark_read(&store, &first.id).await.unwrap());
    // Already read, so a second mark is a no-op.
    assert!(!NotificationRepo::mark_read(&store, &first.id).await.unwrap());
    assert_eq!(NotificationRepo::unread_count(&store).await.unwrap(), 1);

    let unread = NotificationRepo::list(&store, true).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].title, "Low energy");

    assert_eq!(NotificationRepo::mark_all_read(&store).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&store).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// On-disk format
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collections_are_wholesale_json_arrays() {
    let (store, dir) = open_store().await;

    UserRepo::create(&store, new_user("Formatted", Some("f@example.com")))
        .await
        .unwrap();

    let raw = tokio::fs::read_to_string(dir.path().join(format!("{USERS_KEY}.json")))
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let users = parsed.as_array().expect("top-level JSON array");
    assert_eq!(users.len(), 1);
    // Field names match the original client's storage format.
    assert_eq!(users[0]["name"], "Formatted");
    assert!(users[0]["magicEnergy"].is_u64());
    assert_eq!(users[0]["isGuest"], false);
}

#[tokio::test]
async fn missing_collection_reads_as_empty() {
    let (store, _dir) = open_store().await;
    let entries = ArchiveRepo::list(&store).await.unwrap();
    assert!(entries.is_empty());
}
