//! Integration tests for the concrete snapshot stores
//!
//! On-disk stores use REAL files inside a temporary directory.

mod test_helpers;

use marquee_core::types::CursorState;
use marquee_core::{Snapshot, SnapshotStore};
use marquee_storage::{JsonFileStore, MemoryStore, SqliteStore};
use tempfile::TempDir;
use test_helpers::{playlist, sample_snapshot};

async fn sqlite_store(dir: &TempDir) -> SqliteStore {
    let url = format!("sqlite://{}", dir.path().join("marquee.db").display());
    SqliteStore::connect(&url)
        .await
        .expect("Failed to open SQLite store")
}

// ===== JSON file =====

#[tokio::test]
async fn json_missing_file_loads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));

    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn json_round_trip_preserves_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested/dirs/state.json"));
    let snapshot = sample_snapshot();

    store.save(&snapshot).await.unwrap();

    let reopened = JsonFileStore::new(store.path());
    assert_eq!(reopened.load().await.unwrap(), Some(snapshot));
    assert!(!dir.path().join("nested/dirs/state.json.tmp").exists());
}

#[tokio::test]
async fn json_overlapping_saves_leave_one_complete_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));

    let a = sample_snapshot();
    let mut b = sample_snapshot();
    b.playlists.push(playlist("Extra", 2));

    let (ra, rb) = tokio::join!(store.save(&a), store.save(&b));
    ra.unwrap();
    rb.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert!(loaded == a || loaded == b);
}

#[tokio::test]
async fn json_later_save_replaces_earlier() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));

    store.save(&sample_snapshot()).await.unwrap();
    let empty = Snapshot::new(Vec::new(), CursorState::default(), Vec::new());
    store.save(&empty).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(empty));
}

#[tokio::test]
async fn json_corrupt_file_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::new(&path).load().await.unwrap_err();
    assert!(err.is_persistence());
}

#[tokio::test]
async fn json_unreadable_file_is_backed_up_before_next_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let future = r#"{"schema_version": 99, "playlists": [], "cursor_state": {}, "history": []}"#;
    std::fs::write(&path, future).unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load().await.unwrap_err().is_persistence());
    assert_eq!(std::fs::read_to_string(store.backup_path()).unwrap(), future);

    let snapshot = sample_snapshot();
    store.save(&snapshot).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(snapshot));
    assert_eq!(std::fs::read_to_string(store.backup_path()).unwrap(), future);
}

#[tokio::test]
async fn json_reads_legacy_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{
            "video_playlists": [{
                "id": "pl-legacy",
                "name": "Old Mix",
                "items": [],
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z",
                "is_favorite": false,
                "total_duration": 0,
                "play_count": 0,
                "tags": [],
                "is_public": false
            }],
            "video_playback_state": {
                "current_playlist_id": "pl-legacy",
                "current_item_index": 0,
                "status": "idle",
                "shuffle_enabled": false,
                "repeat_mode": "one",
                "playback_history": []
            }
        }"#,
    )
    .unwrap();

    let snapshot = JsonFileStore::new(&path).load().await.unwrap().unwrap();

    assert_eq!(snapshot.playlists[0].name, "Old Mix");
    assert_eq!(snapshot.cursor_state.playlist_id, Some("pl-legacy".into()));
}

// ===== SQLite =====

#[tokio::test]
async fn sqlite_empty_database_loads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;

    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_round_trip_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = sample_snapshot();

    {
        let store = sqlite_store(&dir).await;
        store.save(&snapshot).await.unwrap();
        store.pool().close().await;
    }

    let store = sqlite_store(&dir).await;
    assert_eq!(store.load().await.unwrap(), Some(snapshot));
}

#[tokio::test]
async fn sqlite_upsert_keeps_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(&dir).await;

    store.save(&sample_snapshot()).await.unwrap();
    let mut latest = sample_snapshot();
    latest.cursor_state.current_index = 2;
    store.save(&latest).await.unwrap();

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM engine_snapshot")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(store.load().await.unwrap(), Some(latest));
}

// ===== Memory =====

#[tokio::test]
async fn memory_store_round_trip() {
    let store = MemoryStore::new();
    let snapshot = sample_snapshot();

    store.save(&snapshot).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(snapshot));
}

#[tokio::test]
async fn memory_store_load_failure_is_persistence_error() {
    let store = MemoryStore::new();
    store.set_fail_loads(true);

    assert!(store.load().await.unwrap_err().is_persistence());
}
