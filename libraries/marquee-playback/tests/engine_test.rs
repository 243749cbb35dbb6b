//! End-to-end tests for the playback engine facade
//!
//! Every test drives a real `PlaybackEngine` through its public async API
//! and checks both in-memory state and what reached the gateway.

use marquee_core::types::{
    CreatePlaylist, HistoryEntry, MediaId, MediaItem, PlaybackStatus, PlaylistId, RepeatMode,
    UpdatePlaylist,
};
use marquee_core::{MarqueeError, SnapshotStore};
use marquee_playback::{EngineConfig, PlaybackEngine};
use marquee_storage::{JsonFileStore, MemoryStore};

// ===== Helpers =====

fn config() -> EngineConfig {
    EngineConfig {
        shuffle_seed: Some(11),
        ..Default::default()
    }
}

fn media(id: &str, duration: f64) -> MediaItem {
    MediaItem::new(MediaId::new(id), id.to_uppercase(), duration)
}

async fn engine_with_playlist(
    name: &str,
    items: &[&str],
) -> (PlaybackEngine<MemoryStore>, MemoryStore, PlaylistId) {
    let store = MemoryStore::new();
    let mut engine = PlaybackEngine::open(store.clone(), config()).await;
    let playlist = engine
        .create_playlist(CreatePlaylist::named(name))
        .await
        .unwrap();
    for item in items {
        engine.add_entry(&playlist.id, media(item, 100.0)).await.unwrap();
    }
    (engine, store, playlist.id)
}

// ===== Scenarios =====

#[tokio::test]
async fn empty_playlist_cannot_play_until_an_entry_is_added() {
    let (mut engine, _, id) = engine_with_playlist("A", &[]).await;

    let err = engine.play(&id, 0).await.unwrap_err();
    assert!(matches!(err, MarqueeError::EmptyPlaylist(_)));
    assert_eq!(engine.cursor().status, PlaybackStatus::Idle);

    engine.add_entry(&id, media("x", 30.0)).await.unwrap();
    assert_eq!(engine.play(&id, 0).await.unwrap(), 0);

    assert_eq!(engine.cursor().status, PlaybackStatus::Playing);
    assert_eq!(engine.cursor().current_index, 0);
    assert_eq!(engine.current_item().unwrap().title, "X");
}

#[tokio::test]
async fn repeat_one_replays_same_index_on_completion() {
    let (mut engine, _, id) = engine_with_playlist("B", &["x", "y", "z"]).await;
    engine.play(&id, 1).await.unwrap();
    engine.set_repeat_mode(RepeatMode::One).await.unwrap();

    assert_eq!(engine.item_finished(100.0).await.unwrap(), Some(1));
    assert_eq!(engine.cursor().current_index, 1);

    // Manual Next still advances under repeat-one
    assert_eq!(engine.next().await.unwrap(), 2);
}

#[tokio::test]
async fn sequential_navigation_with_repeat_all_wraps() {
    let (mut engine, _, id) = engine_with_playlist("C", &["x", "y", "z"]).await;
    engine.set_repeat_mode(RepeatMode::All).await.unwrap();

    engine.play(&id, 2).await.unwrap();
    assert_eq!(engine.next_index(), Some(0));
    assert_eq!(engine.next().await.unwrap(), 0);
    assert_eq!(engine.previous().await.unwrap(), 2);
}

#[tokio::test]
async fn sequential_navigation_without_repeat_holds_at_ends() {
    let (mut engine, _, id) = engine_with_playlist("D", &["x", "y", "z"]).await;

    engine.play(&id, 2).await.unwrap();
    assert_eq!(engine.next().await.unwrap(), 2);

    engine.seek_to_index(0).await.unwrap();
    assert_eq!(engine.previous().await.unwrap(), 0);
    assert_eq!(engine.previous_index(), Some(0));
}

#[tokio::test]
async fn shuffle_next_never_repeats_current() {
    let (mut engine, _, id) = engine_with_playlist("E", &["a", "b", "c", "d", "e"]).await;
    engine.play(&id, 2).await.unwrap();
    assert!(engine.toggle_shuffle().await.unwrap());

    for _ in 0..50 {
        let current = engine.cursor().current_index;
        let next = engine.next().await.unwrap();
        assert_ne!(next, current);
        assert!(next < 5);
    }
}

#[tokio::test]
async fn natural_completion_stops_at_end_without_repeat() {
    let (mut engine, _, id) = engine_with_playlist("F", &["x", "y"]).await;
    engine.play(&id, 0).await.unwrap();

    assert_eq!(engine.item_finished(100.0).await.unwrap(), Some(1));
    assert_eq!(engine.item_finished(50.0).await.unwrap(), None);

    assert_eq!(engine.cursor().status, PlaybackStatus::Idle);
    assert_eq!(engine.cursor().playlist_id.as_ref(), Some(&id));
    assert!(engine.current_item().is_none());

    let history = engine.history(None);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].media_title, "Y");
    assert_eq!(history[0].completion_percentage, 50.0);
    assert_eq!(history[1].media_title, "X");

    let playlist = engine.playlist(&id).unwrap();
    assert_eq!(playlist.entries[0].play_count, 1);
    assert_eq!(playlist.entries[1].play_count, 1);
}

#[tokio::test]
async fn deleting_active_playlist_idles_cursor() {
    let (mut engine, store, id) = engine_with_playlist("G", &["x", "y"]).await;
    engine.play(&id, 1).await.unwrap();

    engine.delete_playlist(&id).await.unwrap();

    assert_eq!(engine.cursor().status, PlaybackStatus::Idle);
    assert!(engine.cursor().playlist_id.is_none());
    assert!(engine.playlist(&id).is_none());

    let saved = store.snapshot().unwrap();
    assert!(saved.playlists.is_empty());
    assert!(saved.cursor_state.playlist_id.is_none());
}

#[tokio::test]
async fn bad_seek_puts_active_cursor_in_error() {
    let (mut engine, _, id) = engine_with_playlist("H", &["x", "y"]).await;
    engine.play(&id, 0).await.unwrap();

    let err = engine.seek_to_index(5).await.unwrap_err();
    assert!(matches!(err, MarqueeError::IndexOutOfRange { index: 5, len: 2 }));
    assert_eq!(engine.cursor().status, PlaybackStatus::Error);

    engine.resume().await.unwrap();
    assert_eq!(engine.cursor().status, PlaybackStatus::Playing);
}

#[tokio::test]
async fn pause_on_idle_engine_is_invalid_state() {
    let (mut engine, _, _) = engine_with_playlist("I", &["x"]).await;

    assert!(matches!(
        engine.pause().await,
        Err(MarqueeError::InvalidState(_))
    ));
    assert!(matches!(
        engine.next().await,
        Err(MarqueeError::InvalidState(_))
    ));
}

#[tokio::test]
async fn create_rejects_invalid_names() {
    let store = MemoryStore::new();
    let mut engine = PlaybackEngine::open(store.clone(), config()).await;

    for name in [String::new(), "   ".to_string(), "x".repeat(101)] {
        let err = engine
            .create_playlist(CreatePlaylist::named(name))
            .await
            .unwrap_err();
        assert!(matches!(err, MarqueeError::Validation(_)));
    }
    // Rejected actions are not saved
    assert_eq!(store.save_count(), 0);

    engine
        .create_playlist(CreatePlaylist::named("Road Trip Mix"))
        .await
        .unwrap();
    assert_eq!(engine.playlists().len(), 1);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn history_query_honours_limit_and_capacity() {
    let store = MemoryStore::new();
    let mut engine = PlaybackEngine::open(
        store,
        EngineConfig {
            history_capacity: 100,
            history_query_limit: 50,
            shuffle_seed: Some(1),
        },
    )
    .await;

    for i in 0..101 {
        let entry = HistoryEntry::new(
            PlaylistId::new("p"),
            "P",
            MediaId::new(format!("m{}", i)),
            format!("Clip {}", i),
            10.0,
            10.0,
        );
        engine.record_history(entry).await.unwrap();
    }

    assert_eq!(engine.history(None).len(), 50);
    assert_eq!(engine.history(Some(1000)).len(), 100);
    assert_eq!(engine.history(Some(1))[0].media_title, "Clip 100");
    assert_eq!(engine.snapshot().history.last().unwrap().media_title, "Clip 1");
}

#[tokio::test]
async fn configured_history_capacity_is_capped_at_one_hundred() {
    let mut engine = PlaybackEngine::open(
        MemoryStore::new(),
        EngineConfig {
            history_capacity: 500,
            ..config()
        },
    )
    .await;

    for i in 0..150 {
        let entry = HistoryEntry::new(
            PlaylistId::new("p"),
            "P",
            MediaId::new(format!("m{}", i)),
            format!("Clip {}", i),
            10.0,
            10.0,
        );
        engine.record_history(entry).await.unwrap();
    }

    assert_eq!(engine.history(Some(1000)).len(), 100);
    assert_eq!(engine.snapshot().history.len(), 100);
    assert_eq!(engine.history(Some(1))[0].media_title, "Clip 149");
}

#[tokio::test]
async fn stats_reflect_library() {
    let (mut engine, _, id) = engine_with_playlist("Stats", &["x", "y"]).await;
    engine.play(&id, 0).await.unwrap();
    engine.set_favorite(&id, true).await.unwrap();

    let stats = engine.stats();

    assert_eq!(stats.total_playlists, 1);
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.total_duration, 200.0);
    assert_eq!(stats.most_played, Some(id.clone()));
    assert_eq!(stats.recently_played, vec![id.clone()]);
    assert_eq!(stats.favorites, vec![id]);
}

// ===== Persistence =====

#[tokio::test]
async fn every_mutation_is_written_through() {
    let (mut engine, store, id) = engine_with_playlist("W", &["x", "y"]).await;
    let before = store.save_count();

    engine.play(&id, 0).await.unwrap();
    engine.pause().await.unwrap();
    engine
        .update_playlist(
            &id,
            UpdatePlaylist {
                description: Some("evening".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.save_count(), before + 3);
    assert_eq!(store.snapshot().unwrap(), engine.snapshot());
}

#[tokio::test]
async fn save_failure_keeps_in_memory_change() {
    let (mut engine, store, id) = engine_with_playlist("P", &["x"]).await;
    let saved_before = store.snapshot();
    store.set_fail_saves(true);

    let err = engine.rename_playlist(&id, "Renamed").await.unwrap_err();

    assert!(err.is_persistence());
    assert_eq!(engine.playlist(&id).unwrap().name, "Renamed");
    assert_eq!(store.snapshot(), saved_before);

    // Next successful save catches the store up
    store.set_fail_saves(false);
    engine.persist().await.unwrap();
    assert_eq!(store.snapshot().unwrap().playlists[0].name, "Renamed");
}

#[tokio::test]
async fn load_failure_starts_empty() {
    let store = MemoryStore::with_snapshot(marquee_core::Snapshot::new(
        Vec::new(),
        Default::default(),
        Vec::new(),
    ));
    store.set_fail_loads(true);

    let engine = PlaybackEngine::open(store, config()).await;

    assert!(engine.playlists().is_empty());
    assert_eq!(engine.cursor().status, PlaybackStatus::Idle);
}

#[tokio::test]
async fn state_survives_restart_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marquee/state.json");

    let expected = {
        let mut engine = PlaybackEngine::open(JsonFileStore::new(&path), config()).await;
        let playlist = engine
            .create_playlist(CreatePlaylist::named("Persisted"))
            .await
            .unwrap();
        engine.add_entry(&playlist.id, media("x", 60.0)).await.unwrap();
        engine.add_entry(&playlist.id, media("y", 90.0)).await.unwrap();
        engine.play(&playlist.id, 1).await.unwrap();
        engine.item_finished(30.0).await.unwrap();
        engine.snapshot()
    };

    let engine = PlaybackEngine::open(JsonFileStore::new(&path), config()).await;

    assert_eq!(engine.snapshot(), expected);
    assert_eq!(engine.gateway().load().await.unwrap(), Some(expected));
}

#[tokio::test]
async fn non_finite_seconds_never_reach_the_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let expected = {
        let mut engine = PlaybackEngine::open(JsonFileStore::new(&path), config()).await;
        let playlist = engine
            .create_playlist(CreatePlaylist::named("Kept"))
            .await
            .unwrap();
        engine.add_entry(&playlist.id, media("x", 60.0)).await.unwrap();

        let err = engine
            .add_entry(&playlist.id, media("nan", f64::NAN))
            .await
            .unwrap_err();
        assert!(matches!(err, MarqueeError::Validation(_)));

        engine.play(&playlist.id, 0).await.unwrap();
        let err = engine.item_finished(f64::INFINITY).await.unwrap_err();
        assert!(matches!(err, MarqueeError::Validation(_)));

        assert!(engine.history(None).is_empty());
        assert_eq!(engine.playlist(&playlist.id).unwrap().total_duration, 60.0);
        engine.snapshot()
    };

    let engine = PlaybackEngine::open(JsonFileStore::new(&path), config()).await;

    assert_eq!(engine.playlists().len(), 1);
    assert_eq!(engine.playlists()[0].entries.len(), 1);
    assert_eq!(engine.snapshot(), expected);
}

#[tokio::test]
async fn stale_cursor_is_normalised_on_open() {
    let (mut engine, store, id) = engine_with_playlist("S", &["x", "y"]).await;
    engine.play(&id, 1).await.unwrap();

    let mut snapshot = store.snapshot().unwrap();
    snapshot.playlists.clear();
    let reopened = PlaybackEngine::open(MemoryStore::with_snapshot(snapshot), config()).await;

    assert_eq!(reopened.cursor().status, PlaybackStatus::Idle);
    assert!(reopened.cursor().playlist_id.is_none());
    assert!(reopened.current_item().is_none());
}
