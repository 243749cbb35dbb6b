//! Shared fixtures for store integration tests

use marquee_core::types::{
    CreatePlaylist, CursorState, HistoryEntry, MediaId, MediaItem, PlaybackStatus, Playlist,
    PlaylistEntry, RepeatMode, Resolution,
};
use marquee_core::Snapshot;

/// Playlist with `len` entries of 60 seconds each
pub fn playlist(name: &str, len: usize) -> Playlist {
    let mut playlist = Playlist::create(CreatePlaylist::named(name)).expect("valid name");
    for i in 0..len {
        let id = MediaId::new(format!("{}-{}", name, i));
        let mut media = MediaItem::new(id, format!("Clip {}", i), 60.0)
            .with_path(format!("/videos/{}/{}.mp4", name, i))
            .with_format("mp4");
        media.resolution = Some(Resolution {
            width: 1920,
            height: 1080,
        });
        playlist.entries.push(PlaylistEntry::new(media, i));
    }
    playlist.reindex();
    playlist
}

/// Non-trivial snapshot: two playlists, an active cursor and some history
pub fn sample_snapshot() -> Snapshot {
    let first = playlist("Road Trip", 3);
    let second = playlist("Workout", 1);

    let history = vec![HistoryEntry::new(
        first.id.clone(),
        first.name.clone(),
        first.entries[0].media.id.clone(),
        first.entries[0].media.title.clone(),
        45.0,
        60.0,
    )];

    let cursor = CursorState {
        playlist_id: Some(first.id.clone()),
        current_index: 1,
        status: PlaybackStatus::Paused,
        shuffle_enabled: true,
        repeat_mode: RepeatMode::All,
    };

    Snapshot::new(vec![first, second], cursor, history)
}
