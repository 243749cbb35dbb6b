//! Marquee Core
//!
//! Platform-agnostic core types, validation helpers, and the persistence
//! contract for the Marquee playlist playback engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `MediaItem`, `Playlist`, `PlaylistEntry`, `CursorState`, `HistoryEntry`
//! - **Identifiers**: collision-resistant `PlaylistId`, `EntryId`, `MediaId`, `HistoryId`
//! - **Validation**: playlist name rules and duration aggregation
//! - **Persistence Contract**: the `Snapshot` document and the `SnapshotStore` trait
//! - **Error Handling**: Unified `MarqueeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use marquee_core::types::{CreatePlaylist, MediaItem, MediaId, Playlist, PlaylistEntry};
//!
//! let mut playlist = Playlist::create(CreatePlaylist::named("Road Trip Mix")).unwrap();
//! let item = MediaItem::new(MediaId::new("clip-1"), "Opening", 95.0);
//! playlist.entries.push(PlaylistEntry::new(item, 0));
//! playlist.reindex();
//!
//! assert_eq!(playlist.len(), 1);
//! assert_eq!(playlist.total_duration, 95.0);
//! assert!(playlist.check_invariants().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;
pub mod validation;

pub use error::{MarqueeError, Result};
pub use storage::{Snapshot, SnapshotStore, SCHEMA_VERSION};

pub use types::{
    // Identifiers
    EntryId, HistoryId, MediaId, PlaylistId,
    // Media
    MediaItem, Resolution,
    // Playlists
    CreatePlaylist, Playlist, PlaylistEntry, UpdateEntry, UpdatePlaylist,
    // Playback
    CursorState, PlaybackStatus, RepeatMode,
    // History
    HistoryEntry,
};
