//! Persistence contract for engine state

use crate::error::Result;
use crate::types::{CursorState, HistoryEntry, Playlist};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Current snapshot schema version
///
/// Bump this and add a migration step whenever a stored key changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Full durable state of the engine
///
/// Always written whole: stores keep the latest complete snapshot, so
/// overlapping saves resolve as last-write-wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version of this document
    pub schema_version: u32,

    /// All playlists in creation order
    pub playlists: Vec<Playlist>,

    /// Playback cursor
    pub cursor_state: CursorState,

    /// Playback history, newest first
    pub history: Vec<HistoryEntry>,
}

impl Snapshot {
    /// Snapshot at the current schema version
    pub fn new(
        playlists: Vec<Playlist>,
        cursor_state: CursorState,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            playlists,
            cursor_state,
            history,
        }
    }
}

/// Durable storage for engine snapshots
///
/// `load` is called once at start-up. `None` means nothing has been saved
/// yet. `save` is called after every mutation and must tolerate being called
/// again before a previous call's effects are observed.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the most recently saved snapshot
    async fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

#[async_trait]
impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    async fn load(&self) -> Result<Option<Snapshot>> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot).await
    }
}

#[async_trait]
impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    async fn load(&self) -> Result<Option<Snapshot>> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot).await
    }
}
