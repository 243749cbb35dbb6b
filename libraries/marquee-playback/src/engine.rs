//! Playback engine facade
//!
//! Owns the engine state, a persistence gateway and the shuffle RNG. Every
//! mutating method applies one [`Action`] and then writes the full snapshot
//! through the gateway.

use crate::action::{Action, EngineState, Outcome};
use crate::config::EngineConfig;
use crate::store::LibraryStats;
use marquee_core::types::{
    CreatePlaylist, CursorState, EntryId, HistoryEntry, MediaItem, Playlist, PlaylistEntry,
    PlaylistId, RepeatMode, UpdateEntry, UpdatePlaylist,
};
use marquee_core::{MarqueeError, Result, Snapshot, SnapshotStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Playlist playback engine
///
/// Construct one per process at the composition root and pass it to whatever
/// needs it. Mutations are applied in memory first; a failed save returns
/// [`MarqueeError::Persistence`] but the change stays applied.
pub struct PlaybackEngine<S: SnapshotStore> {
    state: EngineState,
    gateway: S,
    rng: StdRng,
    config: EngineConfig,
}

impl<S: SnapshotStore> PlaybackEngine<S> {
    /// Create an engine with empty state, without loading
    pub fn new(gateway: S, config: EngineConfig) -> Self {
        Self {
            state: EngineState::new(config.history_capacity),
            rng: rng_for(&config),
            gateway,
            config,
        }
    }

    /// Load saved state once and build the engine around it
    ///
    /// A load failure is not fatal: it is logged and the engine starts
    /// empty.
    pub async fn open(gateway: S, config: EngineConfig) -> Self {
        let state = match gateway.load().await {
            Ok(Some(snapshot)) => {
                info!(
                    playlists = snapshot.playlists.len(),
                    history = snapshot.history.len(),
                    "Loaded saved engine state"
                );
                EngineState::from_snapshot(snapshot, config.history_capacity)
            }
            Ok(None) => {
                info!("No saved engine state, starting empty");
                EngineState::new(config.history_capacity)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load saved engine state, starting empty");
                EngineState::new(config.history_capacity)
            }
        };

        Self {
            state,
            rng: rng_for(&config),
            gateway,
            config,
        }
    }

    /// Apply an action and write the resulting snapshot
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        let name = action.name();
        let outcome = self.state.apply(action, &mut self.rng)?;
        debug!(action = name, ?outcome, "Applied action");

        self.persist().await?;
        Ok(outcome)
    }

    /// Write the current snapshot through the gateway
    pub async fn persist(&self) -> Result<()> {
        let snapshot = self.state.snapshot();
        self.gateway.save(&snapshot).await.map_err(|e| {
            warn!(error = %e, "Failed to save engine state; in-memory state kept");
            if e.is_persistence() {
                e
            } else {
                MarqueeError::persistence(e.to_string())
            }
        })
    }

    // ===== Playlists =====

    /// Create a playlist
    pub async fn create_playlist(&mut self, params: CreatePlaylist) -> Result<Playlist> {
        self.dispatch(Action::CreatePlaylist(params))
            .await?
            .into_playlist()
    }

    /// Partially update a playlist
    pub async fn update_playlist(&mut self, id: &PlaylistId, update: UpdatePlaylist) -> Result<()> {
        self.dispatch(Action::UpdatePlaylist {
            playlist_id: id.clone(),
            update,
        })
        .await
        .map(drop)
    }

    /// Rename a playlist
    pub async fn rename_playlist(&mut self, id: &PlaylistId, name: &str) -> Result<()> {
        self.update_playlist(
            id,
            UpdatePlaylist {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    /// Mark or unmark a playlist as favorite
    pub async fn set_favorite(&mut self, id: &PlaylistId, is_favorite: bool) -> Result<()> {
        self.update_playlist(
            id,
            UpdatePlaylist {
                is_favorite: Some(is_favorite),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a playlist; clears the cursor if it referenced it
    pub async fn delete_playlist(&mut self, id: &PlaylistId) -> Result<()> {
        self.dispatch(Action::DeletePlaylist {
            playlist_id: id.clone(),
        })
        .await
        .map(drop)
    }

    /// Deep-copy a playlist
    pub async fn duplicate_playlist(
        &mut self,
        id: &PlaylistId,
        name: Option<&str>,
    ) -> Result<Playlist> {
        self.dispatch(Action::DuplicatePlaylist {
            playlist_id: id.clone(),
            name: name.map(str::to_string),
        })
        .await?
        .into_playlist()
    }

    // ===== Entries =====

    /// Append a media item to a playlist
    pub async fn add_entry(&mut self, id: &PlaylistId, media: MediaItem) -> Result<EntryId> {
        self.dispatch(Action::AddEntry {
            playlist_id: id.clone(),
            media,
        })
        .await?
        .into_entry_id()
    }

    /// Remove an entry
    pub async fn remove_entry(
        &mut self,
        id: &PlaylistId,
        entry_id: &EntryId,
    ) -> Result<PlaylistEntry> {
        self.dispatch(Action::RemoveEntry {
            playlist_id: id.clone(),
            entry_id: entry_id.clone(),
        })
        .await?
        .into_removed_entry()
    }

    /// Reorder a playlist to a full permutation of its entries
    pub async fn reorder_entries(&mut self, id: &PlaylistId, order: Vec<EntryId>) -> Result<()> {
        self.dispatch(Action::ReorderEntries {
            playlist_id: id.clone(),
            order,
        })
        .await
        .map(drop)
    }

    /// Move one entry to a new index
    pub async fn move_entry(&mut self, id: &PlaylistId, from: usize, to: usize) -> Result<()> {
        self.dispatch(Action::MoveEntry {
            playlist_id: id.clone(),
            from,
            to,
        })
        .await
        .map(drop)
    }

    /// Update an entry's custom title or notes
    pub async fn update_entry(
        &mut self,
        id: &PlaylistId,
        entry_id: &EntryId,
        update: UpdateEntry,
    ) -> Result<()> {
        self.dispatch(Action::UpdateEntry {
            playlist_id: id.clone(),
            entry_id: entry_id.clone(),
            update,
        })
        .await
        .map(drop)
    }

    // ===== Playback =====

    /// Start playing a playlist; returns the selected index
    pub async fn play(&mut self, id: &PlaylistId, start_index: usize) -> Result<usize> {
        self.dispatch(Action::Play {
            playlist_id: id.clone(),
            start_index,
        })
        .await?
        .into_index()
    }

    /// Pause playback
    pub async fn pause(&mut self) -> Result<()> {
        self.dispatch(Action::Pause).await.map(drop)
    }

    /// Resume playback
    pub async fn resume(&mut self) -> Result<()> {
        self.dispatch(Action::Resume).await.map(drop)
    }

    /// Stop playback, keeping the playlist reference
    pub async fn stop(&mut self) -> Result<()> {
        self.dispatch(Action::Stop).await.map(drop)
    }

    /// Move to the next item; returns the new index
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Result<usize> {
        self.dispatch(Action::Next).await?.into_index()
    }

    /// Move to the previous item; returns the new index
    pub async fn previous(&mut self) -> Result<usize> {
        self.dispatch(Action::Previous).await?.into_index()
    }

    /// Jump to an index in the current playlist
    pub async fn seek_to_index(&mut self, index: usize) -> Result<()> {
        self.dispatch(Action::SeekToIndex { index }).await.map(drop)
    }

    /// Flip shuffle; returns the new flag
    pub async fn toggle_shuffle(&mut self) -> Result<bool> {
        self.dispatch(Action::ToggleShuffle).await?.into_shuffle()
    }

    /// Set the repeat mode
    pub async fn set_repeat_mode(&mut self, mode: RepeatMode) -> Result<()> {
        self.dispatch(Action::SetRepeatMode(mode)).await.map(drop)
    }

    /// Handle natural completion of the current item
    ///
    /// Returns the index now playing, or `None` if playback stopped at the
    /// end of the playlist.
    pub async fn item_finished(&mut self, seconds_played: f64) -> Result<Option<usize>> {
        self.dispatch(Action::ItemFinished { seconds_played })
            .await?
            .into_finished()
    }

    /// Report that the render surface failed on the current item
    pub async fn report_media_error(&mut self) -> Result<()> {
        self.dispatch(Action::MediaError).await.map(drop)
    }

    /// Record a history entry supplied by the caller
    pub async fn record_history(&mut self, entry: HistoryEntry) -> Result<()> {
        self.dispatch(Action::RecordHistory(entry)).await.map(drop)
    }

    // ===== Queries =====

    /// Look up a playlist
    pub fn playlist(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.state.store.get(id)
    }

    /// All playlists in creation order
    pub fn playlists(&self) -> &[Playlist] {
        self.state.store.all()
    }

    /// Cursor state
    pub fn cursor(&self) -> &CursorState {
        self.state.cursor.state()
    }

    /// Entry under the cursor; `None` when idle
    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.state.current_entry()
    }

    /// Media item under the cursor; `None` when idle
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.current_entry().map(|entry| &entry.media)
    }

    /// Index a Next press would select, without moving
    ///
    /// Takes `&mut self` because shuffle draws from the engine's RNG.
    pub fn next_index(&mut self) -> Option<usize> {
        let len = self.active_len()?;
        Some(self.state.cursor.peek_next(len, &mut self.rng))
    }

    /// Index a Previous press would select, without moving
    pub fn previous_index(&mut self) -> Option<usize> {
        let len = self.active_len()?;
        Some(self.state.cursor.peek_previous(len, &mut self.rng))
    }

    fn active_len(&self) -> Option<usize> {
        self.state
            .cursor
            .playlist_id()
            .and_then(|id| self.state.store.get(id))
            .map(Playlist::len)
            .filter(|len| *len > 0)
    }

    /// Most recent history entries, newest first
    ///
    /// `limit` defaults to the configured query limit.
    pub fn history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let limit = limit.unwrap_or(self.config.history_query_limit);
        self.state.history.query(limit).cloned().collect()
    }

    /// Library statistics
    pub fn stats(&self) -> LibraryStats {
        self.state.store.stats()
    }

    /// Full snapshot of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Persistence gateway
    pub fn gateway(&self) -> &S {
        &self.gateway
    }
}

fn rng_for(config: &EngineConfig) -> StdRng {
    match config.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
