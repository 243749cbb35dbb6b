//! Engine actions and their state transitions
//!
//! Every mutation of engine state is expressed as one [`Action`] variant and
//! applied through [`EngineState::apply`], which dispatches to one transition
//! function per variant. Transitions validate before mutating, so a failed
//! action leaves state untouched (the one exception being a bad seek, which
//! moves an active cursor to `error`).

use crate::cursor::PlaybackCursor;
use crate::history::HistoryLedger;
use crate::store::PlaylistStore;
use marquee_core::types::{
    CreatePlaylist, EntryId, HistoryEntry, MediaItem, PlaybackStatus, Playlist, PlaylistEntry,
    PlaylistId, RepeatMode, UpdateEntry, UpdatePlaylist,
};
use marquee_core::validation::validate_duration;
use marquee_core::{MarqueeError, Result, Snapshot};
use rand::Rng;
use tracing::{debug, warn};

/// A single mutation of engine state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Create a new, empty playlist
    CreatePlaylist(CreatePlaylist),

    /// Partially update playlist metadata
    UpdatePlaylist {
        /// Target playlist
        playlist_id: PlaylistId,
        /// Fields to change
        update: UpdatePlaylist,
    },

    /// Delete a playlist, clearing the cursor if it referenced it
    DeletePlaylist {
        /// Target playlist
        playlist_id: PlaylistId,
    },

    /// Deep-copy a playlist
    DuplicatePlaylist {
        /// Source playlist
        playlist_id: PlaylistId,
        /// Name for the copy; `"<name> (copy)"` when unset
        name: Option<String>,
    },

    /// Append a media item to a playlist
    AddEntry {
        /// Target playlist
        playlist_id: PlaylistId,
        /// Item to append
        media: MediaItem,
    },

    /// Remove one entry from a playlist
    RemoveEntry {
        /// Target playlist
        playlist_id: PlaylistId,
        /// Entry to remove
        entry_id: EntryId,
    },

    /// Reorder a playlist to a full permutation of its entries
    ReorderEntries {
        /// Target playlist
        playlist_id: PlaylistId,
        /// Every entry ID exactly once, in the new order
        order: Vec<EntryId>,
    },

    /// Move one entry to a new index
    MoveEntry {
        /// Target playlist
        playlist_id: PlaylistId,
        /// Current index of the entry
        from: usize,
        /// Destination index
        to: usize,
    },

    /// Update an entry's custom title or notes
    UpdateEntry {
        /// Target playlist
        playlist_id: PlaylistId,
        /// Target entry
        entry_id: EntryId,
        /// Fields to change
        update: UpdateEntry,
    },

    /// Start playing a playlist
    Play {
        /// Playlist to play
        playlist_id: PlaylistId,
        /// First index, clamped into range
        start_index: usize,
    },

    /// Pause the current item
    Pause,

    /// Resume the current item
    Resume,

    /// Stop playback, keeping the playlist reference
    Stop,

    /// Select the next item
    Next,

    /// Select the previous item
    Previous,

    /// Jump to an index in the current playlist
    SeekToIndex {
        /// Target index
        index: usize,
    },

    /// Flip the shuffle flag
    ToggleShuffle,

    /// Set the repeat mode
    SetRepeatMode(RepeatMode),

    /// The current item reached its end
    ItemFinished {
        /// Seconds actually played
        seconds_played: f64,
    },

    /// The render surface failed to play the current item
    MediaError,

    /// Record a history entry supplied by the caller
    RecordHistory(HistoryEntry),
}

impl Action {
    /// Short stable name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePlaylist(_) => "create_playlist",
            Self::UpdatePlaylist { .. } => "update_playlist",
            Self::DeletePlaylist { .. } => "delete_playlist",
            Self::DuplicatePlaylist { .. } => "duplicate_playlist",
            Self::AddEntry { .. } => "add_entry",
            Self::RemoveEntry { .. } => "remove_entry",
            Self::ReorderEntries { .. } => "reorder_entries",
            Self::MoveEntry { .. } => "move_entry",
            Self::UpdateEntry { .. } => "update_entry",
            Self::Play { .. } => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::SeekToIndex { .. } => "seek_to_index",
            Self::ToggleShuffle => "toggle_shuffle",
            Self::SetRepeatMode(_) => "set_repeat_mode",
            Self::ItemFinished { .. } => "item_finished",
            Self::MediaError => "media_error",
            Self::RecordHistory(_) => "record_history",
        }
    }
}

/// Value produced by a successful transition
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to report
    Done,
    /// A playlist was created or duplicated
    Playlist(Playlist),
    /// An entry was appended
    EntryAdded(EntryId),
    /// An entry was removed
    EntryRemoved(PlaylistEntry),
    /// The cursor now points at this index
    Index(usize),
    /// Result of a natural completion: the index now playing, or `None`
    /// when playback stopped at the end of the playlist
    Finished(Option<usize>),
    /// New shuffle flag
    Shuffle(bool),
}

impl Outcome {
    /// Created or duplicated playlist
    pub fn into_playlist(self) -> Result<Playlist> {
        match self {
            Self::Playlist(playlist) => Ok(playlist),
            other => Err(unexpected("playlist", &other)),
        }
    }

    /// ID of an appended entry
    pub fn into_entry_id(self) -> Result<EntryId> {
        match self {
            Self::EntryAdded(id) => Ok(id),
            other => Err(unexpected("entry id", &other)),
        }
    }

    /// Removed entry
    pub fn into_removed_entry(self) -> Result<PlaylistEntry> {
        match self {
            Self::EntryRemoved(entry) => Ok(entry),
            other => Err(unexpected("removed entry", &other)),
        }
    }

    /// Selected cursor index
    pub fn into_index(self) -> Result<usize> {
        match self {
            Self::Index(index) => Ok(index),
            other => Err(unexpected("index", &other)),
        }
    }

    /// Index chosen after natural completion
    pub fn into_finished(self) -> Result<Option<usize>> {
        match self {
            Self::Finished(index) => Ok(index),
            other => Err(unexpected("finish result", &other)),
        }
    }

    /// New shuffle flag
    pub fn into_shuffle(self) -> Result<bool> {
        match self {
            Self::Shuffle(enabled) => Ok(enabled),
            other => Err(unexpected("shuffle flag", &other)),
        }
    }
}

fn unexpected(wanted: &str, got: &Outcome) -> MarqueeError {
    MarqueeError::invariant(format!("expected {} outcome, got {:?}", wanted, got))
}

/// Complete in-memory engine state
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// All playlists
    pub store: PlaylistStore,
    /// Playback cursor
    pub cursor: PlaybackCursor,
    /// Playback history
    pub history: HistoryLedger,
}

impl EngineState {
    /// Empty state with the given history capacity
    pub fn new(history_capacity: usize) -> Self {
        Self {
            store: PlaylistStore::new(),
            cursor: PlaybackCursor::new(),
            history: HistoryLedger::new(history_capacity),
        }
    }

    /// Rebuild state from a stored snapshot
    ///
    /// A cursor that no longer matches the stored playlists is normalised.
    pub fn from_snapshot(snapshot: Snapshot, history_capacity: usize) -> Self {
        let mut state = Self {
            store: PlaylistStore::from_playlists(snapshot.playlists),
            cursor: PlaybackCursor::from_state(snapshot.cursor_state),
            history: HistoryLedger::from_entries(snapshot.history, history_capacity),
        };

        if state.cursor.reconcile(&state.store) {
            warn!(cursor = ?state.cursor.state(), "stored cursor was stale, reset to idle");
        }

        state
    }

    /// Full snapshot of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.store.all().to_vec(),
            self.cursor.state().clone(),
            self.history.to_vec(),
        )
    }

    /// Entry the cursor currently points at
    ///
    /// `None` when idle or when the reference does not resolve.
    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        if self.cursor.status() == PlaybackStatus::Idle {
            return None;
        }
        self.cursor
            .playlist_id()
            .and_then(|id| self.store.get(id))
            .and_then(|playlist| playlist.entries.get(self.cursor.current_index()))
    }

    /// Apply one action
    pub fn apply<R: Rng>(&mut self, action: Action, rng: &mut R) -> Result<Outcome> {
        let outcome = match action {
            Action::CreatePlaylist(params) => self.create_playlist(params),
            Action::UpdatePlaylist {
                playlist_id,
                update,
            } => self.update_playlist(&playlist_id, update),
            Action::DeletePlaylist { playlist_id } => self.delete_playlist(&playlist_id),
            Action::DuplicatePlaylist { playlist_id, name } => {
                self.duplicate_playlist(&playlist_id, name.as_deref())
            }
            Action::AddEntry { playlist_id, media } => self.add_entry(&playlist_id, media),
            Action::RemoveEntry {
                playlist_id,
                entry_id,
            } => self.remove_entry(&playlist_id, &entry_id),
            Action::ReorderEntries { playlist_id, order } => {
                self.reorder_entries(&playlist_id, &order)
            }
            Action::MoveEntry {
                playlist_id,
                from,
                to,
            } => self.move_entry(&playlist_id, from, to),
            Action::UpdateEntry {
                playlist_id,
                entry_id,
                update,
            } => self.update_entry(&playlist_id, &entry_id, update),
            Action::Play {
                playlist_id,
                start_index,
            } => self.play(&playlist_id, start_index),
            Action::Pause => self.cursor.pause().map(|()| Outcome::Done),
            Action::Resume => self.cursor.resume().map(|()| Outcome::Done),
            Action::Stop => {
                self.cursor.stop();
                Ok(Outcome::Done)
            }
            Action::Next => self.step(rng, PlaybackCursor::peek_next),
            Action::Previous => self.step(rng, PlaybackCursor::peek_previous),
            Action::SeekToIndex { index } => self.seek_to_index(index),
            Action::ToggleShuffle => Ok(Outcome::Shuffle(self.cursor.toggle_shuffle())),
            Action::SetRepeatMode(mode) => {
                self.cursor.set_repeat_mode(mode);
                Ok(Outcome::Done)
            }
            Action::ItemFinished { seconds_played } => self.item_finished(seconds_played, rng),
            Action::MediaError => self.media_error(),
            Action::RecordHistory(entry) => self.record_history(entry),
        }?;

        if self.cursor.reconcile(&self.store) {
            debug!(cursor = ?self.cursor.state(), "cursor reconciled after transition");
        }

        Ok(outcome)
    }

    // ===== Playlist transitions =====

    fn create_playlist(&mut self, params: CreatePlaylist) -> Result<Outcome> {
        self.store.create(params).map(Outcome::Playlist)
    }

    fn update_playlist(&mut self, id: &PlaylistId, update: UpdatePlaylist) -> Result<Outcome> {
        self.store.update(id, update)?;
        Ok(Outcome::Done)
    }

    fn delete_playlist(&mut self, id: &PlaylistId) -> Result<Outcome> {
        self.store.delete(id)?;
        if self.cursor.references(id) {
            self.cursor.clear();
        }
        Ok(Outcome::Done)
    }

    fn duplicate_playlist(&mut self, id: &PlaylistId, name: Option<&str>) -> Result<Outcome> {
        self.store.duplicate(id, name).map(Outcome::Playlist)
    }

    // ===== Entry transitions =====

    fn add_entry(&mut self, id: &PlaylistId, media: MediaItem) -> Result<Outcome> {
        self.store.add_entry(id, media).map(Outcome::EntryAdded)
    }

    fn remove_entry(&mut self, id: &PlaylistId, entry_id: &EntryId) -> Result<Outcome> {
        let (removed_index, entry) = self.store.remove_entry(id, entry_id)?;

        if self.cursor.references(id) {
            let remaining = self.store.require(id)?.len();
            let current = self.cursor.current_index();

            if removed_index < current {
                self.cursor.move_to(current - 1);
            } else if current >= remaining {
                if remaining == 0 {
                    self.cursor.stop();
                } else {
                    self.cursor.move_to(remaining - 1);
                }
            }
        }

        Ok(Outcome::EntryRemoved(entry))
    }

    fn reorder_entries(&mut self, id: &PlaylistId, order: &[EntryId]) -> Result<Outcome> {
        let current = self.current_entry_id(id);
        self.store.reorder(id, order)?;
        self.follow_entry(id, current.as_ref())?;
        Ok(Outcome::Done)
    }

    fn move_entry(&mut self, id: &PlaylistId, from: usize, to: usize) -> Result<Outcome> {
        let current = self.current_entry_id(id);
        self.store.move_entry(id, from, to)?;
        self.follow_entry(id, current.as_ref())?;
        Ok(Outcome::Done)
    }

    fn update_entry(
        &mut self,
        id: &PlaylistId,
        entry_id: &EntryId,
        update: UpdateEntry,
    ) -> Result<Outcome> {
        self.store.update_entry(id, entry_id, update)?;
        Ok(Outcome::Done)
    }

    /// Entry under the cursor, if the cursor references `id`
    fn current_entry_id(&self, id: &PlaylistId) -> Option<EntryId> {
        if !self.cursor.references(id) {
            return None;
        }
        self.store
            .get(id)
            .and_then(|p| p.entries.get(self.cursor.current_index()))
            .map(|e| e.id.clone())
    }

    /// Keep the cursor on the same entry after a reorder
    fn follow_entry(&mut self, id: &PlaylistId, entry_id: Option<&EntryId>) -> Result<()> {
        if let Some(entry_id) = entry_id {
            if let Some(index) = self.store.require(id)?.entry_index(entry_id) {
                self.cursor.move_to(index);
            }
        }
        Ok(())
    }

    // ===== Cursor transitions =====

    fn play(&mut self, id: &PlaylistId, start_index: usize) -> Result<Outcome> {
        let index = self.cursor.play(self.store.require(id)?, start_index)?;
        self.store.record_play(id)?;
        Ok(Outcome::Index(index))
    }

    /// Playlist the cursor references, failing if there is none
    fn active_playlist(&self) -> Result<&Playlist> {
        let id = self
            .cursor
            .playlist_id()
            .ok_or_else(|| MarqueeError::invalid_state("no playlist selected"))?;
        self.store.require(id)
    }

    fn step<R: Rng>(
        &mut self,
        rng: &mut R,
        pick: fn(&PlaybackCursor, usize, &mut R) -> usize,
    ) -> Result<Outcome> {
        let playlist = self.active_playlist()?;
        if playlist.is_empty() {
            return Err(MarqueeError::EmptyPlaylist(playlist.id.to_string()));
        }

        let index = pick(&self.cursor, playlist.len(), rng);
        self.cursor.move_to(index);
        Ok(Outcome::Index(index))
    }

    fn seek_to_index(&mut self, index: usize) -> Result<Outcome> {
        let len = self.active_playlist()?.len();
        self.cursor.seek_to_index(index, len)?;
        Ok(Outcome::Index(index))
    }

    fn media_error(&mut self) -> Result<Outcome> {
        if self.cursor.status() == PlaybackStatus::Idle {
            return Err(MarqueeError::invalid_state("nothing is playing"));
        }
        self.cursor.fail();
        Ok(Outcome::Done)
    }

    fn record_history(&mut self, entry: HistoryEntry) -> Result<Outcome> {
        validate_duration(entry.duration_played, "duration played")?;
        if !entry.completion_percentage.is_finite() {
            return Err(MarqueeError::validation(format!(
                "completion percentage must be finite, got {}",
                entry.completion_percentage
            )));
        }
        self.history.record(entry);
        Ok(Outcome::Done)
    }

    /// Natural end of the current item
    ///
    /// Records history and the entry's play count, then replays under
    /// repeat-one, stops at the end of a sequential playlist without
    /// repeat, or advances with the Next rule.
    fn item_finished<R: Rng>(&mut self, seconds_played: f64, rng: &mut R) -> Result<Outcome> {
        if !seconds_played.is_finite() {
            return Err(MarqueeError::validation(format!(
                "seconds played must be finite, got {}",
                seconds_played
            )));
        }
        if self.cursor.status() == PlaybackStatus::Idle {
            return Err(MarqueeError::invalid_state("nothing is playing"));
        }

        let playlist = self.active_playlist()?;
        let index = self.cursor.current_index();
        let entry = playlist
            .entries
            .get(index)
            .ok_or(MarqueeError::IndexOutOfRange {
                index,
                len: playlist.len(),
            })?;

        let record = HistoryEntry::new(
            playlist.id.clone(),
            playlist.name.clone(),
            entry.media.id.clone(),
            entry.media.title.clone(),
            seconds_played,
            entry.media.duration,
        );
        let playlist_id = playlist.id.clone();
        let len = playlist.len();

        self.history.record(record);
        self.store.mark_entry_played(&playlist_id, index)?;

        let shuffle = self.cursor.shuffle_enabled();
        let next = match self.cursor.repeat_mode() {
            RepeatMode::One => Some(index),
            RepeatMode::Off if !shuffle && index + 1 >= len => None,
            RepeatMode::Off | RepeatMode::All => Some(self.cursor.peek_next(len, rng)),
        };

        match next {
            Some(next) => self.cursor.begin_item(next),
            None => self.cursor.stop(),
        }

        Ok(Outcome::Finished(next))
    }
}
