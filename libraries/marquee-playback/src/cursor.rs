//! Playback cursor state machine
//!
//! The cursor only references a playlist by ID and index. Every operation
//! that needs the playlist's length takes it from the caller, which resolves
//! it against the live store.
//!
//! Status transitions:
//!
//! ```text
//! idle ──play──> loading ──> playing <──pause/resume──> paused
//!   ^                          │                          │
//!   └────────────stop──────────┴──────────────────────────┘
//! any non-idle ──bad seek / media error──> error ──resume/play──> playing
//! ```

use crate::store::PlaylistStore;
use marquee_core::types::{CursorState, PlaybackStatus, Playlist, PlaylistId, RepeatMode};
use marquee_core::{MarqueeError, Result};
use rand::Rng;
use tracing::debug;

/// Index a Next press would select
///
/// With shuffle on, picks uniformly among every index except `current`
/// (or `0` for a single-entry playlist). Sequential order steps forward,
/// wrapping only under [`RepeatMode::All`] and otherwise holding at the
/// last index. [`RepeatMode::One`] is handled on natural completion, not
/// here.
pub fn next_index<R: Rng>(
    current: usize,
    len: usize,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> usize {
    if len == 0 {
        return 0;
    }
    if shuffle {
        return random_other_index(current, len, rng);
    }

    let last = len - 1;
    if current >= last {
        match repeat {
            RepeatMode::All => 0,
            RepeatMode::Off | RepeatMode::One => last,
        }
    } else {
        current + 1
    }
}

/// Index a Previous press would select
///
/// Mirror of [`next_index`]: sequential order steps back, wrapping to the
/// last index only under [`RepeatMode::All`] and otherwise clamping at `0`.
pub fn previous_index<R: Rng>(
    current: usize,
    len: usize,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> usize {
    if len == 0 {
        return 0;
    }
    if shuffle {
        return random_other_index(current, len, rng);
    }

    let last = len - 1;
    if current == 0 {
        match repeat {
            RepeatMode::All => last,
            RepeatMode::Off | RepeatMode::One => 0,
        }
    } else {
        current.min(last + 1) - 1
    }
}

fn random_other_index<R: Rng>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }
    if current >= len {
        return rng.gen_range(0..len);
    }

    // Draw from len - 1 slots and skip over the current one
    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

/// Playback cursor over one playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    state: CursorState,
}

impl PlaybackCursor {
    /// Idle cursor with no playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously persisted state
    ///
    /// Call [`PlaybackCursor::reconcile`] before trusting it.
    pub fn from_state(state: CursorState) -> Self {
        Self { state }
    }

    /// Underlying state
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Referenced playlist, if any
    pub fn playlist_id(&self) -> Option<&PlaylistId> {
        self.state.playlist_id.as_ref()
    }

    /// Current index into the referenced playlist
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Current status
    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    /// Shuffle flag
    pub fn shuffle_enabled(&self) -> bool {
        self.state.shuffle_enabled
    }

    /// Repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.state.repeat_mode
    }

    /// Whether the cursor references the given playlist
    pub fn references(&self, playlist_id: &PlaylistId) -> bool {
        self.state.references(playlist_id)
    }

    /// Start playing `playlist` at `start_index`, clamped into range
    ///
    /// Passes through `loading` and ends in `playing`. Returns the index
    /// actually selected.
    pub fn play(&mut self, playlist: &Playlist, start_index: usize) -> Result<usize> {
        if playlist.is_empty() {
            return Err(MarqueeError::EmptyPlaylist(playlist.id.to_string()));
        }

        let index = start_index.min(playlist.len() - 1);
        self.state.playlist_id = Some(playlist.id.clone());
        self.state.current_index = index;
        self.set_status(PlaybackStatus::Loading);
        self.set_status(PlaybackStatus::Playing);

        Ok(index)
    }

    /// Pause playback; no-op when already paused
    pub fn pause(&mut self) -> Result<()> {
        match self.state.status {
            PlaybackStatus::Idle => Err(MarqueeError::invalid_state("nothing is playing")),
            PlaybackStatus::Error => Err(MarqueeError::invalid_state(
                "cannot pause after a playback error",
            )),
            PlaybackStatus::Paused => Ok(()),
            PlaybackStatus::Playing | PlaybackStatus::Loading => {
                self.set_status(PlaybackStatus::Paused);
                Ok(())
            }
        }
    }

    /// Resume playback; no-op when already playing
    pub fn resume(&mut self) -> Result<()> {
        match self.state.status {
            PlaybackStatus::Idle => Err(MarqueeError::invalid_state("nothing to resume")),
            PlaybackStatus::Playing => Ok(()),
            PlaybackStatus::Paused | PlaybackStatus::Loading | PlaybackStatus::Error => {
                self.set_status(PlaybackStatus::Playing);
                Ok(())
            }
        }
    }

    /// Go idle at index 0, keeping the playlist reference
    pub fn stop(&mut self) {
        self.state.current_index = 0;
        self.set_status(PlaybackStatus::Idle);
    }

    /// Go idle and drop the playlist reference
    pub fn clear(&mut self) {
        self.state.playlist_id = None;
        self.state.current_index = 0;
        self.set_status(PlaybackStatus::Idle);
    }

    /// Jump to `index` in a playlist of `len` entries
    ///
    /// An out-of-range target moves a non-idle cursor to `error`.
    pub fn seek_to_index(&mut self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            if self.state.status != PlaybackStatus::Idle {
                self.set_status(PlaybackStatus::Error);
            }
            return Err(MarqueeError::IndexOutOfRange { index, len });
        }

        self.state.current_index = index;
        Ok(())
    }

    /// Set the current index without touching status
    ///
    /// Used after Next/Previous, where the index was already derived from
    /// the playlist length.
    pub(crate) fn move_to(&mut self, index: usize) {
        self.state.current_index = index;
    }

    /// Load and start the item at `index` of the referenced playlist
    pub(crate) fn begin_item(&mut self, index: usize) {
        self.state.current_index = index;
        self.set_status(PlaybackStatus::Loading);
        self.set_status(PlaybackStatus::Playing);
    }

    /// Flip the shuffle flag and return the new value
    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.shuffle_enabled = !self.state.shuffle_enabled;
        self.state.shuffle_enabled
    }

    /// Set the repeat mode
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.state.repeat_mode = mode;
    }

    /// Enter `error` after the render surface failed
    pub fn fail(&mut self) {
        self.set_status(PlaybackStatus::Error);
    }

    /// Index a Next press would select
    pub fn peek_next<R: Rng>(&self, len: usize, rng: &mut R) -> usize {
        next_index(
            self.state.current_index,
            len,
            self.state.shuffle_enabled,
            self.state.repeat_mode,
            rng,
        )
    }

    /// Index a Previous press would select
    pub fn peek_previous<R: Rng>(&self, len: usize, rng: &mut R) -> usize {
        previous_index(
            self.state.current_index,
            len,
            self.state.shuffle_enabled,
            self.state.repeat_mode,
            rng,
        )
    }

    /// Repair the cursor against the live store
    ///
    /// A reference to a missing playlist is dropped. An active cursor whose
    /// playlist became empty, or whose index fell out of range, goes idle at
    /// index 0. Returns whether anything changed.
    pub fn reconcile(&mut self, store: &PlaylistStore) -> bool {
        let before = self.state.clone();

        match self.state.playlist_id.as_ref().map(|id| store.get(id)) {
            Some(None) => self.clear(),
            Some(Some(playlist)) => {
                if self.state.current_index >= playlist.len() {
                    self.stop();
                }
            }
            None => {
                if self.state.status != PlaybackStatus::Idle {
                    self.stop();
                }
            }
        }

        self.state != before
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.state.status != status {
            debug!(from = %self.state.status, to = %status, "cursor status change");
            self.state.status = status;
        }
    }
}
