//! Playlist store
//!
//! In-memory collection of playlists and their ordered entries. Every
//! structural mutation renumbers positions and recomputes the cached total
//! duration before returning.

use chrono::Utc;
use marquee_core::types::{
    CreatePlaylist, EntryId, MediaItem, Playlist, PlaylistEntry, PlaylistId, UpdateEntry,
    UpdatePlaylist,
};
use marquee_core::validation::{validate_duration, validate_playlist_name};
use marquee_core::{MarqueeError, Result};
use std::collections::HashSet;
use tracing::warn;

/// Number of playlists reported in [`LibraryStats::recently_played`]
const RECENTLY_PLAYED_LIMIT: usize = 5;

/// Owns every playlist, in creation order
#[derive(Debug, Clone, Default)]
pub struct PlaylistStore {
    playlists: Vec<Playlist>,
}

impl PlaylistStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted playlists
    ///
    /// Positions and cached durations are recomputed; a mismatch is logged
    /// since it means the stored document was written by buggy code.
    pub fn from_playlists(mut playlists: Vec<Playlist>) -> Self {
        for playlist in &mut playlists {
            if let Err(err) = playlist.check_invariants() {
                warn!(playlist = %playlist.id, error = %err, "repairing stored playlist");
                playlist.renumber_entries();
                playlist.recompute_total_duration();
            }
        }
        Self { playlists }
    }

    /// All playlists in creation order
    pub fn all(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Number of playlists
    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    /// Whether the store holds no playlists
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Look up a playlist
    pub fn get(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    /// Look up a playlist, failing with `NotFound`
    pub fn require(&self, id: &PlaylistId) -> Result<&Playlist> {
        self.get(id)
            .ok_or_else(|| MarqueeError::not_found("Playlist", id.as_str()))
    }

    fn require_mut(&mut self, id: &PlaylistId) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| MarqueeError::not_found("Playlist", id.as_str()))
    }

    // ===== Playlist CRUD =====

    /// Create a playlist with a validated name
    pub fn create(&mut self, params: CreatePlaylist) -> Result<Playlist> {
        let playlist = Playlist::create(params)?;
        self.playlists.push(playlist.clone());
        Ok(playlist)
    }

    /// Apply a partial update; always refreshes `updated_at`
    pub fn update(&mut self, id: &PlaylistId, update: UpdatePlaylist) -> Result<()> {
        // Validate before touching anything
        let name = update
            .name
            .as_deref()
            .map(validate_playlist_name)
            .transpose()?;
        let playlist = self.require_mut(id)?;

        if let Some(name) = name {
            playlist.name = name;
        }
        if let Some(description) = update.description {
            playlist.description = Some(description);
        }
        if let Some(thumbnail_path) = update.thumbnail_path {
            playlist.thumbnail_path = Some(thumbnail_path);
        }
        if let Some(tags) = update.tags {
            playlist.tags = tags;
        }
        if let Some(is_public) = update.is_public {
            playlist.is_public = is_public;
        }
        if let Some(is_favorite) = update.is_favorite {
            playlist.is_favorite = is_favorite;
        }
        playlist.touch();

        Ok(())
    }

    /// Remove a playlist and return it
    pub fn delete(&mut self, id: &PlaylistId) -> Result<Playlist> {
        let index = self
            .playlists
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| MarqueeError::not_found("Playlist", id.as_str()))?;
        Ok(self.playlists.remove(index))
    }

    /// Deep-copy a playlist with fresh identities and zeroed play stats
    ///
    /// The copy is named `"<original> (copy)"` unless `new_name` is given;
    /// either name must pass validation.
    pub fn duplicate(&mut self, id: &PlaylistId, new_name: Option<&str>) -> Result<Playlist> {
        let original = self.require(id)?;
        let name = match new_name {
            Some(name) => validate_playlist_name(name)?,
            None => validate_playlist_name(&format!("{} (copy)", original.name))?,
        };

        let now = Utc::now();
        let mut copy = Playlist {
            id: PlaylistId::generate(),
            name,
            entries: original.entries.iter().map(PlaylistEntry::fresh_copy).collect(),
            created_at: now,
            updated_at: now,
            play_count: 0,
            last_played: None,
            ..original.clone()
        };
        copy.renumber_entries();
        copy.recompute_total_duration();

        self.playlists.push(copy.clone());
        Ok(copy)
    }

    // ===== Entries =====

    /// Append a media item as a new entry at the end of the playlist
    ///
    /// Fails with `Validation` when the media duration is negative or not
    /// finite; the playlist is left untouched.
    pub fn add_entry(&mut self, id: &PlaylistId, media: MediaItem) -> Result<EntryId> {
        validate_duration(media.duration, "media duration")?;
        let playlist = self.require_mut(id)?;
        let entry = PlaylistEntry::new(media, playlist.entries.len());
        let entry_id = entry.id.clone();

        playlist.entries.push(entry);
        playlist.reindex();

        Ok(entry_id)
    }

    /// Remove an entry, returning its former index and the entry itself
    pub fn remove_entry(
        &mut self,
        id: &PlaylistId,
        entry_id: &EntryId,
    ) -> Result<(usize, PlaylistEntry)> {
        let playlist = self.require_mut(id)?;
        let index = playlist
            .entry_index(entry_id)
            .ok_or_else(|| MarqueeError::not_found("Entry", entry_id.as_str()))?;

        let entry = playlist.entries.remove(index);
        playlist.reindex();

        Ok((index, entry))
    }

    /// Reorder entries to match a full permutation of their IDs
    ///
    /// Fails with `Invariant` unless `order` names every existing entry
    /// exactly once.
    pub fn reorder(&mut self, id: &PlaylistId, order: &[EntryId]) -> Result<()> {
        let playlist = self.require_mut(id)?;

        if order.len() != playlist.entries.len() {
            return Err(MarqueeError::invariant(format!(
                "reorder supplied {} entries, playlist {} has {}",
                order.len(),
                id,
                playlist.entries.len()
            )));
        }

        let existing: HashSet<&EntryId> = playlist.entries.iter().map(|e| &e.id).collect();
        let mut seen = HashSet::with_capacity(order.len());
        for entry_id in order {
            if !existing.contains(entry_id) {
                return Err(MarqueeError::invariant(format!(
                    "entry {} is not in playlist {}",
                    entry_id, id
                )));
            }
            if !seen.insert(entry_id) {
                return Err(MarqueeError::invariant(format!(
                    "entry {} appears more than once in reorder payload",
                    entry_id
                )));
            }
        }

        let mut remaining = std::mem::take(&mut playlist.entries);
        for entry_id in order {
            if let Some(pos) = remaining.iter().position(|e| &e.id == entry_id) {
                playlist.entries.push(remaining.swap_remove(pos));
            }
        }
        playlist.reindex();

        Ok(())
    }

    /// Move one entry from `from` to `to`
    pub fn move_entry(&mut self, id: &PlaylistId, from: usize, to: usize) -> Result<()> {
        let playlist = self.require(id)?;
        let len = playlist.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(MarqueeError::IndexOutOfRange { index, len });
            }
        }

        let mut order: Vec<EntryId> = playlist.entries.iter().map(|e| e.id.clone()).collect();
        let moved = order.remove(from);
        order.insert(to, moved);

        self.reorder(id, &order)
    }

    /// Update an entry's custom title or notes
    pub fn update_entry(
        &mut self,
        id: &PlaylistId,
        entry_id: &EntryId,
        update: UpdateEntry,
    ) -> Result<()> {
        let playlist = self.require_mut(id)?;
        let entry = playlist
            .entries
            .iter_mut()
            .find(|e| &e.id == entry_id)
            .ok_or_else(|| MarqueeError::not_found("Entry", entry_id.as_str()))?;

        if let Some(custom_title) = update.custom_title {
            entry.custom_title = custom_title.filter(|t| !t.trim().is_empty());
        }
        if let Some(notes) = update.notes {
            entry.notes = notes;
        }
        playlist.touch();

        Ok(())
    }

    // ===== Play statistics =====

    /// Count one playback start of a playlist
    pub fn record_play(&mut self, id: &PlaylistId) -> Result<()> {
        let playlist = self.require_mut(id)?;
        playlist.play_count = playlist.play_count.saturating_add(1);
        playlist.last_played = Some(Utc::now());
        playlist.touch();
        Ok(())
    }

    /// Count one completed play of the entry at `index`
    pub fn mark_entry_played(&mut self, id: &PlaylistId, index: usize) -> Result<()> {
        let playlist = self.require_mut(id)?;
        let len = playlist.entries.len();
        let entry = playlist
            .entries
            .get_mut(index)
            .ok_or(MarqueeError::IndexOutOfRange { index, len })?;

        entry.play_count = entry.play_count.saturating_add(1);
        entry.last_played = Some(Utc::now());
        playlist.touch();
        Ok(())
    }

    /// Aggregate statistics across all playlists
    pub fn stats(&self) -> LibraryStats {
        let mut recent: Vec<&Playlist> = self
            .playlists
            .iter()
            .filter(|p| p.last_played.is_some())
            .collect();
        recent.sort_by(|a, b| b.last_played.cmp(&a.last_played));

        LibraryStats {
            total_playlists: self.playlists.len(),
            total_entries: self.playlists.iter().map(Playlist::len).sum(),
            total_duration: self.playlists.iter().map(|p| p.total_duration).sum(),
            most_played: self
                .playlists
                .iter()
                .filter(|p| p.play_count > 0)
                .max_by_key(|p| p.play_count)
                .map(|p| p.id.clone()),
            recently_played: recent
                .into_iter()
                .take(RECENTLY_PLAYED_LIMIT)
                .map(|p| p.id.clone())
                .collect(),
            favorites: self
                .playlists
                .iter()
                .filter(|p| p.is_favorite)
                .map(|p| p.id.clone())
                .collect(),
        }
    }

    /// Verify every playlist's position and duration invariants
    pub fn check_invariants(&self) -> Result<()> {
        self.playlists.iter().try_for_each(Playlist::check_invariants)
    }
}

/// Aggregate statistics over the store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LibraryStats {
    /// Number of playlists
    pub total_playlists: usize,
    /// Number of entries across all playlists
    pub total_entries: usize,
    /// Sum of all playlist durations, in seconds
    pub total_duration: f64,
    /// Playlist with the highest play count
    pub most_played: Option<PlaylistId>,
    /// Most recently started playlists, newest first
    pub recently_played: Vec<PlaylistId>,
    /// Playlists marked as favorite
    pub favorites: Vec<PlaylistId>,
}
