//! Playlist domain types
use crate::error::{MarqueeError, Result};
use crate::types::{EntryId, MediaItem, PlaylistId};
use crate::validation::{format_duration, total_duration, validate_playlist_name};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Playlist
///
/// Entry order is playback order when shuffle is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name (1-100 trimmed characters)
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered entries
    #[serde(default)]
    pub entries: Vec<PlaylistEntry>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,

    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<PathBuf>,

    /// Marked as favorite
    #[serde(default)]
    pub is_favorite: bool,

    /// Sum of entry durations in seconds
    #[serde(default)]
    pub total_duration: f64,

    /// Number of times playback of this playlist was started
    #[serde(default)]
    pub play_count: u32,

    /// When playback of this playlist was last started
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Public/private flag
    #[serde(default)]
    pub is_public: bool,
}

impl Playlist {
    /// Create an empty playlist from validated parameters
    pub fn create(params: CreatePlaylist) -> Result<Self> {
        let name = validate_playlist_name(&params.name)?;
        let now = Utc::now();

        Ok(Self {
            id: PlaylistId::generate(),
            name,
            description: params.description,
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
            thumbnail_path: params.thumbnail_path,
            is_favorite: false,
            total_duration: 0.0,
            play_count: 0,
            last_played: None,
            tags: params.tags,
            is_public: params.is_public,
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the playlist has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by ID
    pub fn entry(&self, entry_id: &EntryId) -> Option<&PlaylistEntry> {
        self.entries.iter().find(|e| &e.id == entry_id)
    }

    /// Index of an entry by ID
    pub fn entry_index(&self, entry_id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == entry_id)
    }

    /// Rewrite every entry's position to match its index
    pub fn renumber_entries(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index;
        }
    }

    /// Recompute the cached total duration from the entries
    pub fn recompute_total_duration(&mut self) {
        self.total_duration = total_duration(&self.entries);
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Renumber, recompute duration, and refresh `updated_at` after a structural change
    pub fn reindex(&mut self) {
        self.renumber_entries();
        self.recompute_total_duration();
        self.touch();
    }

    /// Short display line, e.g. `"3 items • 4:05"`
    pub fn summary(&self) -> String {
        let noun = if self.entries.len() == 1 { "item" } else { "items" };
        format!(
            "{} {} • {}",
            self.entries.len(),
            noun,
            format_duration(self.total_duration)
        )
    }

    /// Verify positions are contiguous and the cached duration matches
    pub fn check_invariants(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.position != index {
                return Err(MarqueeError::invariant(format!(
                    "entry {} in playlist {} has position {} at index {}",
                    entry.id, self.id, entry.position, index
                )));
            }
        }

        let expected = total_duration(&self.entries);
        if self.total_duration != expected {
            return Err(MarqueeError::invariant(format!(
                "playlist {} caches duration {} but entries sum to {}",
                self.id, self.total_duration, expected
            )));
        }

        Ok(())
    }
}

/// One media item placed in a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Unique entry identifier
    pub id: EntryId,

    /// The referenced media item
    pub media: MediaItem,

    /// When the entry was added
    pub added_at: DateTime<Utc>,

    /// Completed plays of this entry
    #[serde(default)]
    pub play_count: u32,

    /// Last completed play of this entry
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,

    /// Zero-based position within the playlist
    pub position: usize,

    /// Title override shown instead of the media title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,

    /// User notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlaylistEntry {
    /// Create a fresh entry at the given position
    pub fn new(media: MediaItem, position: usize) -> Self {
        Self {
            id: EntryId::generate(),
            media,
            added_at: Utc::now(),
            play_count: 0,
            last_played: None,
            position,
            custom_title: None,
            notes: None,
        }
    }

    /// Title to display: the custom title when set, else the media title
    pub fn display_title(&self) -> &str {
        self.custom_title.as_deref().unwrap_or(&self.media.title)
    }

    /// Copy of this entry with a fresh ID and timestamps and zeroed play stats
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: EntryId::generate(),
            added_at: Utc::now(),
            play_count: 0,
            last_played: None,
            ..self.clone()
        }
    }
}

/// Parameters for creating a playlist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePlaylist {
    /// Playlist name (validated)
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Optional cover image
    #[serde(default)]
    pub thumbnail_path: Option<PathBuf>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Public flag (default private)
    #[serde(default)]
    pub is_public: bool,
}

impl CreatePlaylist {
    /// Parameters with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial playlist update, only provided fields change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    /// New name (validated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New cover image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<PathBuf>,

    /// Replacement tag list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Public flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    /// Favorite flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Partial entry metadata update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntry {
    /// Title override; `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<Option<String>>,

    /// Notes; `Some(None)` clears them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}
