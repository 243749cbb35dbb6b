//! Playback history record
use crate::types::{HistoryId, MediaId, PlaylistId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One past playback session
///
/// Carries snapshots of the playlist name and media title so it stays
/// readable after the playlist is renamed or deleted. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Record identifier
    pub id: HistoryId,

    /// Source playlist
    pub playlist_id: PlaylistId,

    /// Playlist name at the time of playback
    #[serde(default)]
    pub playlist_name: Option<String>,

    /// Played media item
    #[serde(rename = "video_id")]
    pub media_id: MediaId,

    /// Media title at the time of playback
    #[serde(rename = "video_title")]
    pub media_title: String,

    /// When playback happened
    pub played_at: DateTime<Utc>,

    /// Seconds actually played
    pub duration_played: f64,

    /// Completion percentage, 0-100
    pub completion_percentage: f64,

    /// Free-form device description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
}

impl HistoryEntry {
    /// Build a record, deriving completion from played and total seconds
    pub fn new(
        playlist_id: PlaylistId,
        playlist_name: impl Into<String>,
        media_id: MediaId,
        media_title: impl Into<String>,
        duration_played: f64,
        media_duration: f64,
    ) -> Self {
        Self {
            id: HistoryId::generate(),
            playlist_id,
            playlist_name: Some(playlist_name.into()),
            media_id,
            media_title: media_title.into(),
            played_at: Utc::now(),
            duration_played: duration_played.max(0.0),
            completion_percentage: completion_percentage(duration_played, media_duration),
            device_info: None,
        }
    }
}

/// Percentage of `total` covered by `played`, clamped to 0-100
pub fn completion_percentage(played: f64, total: f64) -> f64 {
    if total.is_nan() || total <= 0.0 || !played.is_finite() {
        return 0.0;
    }
    (played / total * 100.0).clamp(0.0, 100.0)
}
