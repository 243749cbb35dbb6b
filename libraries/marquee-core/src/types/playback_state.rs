//! Playback cursor state types
use crate::error::{MarqueeError, Result};
use crate::types::PlaylistId;
use serde::{Deserialize, Serialize};

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop advancing at the end of the playlist
    #[default]
    Off,
    /// Replay the current item when it finishes
    One,
    /// Wrap around at either end of the playlist
    All,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for RepeatMode {
    type Err = MarqueeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" => Ok(Self::Off),
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            other => Err(MarqueeError::validation(format!(
                "unknown repeat mode '{}' (expected off, one or all)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cursor status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Nothing is playing
    #[default]
    Idle,
    /// Current item is playing
    Playing,
    /// Current item is paused
    Paused,
    /// Current item is being loaded by the render surface
    Loading,
    /// Render surface failed, or an invalid seek was requested
    Error,
}

impl PlaybackStatus {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Loading => "loading",
            Self::Error => "error",
        }
    }

    /// Whether the cursor must reference a live playlist entry
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playback cursor: which playlist and index are current, plus mode flags
///
/// Holds a reference (playlist ID + index), never a copy of the playlist, so
/// it must always be resolved against the live store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorState {
    /// Active playlist, if any
    #[serde(rename = "current_playlist_id")]
    pub playlist_id: Option<PlaylistId>,

    /// Index into the active playlist's entries
    #[serde(rename = "current_item_index", default)]
    pub current_index: usize,

    /// Current status
    #[serde(default)]
    pub status: PlaybackStatus,

    /// Shuffle flag
    #[serde(default)]
    pub shuffle_enabled: bool,

    /// Repeat mode
    #[serde(default)]
    pub repeat_mode: RepeatMode,
}

impl CursorState {
    /// Whether the cursor references the given playlist
    pub fn references(&self, playlist_id: &PlaylistId) -> bool {
        self.playlist_id.as_ref() == Some(playlist_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_mode_string_conversion() {
        for mode in [RepeatMode::Off, RepeatMode::One, RepeatMode::All] {
            assert_eq!(mode.as_str().parse::<RepeatMode>().unwrap(), mode);
        }
        assert!(matches!(
            "sometimes".parse::<RepeatMode>(),
            Err(MarqueeError::Validation(_))
        ));
    }

    #[test]
    fn default_cursor_is_idle_without_playlist() {
        let cursor = CursorState::default();
        assert_eq!(cursor.status, PlaybackStatus::Idle);
        assert!(cursor.playlist_id.is_none());
        assert_eq!(cursor.current_index, 0);
        assert!(!cursor.shuffle_enabled);
        assert_eq!(cursor.repeat_mode, RepeatMode::Off);
    }

    #[test]
    fn cursor_uses_stable_keys() {
        let cursor = CursorState {
            playlist_id: Some(PlaylistId::new("p1")),
            current_index: 2,
            status: PlaybackStatus::Paused,
            shuffle_enabled: true,
            repeat_mode: RepeatMode::All,
        };

        let json = serde_json::to_value(&cursor).unwrap();
        assert_eq!(json["current_playlist_id"], "p1");
        assert_eq!(json["current_item_index"], 2);
        assert_eq!(json["status"], "paused");
        assert_eq!(json["repeat_mode"], "all");
    }
}
