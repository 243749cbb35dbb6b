//! Media item types supplied by the catalog
use crate::types::MediaId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A playable media item
///
/// Produced by the file-scanning collaborator and treated as immutable by
/// the engine once referenced from a playlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Catalog identifier
    pub id: MediaId,

    /// Display title
    pub title: String,

    /// Location of the media resource
    #[serde(default)]
    pub file_path: PathBuf,

    /// Duration in seconds
    pub duration: f64,

    /// File size in bytes
    #[serde(default)]
    pub file_size: u64,

    /// Container format (e.g. "mp4", "mkv")
    #[serde(default)]
    pub format: String,

    /// Frame size, for video items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,

    /// Codec name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,

    /// Bitrate in bits per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,

    /// Frames per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,

    /// Pre-rendered thumbnail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<PathBuf>,
}

impl MediaItem {
    /// Create a media item with only the fields the engine relies on
    pub fn new(id: MediaId, title: impl Into<String>, duration: f64) -> Self {
        Self {
            id,
            title: title.into(),
            file_path: PathBuf::new(),
            duration,
            file_size: 0,
            format: String::new(),
            resolution: None,
            codec: None,
            bitrate: None,
            frame_rate: None,
            thumbnail_path: None,
        }
    }

    /// Set the file path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Set the container format
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// Video frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_path_and_format() {
        let item = MediaItem::new(MediaId::new("m1"), "Clip", 12.5)
            .with_path("/videos/clip.mp4")
            .with_format("mp4");

        assert_eq!(item.file_path, PathBuf::from("/videos/clip.mp4"));
        assert_eq!(item.format, "mp4");
        assert_eq!(item.duration, 12.5);
    }

    #[test]
    fn optional_metadata_is_omitted_when_absent() {
        let item = MediaItem::new(MediaId::new("m1"), "Clip", 1.0);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("codec").is_none());
        assert!(json.get("resolution").is_none());
    }

    #[test]
    fn resolution_display() {
        let res = Resolution {
            width: 1920,
            height: 1080,
        };
        assert_eq!(res.to_string(), "1920x1080");
    }
}
