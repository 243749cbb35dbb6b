//! Pure validation and duration helpers

use crate::error::{MarqueeError, Result};
use crate::types::PlaylistEntry;

/// Maximum playlist name length, in characters after trimming
pub const MAX_PLAYLIST_NAME_CHARS: usize = 100;

/// Validate a playlist name and return it trimmed
///
/// Fails with `Validation` when the trimmed name is empty or longer than
/// [`MAX_PLAYLIST_NAME_CHARS`] characters.
pub fn validate_playlist_name(name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(MarqueeError::validation("playlist name must not be empty"));
    }

    let chars = trimmed.chars().count();
    if chars > MAX_PLAYLIST_NAME_CHARS {
        return Err(MarqueeError::validation(format!(
            "playlist name is {} characters, maximum is {}",
            chars, MAX_PLAYLIST_NAME_CHARS
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate a length of time in seconds
///
/// Non-finite values cannot be stored in a JSON snapshot, so they are
/// rejected along with negative ones.
pub fn validate_duration(seconds: f64, what: &str) -> Result<f64> {
    if !seconds.is_finite() {
        return Err(MarqueeError::validation(format!(
            "{} must be a finite number of seconds, got {}",
            what, seconds
        )));
    }
    if seconds < 0.0 {
        return Err(MarqueeError::validation(format!(
            "{} must not be negative, got {}",
            what, seconds
        )));
    }
    Ok(seconds)
}

/// Sum of entry media durations, in seconds
pub fn total_duration(entries: &[PlaylistEntry]) -> f64 {
    entries.iter().map(|entry| entry.media.duration).sum()
}

/// Format seconds as `m:ss`, or `h:mm:ss` past one hour
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Human-readable byte count with binary units
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        let rounded = format!("{:.2}", value);
        let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", rounded, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaId, MediaItem};

    #[test]
    fn accepts_ordinary_name() {
        assert_eq!(
            validate_playlist_name("Road Trip Mix").unwrap(),
            "Road Trip Mix"
        );
    }

    #[test]
    fn rejects_empty_and_blank_names() {
        assert!(matches!(
            validate_playlist_name(""),
            Err(MarqueeError::Validation(_))
        ));
        assert!(matches!(
            validate_playlist_name("   "),
            Err(MarqueeError::Validation(_))
        ));
    }

    #[test]
    fn length_limit_counts_characters_after_trim() {
        assert!(validate_playlist_name(&"x".repeat(100)).is_ok());
        assert!(validate_playlist_name(&format!("  {}  ", "x".repeat(100))).is_ok());
        assert!(matches!(
            validate_playlist_name(&"x".repeat(101)),
            Err(MarqueeError::Validation(_))
        ));
        // 100 multi-byte characters are still within the limit
        assert!(validate_playlist_name(&"é".repeat(100)).is_ok());
    }

    #[test]
    fn durations_must_be_finite_and_non_negative() {
        assert_eq!(validate_duration(0.0, "duration").unwrap(), 0.0);
        assert_eq!(validate_duration(95.5, "duration").unwrap(), 95.5);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.5] {
            assert!(matches!(
                validate_duration(bad, "duration"),
                Err(MarqueeError::Validation(_))
            ));
        }
    }

    #[test]
    fn total_duration_sums_entries() {
        let entries = vec![
            PlaylistEntry::new(MediaItem::new(MediaId::new("a"), "A", 60.0), 0),
            PlaylistEntry::new(MediaItem::new(MediaId::new("b"), "B", 30.5), 1),
        ];
        assert_eq!(total_duration(&entries), 90.5);
        assert_eq!(total_duration(&[]), 0.0);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.9), "1:05");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn formats_file_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
    }
}
