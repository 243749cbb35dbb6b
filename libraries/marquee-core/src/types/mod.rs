mod history;
mod ids;
mod media;
mod playback_state;
mod playlist;

pub use history::{completion_percentage, HistoryEntry};
pub use ids::{EntryId, HistoryId, MediaId, PlaylistId};
pub use media::{MediaItem, Resolution};
pub use playback_state::{CursorState, PlaybackStatus, RepeatMode};
pub use playlist::{CreatePlaylist, Playlist, PlaylistEntry, UpdateEntry, UpdatePlaylist};
