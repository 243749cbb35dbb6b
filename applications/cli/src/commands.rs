//! Subcommands and their execution against one engine
use crate::error::{CliError, Result};
use clap::Subcommand;
use marquee_core::types::{
    CreatePlaylist, MediaId, MediaItem, Playlist, PlaylistId, RepeatMode,
};
use marquee_core::validation::{format_duration, format_file_size, validate_duration};
use marquee_core::SnapshotStore;
use marquee_playback::PlaybackEngine;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all playlists
    List,
    /// Show one playlist and its entries
    Show {
        /// Playlist ID or name
        playlist: String,
    },
    /// Create a new playlist
    Create {
        /// Playlist name
        name: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Mark the playlist as public
        #[arg(long)]
        public: bool,
    },
    /// Rename a playlist
    Rename {
        /// Playlist ID or name
        playlist: String,
        /// New name
        name: String,
    },
    /// Delete a playlist
    Delete {
        /// Playlist ID or name
        playlist: String,
    },
    /// Copy a playlist with all of its entries
    Duplicate {
        /// Playlist ID or name
        playlist: String,
        /// Name for the copy
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Append a media file to a playlist
    Add {
        /// Playlist ID or name
        playlist: String,
        /// Media file path
        file: PathBuf,
        /// Duration in seconds
        #[arg(short, long)]
        duration: f64,
        /// Title (defaults to the file stem)
        #[arg(short, long)]
        title: Option<String>,
        /// File size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,
    },
    /// Remove the entry at an index
    Remove {
        /// Playlist ID or name
        playlist: String,
        /// Entry index (0-based)
        index: usize,
    },
    /// Move an entry to another index
    Move {
        /// Playlist ID or name
        playlist: String,
        /// Current index (0-based)
        from: usize,
        /// Destination index (0-based)
        to: usize,
    },
    /// Start playing a playlist
    Play {
        /// Playlist ID or name
        playlist: String,
        /// Index to start at
        #[arg(short, long, default_value_t = 0)]
        start: usize,
    },
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
    /// Stop playback
    Stop,
    /// Skip to the next item
    Next,
    /// Go back to the previous item
    Previous,
    /// Jump to an index in the current playlist
    Seek {
        /// Entry index (0-based)
        index: usize,
    },
    /// Report that the current item finished playing
    Finish {
        /// Seconds actually played (defaults to the full duration)
        #[arg(short, long)]
        played: Option<f64>,
    },
    /// Toggle shuffle
    Shuffle,
    /// Set the repeat mode
    Repeat {
        /// off, one or all
        #[arg(value_parser = parse_repeat_mode)]
        mode: RepeatMode,
    },
    /// Show recent playback history
    History {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show library statistics
    Stats,
    /// Show the playback cursor
    Status,
}

/// Reject seconds a snapshot cannot store before they reach the engine
fn seconds_arg(seconds: f64, what: &str) -> Result<f64> {
    validate_duration(seconds, what).map_err(|e| CliError::BadRequest(e.to_string()))
}

fn parse_repeat_mode(s: &str) -> std::result::Result<RepeatMode, String> {
    s.to_lowercase().parse().map_err(|e: marquee_core::MarqueeError| e.to_string())
}

/// Resolve a playlist by exact ID, then by case-insensitive name
pub fn resolve_playlist(playlists: &[Playlist], reference: &str) -> Result<PlaylistId> {
    if let Some(playlist) = playlists.iter().find(|p| p.id.as_str() == reference) {
        return Ok(playlist.id.clone());
    }

    let mut matches = playlists
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(reference));
    match (matches.next(), matches.next()) {
        (Some(playlist), None) => Ok(playlist.id.clone()),
        (Some(_), Some(_)) => Err(CliError::BadRequest(format!(
            "more than one playlist is named '{}', use its ID",
            reference
        ))),
        (None, _) => Err(marquee_core::MarqueeError::not_found("Playlist", reference).into()),
    }
}

fn media_from_file(file: PathBuf, duration: f64, title: Option<String>, size: u64) -> MediaItem {
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string())
    });
    let format = file
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut media = MediaItem::new(MediaId::generate(), title, duration)
        .with_path(file)
        .with_format(format);
    media.file_size = size;
    media
}

/// Execute one command and write its human-readable output
pub async fn run<S, W>(engine: &mut PlaybackEngine<S>, command: Command, out: &mut W) -> Result<()>
where
    S: SnapshotStore,
    W: Write,
{
    match command {
        Command::List => {
            if engine.playlists().is_empty() {
                writeln!(out, "No playlists")?;
            }
            for playlist in engine.playlists() {
                let favorite = if playlist.is_favorite { " *" } else { "" };
                writeln!(
                    out,
                    "{}  {}{}  ({})",
                    playlist.id,
                    playlist.name,
                    favorite,
                    playlist.summary()
                )?;
            }
        }
        Command::Show { playlist } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            let playlist = engine
                .playlist(&id)
                .ok_or_else(|| marquee_core::MarqueeError::not_found("Playlist", id.as_str()))?;
            let current = engine
                .cursor()
                .playlist_id
                .as_ref()
                .filter(|p| **p == id)
                .map(|_| engine.cursor().current_index);

            writeln!(out, "{} ({})", playlist.name, playlist.summary())?;
            if let Some(description) = &playlist.description {
                writeln!(out, "{}", description)?;
            }
            if !playlist.tags.is_empty() {
                writeln!(out, "tags: {}", playlist.tags.join(", "))?;
            }
            for entry in &playlist.entries {
                let marker = if current == Some(entry.position) { ">" } else { " " };
                writeln!(
                    out,
                    "{} {:>3}. {}  [{}, {}]",
                    marker,
                    entry.position,
                    entry.display_title(),
                    format_duration(entry.media.duration),
                    format_file_size(entry.media.file_size)
                )?;
            }
        }
        Command::Create {
            name,
            description,
            tags,
            public,
        } => {
            let playlist = engine
                .create_playlist(CreatePlaylist {
                    name,
                    description,
                    tags,
                    is_public: public,
                    ..Default::default()
                })
                .await?;
            writeln!(out, "Created {} ({})", playlist.name, playlist.id)?;
        }
        Command::Rename { playlist, name } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            engine.rename_playlist(&id, &name).await?;
            writeln!(out, "Renamed {}", id)?;
        }
        Command::Delete { playlist } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            engine.delete_playlist(&id).await?;
            writeln!(out, "Deleted {}", id)?;
        }
        Command::Duplicate { playlist, name } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            let copy = engine.duplicate_playlist(&id, name.as_deref()).await?;
            writeln!(out, "Created {} ({})", copy.name, copy.id)?;
        }
        Command::Add {
            playlist,
            file,
            duration,
            title,
            size,
        } => {
            let duration = seconds_arg(duration, "duration")?;
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            let media = media_from_file(file, duration, title, size);
            let title = media.title.clone();
            let entry_id = engine.add_entry(&id, media).await?;
            writeln!(out, "Added {} ({})", title, entry_id)?;
        }
        Command::Remove { playlist, index } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            let entry_id = engine
                .playlist(&id)
                .and_then(|p| p.entries.get(index).map(|e| e.id.clone()))
                .ok_or_else(|| marquee_core::MarqueeError::IndexOutOfRange {
                    index,
                    len: engine.playlist(&id).map_or(0, Playlist::len),
                })?;
            let removed = engine.remove_entry(&id, &entry_id).await?;
            writeln!(out, "Removed {}", removed.display_title())?;
        }
        Command::Move { playlist, from, to } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            engine.move_entry(&id, from, to).await?;
            writeln!(out, "Moved entry {} to {}", from, to)?;
        }
        Command::Play { playlist, start } => {
            let id = resolve_playlist(engine.playlists(), &playlist)?;
            engine.play(&id, start).await?;
            write_now_playing(engine, out)?;
        }
        Command::Pause => {
            engine.pause().await?;
            write_status(engine, out)?;
        }
        Command::Resume => {
            engine.resume().await?;
            write_status(engine, out)?;
        }
        Command::Stop => {
            engine.stop().await?;
            write_status(engine, out)?;
        }
        Command::Next => {
            engine.next().await?;
            write_now_playing(engine, out)?;
        }
        Command::Previous => {
            engine.previous().await?;
            write_now_playing(engine, out)?;
        }
        Command::Seek { index } => {
            engine.seek_to_index(index).await?;
            write_now_playing(engine, out)?;
        }
        Command::Finish { played } => {
            let played = match played {
                Some(seconds) => seconds_arg(seconds, "played")?,
                None => engine.current_item().map_or(0.0, |m| m.duration),
            };
            match engine.item_finished(played).await? {
                Some(_) => write_now_playing(engine, out)?,
                None => writeln!(out, "Reached the end of the playlist")?,
            }
        }
        Command::Shuffle => {
            let enabled = engine.toggle_shuffle().await?;
            writeln!(out, "Shuffle {}", if enabled { "on" } else { "off" })?;
        }
        Command::Repeat { mode } => {
            engine.set_repeat_mode(mode).await?;
            writeln!(out, "Repeat {}", mode)?;
        }
        Command::History { limit } => {
            let history = engine.history(limit);
            if history.is_empty() {
                writeln!(out, "No playback history")?;
            }
            for entry in history {
                writeln!(
                    out,
                    "{}  {}  {}  {}/{:.0}%",
                    entry.played_at.format("%Y-%m-%d %H:%M"),
                    entry.playlist_name.as_deref().unwrap_or("-"),
                    entry.media_title,
                    format_duration(entry.duration_played),
                    entry.completion_percentage
                )?;
            }
        }
        Command::Stats => {
            let stats = engine.stats();
            let name_of = |id: &PlaylistId| {
                engine
                    .playlist(id)
                    .map_or_else(|| id.to_string(), |p| p.name.clone())
            };

            writeln!(out, "Playlists:       {}", stats.total_playlists)?;
            writeln!(out, "Entries:         {}", stats.total_entries)?;
            writeln!(out, "Total duration:  {}", format_duration(stats.total_duration))?;
            if let Some(id) = &stats.most_played {
                writeln!(out, "Most played:     {}", name_of(id))?;
            }
            if !stats.recently_played.is_empty() {
                let names: Vec<String> = stats.recently_played.iter().map(name_of).collect();
                writeln!(out, "Recently played: {}", names.join(", "))?;
            }
            if !stats.favorites.is_empty() {
                let names: Vec<String> = stats.favorites.iter().map(name_of).collect();
                writeln!(out, "Favorites:       {}", names.join(", "))?;
            }
        }
        Command::Status => write_status(engine, out)?,
    }

    Ok(())
}

fn write_now_playing<S: SnapshotStore, W: Write>(
    engine: &PlaybackEngine<S>,
    out: &mut W,
) -> Result<()> {
    match engine.current_entry() {
        Some(entry) => writeln!(
            out,
            "Now playing [{}] {} ({})",
            entry.position,
            entry.display_title(),
            format_duration(entry.media.duration)
        )?,
        None => writeln!(out, "Nothing is playing")?,
    }
    Ok(())
}

fn write_status<S: SnapshotStore, W: Write>(engine: &PlaybackEngine<S>, out: &mut W) -> Result<()> {
    let cursor = engine.cursor();
    let playlist = cursor
        .playlist_id
        .as_ref()
        .and_then(|id| engine.playlist(id))
        .map_or("-", |p| p.name.as_str());

    writeln!(
        out,
        "{}  playlist: {}  index: {}  shuffle: {}  repeat: {}",
        cursor.status,
        playlist,
        cursor.current_index,
        if cursor.shuffle_enabled { "on" } else { "off" },
        cursor.repeat_mode
    )?;
    if let Some(entry) = engine.current_entry() {
        writeln!(out, "current: {}", entry.display_title())?;
    }
    Ok(())
}
