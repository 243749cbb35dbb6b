//! Marquee - Playlist Playback
//!
//! Playlist management and playback sequencing for the Marquee engine.
//!
//! This crate provides:
//! - Playlist store (CRUD, entry add/remove/reorder, play statistics)
//! - Playback cursor (idle/loading/playing/paused/error state machine)
//! - Shuffle and repeat index derivation (Off, One, All)
//! - Bounded playback history (newest first)
//! - Tagged-variant actions with one transition function per variant
//! - `PlaybackEngine` facade with write-through persistence
//!
//! # Architecture
//!
//! `marquee-playback` does not know how state is stored. The engine talks to
//! any [`marquee_core::SnapshotStore`]; concrete stores live in
//! `marquee-storage`.
//!
//! All transitions run synchronously on [`EngineState`]. The only `await`
//! points are the gateway's `load` (once, in [`PlaybackEngine::open`]) and
//! `save` (after every mutation).
//!
//! # Example: Transitions
//!
//! ```rust
//! use marquee_playback::{Action, EngineState};
//! use marquee_core::types::{CreatePlaylist, MediaId, MediaItem, PlaybackStatus};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut state = EngineState::new(100);
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let playlist = state
//!     .apply(Action::CreatePlaylist(CreatePlaylist::named("A")), &mut rng)
//!     .unwrap()
//!     .into_playlist()
//!     .unwrap();
//!
//! // Empty playlists cannot be played
//! let play = Action::Play { playlist_id: playlist.id.clone(), start_index: 0 };
//! assert!(state.apply(play.clone(), &mut rng).is_err());
//!
//! state
//!     .apply(
//!         Action::AddEntry {
//!             playlist_id: playlist.id.clone(),
//!             media: MediaItem::new(MediaId::new("clip-1"), "Opening", 95.0),
//!         },
//!         &mut rng,
//!     )
//!     .unwrap();
//! state.apply(play, &mut rng).unwrap();
//!
//! assert_eq!(state.cursor.status(), PlaybackStatus::Playing);
//! assert_eq!(state.cursor.current_index(), 0);
//! ```
//!
//! # Example: Engine
//!
//! ```rust
//! use marquee_playback::{EngineConfig, PlaybackEngine};
//! use marquee_core::types::{CreatePlaylist, MediaId, MediaItem, RepeatMode};
//! use marquee_storage::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> marquee_core::Result<()> {
//! let mut engine = PlaybackEngine::open(MemoryStore::new(), EngineConfig::default()).await;
//!
//! let playlist = engine.create_playlist(CreatePlaylist::named("B")).await?;
//! for (id, title) in [("x", "X"), ("y", "Y"), ("z", "Z")] {
//!     let media = MediaItem::new(MediaId::new(id), title, 120.0);
//!     engine.add_entry(&playlist.id, media).await?;
//! }
//!
//! engine.play(&playlist.id, 1).await?;
//! engine.set_repeat_mode(RepeatMode::One).await?;
//!
//! // Repeat-one replays the finished item
//! assert_eq!(engine.item_finished(120.0).await?, Some(1));
//! assert_eq!(engine.current_item().unwrap().title, "Y");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod action;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod history;
pub mod store;

pub use action::{Action, EngineState, Outcome};
pub use config::EngineConfig;
pub use cursor::{next_index, previous_index, PlaybackCursor};
pub use engine::PlaybackEngine;
pub use history::HistoryLedger;
pub use store::{LibraryStats, PlaylistStore};
