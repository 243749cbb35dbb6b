//! Marquee Storage
//!
//! Concrete persistence gateways for the Marquee playlist engine.
//!
//! Every store implements [`marquee_core::SnapshotStore`] and keeps exactly
//! one document: the latest full [`marquee_core::Snapshot`]. Saves replace
//! it wholesale, so overlapping saves resolve as last-write-wins.
//!
//! # Stores
//!
//! - [`JsonFileStore`]: pretty JSON file, atomically replaced on save
//! - [`SqliteStore`]: single-row `SQLite` table, upserted on save
//! - [`MemoryStore`]: shared in-process slot for tests and ephemeral sessions
//!
//! Documents are decoded through [`codec`], which migrates older layouts to
//! the current schema.
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee_storage::SqliteStore;
//! use marquee_core::SnapshotStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::connect("sqlite://marquee.db").await?;
//!
//! if let Some(snapshot) = store.load().await? {
//!     println!("{} playlists", snapshot.playlists.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod error;
mod json_file;
mod memory;
mod sqlite;

pub use error::StorageError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::{create_pool, run_migrations, SqliteStore};
