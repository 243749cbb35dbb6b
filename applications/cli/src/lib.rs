//! Marquee CLI Library
//!
//! Configuration, gateway selection and subcommand execution for the
//! `marquee` binary.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{run, Command};
pub use config::{Backend, CliConfig};
pub use error::{CliError, Result};

use marquee_core::SnapshotStore;
use marquee_storage::{JsonFileStore, SqliteStore};

/// Open the persistence gateway selected by the configuration
pub async fn open_gateway(config: &CliConfig) -> Result<Box<dyn SnapshotStore>> {
    match config.storage.backend {
        Backend::Json => {
            tracing::debug!(path = %config.storage.data_path.display(), "Using JSON file store");
            Ok(Box::new(JsonFileStore::new(&config.storage.data_path)))
        }
        Backend::Sqlite => {
            tracing::debug!(url = %config.storage.database_url, "Using SQLite store");
            Ok(Box::new(SqliteStore::connect(&config.storage.database_url).await?))
        }
    }
}
