//! Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Snapshot document could not be migrated to the current schema
    #[error("Migration error: {0}")]
    Migration(String),

    /// Document was written by a newer version of Marquee
    #[error("Unsupported snapshot schema version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to run
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Save rejected by a store configured to fail
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create a migration error
    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Migration(msg.into())
    }
}

impl From<StorageError> for marquee_core::MarqueeError {
    fn from(err: StorageError) -> Self {
        marquee_core::MarqueeError::persistence(err.to_string())
    }
}
