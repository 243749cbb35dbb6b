//! Core error types for Marquee
use thiserror::Error;

/// Result type alias using `MarqueeError`
pub type Result<T> = std::result::Result<T, MarqueeError>;

/// Core error type for Marquee
///
/// Every variant is recoverable at the call site. `Validation`, `NotFound`,
/// `EmptyPlaylist`, `Invariant` and `InvalidState` are raised before any state
/// changes. `Persistence` is raised after the in-memory change has already
/// been applied.
#[derive(Error, Debug)]
pub enum MarqueeError {
    /// Bad name or parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown playlist or entry
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Play requested on a playlist with no entries
    #[error("Playlist is empty: {0}")]
    EmptyPlaylist(String),

    /// Seek or move target outside the playlist bounds
    #[error("Index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Reorder payload does not match the existing entry set
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Operation not allowed in the current cursor state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Durable storage failed to load or save
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl MarqueeError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invariant error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Whether the error was raised after the in-memory mutation succeeded
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
