//! CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] marquee_core::MarqueeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<marquee_storage::StorageError> for CliError {
    fn from(err: marquee_storage::StorageError) -> Self {
        // StorageError -> MarqueeError::Persistence -> CliError
        CliError::Engine(err.into())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
