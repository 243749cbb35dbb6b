//! Engine configuration

use serde::{Deserialize, Serialize};

/// Default number of history entries retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Upper bound on retained history entries
pub const MAX_HISTORY_CAPACITY: usize = 100;

/// Default number of entries returned by a history query
pub const DEFAULT_HISTORY_QUERY_LIMIT: usize = 50;

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum history size (default and upper bound: 100)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Entries returned by `history(None)` (default: 50)
    #[serde(default = "default_history_query_limit")]
    pub history_query_limit: usize,

    /// Fixed seed for shuffle selection; entropy when unset
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_history_query_limit() -> usize {
    DEFAULT_HISTORY_QUERY_LIMIT
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_query_limit: DEFAULT_HISTORY_QUERY_LIMIT,
            shuffle_seed: None,
        }
    }
}
