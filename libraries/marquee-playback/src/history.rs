//! Playback history ledger
//!
//! Bounded, newest-first record of past playback sessions.

use crate::config::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use marquee_core::types::HistoryEntry;
use std::collections::VecDeque;
use tracing::warn;

fn clamp_capacity(capacity: usize) -> usize {
    if capacity > MAX_HISTORY_CAPACITY {
        warn!(
            requested = capacity,
            max = MAX_HISTORY_CAPACITY,
            "History capacity clamped"
        );
        MAX_HISTORY_CAPACITY
    } else {
        capacity
    }
}

/// Append-only history with bounded size
///
/// Entries are never edited or removed individually; once the ledger is
/// full, recording a new entry evicts the single oldest one.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    /// History buffer (most recent = front)
    entries: VecDeque<HistoryEntry>,

    /// Maximum history size
    capacity: usize,
}

impl HistoryLedger {
    /// Create an empty ledger holding at most `capacity` entries
    ///
    /// Capacities above [`MAX_HISTORY_CAPACITY`] are clamped to it.
    pub fn new(capacity: usize) -> Self {
        let capacity = clamp_capacity(capacity);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Restore a ledger from stored entries (newest first)
    ///
    /// Anything beyond `capacity` is dropped from the old end.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let capacity = clamp_capacity(capacity);
        let mut entries = VecDeque::from(entries);
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Record a new entry as the most recent
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Up to `limit` most recent entries, newest first
    pub fn query(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().take(limit)
    }

    /// All entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Copy of all entries, newest first
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
