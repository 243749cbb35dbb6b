//! In-process snapshot store

use crate::error::StorageError;
use async_trait::async_trait;
use marquee_core::{Snapshot, SnapshotStore};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Shared {
    snapshot: Mutex<Option<Snapshot>>,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    saves: AtomicUsize,
}

/// Snapshot store held in memory
///
/// Clones share the same slot, so a test can keep one handle while the
/// engine owns another. Saves and loads can be switched to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `snapshot`
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        store.replace(Some(snapshot));
        store
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.shared.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent loads fail (or succeed again)
    pub fn set_fail_loads(&self, fail: bool) {
        self.shared.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Copy of the stored snapshot
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.slot().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.shared.saves.load(Ordering::SeqCst)
    }

    fn replace(&self, snapshot: Option<Snapshot>) {
        *self.slot() = snapshot;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Snapshot>> {
        // A poisoned slot still holds a complete snapshot
        self.shared
            .snapshot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> marquee_core::Result<Option<Snapshot>> {
        if self.shared.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store loads disabled".into()).into());
        }
        Ok(self.snapshot())
    }

    async fn save(&self, snapshot: &Snapshot) -> marquee_core::Result<()> {
        if self.shared.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store saves disabled".into()).into());
        }
        self.replace(Some(snapshot.clone()));
        self.shared.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::types::CursorState;

    #[tokio::test]
    async fn clones_share_the_slot() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let snapshot = Snapshot::new(Vec::new(), CursorState::default(), Vec::new());

        store.save(&snapshot).await.unwrap();

        assert_eq!(handle.snapshot(), Some(snapshot));
        assert_eq!(handle.save_count(), 1);
    }

    #[tokio::test]
    async fn failing_saves_leave_previous_snapshot() {
        let snapshot = Snapshot::new(Vec::new(), CursorState::default(), Vec::new());
        let store = MemoryStore::with_snapshot(snapshot.clone());
        store.set_fail_saves(true);

        let mut changed = snapshot.clone();
        changed.cursor_state.shuffle_enabled = true;
        let err = store.save(&changed).await.unwrap_err();

        assert!(err.is_persistence());
        assert_eq!(store.load().await.unwrap(), Some(snapshot));
    }
}
