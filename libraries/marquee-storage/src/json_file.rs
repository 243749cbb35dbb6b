//! JSON document on the local filesystem

use crate::codec;
use crate::error::StorageError;
use async_trait::async_trait;
use marquee_core::{Snapshot, SnapshotStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Snapshot store backed by a single JSON file
///
/// Each save writes the whole document to `<path>.tmp` and renames it over
/// the target, so readers only ever see a complete snapshot. Saves through
/// one store are serialized; the last one to finish wins. A document that
/// fails to decode is copied to `<path>.bak` so a later save cannot destroy
/// it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store at `path`; the file is created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the snapshot document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable document is copied before it can be overwritten
    pub fn backup_path(&self) -> PathBuf {
        self.sibling(".bak")
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    async fn keep_backup(&self) {
        let backup = self.backup_path();
        match tokio::fs::copy(&self.path, &backup).await {
            Ok(_) => warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                "Unreadable snapshot file copied aside"
            ),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Could not back up unreadable snapshot file"
            ),
        }
    }

    async fn read(&self) -> Result<Option<Snapshot>, StorageError> {
        let document = match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot file yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = match codec::decode(&document) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.keep_backup().await;
                return Err(e);
            }
        };
        info!(
            path = %self.path.display(),
            playlists = snapshot.playlists.len(),
            "Loaded snapshot file"
        );
        Ok(Some(snapshot))
    }

    async fn write(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let document = codec::encode(snapshot)?;
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, document.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = document.len(), "Saved snapshot file");
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> marquee_core::Result<Option<Snapshot>> {
        Ok(self.read().await?)
    }

    async fn save(&self, snapshot: &Snapshot) -> marquee_core::Result<()> {
        Ok(self.write(snapshot).await?)
    }
}
