//! SQLite-backed snapshot store

use crate::codec;
use crate::error::StorageError;
use async_trait::async_trait;
use marquee_core::{Snapshot, SnapshotStore, SCHEMA_VERSION};
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Fixed primary key of the single snapshot row
const SNAPSHOT_ROW_ID: i64 = 1;

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://marquee.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Run database migrations
///
/// Creates the `engine_snapshot` table if it does not exist.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Snapshot store keeping the latest document in one `SQLite` row
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` and prepare the schema
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = create_pool(database_url).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and prepare the schema
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn read(&self) -> Result<Option<Snapshot>, StorageError> {
        let row = sqlx::query("SELECT document FROM engine_snapshot WHERE id = ?")
            .bind(SNAPSHOT_ROW_ID)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!("No snapshot row yet");
            return Ok(None);
        };

        let document: String = row.try_get("document")?;
        let snapshot = codec::decode(&document)?;
        info!(playlists = snapshot.playlists.len(), "Loaded snapshot row");
        Ok(Some(snapshot))
    }

    async fn write(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let document = codec::encode(snapshot)?;
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO engine_snapshot (id, schema_version, document, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id)
             DO UPDATE SET
                schema_version = excluded.schema_version,
                document = excluded.document,
                updated_at = excluded.updated_at",
        )
        .bind(SNAPSHOT_ROW_ID)
        .bind(i64::from(SCHEMA_VERSION))
        .bind(&document)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(bytes = document.len(), "Saved snapshot row");
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn load(&self) -> marquee_core::Result<Option<Snapshot>> {
        Ok(self.read().await?)
    }

    async fn save(&self, snapshot: &Snapshot) -> marquee_core::Result<()> {
        Ok(self.write(snapshot).await?)
    }
}
