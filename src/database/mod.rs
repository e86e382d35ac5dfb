//! Database module
//!
//! Owns the embedded database instance and its durable mirror:
//! - Store lifecycle (open/persist/close) and the unit-of-work wrapper
//! - Schema and migrations
//! - Model definitions
//! - Repository layer for CRUD operations

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;

use crate::config::{DATABASE_STORAGE_KEY, SESSION_DB_FILE};
use crate::error::Result;
use crate::storage::SnapshotSlot;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Build connection options shared by migration and application connections.
fn connect_options(db_path: &Path) -> std::result::Result<SqliteConnectOptions, sqlx::Error> {
    SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display())).map(
        |opts| {
            opts.create_if_missing(true)
                .busy_timeout(Duration::from_secs(5))
                .journal_mode(SqliteJournalMode::Wal)
                .foreign_keys(true)
        },
    )
}

/// The persistence layer: one embedded database plus its durable mirror.
///
/// The working database file is session state, rebuilt from the slot's
/// snapshot at open; the snapshot is the authoritative durable copy and is
/// rewritten after every mutating operation.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    slot: SnapshotSlot,
    db_path: PathBuf,
}

impl Store {
    /// Open (or create) the store rooted at `data_dir`.
    ///
    /// Restores the database from the stored snapshot when one exists. A
    /// snapshot that cannot be decoded, or whose bytes are not a loadable
    /// database, is logged and discarded; open falls back to a fresh empty
    /// database rather than failing startup.
    pub async fn open(data_dir: &Path) -> Result<Store> {
        tracing::info!("Opening store at: {:?}", data_dir);

        std::fs::create_dir_all(data_dir)?;

        let slot = SnapshotSlot::new(data_dir, DATABASE_STORAGE_KEY);
        let db_path = data_dir.join(SESSION_DB_FILE);

        let restored = restore_working_copy(&slot, &db_path).await?;

        let (pool, migrations_applied) = match connect_and_migrate(&db_path).await {
            Ok(ok) => ok,
            Err(e) if restored => {
                tracing::warn!(
                    "Restored snapshot is not a loadable database, starting fresh: {}",
                    e
                );
                remove_working_copy(&db_path).await;
                connect_and_migrate(&db_path).await?
            }
            Err(e) => return Err(e),
        };

        let store = Store {
            pool,
            slot,
            db_path,
        };

        // A migrated database is mirrored out immediately so the slot never
        // lags behind the schema this session runs on.
        if migrations_applied > 0 {
            store.persist().await;
        }

        tracing::info!("Store opened successfully");

        Ok(store)
    }

    /// Mirror the entire database into the durable slot.
    ///
    /// Never fails the caller: a storage failure leaves the in-memory state
    /// authoritative for the session, and the next successful mutation's
    /// persist retries implicitly.
    pub async fn persist(&self) {
        if let Err(e) = self.try_persist().await {
            tracing::error!("Failed to save database snapshot: {}", e);
        }
    }

    async fn try_persist(&self) -> Result<()> {
        // Fold the WAL into the main file so its bytes are the complete
        // database image.
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;

        let bytes = tokio::fs::read(&self.db_path).await?;
        self.slot.save(&bytes).await
    }

    /// Unit of work: run `op` against the database, then mirror the result
    /// into the durable slot on both the success and the failure path,
    /// before handing `op`'s result back.
    pub async fn with_db<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(SqlitePool) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = op(self.pool.clone()).await;
        self.persist().await;
        result
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool. The working copy and the slot stay on
    /// disk; a later `open` resumes from the slot.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Lay down the working database file from the slot's snapshot.
///
/// Returns whether snapshot bytes were restored. A snapshot that cannot be
/// decoded is logged and skipped; the session then starts from a fresh
/// database.
async fn restore_working_copy(slot: &SnapshotSlot, db_path: &Path) -> Result<bool> {
    remove_working_copy(db_path).await;

    match slot.load().await {
        Ok(Some(bytes)) => {
            tokio::fs::write(db_path, &bytes).await?;
            tracing::info!("Restored database snapshot: {} bytes", bytes.len());
            Ok(true)
        }
        Ok(None) => Ok(false),
        Err(e) => {
            tracing::error!("Failed to load database snapshot, starting fresh: {}", e);
            Ok(false)
        }
    }
}

/// Remove the working copy and any journal files left from a prior session.
async fn remove_working_copy(db_path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let path = PathBuf::from(format!("{}{}", db_path.display(), suffix));
        let _ = tokio::fs::remove_file(&path).await;
    }
}

/// Create and initialize the connection pool.
///
/// Migrations run on a dedicated single-connection pool that is closed
/// before the application pool is created. This prevents schema-caching
/// issues where pooled connections opened before ALTER TABLE ADD COLUMN
/// still see the old column count.
async fn connect_and_migrate(db_path: &Path) -> Result<(SqlitePool, u32)> {
    let migration_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(db_path)?)
        .await?;

    let applied = schema::initialize_database(&migration_pool).await?;
    migration_pool.close().await;

    // All application connections open after migrations have committed, so
    // they read the final schema including every ADD COLUMN.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(db_path)?)
        .await?;

    Ok((pool, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_fresh_store() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);

        // The migration persist already mirrored the fresh database out.
        assert!(store.slot.path().exists());

        store.close().await;
    }

    #[tokio::test]
    async fn test_snapshot_survives_loss_of_the_working_copy() {
        let temp = TempDir::new().unwrap();

        {
            let store = Store::open(temp.path()).await.unwrap();
            store
                .with_db(|pool| async move {
                    sqlx::query("INSERT INTO settings (key, value) VALUES ('k', 'v')")
                        .execute(&pool)
                        .await?;
                    Ok(())
                })
                .await
                .unwrap();
            store.close().await;
        }

        // The session file is disposable; the slot must carry the data.
        std::fs::remove_file(temp.path().join(SESSION_DB_FILE)).unwrap();

        let store = Store::open(temp.path()).await.unwrap();
        let value: String = sqlx::query_scalar("SELECT value FROM settings WHERE key = 'k'")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(value, "v");
        store.close().await;
    }

    #[tokio::test]
    async fn test_corrupt_envelope_falls_back_to_fresh_database() {
        let temp = TempDir::new().unwrap();

        std::fs::write(
            temp.path().join(format!("{}.json", DATABASE_STORAGE_KEY)),
            "}}}not an envelope",
        )
        .unwrap();

        let store = Store::open(temp.path()).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        store.close().await;
    }

    #[tokio::test]
    async fn test_unloadable_snapshot_bytes_fall_back_to_fresh_database() {
        let temp = TempDir::new().unwrap();

        // A well-formed envelope whose bytes are not a SQLite image.
        let slot = SnapshotSlot::new(temp.path(), DATABASE_STORAGE_KEY);
        slot.save(b"definitely not a database file").await.unwrap();

        let store = Store::open(temp.path()).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        store.close().await;
    }

    #[tokio::test]
    async fn test_with_db_persists_on_the_failure_path_too() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).await.unwrap();

        let before = std::fs::metadata(store.slot.path()).unwrap().modified().unwrap();

        let result: crate::error::Result<()> = store
            .with_db(|pool| async move {
                sqlx::query("INSERT INTO nonexistent_table (x) VALUES (1)")
                    .execute(&pool)
                    .await?;
                Ok(())
            })
            .await;

        assert!(result.is_err());
        let after = std::fs::metadata(store.slot.path()).unwrap().modified().unwrap();
        assert!(after >= before);

        store.close().await;
    }
}
