//! Database schema and migrations
//!
//! Schema changes form an ordered ledger of versioned steps recorded in
//! the `migrations` table. The column-adding steps keep check-before-alter
//! guards so the sequence stays safe against restored snapshots that
//! predate the ledger and carry any historical notes-table shape.

use crate::error::Result;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

const LATEST_VERSION: i32 = 4;

const BASE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'default',
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT
    );

    CREATE TABLE IF NOT EXISTS text_options (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        name TEXT NOT NULL,
        value TEXT NOT NULL,
        label TEXT,
        style TEXT,
        sort_order INTEGER DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_text_options_type ON text_options (type)
"#;

const ASSETS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS assets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Bring the database to the current schema version.
///
/// Returns the number of migration steps applied. Safe to run on every
/// open; a schema-current database applies nothing.
pub async fn initialize_database(pool: &SqlitePool) -> Result<u32> {
    tracing::info!("Initializing database schema");

    // WAL mode for crash safety; the persist path folds the WAL back into
    // the main file before exporting its bytes.
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    tracing::info!("Current database version: {}", current_version);

    let applied = apply_migrations(pool, current_version).await?;

    tracing::info!("Database initialization complete");
    Ok(applied)
}

async fn apply_migrations(pool: &SqlitePool, current_version: i32) -> Result<u32> {
    let mut applied = 0;

    for version in (current_version + 1)..=LATEST_VERSION {
        tracing::info!("Applying migration version {}", version);

        let mut tx = pool.begin().await?;

        match version {
            1 => {
                for statement in BASE_SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
                    sqlx::query(statement).execute(&mut *tx).await?;
                }
            }
            2 => {
                if !column_exists(&mut tx, "notes", "is_favorite").await? {
                    sqlx::query("ALTER TABLE notes ADD COLUMN is_favorite INTEGER DEFAULT 0")
                        .execute(&mut *tx)
                        .await?;
                }
            }
            3 => {
                if !column_exists(&mut tx, "notes", "previous_status").await? {
                    sqlx::query("ALTER TABLE notes ADD COLUMN previous_status TEXT")
                        .execute(&mut *tx)
                        .await?;
                }
            }
            4 => {
                sqlx::query(ASSETS_SCHEMA).execute(&mut *tx).await?;
            }
            _ => {
                return Err(crate::error::AppError::Generic(format!(
                    "Unknown migration version: {}",
                    version
                )))
            }
        }

        sqlx::query("INSERT INTO migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        applied += 1;

        tracing::info!("Migration version {} applied successfully", version);
    }

    Ok(applied)
}

async fn column_exists(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    column: &str,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_one(&mut **tx)
        .await?;

    Ok(count > 0)
}
