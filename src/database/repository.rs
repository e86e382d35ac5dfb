//! Repository layer for database operations
//!
//! CRUD operations for all entities. Mutations run through the store's
//! unit of work so every change is mirrored into the durable slot before
//! the caller's future resolves; reads query the pool directly.

use super::models::{
    now_rfc3339, Asset, AssetKind, NewTextOption, Note, NoteStatus, OptionKind, StylePayload,
    TextOption,
};
use super::Store;
use crate::error::{AppError, Result};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    store: Store,
}

impl Repository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ===== Settings =====

    /// Read a setting. Missing keys and read failures both surface as
    /// `None`; settings lookups are never fatal.
    pub async fn get_setting(&self, key: &str) -> Option<String> {
        let result = sqlx::query_scalar::<_, Option<String>>(
            "SELECT value FROM settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(self.store.pool())
        .await;

        match result {
            Ok(row) => row.flatten(),
            Err(e) => {
                tracing::warn!("Settings lookup failed for {:?}: {}", key, e);
                None
            }
        }
    }

    /// Write a setting (upsert by key). Write failures propagate; callers
    /// may need to react.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.store
            .with_db(|pool| async move {
                sqlx::query(
                    r#"
                    INSERT INTO settings (key, value) VALUES (?, ?)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value
                    "#,
                )
                .bind(key)
                .bind(value)
                .execute(&pool)
                .await?;
                Ok(())
            })
            .await?;

        tracing::debug!("Set setting: {} = {}", key, value);
        Ok(())
    }

    // ===== Notes =====

    /// List notes in one lifecycle bucket, favorites first, then newest
    /// created first.
    pub async fn list_notes(&self, status: NoteStatus) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes
            WHERE status = ?
            ORDER BY is_favorite DESC, created_at DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(self.store.pool())
        .await?;

        Ok(notes)
    }

    /// Insert a new note, returning its generated id.
    pub async fn add_note(&self, content: &str, status: NoteStatus) -> Result<i64> {
        let id = self
            .store
            .with_db(|pool| async move {
                let now = now_rfc3339();
                let result = sqlx::query(
                    "INSERT INTO notes (content, status, created_at, updated_at) VALUES (?, ?, ?, ?)",
                )
                .bind(content)
                .bind(status.as_str())
                .bind(&now)
                .bind(&now)
                .execute(&pool)
                .await?;
                Ok(result.last_insert_rowid())
            })
            .await?;

        tracing::debug!("Created note: {}", id);
        Ok(id)
    }

    /// Move a note to a new lifecycle bucket.
    ///
    /// One UPDATE captures the pre-update status into `previous_status`
    /// while overwriting it, so there is no read-then-write window.
    pub async fn update_note_status(&self, id: i64, status: NoteStatus) -> Result<()> {
        let rows = self
            .store
            .with_db(|pool| async move {
                let result = sqlx::query(
                    "UPDATE notes SET previous_status = status, status = ?, updated_at = ? WHERE id = ?",
                )
                .bind(status.as_str())
                .bind(now_rfc3339())
                .bind(id)
                .execute(&pool)
                .await?;
                Ok(result.rows_affected())
            })
            .await?;

        if rows == 0 {
            return Err(AppError::NoteNotFound(id));
        }

        tracing::debug!("Note {} moved to {}", id, status);
        Ok(())
    }

    /// Current lifecycle bucket of a note.
    pub async fn note_status(&self, id: i64) -> Result<NoteStatus> {
        let stored: String = sqlx::query_scalar("SELECT status FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.store.pool())
            .await?
            .ok_or(AppError::NoteNotFound(id))?;

        Ok(NoteStatus::parse_lenient(&stored))
    }

    /// Restore target for a note: the stored previous status when it is a
    /// recognized non-default value, `Default` otherwise.
    pub async fn note_previous_status(&self, id: i64) -> Result<NoteStatus> {
        let stored = sqlx::query_scalar::<_, Option<String>>(
            "SELECT previous_status FROM notes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.store.pool())
        .await?
        .ok_or(AppError::NoteNotFound(id))?;

        Ok(NoteStatus::restore_target(stored.as_deref()))
    }

    /// Rewrite a note's content; its status is untouched.
    pub async fn update_note_content(&self, id: i64, content: &str) -> Result<()> {
        let rows = self
            .store
            .with_db(|pool| async move {
                let result =
                    sqlx::query("UPDATE notes SET content = ?, updated_at = ? WHERE id = ?")
                        .bind(content)
                        .bind(now_rfc3339())
                        .bind(id)
                        .execute(&pool)
                        .await?;
                Ok(result.rows_affected())
            })
            .await?;

        if rows == 0 {
            return Err(AppError::NoteNotFound(id));
        }

        tracing::debug!("Updated note content: {}", id);
        Ok(())
    }

    /// Hard delete: row removal, irreversible.
    pub async fn delete_note(&self, id: i64) -> Result<()> {
        self.store
            .with_db(|pool| async move {
                sqlx::query("DELETE FROM notes WHERE id = ?")
                    .bind(id)
                    .execute(&pool)
                    .await?;
                Ok(())
            })
            .await?;

        tracing::debug!("Hard deleted note: {}", id);
        Ok(())
    }

    /// Flip the favorite flag and the timestamp in a single statement.
    pub async fn toggle_favorite(&self, id: i64) -> Result<()> {
        let rows = self
            .store
            .with_db(|pool| async move {
                let result = sqlx::query(
                    "UPDATE notes SET is_favorite = NOT is_favorite, updated_at = ? WHERE id = ?",
                )
                .bind(now_rfc3339())
                .bind(id)
                .execute(&pool)
                .await?;
                Ok(result.rows_affected())
            })
            .await?;

        if rows == 0 {
            return Err(AppError::NoteNotFound(id));
        }

        tracing::debug!("Toggled favorite on note: {}", id);
        Ok(())
    }

    /// Favorite notes still in the default bucket, newest first.
    pub async fn list_favorites(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes
            WHERE is_favorite = 1 AND status = 'default'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.store.pool())
        .await?;

        Ok(notes)
    }

    /// Case-insensitive substring search over note content. Best-effort: a
    /// blank term or any query failure yields an empty result rather than
    /// an error.
    pub async fn search_notes(&self, term: &str, status: Option<NoteStatus>) -> Vec<Note> {
        if term.trim().is_empty() {
            return Vec::new();
        }

        let pattern = format!("%{}%", term);

        let result = match status {
            Some(status) => {
                sqlx::query_as::<_, Note>(
                    r#"
                    SELECT * FROM notes
                    WHERE content LIKE ? COLLATE NOCASE AND status = ?
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(&pattern)
                .bind(status.as_str())
                .fetch_all(self.store.pool())
                .await
            }
            None => {
                sqlx::query_as::<_, Note>(
                    r#"
                    SELECT * FROM notes
                    WHERE content LIKE ? COLLATE NOCASE
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(&pattern)
                .fetch_all(self.store.pool())
                .await
            }
        };

        match result {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!("Note search failed: {}", e);
                Vec::new()
            }
        }
    }

    // ===== Text options =====

    /// List options of one kind in display order.
    pub async fn list_options(&self, kind: OptionKind) -> Result<Vec<TextOption>> {
        let options = sqlx::query_as::<_, TextOption>(
            "SELECT * FROM text_options WHERE type = ? ORDER BY sort_order ASC",
        )
        .bind(kind.as_str())
        .fetch_all(self.store.pool())
        .await?;

        Ok(options)
    }

    /// Insert a text option. The style payload is reduced to its canonical
    /// single-encoded form here, on the write path.
    pub async fn add_option(&self, option: NewTextOption) -> Result<i64> {
        let style = option
            .style
            .clone()
            .map(StylePayload::normalize)
            .unwrap_or_default();
        let encoded = if style.is_empty() {
            String::new()
        } else {
            style.encode()
        };
        let label = option.label.clone().unwrap_or_else(|| option.name.clone());

        let id = self
            .store
            .with_db(|pool| async move {
                let result = sqlx::query(
                    r#"
                    INSERT INTO text_options (type, name, value, label, style, sort_order)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(option.kind.as_str())
                .bind(&option.name)
                .bind(&option.value)
                .bind(&label)
                .bind(&encoded)
                .bind(option.sort_order)
                .execute(&pool)
                .await?;
                Ok(result.last_insert_rowid())
            })
            .await?;

        Ok(id)
    }

    // ===== Assets =====

    /// Upsert an asset by its unique name.
    pub async fn store_asset(&self, name: &str, kind: AssetKind, content: &str) -> Result<()> {
        self.store
            .with_db(|pool| async move {
                sqlx::query(
                    r#"
                    INSERT INTO assets (name, type, content, created_at) VALUES (?, ?, ?, ?)
                    ON CONFLICT(name) DO UPDATE SET type = excluded.type, content = excluded.content
                    "#,
                )
                .bind(name)
                .bind(kind.as_str())
                .bind(content)
                .bind(now_rfc3339())
                .execute(&pool)
                .await?;
                Ok(())
            })
            .await?;

        tracing::debug!("Stored asset: {}", name);
        Ok(())
    }

    /// Case-insensitive asset lookup; missing names and read failures both
    /// surface as `None`.
    pub async fn get_asset(&self, name: &str) -> Option<Asset> {
        let result =
            sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE name = ? COLLATE NOCASE")
                .bind(name)
                .fetch_optional(self.store.pool())
                .await;

        match result {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!("Asset lookup failed for {:?}: {}", name, e);
                None
            }
        }
    }

    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        let assets = sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY name ASC")
            .fetch_all(self.store.pool())
            .await?;

        Ok(assets)
    }

    pub async fn count_assets(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets")
            .fetch_one(self.store.pool())
            .await?;

        Ok(count)
    }
}
