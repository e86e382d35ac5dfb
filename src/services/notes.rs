//! Notes service
//!
//! High-level lifecycle logic for notes: listing per bucket, status
//! transitions, restore semantics and permanent deletion.

use crate::database::{Note, NoteStatus, Repository};
use crate::error::{AppError, Result};

/// Service for managing notes
#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
}

impl NotesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new note in the given bucket.
    pub async fn create_note(&self, content: &str, status: NoteStatus) -> Result<i64> {
        tracing::info!("Creating new note in the {} bucket", status);

        let id = self.repo.add_note(content, status).await?;

        tracing::info!("Note created successfully: {}", id);

        Ok(id)
    }

    /// List the notes of one bucket, favorites first, newest first.
    pub async fn list_notes(&self, status: NoteStatus) -> Result<Vec<Note>> {
        self.repo.list_notes(status).await
    }

    /// Rewrite a note's content.
    pub async fn update_content(&self, id: i64, content: &str) -> Result<()> {
        tracing::debug!("Updating note content: {}", id);
        self.repo.update_note_content(id, content).await
    }

    /// Move a note between lifecycle buckets.
    pub async fn move_to(&self, id: i64, status: NoteStatus) -> Result<()> {
        self.repo.update_note_status(id, status).await
    }

    /// Return an archived or deleted note to where it previously lived.
    pub async fn restore_note(&self, id: i64) -> Result<NoteStatus> {
        let target = self.repo.note_previous_status(id).await?;
        self.repo.update_note_status(id, target).await?;

        tracing::info!("Note {} restored to {}", id, target);

        Ok(target)
    }

    /// Permanently remove a note. Only allowed from the deleted bucket;
    /// hard deletion is an explicit, irreversible action.
    pub async fn delete_forever(&self, id: i64) -> Result<()> {
        let status = self.repo.note_status(id).await?;
        if status != NoteStatus::Deleted {
            return Err(AppError::Generic(format!(
                "Note {} is not in the deleted bucket; move it there first",
                id
            )));
        }

        tracing::info!("Permanently deleting note: {}", id);
        self.repo.delete_note(id).await
    }

    pub async fn toggle_favorite(&self, id: i64) -> Result<()> {
        self.repo.toggle_favorite(id).await
    }

    pub async fn list_favorites(&self) -> Result<Vec<Note>> {
        self.repo.list_favorites().await
    }

    /// Best-effort content search; never fails, at worst returns nothing.
    pub async fn search(&self, term: &str, status: Option<NoteStatus>) -> Vec<Note> {
        self.repo.search_notes(term, status).await
    }
}
