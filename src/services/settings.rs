//! Settings service
//!
//! Key-value settings stored in the database, plus typed helpers for the
//! flags the application actually keeps there.

use crate::database::Repository;
use crate::error::Result;

/// Key recording that the user dismissed the first-run welcome message.
const WELCOME_SEEN_KEY: &str = "has-viewed";

/// Service for persisted application settings
#[derive(Clone)]
pub struct SettingsService {
    repo: Repository,
}

impl SettingsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Read a setting; `None` when unset or unreadable.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.repo.get_setting(key).await
    }

    /// Write a setting (upsert by key).
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.repo.set_setting(key, value).await
    }

    /// Whether the first-run welcome message was already dismissed.
    pub async fn has_seen_welcome(&self) -> bool {
        self.get(WELCOME_SEEN_KEY).await.as_deref() == Some("true")
    }

    pub async fn mark_welcome_seen(&self) -> Result<()> {
        self.set(WELCOME_SEEN_KEY, "true").await
    }
}
