//! Application composition root
//!
//! Constructs the store and every service over it, and runs the first-run
//! seeding passes. The application shell owns an `App` and reaches the
//! store only through the services; it never holds a database handle.

use crate::database::{Repository, Store};
use crate::error::Result;
use crate::services::{AssetsService, NotesService, SettingsService, TextOptionsService};
use std::path::Path;

/// Central application state holding all services
#[derive(Clone)]
pub struct App {
    store: Store,
    pub notes: NotesService,
    pub settings: SettingsService,
    pub text_options: TextOptionsService,
    pub assets: AssetsService,
}

impl App {
    /// Open the store at `data_dir`, wire up the services and run the
    /// idempotent seeding passes.
    pub async fn bootstrap(data_dir: &Path) -> Result<App> {
        tracing::info!("Initializing application");

        let store = Store::open(data_dir).await?;
        let repo = Repository::new(store.clone());

        let app = App {
            store,
            notes: NotesService::new(repo.clone()),
            settings: SettingsService::new(repo.clone()),
            text_options: TextOptionsService::new(repo.clone()),
            assets: AssetsService::new(repo),
        };

        app.text_options.seed_defaults().await?;
        app.assets.seed_if_empty().await?;

        tracing::info!("Application initialized successfully");

        Ok(app)
    }

    /// Shut the store down. Call once when the session ends.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}
