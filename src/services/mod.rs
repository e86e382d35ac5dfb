//! Services module
//!
//! Business logic services that coordinate between the application shell
//! and the repository.

pub mod assets;
pub mod notes;
pub mod options;
pub mod settings;

pub use assets::AssetsService;
pub use notes::NotesService;
pub use options::TextOptionsService;
pub use settings::SettingsService;
