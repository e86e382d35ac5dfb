//! Application configuration constants
//!
//! Central location for fixed storage keys, file names and the canonical
//! seed-data dimensions used throughout the application.

// ===== Durable Storage =====

/// Fixed key under which the database snapshot lives in durable storage.
/// The slot file is named after this key.
pub const DATABASE_STORAGE_KEY: &str = "app-database";

/// File name of the session working copy of the database. The working copy
/// is rebuilt from the snapshot on every open; the slot stays authoritative.
pub const SESSION_DB_FILE: &str = "session.db";

// ===== Text Option Seeds =====

/// Step between seeded text sizes, in pixels.
pub const TEXT_SIZE_STEP_PX: u32 = 7;

/// Number of seeded text sizes (7px through 56px).
pub const TEXT_SIZE_COUNT: u32 = 8;

/// Seeded color palette, in display order.
pub const COLOR_PALETTE: &[(&str, &str)] = &[
    ("Black", "rgb(0, 0, 0)"),
    ("Red", "rgb(179, 23, 23)"),
    ("Green", "rgb(36, 148, 26)"),
    ("Blue", "rgb(26, 74, 197)"),
    ("Yellow", "rgb(241, 187, 9)"),
];
