//! Assets service
//!
//! Bundled icon resources stored as text: raster images become base64 data
//! URLs, vector icons are stored as their raw `<svg>` markup.

use crate::database::{Asset, AssetKind, Repository};
use crate::error::{AppError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// One bundled resource to seed into the assets table.
struct ManifestEntry {
    name: &'static str,
    kind: AssetKind,
    mime: &'static str,
    bytes: &'static [u8],
}

macro_rules! bundled {
    ($file:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/img/", $file))
    };
}

const BUNDLED_ASSETS: &[ManifestEntry] = &[
    ManifestEntry {
        name: "logo",
        kind: AssetKind::Image,
        mime: "image/png",
        bytes: bundled!("logo.png"),
    },
    ManifestEntry {
        name: "home-icon",
        kind: AssetKind::Svg,
        mime: "image/svg+xml",
        bytes: bundled!("home-icon.svg"),
    },
    ManifestEntry {
        name: "active-home-icon",
        kind: AssetKind::Svg,
        mime: "image/svg+xml",
        bytes: bundled!("active-home-icon.svg"),
    },
    ManifestEntry {
        name: "archive-icon",
        kind: AssetKind::Svg,
        mime: "image/svg+xml",
        bytes: bundled!("archive-icon.svg"),
    },
    ManifestEntry {
        name: "active-archive-icon",
        kind: AssetKind::Svg,
        mime: "image/svg+xml",
        bytes: bundled!("active-archive-icon.svg"),
    },
    ManifestEntry {
        name: "deleted-icon",
        kind: AssetKind::Svg,
        mime: "image/svg+xml",
        bytes: bundled!("deleted-icon.svg"),
    },
    ManifestEntry {
        name: "active-deleted-icon",
        kind: AssetKind::Svg,
        mime: "image/svg+xml",
        bytes: bundled!("active-deleted-icon.svg"),
    },
];

/// Service for managing stored assets
#[derive(Clone)]
pub struct AssetsService {
    repo: Repository,
}

impl AssetsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn store(&self, name: &str, kind: AssetKind, content: &str) -> Result<()> {
        self.repo.store_asset(name, kind, content).await
    }

    /// Case-insensitive lookup; `None` when missing or unreadable.
    pub async fn get(&self, name: &str) -> Option<Asset> {
        self.repo.get_asset(name).await
    }

    pub async fn list(&self) -> Result<Vec<Asset>> {
        self.repo.list_assets().await
    }

    /// Seed the bundled icon manifest if the assets table is empty.
    ///
    /// A single asset that fails to convert or store is logged and
    /// skipped; the rest of the batch still goes in. Idempotent across
    /// runs.
    pub async fn seed_if_empty(&self) -> Result<()> {
        if self.repo.count_assets().await? > 0 {
            return Ok(());
        }

        tracing::info!("Seeding {} bundled assets", BUNDLED_ASSETS.len());

        for entry in BUNDLED_ASSETS {
            let content = match storable_content(entry) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping bundled asset {}: {}", entry.name, e);
                    continue;
                }
            };

            if let Err(e) = self.repo.store_asset(entry.name, entry.kind, &content).await {
                tracing::warn!("Failed to store bundled asset {}: {}", entry.name, e);
            }
        }

        Ok(())
    }
}

/// Convert a bundled resource into its stored text form.
fn storable_content(entry: &ManifestEntry) -> Result<String> {
    match entry.kind {
        AssetKind::Image => Ok(data_url(entry.mime, entry.bytes)),
        AssetKind::Svg => {
            let text = std::str::from_utf8(entry.bytes).map_err(|e| {
                AppError::Asset(format!("{} is not valid UTF-8: {}", entry.name, e))
            })?;
            extract_svg_markup(text)
                .map(str::to_string)
                .ok_or_else(|| AppError::Asset(format!("no <svg> element in {}", entry.name)))
        }
    }
}

/// Base64 data URL for raster content.
fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Pull the bare `<svg>...</svg>` element out of a file, dropping any XML
/// prolog, comments and surrounding whitespace.
fn extract_svg_markup(text: &str) -> Option<&str> {
    let start = text.find("<svg")?;
    let end = text.rfind("</svg>")? + "</svg>".len();
    if end <= start {
        return None;
    }
    Some(&text[start..end])
}
