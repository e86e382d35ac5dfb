//! Database models
//!
//! Rust structs representing database entities. All models use serde for
//! serialization to the UI layer; every value handed out is a plain
//! snapshot, never a live handle into the database.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Lifecycle bucket a note lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Default,
    Archived,
    Deleted,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Default => "default",
            NoteStatus::Archived => "archived",
            NoteStatus::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<NoteStatus> {
        match s {
            "default" => Some(NoteStatus::Default),
            "archived" => Some(NoteStatus::Archived),
            "deleted" => Some(NoteStatus::Deleted),
            _ => None,
        }
    }

    /// Lenient form for stored values: anything unrecognized degrades to
    /// `Default` rather than failing the read.
    pub fn parse_lenient(s: &str) -> NoteStatus {
        Self::parse(s).unwrap_or(NoteStatus::Default)
    }

    /// Sanitize a stored `previous_status` into a restore target. Only
    /// `archived` and `deleted` are meaningful prior states; everything
    /// else (missing, corrupted, legacy) falls back to `Default`.
    pub fn restore_target(stored: Option<&str>) -> NoteStatus {
        match stored.and_then(Self::parse) {
            Some(status @ (NoteStatus::Archived | NoteStatus::Deleted)) => status,
            _ => NoteStatus::Default,
        }
    }
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for NoteStatus {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| crate::error::AppError::Generic(format!("Unknown note status: {}", s)))
    }
}

/// A note with rich text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    /// Sanitized rich-text markup.
    pub content: String,
    pub status: NoteStatus,
    /// Restore target for archived/deleted notes, already sanitized.
    pub previous_status: NoteStatus,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for Note {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let previous_status: Option<String> = row.try_get("previous_status")?;
        let created_at: Option<String> = row.try_get("created_at")?;
        let updated_at: Option<String> = row.try_get("updated_at")?;

        Ok(Note {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            status: NoteStatus::parse_lenient(&status),
            previous_status: NoteStatus::restore_target(previous_status.as_deref()),
            is_favorite: row.try_get("is_favorite")?,
            created_at: normalize_timestamp(created_at.as_deref()),
            updated_at: normalize_timestamp(updated_at.as_deref()),
        })
    }
}

/// Category a text option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Size,
    Format,
    Color,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Size => "size",
            OptionKind::Format => "format",
            OptionKind::Color => "color",
        }
    }

    pub fn parse(s: &str) -> Option<OptionKind> {
        match s {
            "size" => Some(OptionKind::Size),
            "format" => Some(OptionKind::Format),
            "color" => Some(OptionKind::Color),
            _ => None,
        }
    }
}

/// Flat property-name to value styling map carried by a text option.
///
/// Persisted as a single canonically-encoded JSON object. Normalization
/// happens at the write path (see [`StylePayload`]); reads decode once and
/// degrade to the empty map on unparseable data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextStyle(pub BTreeMap<String, String>);

impl TextStyle {
    pub fn from_pairs<'a, I>(pairs: I) -> TextStyle
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        TextStyle(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical stored form.
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Decode the stored canonical form; blank and unparseable payloads
    /// both degrade to the empty map.
    pub fn decode(raw: &str) -> TextStyle {
        if raw.trim().is_empty() {
            return TextStyle::default();
        }
        serde_json::from_str(raw).map(TextStyle).unwrap_or_default()
    }
}

/// Style input accepted at the write path.
///
/// `Encoded` covers callers handing over an already-encoded payload,
/// including the double-encoded forms earlier revisions produced;
/// [`StylePayload::normalize`] reduces every variant to one canonical map
/// before anything is stored.
#[derive(Debug, Clone)]
pub enum StylePayload {
    Structured(TextStyle),
    Encoded(String),
}

impl StylePayload {
    pub fn normalize(self) -> TextStyle {
        match self {
            StylePayload::Structured(style) => style,
            StylePayload::Encoded(raw) => Self::unnest(&raw),
        }
    }

    fn unnest(raw: &str) -> TextStyle {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return TextStyle::default();
        }

        let mut value: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => return TextStyle::default(),
        };

        // Peel layers where a JSON string wraps the real object.
        while let serde_json::Value::String(inner) = value {
            value = match serde_json::from_str(&inner) {
                Ok(next) => next,
                Err(_) => return TextStyle::default(),
            };
        }

        serde_json::from_value(value).map(TextStyle).unwrap_or_default()
    }
}

/// A configurable rich-text styling choice offered in the note editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOption {
    pub id: i64,
    pub kind: OptionKind,
    pub name: String,
    pub value: String,
    pub label: Option<String>,
    pub style: TextStyle,
    pub sort_order: i64,
}

impl FromRow<'_, SqliteRow> for TextOption {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let kind: String = row.try_get("type")?;
        let style: Option<String> = row.try_get("style")?;

        Ok(TextOption {
            id: row.try_get("id")?,
            kind: OptionKind::parse(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "type".to_string(),
                source: format!("unknown text option type: {}", kind).into(),
            })?,
            name: row.try_get("name")?,
            value: row.try_get("value")?,
            label: row.try_get("label")?,
            style: style.as_deref().map(TextStyle::decode).unwrap_or_default(),
            sort_order: row.try_get("sort_order")?,
        })
    }
}

/// Input for inserting a text option.
#[derive(Debug, Clone)]
pub struct NewTextOption {
    pub kind: OptionKind,
    pub name: String,
    pub value: String,
    /// Falls back to `name` when absent.
    pub label: Option<String>,
    pub style: Option<StylePayload>,
    pub sort_order: i64,
}

/// Stored representation of a bundled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Svg,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Svg => "svg",
        }
    }

    pub fn parse(s: &str) -> Option<AssetKind> {
        match s {
            "image" => Some(AssetKind::Image),
            "svg" => Some(AssetKind::Svg),
            _ => None,
        }
    }
}

/// A named asset stored as text: a data URL for raster images, raw markup
/// for vector icons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub kind: AssetKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for Asset {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let kind: String = row.try_get("type")?;
        let created_at: Option<String> = row.try_get("created_at")?;

        Ok(Asset {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            kind: AssetKind::parse(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "type".to_string(),
                source: format!("unknown asset type: {}", kind).into(),
            })?,
            content: row.try_get("content")?,
            created_at: normalize_timestamp(created_at.as_deref()),
        })
    }
}

/// Normalize a stored timestamp to UTC.
///
/// Rows written by this crate carry RFC 3339 text; rows created through
/// SQLite's CURRENT_TIMESTAMP default carry the space-separated form with
/// no offset. Missing or unreadable values fall back to the current time.
pub(crate) fn normalize_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Utc::now(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.and_utc();
        }
    }

    tracing::debug!("Unreadable timestamp {:?}, substituting now", raw);
    Utc::now()
}

/// Timestamp format written on every insert and update.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
