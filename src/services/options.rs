//! Text options service
//!
//! Rich-text styling choices (sizes, formats, colors) offered by the note
//! editor, with first-run seeding of the canonical sets.

use crate::config::{COLOR_PALETTE, TEXT_SIZE_COUNT, TEXT_SIZE_STEP_PX};
use crate::database::{NewTextOption, OptionKind, Repository, StylePayload, TextOption, TextStyle};
use crate::error::Result;

/// Service for managing text options
#[derive(Clone)]
pub struct TextOptionsService {
    repo: Repository,
}

impl TextOptionsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// List the options of one category in display order.
    pub async fn list(&self, kind: OptionKind) -> Result<Vec<TextOption>> {
        self.repo.list_options(kind).await
    }

    pub async fn add(&self, option: NewTextOption) -> Result<i64> {
        self.repo.add_option(option).await
    }

    /// Seed the canonical option sets for any category that has none.
    ///
    /// Idempotent; runs on every bootstrap. The three categories are
    /// disjoint, so their seeds run concurrently.
    pub async fn seed_defaults(&self) -> Result<()> {
        tokio::try_join!(self.seed_sizes(), self.seed_formats(), self.seed_colors())?;
        Ok(())
    }

    async fn seed_sizes(&self) -> Result<()> {
        if !self.repo.list_options(OptionKind::Size).await?.is_empty() {
            return Ok(());
        }

        tracing::info!("Seeding default size options");

        for index in 0..TEXT_SIZE_COUNT {
            let px = (index + 1) * TEXT_SIZE_STEP_PX;
            let name = format!("{}px", px);

            self.repo
                .add_option(NewTextOption {
                    kind: OptionKind::Size,
                    name: name.clone(),
                    value: px.to_string(),
                    label: Some(name),
                    style: None,
                    sort_order: index as i64,
                })
                .await?;
        }

        Ok(())
    }

    async fn seed_formats(&self) -> Result<()> {
        if !self.repo.list_options(OptionKind::Format).await?.is_empty() {
            return Ok(());
        }

        tracing::info!("Seeding default format options");

        let formats = [
            ("bold", "B", ("font-weight", "bold")),
            ("italic", "I", ("font-style", "italic")),
            ("underline", "U", ("text-decoration", "underline")),
        ];

        for (index, (name, label, style)) in formats.into_iter().enumerate() {
            self.repo
                .add_option(NewTextOption {
                    kind: OptionKind::Format,
                    name: name.to_string(),
                    value: name.to_string(),
                    label: Some(label.to_string()),
                    style: Some(StylePayload::Structured(TextStyle::from_pairs([style]))),
                    sort_order: index as i64,
                })
                .await?;
        }

        Ok(())
    }

    async fn seed_colors(&self) -> Result<()> {
        if !self.repo.list_options(OptionKind::Color).await?.is_empty() {
            return Ok(());
        }

        tracing::info!("Seeding default color options");

        for (index, (name, value)) in COLOR_PALETTE.iter().enumerate() {
            self.repo
                .add_option(NewTextOption {
                    kind: OptionKind::Color,
                    name: name.to_string(),
                    value: value.to_string(),
                    label: None,
                    style: None,
                    sort_order: index as i64,
                })
                .await?;
        }

        Ok(())
    }
}
