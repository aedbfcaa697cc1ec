use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::language_model::Availability;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryKind {
    #[serde(rename = "tl;dr")]
    TlDr,
    #[serde(rename = "key-points")]
    KeyPoints,
    #[serde(rename = "teaser")]
    Teaser,
    #[serde(rename = "headline")]
    Headline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    PlainText,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

/// Options used when creating a summarizer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizerOptions {
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub format: SummaryFormat,
    pub length: SummaryLength,
}

impl SummarizerOptions {
    /// Short plain-text tl;dr, used for page synopses.
    pub const PAGE_SYNOPSIS: Self = Self {
        kind: SummaryKind::TlDr,
        format: SummaryFormat::PlainText,
        length: SummaryLength::Short,
    };
}

/// Summarization backend.
#[async_trait]
pub trait SummarizerBackend: Send + Sync {
    async fn availability(&self) -> Result<Availability>;

    async fn create_session(
        &self,
        options: SummarizerOptions,
    ) -> Result<Box<dyn SummarizerSession>>;
}

#[async_trait]
pub trait SummarizerSession: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;

    async fn destroy(&self) -> Result<()>;
}
