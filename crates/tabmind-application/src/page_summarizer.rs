//! Page synopsis adapter.
//!
//! Turns the visible text of a tab into a short synopsis through the
//! summarization backend. Absence is the normal outcome when the page is too
//! short, the backend is not ready, or anything fails along the way.

use std::sync::Arc;

use tabmind_core::ai::{SummarizerBackend, SummarizerOptions};
use tabmind_core::config::ContentConfig;
use tabmind_core::content::PageContentProbe;
use tabmind_core::error::Result;
use tabmind_core::tab::TabId;

pub struct PageSummarizer {
    content_probe: Arc<dyn PageContentProbe>,
    backend: Arc<dyn SummarizerBackend>,
    config: ContentConfig,
}

impl PageSummarizer {
    pub fn new(
        content_probe: Arc<dyn PageContentProbe>,
        backend: Arc<dyn SummarizerBackend>,
        config: ContentConfig,
    ) -> Self {
        Self {
            content_probe,
            backend,
            config,
        }
    }

    /// Summarizes the page shown in `tab_id`.
    ///
    /// Never fails: every error is logged and reported as `None`.
    pub async fn summarize(&self, tab_id: TabId) -> Option<String> {
        match self.try_summarize(tab_id).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::debug!("[PageSummarizer] No summary for tab {}: {}", tab_id, e);
                None
            }
        }
    }

    async fn try_summarize(&self, tab_id: TabId) -> Result<Option<String>> {
        let limit = self.config.page_text_limit;
        let raw = self.content_probe.visible_text(tab_id, limit).await?;
        // The probe is asked for a bounded prefix; enforce it regardless.
        let text: String = raw.chars().take(limit).collect();

        if text.trim().chars().count() < self.config.min_page_text {
            return Ok(None);
        }

        if !self.backend.availability().await?.is_ready() {
            return Ok(None);
        }

        let session = self
            .backend
            .create_session(SummarizerOptions::PAGE_SYNOPSIS)
            .await?;
        let result = session.summarize(&text).await;
        if let Err(e) = session.destroy().await {
            tracing::debug!("[PageSummarizer] Failed to release summarizer session: {}", e);
        }

        let summary = result?;
        let summary = summary.trim();
        Ok((!summary.is_empty()).then(|| summary.to_string()))
    }
}
