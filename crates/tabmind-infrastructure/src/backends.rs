//! Backends for hosts without on-device AI.
//!
//! Both always report [`Availability::No`], which routes every cycle through
//! the hostname heuristic and the templated cluster summaries.

use async_trait::async_trait;

use tabmind_core::ai::{
    Availability, LanguageModel, LanguageModelConfig, LanguageModelSession, SummarizerBackend,
    SummarizerOptions, SummarizerSession,
};
use tabmind_core::error::{Result, TabMindError};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLanguageModel;

#[async_trait]
impl LanguageModel for UnavailableLanguageModel {
    async fn availability(&self) -> Result<Availability> {
        Ok(Availability::No)
    }

    async fn create_session(
        &self,
        _config: LanguageModelConfig,
    ) -> Result<Box<dyn LanguageModelSession>> {
        Err(TabMindError::backend("no language model on this host"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSummarizer;

#[async_trait]
impl SummarizerBackend for UnavailableSummarizer {
    async fn availability(&self) -> Result<Availability> {
        Ok(Availability::No)
    }

    async fn create_session(
        &self,
        _options: SummarizerOptions,
    ) -> Result<Box<dyn SummarizerSession>> {
        Err(TabMindError::backend("no summarizer on this host"))
    }
}
