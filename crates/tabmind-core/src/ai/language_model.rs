use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tri-state availability reported by an on-device backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// The model can be used right away.
    Readily,
    /// The model exists but has to be fetched first.
    AfterDownload,
    /// The model cannot be used.
    No,
}

impl Availability {
    pub fn is_ready(self) -> bool {
        self == Availability::Readily
    }
}

/// Session configuration passed on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModelConfig {
    pub system_prompt: String,
    pub temperature: f32,
    pub top_k: u32,
}

/// Language-model backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Probes whether sessions can be created.
    async fn availability(&self) -> Result<Availability>;

    /// Opens a new session. Callers own the returned handle and must
    /// [`destroy`](LanguageModelSession::destroy) it.
    async fn create_session(
        &self,
        config: LanguageModelConfig,
    ) -> Result<Box<dyn LanguageModelSession>>;
}

/// A live language-model session.
#[async_trait]
pub trait LanguageModelSession: Send + Sync {
    /// Single-shot prompt.
    async fn prompt(&self, text: &str) -> Result<String>;

    /// Releases the backend resources held by this session.
    async fn destroy(&self) -> Result<()>;
}
