//! Runtime configuration model.
//!
//! Every field has a default so a partial (or missing) `config.toml` still
//! yields a complete configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for TabMind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TabMindConfig {
    /// Page-content extraction limits.
    pub content: ContentConfig,
    pub clustering: ClusteringConfig,
    pub cluster_summary: ClusterSummaryConfig,
    /// Workspace actor behaviour.
    pub orchestrator: OrchestratorConfig,
    /// Persistence settings.
    pub storage: StorageConfig,
}

impl TabMindConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Renders the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Maximum number of characters read from a page.
    pub page_text_limit: usize,
    /// Pages with less visible text than this are not summarized.
    pub min_page_text: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            page_text_limit: 5000,
            min_page_text: 100,
        }
    }
}

/// Sampling settings for the clustering session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub temperature: f32,
    pub top_k: u32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_k: 3,
        }
    }
}

/// Sampling settings for the short-lived cluster summary session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSummaryConfig {
    pub temperature: f32,
    pub top_k: u32,
}

impl Default for ClusterSummaryConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Run one analysis cycle for a burst of queued tab events.
    pub coalesce_tab_events: bool,
    /// Bound of the workspace command queue.
    pub command_queue_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            coalesce_tab_events: true,
            command_queue_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key under which the workspace state is stored.
    pub state_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_key: "workspaceState".to_string(),
        }
    }
}
