//! One-line descriptions of clusters.

use std::sync::Arc;

use tabmind_core::ai::{LanguageModel, LanguageModelConfig};
use tabmind_core::cluster::Cluster;
use tabmind_core::config::ClusterSummaryConfig;
use tabmind_core::error::Result;
use tabmind_core::workspace::SnapshotCache;

const SYSTEM_PROMPT: &str = "You describe groups of browser tabs. From the tab titles you are \
given, write one short sentence of at most 15 words about what the group is about. Write in \
the third person and focus on the content.";

pub struct ClusterSummarizer {
    language_model: Arc<dyn LanguageModel>,
    config: ClusterSummaryConfig,
}

impl ClusterSummarizer {
    pub fn new(language_model: Arc<dyn LanguageModel>, config: ClusterSummaryConfig) -> Self {
        Self {
            language_model,
            config,
        }
    }

    /// Describes `cluster` using the titles cached in `tab_data`.
    ///
    /// Uses its own short-lived session, released before returning. Falls
    /// back to a templated sentence when the model is not ready or fails.
    pub async fn describe(&self, cluster: &Cluster, tab_data: &SnapshotCache) -> String {
        let titles: Vec<&str> = cluster
            .tab_ids
            .iter()
            .filter_map(|id| tab_data.get(*id))
            .map(|descriptor| descriptor.title.as_str())
            .collect();

        if titles.is_empty() {
            return format!("This workspace contains {} tabs.", cluster.len());
        }

        match self.describe_with_model(cluster, &titles).await {
            Ok(Some(sentence)) => sentence,
            Ok(None) => templated(cluster),
            Err(e) => {
                tracing::warn!(
                    "[ClusterSummarizer] Using template for '{}': {}",
                    cluster.name,
                    e
                );
                templated(cluster)
            }
        }
    }

    async fn describe_with_model(&self, cluster: &Cluster, titles: &[&str]) -> Result<Option<String>> {
        if !self.language_model.availability().await?.is_ready() {
            return Ok(None);
        }

        let session = self
            .language_model
            .create_session(LanguageModelConfig {
                system_prompt: SYSTEM_PROMPT.to_string(),
                temperature: self.config.temperature,
                top_k: self.config.top_k,
            })
            .await?;
        let prompt = format!(
            "Tab titles for the workspace \"{}\":\n{}",
            cluster.name,
            titles.join("\n")
        );
        let result = session.prompt(&prompt).await;
        if let Err(e) = session.destroy().await {
            tracing::debug!("[ClusterSummarizer] Failed to release session: {}", e);
        }

        let sentence = result?;
        let sentence = sentence.trim();
        Ok((!sentence.is_empty()).then(|| sentence.to_string()))
    }
}

fn templated(cluster: &Cluster) -> String {
    format!("{} tabs related to {}", cluster.len(), cluster.name)
}
