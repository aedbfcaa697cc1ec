use std::sync::Arc;

use tabmind_core::ai::{LanguageModel, LanguageModelConfig, LanguageModelSession};
use tabmind_core::cluster::Cluster;
use tabmind_core::config::ClusteringConfig;
use tabmind_core::error::Result;
use tabmind_core::tab::TabInfo;

use super::fallback::cluster_by_hostname;
use super::response::parse_clusters;

const SYSTEM_PROMPT: &str = "You organise browser tabs. Group the tabs you are given into 3 to 7 \
named topical clusters using their titles and URLs. Answer with a JSON array only, where every \
element has a \"name\" (short category label), a \"description\" (one sentence about the cluster) \
and \"tabIds\" (the ids of the tabs that belong to it).";

const RESPONSE_SHAPE: &str =
    r#"[{"name": "cluster name", "description": "what this is about", "tabIds": [1, 2, 3]}]"#;

/// Produces clusters from tab metadata.
///
/// Holds at most one language-model session. A new session is only opened
/// after the previous one has been released, and `&mut self` keeps two
/// cycles from racing on it.
pub struct ClusteringEngine {
    language_model: Arc<dyn LanguageModel>,
    config: ClusteringConfig,
    session: Option<Box<dyn LanguageModelSession>>,
}

impl ClusteringEngine {
    pub fn new(language_model: Arc<dyn LanguageModel>, config: ClusteringConfig) -> Self {
        Self {
            language_model,
            config,
            session: None,
        }
    }

    /// Clusters `tab_info`, always terminating with a result.
    ///
    /// One backend round trip is attempted. If the model is unavailable or
    /// anything goes wrong, the hostname heuristic answers instead.
    pub async fn cluster(&mut self, tab_info: &[TabInfo]) -> Vec<Cluster> {
        if tab_info.is_empty() {
            return Vec::new();
        }

        match self.cluster_with_model(tab_info).await {
            Ok(Some(clusters)) => {
                tracing::info!(
                    "[ClusteringEngine] Model produced {} clusters for {} tabs",
                    clusters.len(),
                    tab_info.len()
                );
                clusters
            }
            Ok(None) => {
                tracing::debug!("[ClusteringEngine] Model not ready, grouping by hostname");
                cluster_by_hostname(tab_info)
            }
            Err(e) => {
                tracing::warn!("[ClusteringEngine] Falling back to hostname grouping: {}", e);
                cluster_by_hostname(tab_info)
            }
        }
    }

    /// `Ok(None)` means the model is not ready.
    async fn cluster_with_model(&mut self, tab_info: &[TabInfo]) -> Result<Option<Vec<Cluster>>> {
        if !self.language_model.availability().await?.is_ready() {
            return Ok(None);
        }

        self.release_session().await;
        let session = self
            .language_model
            .create_session(LanguageModelConfig {
                system_prompt: SYSTEM_PROMPT.to_string(),
                temperature: self.config.temperature,
                top_k: self.config.top_k,
            })
            .await?;
        let session = self.session.insert(session);

        let tab_list = serde_json::to_string_pretty(tab_info)?;
        let prompt = format!(
            "Analyze these tabs and create intelligent clusters:\n{}\n\nReturn only valid JSON with this structure: {}",
            tab_list, RESPONSE_SHAPE
        );
        let response = session.prompt(&prompt).await?;

        parse_clusters(&response, tab_info).map(Some)
    }

    /// Destroys the held session, if any.
    pub async fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.destroy().await {
                tracing::debug!("[ClusteringEngine] Failed to release session: {}", e);
            }
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeLanguageModel;
    use tabmind_core::ai::Availability;
    use tabmind_core::error::TabMindError;
    use tabmind_core::tab::TabId;

    fn infos() -> Vec<TabInfo> {
        vec![
            TabInfo {
                id: TabId(1),
                title: "The Rust Book".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
            },
            TabInfo {
                id: TabId(2),
                title: "tokio - Rust".to_string(),
                url: "https://docs.rs/tokio".to_string(),
            },
            TabInfo {
                id: TabId(3),
                title: "Hacker News".to_string(),
                url: "https://news.ycombinator.com".to_string(),
            },
        ]
    }

    const MODEL_ANSWER: &str = r#"```json
[{"name": "Rust", "description": "Learning Rust", "tabIds": [1, 2]},
 {"name": "News", "description": "Tech news", "tabIds": [3]}]
```"#;

    #[tokio::test]
    async fn test_uses_model_when_ready() {
        let model = Arc::new(FakeLanguageModel::replying(MODEL_ANSWER));
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        let clusters = engine.cluster(&infos()).await;

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].name, "Rust");
        assert_eq!(clusters[0].tab_ids, vec![TabId(1), TabId(2)]);
        assert_eq!(model.prompt_count(), 1);

        let configs = model.configs();
        assert_eq!(configs[0].temperature, 0.3);
        assert_eq!(configs[0].top_k, 3);

        // Only id, title and url are sent.
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("\"url\": \"https://docs.rs/tokio\""));
        assert!(!prompt.contains("summary"));
    }

    #[tokio::test]
    async fn test_unavailable_model_falls_back() {
        let model = Arc::new(FakeLanguageModel::unavailable());
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        let clusters = engine.cluster(&infos()).await;

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].description, "Tabs from doc.rust-lang.org");
        assert_eq!(model.created(), 0);
    }

    #[tokio::test]
    async fn test_after_download_counts_as_unavailable() {
        let model = Arc::new(FakeLanguageModel::replying(MODEL_ANSWER));
        model.set_availability(Availability::AfterDownload);
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        let clusters = engine.cluster(&infos()).await;

        assert_eq!(clusters.len(), 3);
        assert_eq!(model.created(), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back() {
        let model = Arc::new(FakeLanguageModel::replying("I'd group these by topic."));
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        let clusters = engine.cluster(&infos()).await;

        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.description.starts_with("Tabs from ")));
        assert_eq!(model.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_falls_back() {
        let model = Arc::new(FakeLanguageModel::new(Availability::Readily, |_, _| {
            Err(TabMindError::backend("quota exceeded"))
        }));
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        let clusters = engine.cluster(&infos()).await;

        assert_eq!(clusters.len(), 3);
        assert_eq!(model.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_skips_backend() {
        let model = Arc::new(FakeLanguageModel::replying(MODEL_ANSWER));
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        assert!(engine.cluster(&[]).await.is_empty());
        assert_eq!(model.created(), 0);
    }

    #[tokio::test]
    async fn test_at_most_one_session_open() {
        let model = Arc::new(FakeLanguageModel::replying(MODEL_ANSWER));
        let mut engine = ClusteringEngine::new(model.clone(), ClusteringConfig::default());

        for _ in 0..3 {
            engine.cluster(&infos()).await;
        }

        assert_eq!(model.created(), 3);
        assert_eq!(model.destroyed(), 2);
        assert_eq!(model.max_open(), 1);
        assert!(engine.has_session());

        engine.release_session().await;
        assert!(!engine.has_session());
        assert_eq!(model.open(), 0);
    }
}
