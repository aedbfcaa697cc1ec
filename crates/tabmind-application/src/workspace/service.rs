//! Workspace analysis cycle and the state it owns.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;

use tabmind_core::ai::{LanguageModel, SummarizerBackend};
use tabmind_core::cluster::Cluster;
use tabmind_core::config::TabMindConfig;
use tabmind_core::content::PageContentProbe;
use tabmind_core::error::Result;
use tabmind_core::storage::KeyValueStore;
use tabmind_core::tab::{TabHost, TabInfo};
use tabmind_core::workspace::{WorkspaceBroadcaster, WorkspaceEvent, WorkspaceState};

use crate::cluster_summarizer::ClusterSummarizer;
use crate::clustering::ClusteringEngine;
use crate::group_reconciler::{ApplyOutcome, GroupReconciler, RevertOutcome};
use crate::page_summarizer::PageSummarizer;
use crate::snapshot_cache;

/// The collaborators a [`WorkspaceService`] is wired to.
#[derive(Clone)]
pub struct WorkspacePorts {
    pub tab_host: Arc<dyn TabHost>,
    pub language_model: Arc<dyn LanguageModel>,
    pub summarizer_backend: Arc<dyn SummarizerBackend>,
    pub content_probe: Arc<dyn PageContentProbe>,
    pub store: Arc<dyn KeyValueStore>,
    pub broadcaster: Arc<dyn WorkspaceBroadcaster>,
}

/// Owns the workspace state and runs analysis cycles over it.
///
/// Methods take `&mut self`; concurrent callers go through
/// [`WorkspaceHandle`](super::WorkspaceHandle), which serializes them.
pub struct WorkspaceService {
    tab_host: Arc<dyn TabHost>,
    store: Arc<dyn KeyValueStore>,
    broadcaster: Arc<dyn WorkspaceBroadcaster>,
    page_summarizer: PageSummarizer,
    engine: ClusteringEngine,
    cluster_summarizer: ClusterSummarizer,
    reconciler: GroupReconciler,
    state_key: String,
    state: WorkspaceState,
    // Set while the stored state could not be read; nothing is written back.
    store_unreadable: bool,
}

impl WorkspaceService {
    pub fn new(ports: WorkspacePorts, config: &TabMindConfig) -> Self {
        Self {
            page_summarizer: PageSummarizer::new(
                ports.content_probe,
                ports.summarizer_backend,
                config.content.clone(),
            ),
            engine: ClusteringEngine::new(ports.language_model.clone(), config.clustering.clone()),
            cluster_summarizer: ClusterSummarizer::new(
                ports.language_model,
                config.cluster_summary.clone(),
            ),
            reconciler: GroupReconciler::new(ports.tab_host.clone()),
            tab_host: ports.tab_host,
            store: ports.store,
            broadcaster: ports.broadcaster,
            state_key: config.storage.state_key.clone(),
            state: WorkspaceState::new(),
            store_unreadable: false,
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Loads the persisted state and captures the original tab set.
    ///
    /// A missing or corrupt state starts empty. Original tab ids are only
    /// captured when none were stored before. If the store cannot be read,
    /// nothing is captured or persisted until a later load succeeds.
    pub async fn initialize(&mut self) {
        match self.load_state().await {
            Ok(state) => {
                self.state = state;
                self.store_unreadable = false;
            }
            Err(e) => {
                tracing::warn!("[WorkspaceService] Failed to load workspace state: {}", e);
                self.store_unreadable = true;
                return;
            }
        }

        if self.state.original_tab_ids.is_some() {
            return;
        }
        match self.tab_host.query_tabs().await {
            Ok(tabs) => {
                let ids = tabs.iter().map(|tab| tab.id).collect::<Vec<_>>();
                tracing::info!("[WorkspaceService] Captured {} original tabs", ids.len());
                self.state.capture_original_tabs(ids);
                self.persist().await;
            }
            Err(e) => {
                tracing::warn!("[WorkspaceService] Could not capture original tabs: {}", e);
            }
        }
    }

    async fn load_state(&self) -> Result<WorkspaceState> {
        let Some(value) = self.store.get(&self.state_key).await? else {
            return Ok(WorkspaceState::new());
        };
        match serde_json::from_value::<WorkspaceState>(value) {
            Ok(state) => {
                tracing::info!(
                    "[WorkspaceService] Restored workspace with {} clusters and {} cached tabs",
                    state.clusters.len(),
                    state.tab_data.len()
                );
                Ok(state)
            }
            Err(e) => {
                tracing::warn!("[WorkspaceService] Discarding corrupt workspace state: {}", e);
                Ok(WorkspaceState::new())
            }
        }
    }

    /// Runs one full cycle: refresh, cluster, describe, persist, broadcast.
    ///
    /// Never fails outward. If the live tabs cannot be listed the cycle is
    /// abandoned and the state is left as it was. A store that could not be
    /// read at startup is retried first.
    pub async fn run_analysis_cycle(&mut self) {
        if self.store_unreadable {
            self.initialize().await;
        }

        let live_tabs = match self.tab_host.query_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => {
                tracing::warn!("[WorkspaceService] Skipping analysis, tab query failed: {}", e);
                return;
            }
        };

        let descriptors =
            snapshot_cache::refresh(&mut self.state.tab_data, &live_tabs, &self.page_summarizer)
                .await;
        let tab_info: Vec<TabInfo> = descriptors.iter().map(|d| d.tab_info()).collect();

        let mut clusters = self.engine.cluster(&tab_info).await;
        self.describe_clusters(&mut clusters).await;

        self.state.clusters = clusters;
        self.state.last_analysis = Some(Utc::now());
        tracing::info!(
            "[WorkspaceService] Analysis complete: {} tabs, {} clusters",
            live_tabs.len(),
            self.state.clusters.len()
        );

        self.persist().await;
        self.broadcast();
    }

    async fn describe_clusters(&self, clusters: &mut [Cluster]) {
        let tab_data = &self.state.tab_data;
        let summaries = join_all(
            clusters
                .iter()
                .map(|cluster| self.cluster_summarizer.describe(cluster, tab_data)),
        )
        .await;
        for (cluster, summary) in clusters.iter_mut().zip(summaries) {
            cluster.summary = summary;
        }
    }

    async fn persist(&self) {
        if self.store_unreadable {
            tracing::debug!("[WorkspaceService] Store unreadable, not persisting workspace");
            return;
        }
        let value = match serde_json::to_value(&self.state) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("[WorkspaceService] Failed to serialize workspace: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.state_key, value).await {
            tracing::error!("[WorkspaceService] Failed to persist workspace: {}", e);
        }
    }

    fn broadcast(&self) {
        let event = WorkspaceEvent::WorkspaceUpdated {
            data: self.state.clone(),
        };
        if let Err(e) = self.broadcaster.publish(event) {
            tracing::warn!("[WorkspaceService] Failed to broadcast workspace: {}", e);
        }
    }

    /// Materializes `clusters` as visual groups.
    pub async fn apply_clusters(&self, clusters: &[Cluster]) -> Result<ApplyOutcome> {
        self.reconciler.apply(clusters).await
    }

    /// Ungroups everything and closes tabs opened after the original capture.
    pub async fn revert(&self) -> Result<RevertOutcome> {
        self.reconciler.revert(self.state.original_tab_ids()).await
    }

    /// Releases the clustering session.
    pub async fn shutdown(&mut self) {
        self.engine.release_session().await;
        tracing::debug!("[WorkspaceService] Shut down");
    }

    #[cfg(test)]
    pub(crate) fn has_open_session(&self) -> bool {
        self.engine.has_session()
    }
}
