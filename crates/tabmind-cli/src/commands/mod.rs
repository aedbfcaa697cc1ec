//! Subcommand implementations and the wiring they share.

pub mod analyze;
pub mod apply;
pub mod revert;
pub mod show;

use anyhow::{Context as _, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

use tabmind_application::{WorkspaceHandle, WorkspacePorts, WorkspaceService};
use tabmind_core::config::TabMindConfig;
use tabmind_core::storage::KeyValueStore;
use tabmind_infrastructure::{
    ChannelBroadcaster, ConfigService, InMemoryTabHost, JsonFileStore, MemoryStore, TabMindPaths,
    UnavailableLanguageModel, UnavailableSummarizer,
};

/// Resolved configuration and storage for one invocation.
pub struct Context {
    pub config: TabMindConfig,
    pub store: Arc<dyn KeyValueStore>,
}

impl Context {
    /// With `no_save`, workspace state lives in memory for this run only.
    pub fn new(config_path: Option<&Path>, data_dir: Option<&Path>, no_save: bool) -> Result<Self> {
        let paths = TabMindPaths::new(data_dir)?;
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| paths.config_file());
        let config = ConfigService::new(&config_path)
            .load()
            .with_context(|| format!("Failed to load {}", config_path.display()))?;

        let store: Arc<dyn KeyValueStore> = if no_save {
            tracing::debug!("[Context] Keeping workspace state in memory");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::new(paths.storage_file()))
        };
        Ok(Self { config, store })
    }

    /// Starts the workspace actor over a fixture tab host.
    ///
    /// No on-device model exists here, so clustering always takes the
    /// hostname path.
    pub fn spawn_workspace(&self, host: Arc<InMemoryTabHost>) -> (WorkspaceHandle, JoinHandle<()>) {
        let ports = WorkspacePorts {
            tab_host: host.clone(),
            language_model: Arc::new(UnavailableLanguageModel),
            summarizer_backend: Arc::new(UnavailableSummarizer),
            content_probe: host,
            store: self.store.clone(),
            broadcaster: Arc::new(ChannelBroadcaster::default()),
        };
        let service = WorkspaceService::new(ports, &self.config);
        WorkspaceHandle::spawn(service, &self.config.orchestrator)
    }
}

pub fn load_tabs(path: &Path) -> Result<Arc<InMemoryTabHost>> {
    let host = InMemoryTabHost::from_file(path)
        .with_context(|| format!("Failed to read tabs from {}", path.display()))?;
    Ok(Arc::new(host))
}

/// Stops the actor and waits for it to release its resources.
pub async fn stop(handle: WorkspaceHandle, task: JoinHandle<()>) -> Result<()> {
    handle.shutdown().await?;
    task.await.context("Workspace task panicked")?;
    Ok(())
}
