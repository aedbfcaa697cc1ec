//! Workspace state domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::SnapshotCache;
use crate::cluster::Cluster;
use crate::tab::TabId;

/// The single workspace state owned by the orchestrator.
///
/// Loaded from storage at startup (or defaulted), mutated by every analysis
/// cycle and persisted afterwards. `original_tab_ids` is `None` until the
/// first startup captures the live tab set; it is never overwritten after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub last_analysis: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tab_data: SnapshotCache,
    #[serde(default)]
    pub original_tab_ids: Option<Vec<TabId>>,
}

impl WorkspaceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the original tab set unless one was already captured.
    ///
    /// Returns `true` when the ids were stored.
    pub fn capture_original_tabs(&mut self, tab_ids: Vec<TabId>) -> bool {
        if self.original_tab_ids.is_some() {
            return false;
        }
        self.original_tab_ids = Some(tab_ids);
        true
    }

    /// Original tab ids, empty when never captured.
    pub fn original_tab_ids(&self) -> &[TabId] {
        self.original_tab_ids.as_deref().unwrap_or_default()
    }
}
