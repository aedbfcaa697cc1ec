//! Applies clusters as visual tab groups, and undoes them.

use std::collections::HashSet;
use std::sync::Arc;

use tabmind_core::cluster::Cluster;
use tabmind_core::error::Result;
use tabmind_core::tab::{GroupColor, GroupUpdate, TabHost, TabId};

/// What an [`GroupReconciler::apply`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub tabs_ungrouped: usize,
    pub groups_created: usize,
    /// Clusters with no live tab left.
    pub clusters_skipped: usize,
    pub clusters_failed: usize,
}

/// What a [`GroupReconciler::revert`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevertOutcome {
    pub tabs_ungrouped: usize,
    pub tabs_closed: usize,
    /// Closing was withheld because it would have closed every open tab.
    pub close_skipped: bool,
}

pub struct GroupReconciler {
    tab_host: Arc<dyn TabHost>,
}

impl GroupReconciler {
    pub fn new(tab_host: Arc<dyn TabHost>) -> Self {
        Self { tab_host }
    }

    /// Replaces every visual group with one group per cluster.
    ///
    /// Ids that no longer resolve to a live tab are dropped. Clusters may
    /// overlap; a tab claimed twice ends up in the later group. A failure on
    /// one cluster is logged and the rest still proceed.
    pub async fn apply(&self, clusters: &[Cluster]) -> Result<ApplyOutcome> {
        let mut outcome = ApplyOutcome {
            tabs_ungrouped: self.ungroup_all().await?,
            ..ApplyOutcome::default()
        };

        for (index, cluster) in clusters.iter().enumerate() {
            let live = self.live_members(cluster).await;
            if live.is_empty() {
                tracing::debug!(
                    "[GroupReconciler] Skipping '{}': no live tabs",
                    cluster.name
                );
                outcome.clusters_skipped += 1;
                continue;
            }

            match self.create_group(cluster, index, &live).await {
                Ok(()) => outcome.groups_created += 1,
                Err(e) => {
                    tracing::warn!(
                        "[GroupReconciler] Failed to group '{}': {}",
                        cluster.name,
                        e
                    );
                    outcome.clusters_failed += 1;
                }
            }
        }

        tracing::info!(
            "[GroupReconciler] Applied {} groups ({} skipped, {} failed)",
            outcome.groups_created,
            outcome.clusters_skipped,
            outcome.clusters_failed
        );
        Ok(outcome)
    }

    /// Removes every visual group and closes tabs opened since `original_tab_ids`
    /// was captured.
    ///
    /// Nothing is closed when that would leave no tab open. Not transactional:
    /// a failure after ungrouping leaves the tabs ungrouped.
    pub async fn revert(&self, original_tab_ids: &[TabId]) -> Result<RevertOutcome> {
        let mut outcome = RevertOutcome {
            tabs_ungrouped: self.ungroup_all().await?,
            ..RevertOutcome::default()
        };

        let original: HashSet<TabId> = original_tab_ids.iter().copied().collect();
        let live = self.tab_host.query_tabs().await?;
        let to_close: Vec<TabId> = live
            .iter()
            .map(|tab| tab.id)
            .filter(|id| !original.contains(id))
            .collect();

        if !to_close.is_empty() && to_close.len() < live.len() {
            self.tab_host.close_tabs(&to_close).await?;
            outcome.tabs_closed = to_close.len();
        } else if !to_close.is_empty() {
            tracing::warn!(
                "[GroupReconciler] Not closing {} tabs: no original tab is open",
                to_close.len()
            );
            outcome.close_skipped = true;
        }

        tracing::info!(
            "[GroupReconciler] Reverted: {} tabs ungrouped, {} closed",
            outcome.tabs_ungrouped,
            outcome.tabs_closed
        );
        Ok(outcome)
    }

    /// Ungroups the members of every visual group, host-wide.
    async fn ungroup_all(&self) -> Result<usize> {
        let mut members = Vec::new();
        for group in self.tab_host.query_groups().await? {
            members.extend(self.tab_host.tabs_in_group(group.id).await?);
        }
        if !members.is_empty() {
            self.tab_host.ungroup(&members).await?;
        }
        Ok(members.len())
    }

    /// Cluster members that still resolve to a live tab, first occurrence kept.
    async fn live_members(&self, cluster: &Cluster) -> Vec<TabId> {
        let mut seen = HashSet::new();
        let mut live = Vec::new();
        for &id in &cluster.tab_ids {
            if !seen.insert(id) {
                continue;
            }
            match self.tab_host.get_tab(id).await {
                Ok(Some(_)) => live.push(id),
                Ok(None) => {}
                Err(e) => tracing::debug!("[GroupReconciler] Treating tab {} as closed: {}", id, e),
            }
        }
        live
    }

    async fn create_group(&self, cluster: &Cluster, index: usize, tab_ids: &[TabId]) -> Result<()> {
        let group_id = self.tab_host.group(tab_ids).await?;
        self.tab_host
            .update_group(
                group_id,
                GroupUpdate {
                    title: cluster.name.clone(),
                    color: GroupColor::for_index(index),
                    collapsed: false,
                },
            )
            .await
    }
}
