//! Incremental refresh of the tab snapshot cache.

use chrono::Utc;
use futures::future::join_all;

use tabmind_core::tab::{LiveTab, TabDescriptor};
use tabmind_core::workspace::SnapshotCache;

use crate::page_summarizer::PageSummarizer;

/// Brings `cache` up to date with `live_tabs` and returns their descriptors.
///
/// Tabs without an entry, or whose cached URL differs from the live one, get
/// a fresh descriptor stamped with the current time and a best-effort page
/// summary. Every other tab reuses its cached descriptor untouched. Entries
/// for tabs that are no longer live are left in place.
///
/// The result follows the order of `live_tabs`.
pub async fn refresh(
    cache: &mut SnapshotCache,
    live_tabs: &[LiveTab],
    summarizer: &PageSummarizer,
) -> Vec<TabDescriptor> {
    let now = Utc::now();
    let stale: Vec<&LiveTab> = live_tabs.iter().filter(|tab| cache.is_stale(tab)).collect();

    if !stale.is_empty() {
        tracing::debug!(
            "[SnapshotCache] Refreshing {} of {} tabs",
            stale.len(),
            live_tabs.len()
        );
    }

    let summaries = join_all(stale.iter().map(|tab| summarizer.summarize(tab.id))).await;

    for (tab, summary) in stale.into_iter().zip(summaries) {
        let mut descriptor = TabDescriptor::from_live(tab, now);
        descriptor.summary = summary;
        cache.insert(descriptor);
    }

    live_tabs
        .iter()
        .filter_map(|tab| cache.get(tab.id).cloned())
        .collect()
}
