use anyhow::Result;
use serde_json::json;
use std::path::Path;

use super::{Context, load_tabs, stop};

/// Analyzes the fixture tabs, applies the clusters and prints the groups.
pub async fn run(context: &Context, tabs: &Path) -> Result<()> {
    let host = load_tabs(tabs)?;
    let (handle, task) = context.spawn_workspace(host.clone());

    let state = handle.workspace().await?;
    let outcome = handle.apply_clusters(state.clusters).await?;
    tracing::info!(
        "Created {} groups ({} failed)",
        outcome.groups_created,
        outcome.clusters_failed
    );

    let groups: Vec<_> = host
        .groups()
        .await
        .into_iter()
        .map(|(group, tab_ids)| {
            json!({
                "title": group.title,
                "color": group.color,
                "collapsed": group.collapsed,
                "tabIds": tab_ids,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&groups)?);

    stop(handle, task).await
}
