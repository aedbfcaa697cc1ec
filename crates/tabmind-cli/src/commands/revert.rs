use anyhow::Result;
use serde_json::json;
use std::path::Path;

use tabmind_core::tab::TabHost;

use super::{Context, load_tabs, stop};

/// Reverts the fixture tabs to the original tab set stored on first run.
pub async fn run(context: &Context, tabs: &Path) -> Result<()> {
    let host = load_tabs(tabs)?;
    let (handle, task) = context.spawn_workspace(host.clone());

    let outcome = handle.revert().await?;
    if outcome.close_skipped {
        tracing::warn!("Closing skipped: it would have closed every open tab");
    }

    let remaining: Vec<_> = host.query_tabs().await?.into_iter().map(|tab| tab.id).collect();
    let report = json!({
        "tabsUngrouped": outcome.tabs_ungrouped,
        "tabsClosed": outcome.tabs_closed,
        "remainingTabIds": remaining,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    stop(handle, task).await
}
