use anyhow::Result;
use std::path::Path;

use super::{Context, load_tabs, stop};

/// Initializes the workspace, which runs one cycle, and prints its clusters.
pub async fn run(context: &Context, tabs: &Path) -> Result<()> {
    let host = load_tabs(tabs)?;
    let (handle, task) = context.spawn_workspace(host);

    let state = handle.workspace().await?;
    println!("{}", serde_json::to_string_pretty(&state.clusters)?);

    stop(handle, task).await
}
