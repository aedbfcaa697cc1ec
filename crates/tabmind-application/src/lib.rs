//! Application layer for TabMind.
//!
//! Coordinates the core ports into the workspace pipeline: snapshot refresh,
//! clustering, cluster summaries, and the apply/revert reconciler.

pub mod cluster_summarizer;
pub mod clustering;
pub mod group_reconciler;
pub mod page_summarizer;
pub mod snapshot_cache;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use cluster_summarizer::ClusterSummarizer;
pub use clustering::ClusteringEngine;
pub use group_reconciler::{ApplyOutcome, GroupReconciler, RevertOutcome};
pub use page_summarizer::PageSummarizer;
pub use workspace::{WorkspaceHandle, WorkspacePorts, WorkspaceService};
