//! Clustering of tabs into named topical groups.
//!
//! [`ClusteringEngine`] asks the on-device language model first and falls
//! back to [`cluster_by_hostname`] whenever the model cannot answer.

mod engine;
mod fallback;
mod response;

pub use engine::ClusteringEngine;
pub use fallback::{cluster_by_hostname, normalized_hostname};
pub use response::{extract_json_array, parse_clusters};
