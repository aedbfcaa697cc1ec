//! Cluster domain model.

use serde::{Deserialize, Serialize};

use crate::tab::TabId;

/// A named topical group of tabs.
///
/// Clusters produced by a language model are not guaranteed to be disjoint:
/// the same tab id may appear in several clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Category label, also used as the visual group title.
    pub name: String,
    /// One sentence describing the cluster.
    #[serde(default)]
    pub description: String,
    /// Member tabs, in the order they were assigned.
    #[serde(default)]
    pub tab_ids: Vec<TabId>,
    /// One-line human summary, filled by the cluster summarizer.
    #[serde(default)]
    pub summary: String,
}

impl Cluster {
    pub fn new(name: impl Into<String>, description: impl Into<String>, tab_ids: Vec<TabId>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tab_ids,
            summary: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tab_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab_ids.is_empty()
    }
}
