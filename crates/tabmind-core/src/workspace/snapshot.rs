//! Snapshot cache of tab descriptors.
//!
//! The cache is a cumulative history of every tab seen, keyed by tab id.
//! Entries for closed tabs are kept so clusters that still reference them
//! remain displayable until the next cycle replaces those clusters.
//!
//! # Serialization
//!
//! The mapping is persisted as an ordered sequence of `[id, descriptor]`
//! pairs, sorted by id. Loading rebuilds the mapping from that sequence; a
//! repeated id keeps the last descriptor.

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tab::{LiveTab, TabDescriptor, TabId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotCache {
    entries: BTreeMap<TabId, TabDescriptor>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tab_id: TabId) -> Option<&TabDescriptor> {
        self.entries.get(&tab_id)
    }

    /// Stores a descriptor, replacing any previous entry for the same id.
    pub fn insert(&mut self, descriptor: TabDescriptor) {
        self.entries.insert(descriptor.id, descriptor);
    }

    /// Whether the cached entry for `tab` is missing or points at another URL.
    pub fn is_stale(&self, tab: &LiveTab) -> bool {
        match self.entries.get(&tab.id) {
            Some(cached) => cached.url != tab.url,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabDescriptor> {
        self.entries.values()
    }

    pub fn tab_ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.entries.keys().copied()
    }

    /// Converts the mapping into its persisted pair form.
    pub fn to_pairs(&self) -> Vec<(TabId, TabDescriptor)> {
        self.entries
            .iter()
            .map(|(id, descriptor)| (*id, descriptor.clone()))
            .collect()
    }
}

impl FromIterator<(TabId, TabDescriptor)> for SnapshotCache {
    fn from_iter<I: IntoIterator<Item = (TabId, TabDescriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for SnapshotCache {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for pair in &self.entries {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SnapshotCache {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = Vec::<(TabId, TabDescriptor)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
