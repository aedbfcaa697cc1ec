//! Parsing of free-form language-model output into clusters.
//!
//! Models wrap their JSON in prose or markdown fences, invent ids and repeat
//! themselves. Everything here is lenient about the envelope and strict about
//! the ids.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use tabmind_core::cluster::Cluster;
use tabmind_core::error::{Result, TabMindError};
use tabmind_core::tab::{TabId, TabInfo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCluster {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tab_ids: Vec<Value>,
}

/// Every well-formed JSON array that starts somewhere in `text`, in order of
/// their opening bracket.
fn json_arrays(text: &str) -> impl Iterator<Item = Vec<Value>> + '_ {
    text.match_indices('[').filter_map(move |(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Array(items))) => Some(items),
            _ => None,
        }
    })
}

/// First well-formed JSON array embedded in `text`.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    json_arrays(text).next()
}

/// Ids arrive as numbers, or as numeric strings from sloppier models.
fn tab_id_of(value: &Value) -> Option<TabId> {
    match value {
        Value::Number(n) => n.as_i64().map(TabId),
        Value::String(s) => s.trim().parse::<i64>().ok().map(TabId),
        _ => None,
    }
}

/// Parses a model response into clusters over `tab_info`.
///
/// The first embedded array shaped like a cluster list wins. Ids that are not
/// in `tab_info` are dropped, as are repeats inside one cluster; clusters left
/// without ids are dropped. Overlap between clusters is kept.
///
/// Fails when no cluster list is found, or when nothing usable remains while
/// there were tabs to cluster.
pub fn parse_clusters(text: &str, tab_info: &[TabInfo]) -> Result<Vec<Cluster>> {
    let raw: Vec<RawCluster> = json_arrays(text)
        .find_map(|items| serde_json::from_value(Value::Array(items)).ok())
        .ok_or_else(|| TabMindError::backend("response contains no cluster list"))?;

    let known: HashSet<TabId> = tab_info.iter().map(|t| t.id).collect();

    let clusters: Vec<Cluster> = raw
        .into_iter()
        .filter_map(|raw| {
            let mut seen = HashSet::new();
            let tab_ids: Vec<TabId> = raw
                .tab_ids
                .iter()
                .filter_map(tab_id_of)
                .filter(|id| known.contains(id) && seen.insert(*id))
                .collect();
            if tab_ids.is_empty() {
                return None;
            }
            Some(Cluster::new(raw.name.trim(), raw.description.trim(), tab_ids))
        })
        .collect();

    if clusters.is_empty() && !tab_info.is_empty() {
        return Err(TabMindError::backend("response references none of the tabs"));
    }
    Ok(clusters)
}
