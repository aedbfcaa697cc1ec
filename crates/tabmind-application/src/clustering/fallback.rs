//! Hostname-based clustering used whenever the language model cannot help.

use std::collections::HashMap;
use url::Url;

use tabmind_core::cluster::Cluster;
use tabmind_core::tab::{TabId, TabInfo};

/// Host of `raw` with a leading `www.` removed.
///
/// Returns `None` for URLs that do not parse or carry no host.
pub fn normalized_hostname(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str().filter(|host| !host.is_empty())?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Groups tabs by normalized hostname.
///
/// One cluster per distinct hostname, in first-seen order, named after the
/// hostname and described as `Tabs from {hostname}`. Tabs without a usable
/// host belong to no cluster.
pub fn cluster_by_hostname(tab_info: &[TabInfo]) -> Vec<Cluster> {
    let mut order: Vec<(String, Vec<TabId>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tab in tab_info {
        let Some(host) = normalized_hostname(&tab.url) else {
            continue;
        };
        match index.get(&host) {
            Some(&slot) => order[slot].1.push(tab.id),
            None => {
                index.insert(host.clone(), order.len());
                order.push((host, vec![tab.id]));
            }
        }
    }

    order
        .into_iter()
        .map(|(host, tab_ids)| {
            let description = format!("Tabs from {}", host);
            Cluster::new(host, description, tab_ids)
        })
        .collect()
}
