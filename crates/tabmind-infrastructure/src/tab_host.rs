//! Tab host backed by an in-memory tab strip.
//!
//! Used by the CLI to run the pipeline against a JSON fixture of tabs, and
//! handy anywhere a real browser is not at hand.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::Mutex;

use tabmind_core::content::PageContentProbe;
use tabmind_core::error::{Result, TabMindError};
use tabmind_core::tab::{GroupColor, GroupId, GroupUpdate, LiveTab, TabGroup, TabHost, TabId};

/// One tab of a fixture file, optionally with its visible page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabFixture {
    #[serde(flatten)]
    pub tab: LiveTab,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Default)]
struct Strip {
    tabs: Vec<TabFixture>,
    groups: BTreeMap<i64, (TabGroup, Vec<TabId>)>,
    next_group_id: i64,
}

impl Strip {
    fn detach(&mut self, tab_ids: &[TabId]) {
        for (_, members) in self.groups.values_mut() {
            members.retain(|id| !tab_ids.contains(id));
        }
        // Hosts drop a group once its last tab leaves.
        self.groups.retain(|_, (_, members)| !members.is_empty());
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTabHost {
    strip: Mutex<Strip>,
}

impl InMemoryTabHost {
    pub fn new(tabs: Vec<TabFixture>) -> Self {
        Self {
            strip: Mutex::new(Strip {
                tabs,
                groups: BTreeMap::new(),
                next_group_id: 1,
            }),
        }
    }

    /// Parses a JSON array of tabs: `[{"id": 1, "title": "...", "url": "...", "text": "..."}]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let tabs: Vec<TabFixture> = serde_json::from_str(json)?;
        Ok(Self::new(tabs))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Current groups with their members, in creation order.
    pub async fn groups(&self) -> Vec<(TabGroup, Vec<TabId>)> {
        self.strip.lock().await.groups.values().cloned().collect()
    }
}

#[async_trait]
impl TabHost for InMemoryTabHost {
    async fn query_tabs(&self) -> Result<Vec<LiveTab>> {
        let strip = self.strip.lock().await;
        Ok(strip.tabs.iter().map(|fixture| fixture.tab.clone()).collect())
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<Option<LiveTab>> {
        let strip = self.strip.lock().await;
        Ok(strip
            .tabs
            .iter()
            .find(|fixture| fixture.tab.id == tab_id)
            .map(|fixture| fixture.tab.clone()))
    }

    async fn query_groups(&self) -> Result<Vec<TabGroup>> {
        let strip = self.strip.lock().await;
        Ok(strip.groups.values().map(|(group, _)| group.clone()).collect())
    }

    async fn tabs_in_group(&self, group_id: GroupId) -> Result<Vec<TabId>> {
        let strip = self.strip.lock().await;
        strip
            .groups
            .get(&group_id.0)
            .map(|(_, members)| members.clone())
            .ok_or_else(|| TabMindError::not_found("TabGroup", group_id.0.to_string()))
    }

    async fn ungroup(&self, tab_ids: &[TabId]) -> Result<()> {
        self.strip.lock().await.detach(tab_ids);
        Ok(())
    }

    async fn group(&self, tab_ids: &[TabId]) -> Result<GroupId> {
        let mut strip = self.strip.lock().await;
        if let Some(missing) = tab_ids
            .iter()
            .find(|id| !strip.tabs.iter().any(|fixture| fixture.tab.id == **id))
        {
            return Err(TabMindError::host(format!("No tab with id {}", missing)));
        }

        strip.detach(tab_ids);
        let id = strip.next_group_id;
        strip.next_group_id += 1;
        let group = TabGroup {
            id: GroupId(id),
            title: String::new(),
            color: GroupColor::Grey,
            collapsed: false,
        };
        strip.groups.insert(id, (group, tab_ids.to_vec()));
        Ok(GroupId(id))
    }

    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<()> {
        let mut strip = self.strip.lock().await;
        let (group, _) = strip
            .groups
            .get_mut(&group_id.0)
            .ok_or_else(|| TabMindError::not_found("TabGroup", group_id.0.to_string()))?;
        group.title = update.title;
        group.color = update.color;
        group.collapsed = update.collapsed;
        Ok(())
    }

    async fn close_tabs(&self, tab_ids: &[TabId]) -> Result<()> {
        let mut strip = self.strip.lock().await;
        strip.detach(tab_ids);
        strip.tabs.retain(|fixture| !tab_ids.contains(&fixture.tab.id));
        Ok(())
    }
}

#[async_trait]
impl PageContentProbe for InMemoryTabHost {
    async fn visible_text(&self, tab_id: TabId, max_chars: usize) -> Result<String> {
        let strip = self.strip.lock().await;
        let fixture = strip
            .tabs
            .iter()
            .find(|fixture| fixture.tab.id == tab_id)
            .ok_or_else(|| TabMindError::not_found("Tab", tab_id.to_string()))?;
        Ok(fixture
            .text
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(max_chars)
            .collect())
    }
}
