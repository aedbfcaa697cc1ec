//! Hand-written port fakes shared by the unit tests of this crate.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tabmind_core::ai::{
    Availability, LanguageModel, LanguageModelConfig, LanguageModelSession, SummarizerBackend,
    SummarizerOptions, SummarizerSession,
};
use tabmind_core::content::PageContentProbe;
use tabmind_core::error::{Result, TabMindError};
use tabmind_core::storage::KeyValueStore;
use tabmind_core::tab::{GroupColor, GroupId, GroupUpdate, LiveTab, TabGroup, TabHost, TabId};
use tabmind_core::workspace::{WorkspaceBroadcaster, WorkspaceEvent};

pub fn tab(id: i64, url: &str) -> LiveTab {
    LiveTab::new(id, format!("Tab {}", id), url)
}

pub fn ids(values: &[i64]) -> Vec<TabId> {
    values.iter().copied().map(TabId).collect()
}

// ============================================================================
// Tab host
// ============================================================================

#[derive(Default)]
struct HostState {
    tabs: Vec<LiveTab>,
    groups: BTreeMap<i64, (TabGroup, Vec<TabId>)>,
    next_group_id: i64,
    closed: Vec<TabId>,
    failing_tabs: HashSet<TabId>,
    fail_queries: bool,
}

/// In-memory tab strip with visual groups.
#[derive(Default)]
pub struct FakeTabHost {
    state: Mutex<HostState>,
}

impl FakeTabHost {
    pub fn new(tabs: Vec<LiveTab>) -> Self {
        Self {
            state: Mutex::new(HostState {
                tabs,
                next_group_id: 100,
                ..HostState::default()
            }),
        }
    }

    pub fn set_tabs(&self, tabs: Vec<LiveTab>) {
        self.state.lock().unwrap().tabs = tabs;
    }

    /// Pre-existing group, as if the user had grouped tabs by hand.
    pub fn add_group(&self, title: &str, tab_ids: Vec<TabId>) -> GroupId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_group_id;
        state.next_group_id += 1;
        let group = TabGroup {
            id: GroupId(id),
            title: title.to_string(),
            color: GroupColor::Grey,
            collapsed: true,
        };
        state.groups.insert(id, (group, tab_ids));
        GroupId(id)
    }

    /// Any `group` call containing `tab_id` fails.
    pub fn fail_grouping_of(&self, tab_id: TabId) {
        self.state.lock().unwrap().failing_tabs.insert(tab_id);
    }

    pub fn fail_queries(&self) {
        self.state.lock().unwrap().fail_queries = true;
    }

    /// Non-empty groups with their members.
    pub fn groups(&self) -> Vec<(TabGroup, Vec<TabId>)> {
        let state = self.state.lock().unwrap();
        state
            .groups
            .values()
            .filter(|(_, members)| !members.is_empty())
            .cloned()
            .collect()
    }

    pub fn closed(&self) -> Vec<TabId> {
        self.state.lock().unwrap().closed.clone()
    }

    pub fn live_ids(&self) -> Vec<TabId> {
        self.state.lock().unwrap().tabs.iter().map(|t| t.id).collect()
    }
}

#[async_trait]
impl TabHost for FakeTabHost {
    async fn query_tabs(&self) -> Result<Vec<LiveTab>> {
        let state = self.state.lock().unwrap();
        if state.fail_queries {
            return Err(TabMindError::host("tab query rejected"));
        }
        Ok(state.tabs.clone())
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<Option<LiveTab>> {
        let state = self.state.lock().unwrap();
        Ok(state.tabs.iter().find(|t| t.id == tab_id).cloned())
    }

    async fn query_groups(&self) -> Result<Vec<TabGroup>> {
        let state = self.state.lock().unwrap();
        if state.fail_queries {
            return Err(TabMindError::host("group query rejected"));
        }
        Ok(state.groups.values().map(|(g, _)| g.clone()).collect())
    }

    async fn tabs_in_group(&self, group_id: GroupId) -> Result<Vec<TabId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .get(&group_id.0)
            .map(|(_, members)| members.clone())
            .unwrap_or_default())
    }

    async fn ungroup(&self, tab_ids: &[TabId]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        for (_, members) in state.groups.values_mut() {
            members.retain(|id| !tab_ids.contains(id));
        }
        state.groups.retain(|_, (_, members)| !members.is_empty());
        Ok(())
    }

    async fn group(&self, tab_ids: &[TabId]) -> Result<GroupId> {
        let mut state = self.state.lock().unwrap();
        if tab_ids.iter().any(|id| state.failing_tabs.contains(id)) {
            return Err(TabMindError::host("cannot group pinned tab"));
        }
        // A tab lives in at most one group; regrouping moves it.
        for (_, members) in state.groups.values_mut() {
            members.retain(|id| !tab_ids.contains(id));
        }
        let id = state.next_group_id;
        state.next_group_id += 1;
        let group = TabGroup {
            id: GroupId(id),
            title: String::new(),
            color: GroupColor::Grey,
            collapsed: true,
        };
        state.groups.retain(|_, (_, members)| !members.is_empty());
        state.groups.insert(id, (group, tab_ids.to_vec()));
        Ok(GroupId(id))
    }

    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let (group, _) = state
            .groups
            .get_mut(&group_id.0)
            .ok_or_else(|| TabMindError::not_found("TabGroup", group_id.0.to_string()))?;
        group.title = update.title;
        group.color = update.color;
        group.collapsed = update.collapsed;
        Ok(())
    }

    async fn close_tabs(&self, tab_ids: &[TabId]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.tabs.retain(|t| !tab_ids.contains(&t.id));
        state.closed.extend_from_slice(tab_ids);
        Ok(())
    }
}

// ============================================================================
// Language model
// ============================================================================

type Responder = dyn Fn(&LanguageModelConfig, &str) -> Result<String> + Send + Sync;

#[derive(Default)]
pub struct SessionCounters {
    pub created: AtomicUsize,
    pub destroyed: AtomicUsize,
    pub open: AtomicUsize,
    pub max_open: AtomicUsize,
    pub prompts: AtomicUsize,
    /// (open, peak) per system prompt.
    pub by_prompt: Mutex<HashMap<String, (usize, usize)>>,
}

/// Scriptable language model that tracks session lifetimes.
///
/// The responder sees the session configuration, so one fake can answer both
/// clustering and cluster-summary sessions differently.
pub struct FakeLanguageModel {
    availability: Mutex<Availability>,
    responder: Arc<Responder>,
    counters: Arc<SessionCounters>,
    configs: Mutex<Vec<LanguageModelConfig>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeLanguageModel {
    pub fn new<F>(availability: Availability, responder: F) -> Self
    where
        F: Fn(&LanguageModelConfig, &str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            availability: Mutex::new(availability),
            responder: Arc::new(responder),
            counters: Arc::new(SessionCounters::default()),
            configs: Mutex::new(Vec::new()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(Availability::No, |_, _| {
            Err(TabMindError::backend("model is not available"))
        })
    }

    /// Answers every prompt with the same text.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(Availability::Readily, move |_, _| Ok(text.clone()))
    }

    pub fn set_availability(&self, availability: Availability) {
        *self.availability.lock().unwrap() = availability;
    }

    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.counters.destroyed.load(Ordering::SeqCst)
    }

    pub fn open(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.counters.max_open.load(Ordering::SeqCst)
    }

    /// Peak number of simultaneously open sessions whose system prompt
    /// starts with `prefix`.
    pub fn max_open_with_prompt(&self, prefix: &str) -> usize {
        let by_prompt = self.counters.by_prompt.lock().unwrap();
        by_prompt
            .iter()
            .filter(|(prompt, _)| prompt.starts_with(prefix))
            .map(|(_, (_, peak))| *peak)
            .max()
            .unwrap_or(0)
    }

    pub fn prompt_count(&self) -> usize {
        self.counters.prompts.load(Ordering::SeqCst)
    }

    pub fn configs(&self) -> Vec<LanguageModelConfig> {
        self.configs.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn availability(&self) -> Result<Availability> {
        Ok(*self.availability.lock().unwrap())
    }

    async fn create_session(
        &self,
        config: LanguageModelConfig,
    ) -> Result<Box<dyn LanguageModelSession>> {
        self.configs.lock().unwrap().push(config.clone());
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        let open = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open.fetch_max(open, Ordering::SeqCst);
        {
            let mut by_prompt = self.counters.by_prompt.lock().unwrap();
            let (open, peak) = by_prompt.entry(config.system_prompt.clone()).or_default();
            *open += 1;
            *peak = (*peak).max(*open);
        }

        Ok(Box::new(FakeSession {
            config,
            responder: self.responder.clone(),
            counters: self.counters.clone(),
            prompts: self.prompts.clone(),
        }))
    }
}

struct FakeSession {
    config: LanguageModelConfig,
    responder: Arc<Responder>,
    counters: Arc<SessionCounters>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LanguageModelSession for FakeSession {
    async fn prompt(&self, text: &str) -> Result<String> {
        self.counters.prompts.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(text.to_string());
        (self.responder)(&self.config, text)
    }

    async fn destroy(&self) -> Result<()> {
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
        if let Some((open, _)) = self
            .counters
            .by_prompt
            .lock()
            .unwrap()
            .get_mut(&self.config.system_prompt)
        {
            *open -= 1;
        }
        Ok(())
    }
}

// ============================================================================
// Summarizer backend and page content
// ============================================================================

pub struct FakeSummarizer {
    inner: Arc<SummarizerState>,
}

struct SummarizerState {
    availability: Availability,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeSummarizer {
    fn build(availability: Availability, fail: bool) -> Self {
        Self {
            inner: Arc::new(SummarizerState {
                availability,
                fail,
                calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn ready() -> Self {
        Self::build(Availability::Readily, false)
    }

    pub fn unavailable() -> Self {
        Self::build(Availability::AfterDownload, false)
    }

    pub fn failing() -> Self {
        Self::build(Availability::Readily, true)
    }

    /// Number of `summarize` calls made on any session.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummarizerBackend for FakeSummarizer {
    async fn availability(&self) -> Result<Availability> {
        Ok(self.inner.availability)
    }

    async fn create_session(
        &self,
        _options: SummarizerOptions,
    ) -> Result<Box<dyn SummarizerSession>> {
        Ok(Box::new(FakeSummarizerSession {
            state: self.inner.clone(),
        }))
    }
}

struct FakeSummarizerSession {
    state: Arc<SummarizerState>,
}

#[async_trait]
impl SummarizerSession for FakeSummarizerSession {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail {
            return Err(TabMindError::backend("summarizer quota exceeded"));
        }
        let words: Vec<&str> = text.split_whitespace().take(4).collect();
        Ok(format!("  About {}.  ", words.join(" ")))
    }

    async fn destroy(&self) -> Result<()> {
        Ok(())
    }
}

/// Page text per tab; tabs without an entry fail extraction.
#[derive(Default)]
pub struct FakeContentProbe {
    pages: Mutex<HashMap<TabId, String>>,
    calls: AtomicUsize,
}

impl FakeContentProbe {
    pub fn with_page(self, tab_id: i64, text: &str) -> Self {
        self.pages.lock().unwrap().insert(TabId(tab_id), text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageContentProbe for FakeContentProbe {
    async fn visible_text(&self, tab_id: TabId, max_chars: usize) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pages = self.pages.lock().unwrap();
        let text = pages
            .get(&tab_id)
            .ok_or_else(|| TabMindError::host(format!("cannot inject into tab {}", tab_id)))?;
        Ok(text.chars().take(max_chars).collect())
    }
}

/// Text long enough to pass the minimum page-text threshold.
pub fn long_text(topic: &str) -> String {
    format!("{} ", topic).repeat(40)
}

// ============================================================================
// Store and broadcaster
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    fail_writes: bool,
    failing_reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Fails the next `count` reads.
    pub fn failing_reads(self, count: usize) -> Self {
        self.failing_reads.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.values.lock().unwrap().insert(key.to_string(), value);
        self
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let failed = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(TabMindError::data_access("storage temporarily unavailable"));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(TabMindError::data_access("storage quota exceeded"));
        }
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<WorkspaceEvent>>,
}

impl RecordingBroadcaster {
    pub fn events(&self) -> Vec<WorkspaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl WorkspaceBroadcaster for RecordingBroadcaster {
    fn publish(&self, event: WorkspaceEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
