//! Tab host trait definition.
//!
//! The `TabHost` is the boundary to the browser: it enumerates live tabs and
//! performs the visual grouping operations the group reconciler needs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use super::model::{LiveTab, TabId};
use crate::error::Result;

/// Host-assigned identifier of a visual tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

/// Colors a visual group can take.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl GroupColor {
    /// Fixed palette cycled through by cluster index.
    pub const PALETTE: [GroupColor; 9] = [
        GroupColor::Grey,
        GroupColor::Blue,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Green,
        GroupColor::Pink,
        GroupColor::Purple,
        GroupColor::Cyan,
        GroupColor::Orange,
    ];

    /// Color assigned to the cluster at `index`.
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

/// Properties applied to a freshly created group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub title: String,
    pub color: GroupColor,
    pub collapsed: bool,
}

/// A visual group as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    #[serde(default)]
    pub title: String,
    pub color: GroupColor,
    #[serde(default)]
    pub collapsed: bool,
}

/// Browser tab enumeration and visual grouping.
///
/// Every method is a suspension point and may fail independently; callers
/// decide whether a failure is isolated or aborts the operation.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Lists every live tab, host-wide.
    async fn query_tabs(&self) -> Result<Vec<LiveTab>>;

    /// Looks up a single tab. Returns `Ok(None)` when the tab no longer exists.
    async fn get_tab(&self, tab_id: TabId) -> Result<Option<LiveTab>>;

    /// Lists every visual group, host-wide.
    async fn query_groups(&self) -> Result<Vec<TabGroup>>;

    /// Lists the tabs currently in `group_id`.
    async fn tabs_in_group(&self, group_id: GroupId) -> Result<Vec<TabId>>;

    /// Removes the given tabs from whatever group they are in.
    async fn ungroup(&self, tab_ids: &[TabId]) -> Result<()>;

    /// Creates a new group containing `tab_ids` and returns its id.
    async fn group(&self, tab_ids: &[TabId]) -> Result<GroupId>;

    /// Updates the label, color and collapsed state of a group.
    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<()>;

    /// Closes the given tabs.
    async fn close_tabs(&self, tab_ids: &[TabId]) -> Result<()>;
}
