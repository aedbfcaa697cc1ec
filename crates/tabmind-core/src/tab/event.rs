use serde::{Deserialize, Serialize};

use super::model::TabId;

/// Page load status carried by an update event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Complete,
}

/// Tab lifecycle events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TabEvent {
    Created { tab_id: TabId },
    Updated { tab_id: TabId, status: LoadStatus },
    Removed { tab_id: TabId },
    Activated { tab_id: TabId },
}

impl TabEvent {
    /// Whether this event should start an analysis cycle.
    ///
    /// Updates only count once the page has finished loading.
    pub fn triggers_analysis(&self) -> bool {
        match self {
            TabEvent::Updated { status, .. } => *status == LoadStatus::Complete,
            TabEvent::Created { .. } | TabEvent::Removed { .. } | TabEvent::Activated { .. } => {
                true
            }
        }
    }

    pub fn tab_id(&self) -> TabId {
        match self {
            TabEvent::Created { tab_id }
            | TabEvent::Updated { tab_id, .. }
            | TabEvent::Removed { tab_id }
            | TabEvent::Activated { tab_id } => *tab_id,
        }
    }
}
