//! Messages exchanged with the workspace surface.
//!
//! Type tags keep the wire names used by the side panel.

use serde::{Deserialize, Serialize};

use super::model::WorkspaceState;
use crate::cluster::Cluster;
use crate::error::Result;

/// Notification published after every analysis cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceEvent {
    WorkspaceUpdated { data: WorkspaceState },
}

/// Requests accepted from the external request surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceRequest {
    GetWorkspace,
    RefreshAnalysis,
    ApplyClusters { clusters: Vec<Cluster> },
    RevertTabs,
}

/// Response to a [`WorkspaceRequest`].
///
/// Only `GET_WORKSPACE` carries state; everything else is an acknowledgement
/// and the new state arrives through the broadcast channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceResponse {
    Workspace {
        data: WorkspaceState,
    },
    Ack {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl WorkspaceResponse {
    pub fn ok() -> Self {
        Self::Ack {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Ack {
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Workspace { .. } => true,
            Self::Ack { success, .. } => *success,
        }
    }
}
