//! Workspace broadcaster over a tokio broadcast channel.

use tokio::sync::broadcast;

use tabmind_core::error::Result;
use tabmind_core::workspace::{WorkspaceBroadcaster, WorkspaceEvent};

/// Fans workspace events out to every current subscriber.
///
/// Delivery is best-effort: publishing with nobody listening succeeds, and a
/// subscriber that falls behind loses the oldest events.
#[derive(Debug, Clone)]
pub struct ChannelBroadcaster {
    sender: broadcast::Sender<WorkspaceEvent>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(16)
    }
}

impl WorkspaceBroadcaster for ChannelBroadcaster {
    fn publish(&self, event: WorkspaceEvent) -> Result<()> {
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!("[ChannelBroadcaster] Delivered update to {} listeners", receivers);
            }
            Err(_) => {
                tracing::debug!("[ChannelBroadcaster] No listeners for workspace update");
            }
        }
        Ok(())
    }
}
