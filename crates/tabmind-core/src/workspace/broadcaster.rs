use crate::error::Result;
use crate::workspace::event::WorkspaceEvent;

/// Fire-and-forget publication of workspace events.
///
/// There may be zero subscribers; implementations must treat that as a
/// successful publish. No delivery guarantee is made.
pub trait WorkspaceBroadcaster: Send + Sync {
    fn publish(&self, event: WorkspaceEvent) -> Result<()>;
}
