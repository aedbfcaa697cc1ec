pub mod broadcaster;
pub mod event;
pub mod model;
pub mod snapshot;

pub use broadcaster::WorkspaceBroadcaster;
pub use event::{WorkspaceEvent, WorkspaceRequest, WorkspaceResponse};
pub use model::WorkspaceState;
pub use snapshot::SnapshotCache;
