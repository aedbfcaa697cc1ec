//! Workspace orchestration: the analysis cycle and the actor that serializes it.

mod handle;
mod service;

pub use handle::WorkspaceHandle;
pub use service::{WorkspacePorts, WorkspaceService};
