//! Single-writer actor around [`WorkspaceService`].
//!
//! Every trigger and request is queued on one mpsc channel and handled by a
//! single task in arrival order, so analysis cycles never interleave.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use tabmind_core::cluster::Cluster;
use tabmind_core::config::OrchestratorConfig;
use tabmind_core::error::{Result, TabMindError};
use tabmind_core::tab::TabEvent;
use tabmind_core::workspace::{WorkspaceRequest, WorkspaceResponse, WorkspaceState};

use super::service::WorkspaceService;
use crate::group_reconciler::{ApplyOutcome, RevertOutcome};

enum WorkspaceCommand {
    TabEvent(TabEvent),
    Refresh {
        respond_to: oneshot::Sender<()>,
    },
    GetWorkspace {
        respond_to: oneshot::Sender<WorkspaceState>,
    },
    ApplyClusters {
        clusters: Vec<Cluster>,
        respond_to: oneshot::Sender<Result<ApplyOutcome>>,
    },
    Revert {
        respond_to: oneshot::Sender<Result<RevertOutcome>>,
    },
    Shutdown {
        respond_to: oneshot::Sender<()>,
    },
}

/// Cloneable front door to the workspace actor.
#[derive(Clone)]
pub struct WorkspaceHandle {
    sender: mpsc::Sender<WorkspaceCommand>,
}

impl WorkspaceHandle {
    /// Starts the actor task.
    ///
    /// The task loads persisted state, captures the original tabs and runs an
    /// initial cycle before it takes commands. It stops on
    /// [`shutdown`](Self::shutdown) or once every handle is dropped, releasing
    /// the language-model session either way.
    pub fn spawn(service: WorkspaceService, config: &OrchestratorConfig) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(config.command_queue_capacity.max(1));
        let actor = WorkspaceActor {
            service,
            receiver,
            coalesce: config.coalesce_tab_events,
            pending: None,
        };
        let task = tokio::spawn(actor.run());
        (Self { sender }, task)
    }

    async fn send(&self, command: WorkspaceCommand) -> Result<()> {
        self.sender
            .send(command)
            .await
            .map_err(|_| TabMindError::ChannelClosed("workspace actor stopped".to_string()))
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> WorkspaceCommand) -> Result<T> {
        let (respond_to, response) = oneshot::channel();
        self.send(make(respond_to)).await?;
        response
            .await
            .map_err(|_| TabMindError::ChannelClosed("workspace actor dropped the request".to_string()))
    }

    /// Queues a tab lifecycle event.
    pub async fn notify(&self, event: TabEvent) -> Result<()> {
        self.send(WorkspaceCommand::TabEvent(event)).await
    }

    /// Runs a cycle and returns once it has completed.
    pub async fn refresh(&self) -> Result<()> {
        self.request(|respond_to| WorkspaceCommand::Refresh { respond_to }).await
    }

    /// Snapshot of the current workspace state.
    pub async fn workspace(&self) -> Result<WorkspaceState> {
        self.request(|respond_to| WorkspaceCommand::GetWorkspace { respond_to })
            .await
    }

    pub async fn apply_clusters(&self, clusters: Vec<Cluster>) -> Result<ApplyOutcome> {
        self.request(|respond_to| WorkspaceCommand::ApplyClusters {
            clusters,
            respond_to,
        })
        .await?
    }

    pub async fn revert(&self) -> Result<RevertOutcome> {
        self.request(|respond_to| WorkspaceCommand::Revert { respond_to })
            .await?
    }

    /// Answers a request from the external request surface.
    ///
    /// Only `GET_WORKSPACE` carries state; everything else is acknowledged.
    pub async fn handle_request(&self, request: WorkspaceRequest) -> WorkspaceResponse {
        match request {
            WorkspaceRequest::GetWorkspace => match self.workspace().await {
                Ok(data) => WorkspaceResponse::Workspace { data },
                Err(e) => WorkspaceResponse::failed(e.to_string()),
            },
            WorkspaceRequest::RefreshAnalysis => WorkspaceResponse::from_result(self.refresh().await),
            WorkspaceRequest::ApplyClusters { clusters } => {
                WorkspaceResponse::from_result(self.apply_clusters(clusters).await.map(|_| ()))
            }
            WorkspaceRequest::RevertTabs => {
                WorkspaceResponse::from_result(self.revert().await.map(|_| ()))
            }
        }
    }

    /// Stops the actor after the commands queued before this one.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|respond_to| WorkspaceCommand::Shutdown { respond_to })
            .await
    }
}

struct WorkspaceActor {
    service: WorkspaceService,
    receiver: mpsc::Receiver<WorkspaceCommand>,
    coalesce: bool,
    /// A command found while draining a burst of tab events.
    pending: Option<WorkspaceCommand>,
}

impl WorkspaceActor {
    async fn run(mut self) {
        self.service.initialize().await;
        self.service.run_analysis_cycle().await;

        loop {
            let command = match self.pending.take() {
                Some(command) => command,
                None => match self.receiver.recv().await {
                    Some(command) => command,
                    None => break,
                },
            };

            match command {
                WorkspaceCommand::TabEvent(event) => self.on_tab_event(event).await,
                WorkspaceCommand::Refresh { respond_to } => {
                    self.service.run_analysis_cycle().await;
                    let _ = respond_to.send(());
                }
                WorkspaceCommand::GetWorkspace { respond_to } => {
                    let _ = respond_to.send(self.service.state().clone());
                }
                WorkspaceCommand::ApplyClusters {
                    clusters,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.service.apply_clusters(&clusters).await);
                }
                WorkspaceCommand::Revert { respond_to } => {
                    let _ = respond_to.send(self.service.revert().await);
                }
                WorkspaceCommand::Shutdown { respond_to } => {
                    self.service.shutdown().await;
                    let _ = respond_to.send(());
                    return;
                }
            }
        }

        tracing::debug!("[WorkspaceActor] All handles dropped");
        self.service.shutdown().await;
    }

    async fn on_tab_event(&mut self, event: TabEvent) {
        if !event.triggers_analysis() {
            return;
        }
        tracing::debug!("[WorkspaceActor] Tab {} changed, analyzing", event.tab_id());

        if self.coalesce {
            let absorbed = self.drain_tab_events();
            if absorbed > 0 {
                tracing::debug!(
                    "[WorkspaceActor] Coalesced {} queued tab events into one cycle",
                    absorbed
                );
            }
        }

        self.service.run_analysis_cycle().await;
    }

    /// Takes every tab event already queued, stopping at the first other
    /// command, which is kept for the next turn of the loop.
    fn drain_tab_events(&mut self) -> usize {
        let mut absorbed = 0;
        while let Ok(command) = self.receiver.try_recv() {
            match command {
                WorkspaceCommand::TabEvent(_) => absorbed += 1,
                other => {
                    self.pending = Some(other);
                    break;
                }
            }
        }
        absorbed
    }
}
