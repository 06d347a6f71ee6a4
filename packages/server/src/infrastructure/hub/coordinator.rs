//! Session hub: the single coordinator that owns the room registry.
//!
//! ## 設計ノート
//!
//! Every operation (register, unregister, broadcast, count) is a command on one
//! unbounded intake consumed by one coordinator task. Commands are applied strictly in
//! arrival order, so broadcasts to a room are delivered in the order they were issued and
//! a count observed after a broadcast already reflects its evictions.

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{CampaignId, ConnectionId, SessionBroadcaster, SessionMessage};

use super::{client::ConnectionProxy, registry::Registry};

/// Errors for commands that need the coordinator to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("session hub is not running")]
    Stopped,
}

enum HubCommand {
    Register(ConnectionProxy),
    Unregister {
        campaign_id: CampaignId,
        connection_id: ConnectionId,
    },
    Broadcast(SessionMessage),
    CountInRoom {
        campaign_id: CampaignId,
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// Handle to the running hub. Cheap to clone; every clone talks to the same coordinator.
#[derive(Debug, Clone)]
pub struct SessionHub {
    intake: mpsc::UnboundedSender<HubCommand>,
}

impl std::fmt::Debug for HubCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubCommand::Register(proxy) => write!(f, "Register({})", proxy.id()),
            HubCommand::Unregister { connection_id, .. } => {
                write!(f, "Unregister({})", connection_id)
            }
            HubCommand::Broadcast(message) => {
                write!(f, "Broadcast({})", message.message_type().as_str())
            }
            HubCommand::CountInRoom { campaign_id, .. } => write!(f, "CountInRoom({})", campaign_id),
            HubCommand::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl SessionHub {
    /// Spawn the coordinator task and return a handle to it.
    ///
    /// The returned `JoinHandle` completes after [`SessionHub::shutdown`] has been processed.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (intake, commands) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_coordinator(commands));
        tracing::info!("Session hub started");
        (Self { intake }, task)
    }

    /// Add a connection to its campaign room.
    pub fn register(&self, proxy: ConnectionProxy) -> Result<(), HubError> {
        self.send(HubCommand::Register(proxy))
    }

    /// Remove a connection from its room. Safe to call more than once.
    pub fn unregister(&self, campaign_id: CampaignId, connection_id: ConnectionId) {
        if self
            .send(HubCommand::Unregister {
                campaign_id,
                connection_id,
            })
            .is_err()
        {
            tracing::debug!(
                "Session hub stopped; connection {} already released",
                connection_id
            );
        }
    }

    /// Queue a message for every connection in its campaign room.
    pub fn broadcast(&self, message: SessionMessage) {
        let message_type = message.message_type();
        if self.send(HubCommand::Broadcast(message)).is_err() {
            tracing::debug!(
                "Session hub stopped; dropping {} event",
                message_type.as_str()
            );
        }
    }

    /// Number of connections currently in the campaign's room.
    ///
    /// Advisory: the value may be stale as soon as it is returned.
    pub async fn count_in_room(&self, campaign_id: CampaignId) -> Result<usize, HubError> {
        let (reply, answer) = oneshot::channel();
        self.send(HubCommand::CountInRoom { campaign_id, reply })?;
        answer.await.map_err(|_| HubError::Stopped)
    }

    /// Stop the coordinator. All rooms are dropped and every outbound queue is closed.
    pub fn shutdown(&self) {
        if self.send(HubCommand::Shutdown).is_err() {
            tracing::debug!("Session hub already stopped");
        }
    }

    fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.intake.send(command).map_err(|_| HubError::Stopped)
    }
}

impl SessionBroadcaster for SessionHub {
    fn broadcast(&self, message: SessionMessage) {
        SessionHub::broadcast(self, message);
    }
}

async fn run_coordinator(mut commands: mpsc::UnboundedReceiver<HubCommand>) {
    let mut registry = Registry::new();

    while let Some(command) = commands.recv().await {
        tracing::trace!("Hub command: {:?}", command);
        match command {
            HubCommand::Register(proxy) => {
                let connection_id = proxy.id();
                if !registry.register(proxy) {
                    tracing::warn!("Connection {} is already registered", connection_id);
                }
            }
            HubCommand::Unregister {
                campaign_id,
                connection_id,
            } => {
                registry.unregister(campaign_id, connection_id);
            }
            HubCommand::Broadcast(message) => {
                registry.broadcast(&message);
            }
            HubCommand::CountInRoom { campaign_id, reply } => {
                // The caller may have given up waiting.
                let _ = reply.send(registry.count_in_room(campaign_id));
            }
            HubCommand::Shutdown => break,
        }
    }

    commands.close();
    registry.clear();
    tracing::info!("Session hub stopped");
}
