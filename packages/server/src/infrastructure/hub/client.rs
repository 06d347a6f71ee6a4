//! Connection proxy: the hub's view of one live session connection.

use tokio::sync::mpsc;

use crate::domain::{CampaignId, ConnectionId, UserId};

/// Receiving end of a proxy's outbound queue, drained by the connection's writer.
///
/// Yields `None` once the hub has dropped the proxy (unregistered or evicted).
pub type OutboundQueue = mpsc::Receiver<String>;

/// Why an enqueue onto a proxy failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// The queue is at capacity: the peer is not keeping up.
    Full,
    /// The writer has gone away.
    Closed,
}

/// One connection registered in a campaign room.
///
/// The proxy holds the only sender of its outbound queue, so dropping it closes the queue
/// and ends the connection's writer.
#[derive(Debug)]
pub struct ConnectionProxy {
    id: ConnectionId,
    campaign_id: CampaignId,
    user_id: UserId,
    outbound: mpsc::Sender<String>,
}

impl ConnectionProxy {
    /// Create a proxy and its outbound queue.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(
        campaign_id: CampaignId,
        user_id: UserId,
        capacity: usize,
    ) -> (Self, OutboundQueue) {
        let (outbound, queue) = mpsc::channel(capacity.max(1));
        let proxy = Self {
            id: ConnectionId::generate(),
            campaign_id,
            user_id,
            outbound,
        };
        (proxy, queue)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn campaign_id(&self) -> CampaignId {
        self.campaign_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Whether the connection's writer is still draining the queue.
    #[cfg(test)]
    pub fn is_alive(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Enqueue an encoded message without waiting.
    pub fn try_enqueue(&self, encoded: String) -> Result<(), EnqueueError> {
        self.outbound.try_send(encoded).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => EnqueueError::Full,
            mpsc::error::TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }
}
