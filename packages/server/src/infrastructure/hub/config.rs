//! Tuning for session connections.

use std::time::Duration;

/// Capacity of each connection's outbound queue.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;
/// Time allowed to write one frame to the peer.
pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(10);
/// Time allowed between two frames from the peer before the connection is dropped.
pub const DEFAULT_PONG_WAIT: Duration = Duration::from_secs(60);
/// Largest inbound frame accepted from the peer, in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;

/// Per-connection limits and keep-alive timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub outbound_capacity: usize,
    pub write_wait: Duration,
    pub pong_wait: Duration,
    /// Interval between pings. Must be shorter than `pong_wait`.
    pub ping_period: Duration,
    pub max_message_size: usize,
}

impl ConnectionConfig {
    /// Build a config from a pong wait, deriving the ping period as 9/10 of it.
    pub fn with_pong_wait(pong_wait: Duration) -> Self {
        Self {
            pong_wait,
            ping_period: pong_wait * 9 / 10,
            ..Self::default()
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            write_wait: DEFAULT_WRITE_WAIT,
            pong_wait: DEFAULT_PONG_WAIT,
            ping_period: DEFAULT_PONG_WAIT * 9 / 10,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
