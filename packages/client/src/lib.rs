//! Session watcher for Sleeper campaigns.
//!
//! Joins the session room of one campaign over WebSocket and prints every event the
//! server pushes, reconnecting when the connection drops.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;

pub use error::ClientError;
pub use runner::{ReconnectPolicy, run_client};
pub use session::run_watch_session;
