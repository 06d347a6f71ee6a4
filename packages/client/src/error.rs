//! Error types for the session watcher.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the upgrade request (bad campaign or user id)
    #[error("Server rejected the session request with status {0}")]
    Rejected(u16),

    /// The server could not be reached
    #[error("Could not connect: {0}")]
    Unreachable(String),

    /// An established connection was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Writing the feed to the output failed
    #[error("Failed to write feed output: {0}")]
    Output(#[from] std::io::Error),
}
