//! Client execution logic with reconnection support.

use std::{io::Write, time::Duration};

use sleeper_shared::time::Clock;

use crate::{
    domain::{failed_attempts_after, should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_watch_session,
};

/// How often and how patiently the watcher reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

/// Run the watcher with reconnection logic.
///
/// `max_attempts` bounds consecutive failures; a session that connected resets the count.
///
/// Returns the last error once the session cannot or should not be resumed.
pub async fn run_client<W: Write>(
    url: &str,
    policy: ReconnectPolicy,
    clock: &dyn Clock,
    out: &mut W,
) -> ClientError {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            policy.max_attempts
        );

        let error = match run_watch_session(url, clock, out).await {
            // The server closing the room (e.g. on restart) is treated like a lost connection.
            Ok(()) => ClientError::ConnectionError("Server closed the connection".to_string()),
            Err(e) => e,
        };

        if should_exit_immediately(&error) {
            return error;
        }

        tracing::warn!("Connection lost: {}", error);
        reconnect_count = failed_attempts_after(&error, reconnect_count);

        if !should_attempt_reconnect(&error, reconnect_count, policy.max_attempts) {
            tracing::error!(
                "Failed to reconnect after {} attempts. Exiting.",
                policy.max_attempts
            );
            return error;
        }

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            policy.interval.as_secs(),
            reconnect_count + 1,
            policy.max_attempts
        );
        tokio::time::sleep(policy.interval).await;
    }
}
