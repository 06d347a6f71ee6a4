//! Domain logic for client-side operations.
//!
//! Pure functions deciding how the watcher reacts to failures and where it connects.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A rejected request will be rejected again, and a broken output cannot display
/// anything, so neither is worth a reconnect.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_) | ClientError::Output(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Number of consecutive failed attempts after a session ended with `error`.
///
/// A session that got connected before failing starts a fresh streak, so only drops in a
/// row count toward the limit.
pub fn failed_attempts_after(error: &ClientError, previous: u32) -> u32 {
    match error {
        ClientError::ConnectionError(_) => 1,
        _ => previous.saturating_add(1),
    }
}

/// Build the session URL of a campaign room from the server's base URL.
///
/// `base` is the WebSocket origin, e.g. `ws://127.0.0.1:8090`; a trailing slash is ignored.
pub fn session_url(base: &str, campaign_id: i64, user_id: i64) -> String {
    format!(
        "{}/ws/campaigns/{}?user_id={}",
        base.trim_end_matches('/'),
        campaign_id,
        user_id
    )
}
