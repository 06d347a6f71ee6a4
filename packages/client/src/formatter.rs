//! Feed formatting for the session watcher.

use chrono::{DateTime, Utc};
use sleeper_server::domain::{
    ChallengeAction, ChallengeUpdatePayload, DayIncrementedPayload, DicePoolUpdatedPayload,
    RollCompletePayload, SessionEvent, SessionMessage,
};
use sleeper_shared::time::format_feed_time;

/// Message formatter for the event feed
pub struct FeedFormatter;

impl FeedFormatter {
    /// Format one session event as a feed line, stamped with the time it was received.
    pub fn format_message(message: &SessionMessage, received_at: &DateTime<Utc>) -> String {
        let body = match &message.event {
            SessionEvent::RollComplete(payload) => Self::format_roll(payload),
            SessionEvent::DicePoolUpdated(payload) => Self::format_pool(payload),
            SessionEvent::ChallengeUpdate(payload) => Self::format_challenge(payload),
            SessionEvent::DayIncremented(payload) => Self::format_day(payload),
        };
        format!("[{}] {}\n", format_feed_time(received_at), body)
    }

    fn format_roll(payload: &RollCompletePayload) -> String {
        let roll = &payload.roll;
        let mut line = format!(
            "{} rolled {} against d20 {}: {}",
            payload.character_name,
            roll.modified_die,
            roll.secondary_roll,
            roll.outcome.as_str().to_uppercase()
        );
        if roll.skill_applied {
            line.push_str(" (skill)");
        }
        if let Some(action) = &roll.action_type {
            line.push_str(&format!(" [{}]", action));
        }
        line
    }

    fn format_pool(payload: &DicePoolUpdatedPayload) -> String {
        let faces: Vec<String> = payload
            .pool
            .dice
            .iter()
            .map(|die| {
                if die.is_used {
                    format!("({})", die.die_result)
                } else {
                    die.die_result.to_string()
                }
            })
            .collect();
        format!(
            "Character {} has a new dice pool: {} ({} left)",
            payload.character_id,
            faces.join(" "),
            payload.pool.remaining()
        )
    }

    fn format_challenge(payload: &ChallengeUpdatePayload) -> String {
        let challenge = &payload.challenge;
        let verb = match payload.action {
            ChallengeAction::Created => "opened",
            ChallengeAction::Completed => "completed",
        };
        let group = if challenge.is_group_challenge {
            " (group)"
        } else {
            ""
        };
        format!(
            "Challenge #{} {}{}: {} (difficulty {:+})",
            challenge.id, verb, group, challenge.description, challenge.difficulty_modifier
        )
    }

    fn format_day(payload: &DayIncrementedPayload) -> String {
        format!("Day {} begins", payload.current_day)
    }

    /// Format a raw text frame that is not a session event
    pub fn format_raw_message(text: &str) -> String {
        format!("← Received: {}\n", text)
    }

    /// Format a binary frame notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("← Received {} bytes of binary data\n", byte_count)
    }
}
