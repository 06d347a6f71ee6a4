//! Session events pushed to every connection in a campaign room.
//!
//! On the wire each event is a JSON object:
//!
//! ```text
//! { "type": "roll_complete", "campaign_id": 3, "payload": { ... } }
//! ```

use serde::{Deserialize, Serialize};

use super::{
    dice_pool::DicePool,
    entity::{Challenge, RollRecord},
    value_object::{CampaignId, CharacterId},
};

/// Discriminant of a [`SessionEvent`], matching the `type` field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    RollComplete,
    DicePoolUpdated,
    ChallengeUpdate,
    DayIncremented,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::RollComplete => "roll_complete",
            MessageType::DicePoolUpdated => "dice_pool_updated",
            MessageType::ChallengeUpdate => "challenge_update",
            MessageType::DayIncremented => "day_incremented",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCompletePayload {
    pub roll: RollRecord,
    pub character_name: String,
    pub character_id: CharacterId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePoolUpdatedPayload {
    pub character_id: CharacterId,
    pub pool: DicePool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeAction {
    Created,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeUpdatePayload {
    pub action: ChallengeAction,
    pub challenge: Challenge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayIncrementedPayload {
    pub campaign_id: CampaignId,
    pub current_day: u32,
}

/// A live event for a campaign room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    RollComplete(RollCompletePayload),
    DicePoolUpdated(DicePoolUpdatedPayload),
    ChallengeUpdate(ChallengeUpdatePayload),
    DayIncremented(DayIncrementedPayload),
}

impl SessionEvent {
    pub fn message_type(&self) -> MessageType {
        match self {
            SessionEvent::RollComplete(_) => MessageType::RollComplete,
            SessionEvent::DicePoolUpdated(_) => MessageType::DicePoolUpdated,
            SessionEvent::ChallengeUpdate(_) => MessageType::ChallengeUpdate,
            SessionEvent::DayIncremented(_) => MessageType::DayIncremented,
        }
    }
}

/// An event addressed to one campaign room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub campaign_id: CampaignId,
    #[serde(flatten)]
    pub event: SessionEvent,
}

impl SessionMessage {
    pub fn new(campaign_id: CampaignId, event: SessionEvent) -> Self {
        Self { campaign_id, event }
    }

    pub fn message_type(&self) -> MessageType {
        self.event.message_type()
    }

    /// Encode the message as the JSON text frame sent to clients.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON text frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
