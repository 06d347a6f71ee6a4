//! Campaign entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    error::ChallengeStateError,
    resolution::Outcome,
    value_object::{CampaignId, ChallengeId, CharacterId, DieFace, DieId, RollId, UserId},
};

/// A campaign. Its id doubles as the session room key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub gm_user_id: UserId,
    /// In-game day counter, starting at 1.
    pub current_day: u32,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Advance the in-game day and return the new value.
    pub fn increment_day(&mut self) -> u32 {
        self.current_day = self.current_day.saturating_add(1);
        self.current_day
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCampaign {
    pub name: String,
    pub gm_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub name: String,
    pub skill_name: Option<String>,
    /// Added to the d6 when the player applies the skill to a roll.
    pub skill_modifier: i64,
    pub weakness_name: Option<String>,
    pub weakness_modifier: i64,
    /// Size of a randomly rolled dice pool.
    pub max_daily_dice: u32,
    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Replace the editable profile. Owner, campaign and dice count stay fixed.
    pub fn apply(&mut self, update: CharacterUpdate) {
        self.name = update.name;
        self.skill_name = update.skill_name;
        self.skill_modifier = update.skill_modifier;
        self.weakness_name = update.weakness_name;
        self.weakness_modifier = update.weakness_modifier;
    }
}

/// Editable part of a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterUpdate {
    pub name: String,
    pub skill_name: Option<String>,
    pub skill_modifier: i64,
    pub weakness_name: Option<String>,
    pub weakness_modifier: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacter {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub name: String,
    pub skill_name: Option<String>,
    pub skill_modifier: i64,
    pub weakness_name: Option<String>,
    pub weakness_modifier: i64,
    pub max_daily_dice: u32,
    pub created_at: DateTime<Utc>,
}

/// A resolved roll as kept in the roll history.
///
/// Field names on the wire follow the d6/d20 vocabulary the web client uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    pub id: RollId,
    pub character_id: CharacterId,
    pub pool_dice_id: DieId,
    #[serde(rename = "d20_roll")]
    pub secondary_roll: i64,
    pub action_type: Option<String>,
    /// Legacy tri-state flag, see [`Outcome::legacy_success`].
    pub success: Option<bool>,
    pub outcome: Outcome,
    pub notes: Option<String>,
    pub challenge_id: Option<ChallengeId>,
    pub skill_applied: bool,
    pub other_modifiers: i64,
    #[serde(rename = "modified_d6")]
    pub modified_die: DieFace,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRollRecord {
    pub character_id: CharacterId,
    pub pool_dice_id: DieId,
    pub secondary_roll: i64,
    pub action_type: Option<String>,
    pub outcome: Outcome,
    pub notes: Option<String>,
    pub challenge_id: Option<ChallengeId>,
    pub skill_applied: bool,
    pub other_modifiers: i64,
    pub modified_die: DieFace,
    pub created_at: DateTime<Utc>,
}

/// Which rolls to list from the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollHistoryScope {
    Character(CharacterId),
    Campaign(CampaignId),
}

impl RollHistoryScope {
    /// Maximum number of records returned for this scope.
    pub fn limit(&self) -> usize {
        match self {
            RollHistoryScope::Character(_) => 50,
            RollHistoryScope::Campaign(_) => 100,
        }
    }
}

/// A challenge posed by the GM to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub campaign_id: CampaignId,
    pub created_by_user_id: UserId,
    pub description: String,
    pub difficulty_modifier: i64,
    pub is_group_challenge: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    pub fn complete(&mut self) -> Result<(), ChallengeStateError> {
        if !self.is_active {
            return Err(ChallengeStateError::AlreadyCompleted(self.id));
        }
        self.is_active = false;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChallenge {
    pub campaign_id: CampaignId,
    pub created_by_user_id: UserId,
    pub description: String,
    pub difficulty_modifier: i64,
    pub is_group_challenge: bool,
    pub created_at: DateTime<Utc>,
}
