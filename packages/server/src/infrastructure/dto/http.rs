//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub gm_user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCharacterRequest {
    pub campaign_id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub skill_name: Option<String>,
    #[serde(default)]
    pub skill_modifier: i64,
    #[serde(default)]
    pub weakness_name: Option<String>,
    #[serde(default)]
    pub weakness_modifier: i64,
    #[serde(default)]
    pub max_daily_dice: Option<u32>,
}

/// Body of `PUT /api/characters/{character_id}`. Omitted skill or weakness fields clear them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateCharacterRequest {
    pub name: String,
    #[serde(default)]
    pub skill_name: Option<String>,
    #[serde(default)]
    pub skill_modifier: i64,
    #[serde(default)]
    pub weakness_name: Option<String>,
    #[serde(default)]
    pub weakness_modifier: i64,
}

/// Body of `POST /api/characters/{character_id}/dice-pool/manual`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManualPoolRequest {
    pub dice_results: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRollRequest {
    pub character_id: i64,
    pub pool_dice_id: i64,
    pub d20_roll: i64,
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub challenge_id: Option<i64>,
    #[serde(default)]
    pub skill_applied: bool,
    #[serde(default)]
    pub other_modifiers: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateChallengeRequest {
    pub campaign_id: i64,
    pub created_by_user_id: i64,
    pub description: String,
    #[serde(default)]
    pub difficulty_modifier: i64,
    #[serde(default)]
    pub is_group_challenge: bool,
}

/// Query of `GET /api/rolls`. Exactly one scope is expected; `character_id` wins if both
/// are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RollHistoryQuery {
    pub character_id: Option<String>,
    pub campaign_id: Option<String>,
}

/// Query of the WebSocket upgrade request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// Live connection count of a campaign room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCountDto {
    pub campaign_id: i64,
    pub connections: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
