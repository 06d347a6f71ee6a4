//! Conversion of request DTOs into use-case commands.
//!
//! Identifiers arrive as plain integers and are validated here, so a malformed request
//! never reaches a use case.

use crate::{
    domain::{
        CampaignId, ChallengeId, CharacterId, CharacterUpdate, DieId, RollHistoryScope, UserId,
        ValueObjectError,
    },
    infrastructure::dto::http as dto,
    usecase::{ChallengeDraft, CharacterProfile, RollRequest},
};

/// Parse a path or query segment as an identifier.
pub fn parse_id<T>(raw: &str) -> Result<T, ValueObjectError>
where
    T: std::str::FromStr<Err = ValueObjectError>,
{
    raw.parse()
}

impl TryFrom<dto::CreateCharacterRequest> for CharacterProfile {
    type Error = ValueObjectError;

    fn try_from(dto: dto::CreateCharacterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            campaign_id: CampaignId::new(dto.campaign_id)?,
            user_id: UserId::new(dto.user_id)?,
            name: dto.name,
            skill_name: dto.skill_name,
            skill_modifier: dto.skill_modifier,
            weakness_name: dto.weakness_name,
            weakness_modifier: dto.weakness_modifier,
            max_daily_dice: dto.max_daily_dice,
        })
    }
}

impl From<dto::UpdateCharacterRequest> for CharacterUpdate {
    fn from(dto: dto::UpdateCharacterRequest) -> Self {
        Self {
            name: dto.name,
            skill_name: dto.skill_name,
            skill_modifier: dto.skill_modifier,
            weakness_name: dto.weakness_name,
            weakness_modifier: dto.weakness_modifier,
        }
    }
}

impl TryFrom<dto::CreateRollRequest> for RollRequest {
    type Error = ValueObjectError;

    fn try_from(dto: dto::CreateRollRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            character_id: CharacterId::new(dto.character_id)?,
            pool_dice_id: DieId::new(dto.pool_dice_id)?,
            secondary_roll: dto.d20_roll,
            action_type: dto.action_type,
            notes: dto.notes,
            challenge_id: dto.challenge_id.map(ChallengeId::new).transpose()?,
            skill_applied: dto.skill_applied,
            other_modifiers: dto.other_modifiers,
        })
    }
}

impl TryFrom<dto::CreateChallengeRequest> for ChallengeDraft {
    type Error = ValueObjectError;

    fn try_from(dto: dto::CreateChallengeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            campaign_id: CampaignId::new(dto.campaign_id)?,
            created_by_user_id: UserId::new(dto.created_by_user_id)?,
            description: dto.description,
            difficulty_modifier: dto.difficulty_modifier,
            is_group_challenge: dto.is_group_challenge,
        })
    }
}

impl dto::RollHistoryQuery {
    /// Scope of the query, or `None` when neither id is given.
    pub fn scope(&self) -> Result<Option<RollHistoryScope>, ValueObjectError> {
        if let Some(raw) = self.character_id.as_deref() {
            return Ok(Some(RollHistoryScope::Character(parse_id(raw)?)));
        }
        if let Some(raw) = self.campaign_id.as_deref() {
            return Ok(Some(RollHistoryScope::Campaign(parse_id(raw)?)));
        }
        Ok(None)
    }
}
