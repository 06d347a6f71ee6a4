//! UseCase: キャラクターの作成・更新と一覧

use std::sync::Arc;

use sleeper_shared::time::Clock;

use crate::domain::{
    CampaignId, CampaignRepository, Character, CharacterId, CharacterUpdate,
    DEFAULT_MAX_DAILY_DICE, MAX_DAILY_DICE, NewCharacter, UserId,
};

use super::error::CharacterError;

/// Fields supplied when creating a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterProfile {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub name: String,
    pub skill_name: Option<String>,
    pub skill_modifier: i64,
    pub weakness_name: Option<String>,
    pub weakness_modifier: i64,
    /// Dice rolled per pool; defaults to six.
    pub max_daily_dice: Option<u32>,
}

/// キャラクターのユースケース
pub struct CharacterUseCase {
    repository: Arc<dyn CampaignRepository>,
    clock: Arc<dyn Clock>,
}

impl CharacterUseCase {
    pub fn new(repository: Arc<dyn CampaignRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn create(&self, profile: CharacterProfile) -> Result<Character, CharacterError> {
        let name = profile.name.trim();
        if name.is_empty() {
            return Err(CharacterError::EmptyName);
        }
        let max_daily_dice = profile.max_daily_dice.unwrap_or(DEFAULT_MAX_DAILY_DICE);
        if !(1..=MAX_DAILY_DICE).contains(&max_daily_dice) {
            return Err(CharacterError::DailyDiceOutOfRange(max_daily_dice));
        }
        let character = self
            .repository
            .create_character(NewCharacter {
                campaign_id: profile.campaign_id,
                user_id: profile.user_id,
                name: name.to_string(),
                skill_name: profile.skill_name,
                skill_modifier: profile.skill_modifier,
                weakness_name: profile.weakness_name,
                weakness_modifier: profile.weakness_modifier,
                max_daily_dice,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(
            "Character {} '{}' joined campaign {}",
            character.id,
            character.name,
            character.campaign_id
        );
        Ok(character)
    }

    pub async fn get(&self, id: CharacterId) -> Result<Character, CharacterError> {
        Ok(self.repository.get_character(id).await?)
    }

    /// Rename the character and replace its skill and weakness. The name is trimmed and
    /// must not be empty.
    pub async fn update(
        &self,
        id: CharacterId,
        mut update: CharacterUpdate,
    ) -> Result<Character, CharacterError> {
        update.name = update.name.trim().to_string();
        if update.name.is_empty() {
            return Err(CharacterError::EmptyName);
        }
        let character = self.repository.update_character(id, update).await?;
        tracing::info!(
            "Character {} updated: skill {:+}, weakness {:+}",
            character.id,
            character.skill_modifier,
            character.weakness_modifier
        );
        Ok(character)
    }

    pub async fn list(&self, campaign_id: CampaignId) -> Result<Vec<Character>, CharacterError> {
        Ok(self.repository.list_characters(campaign_id).await?)
    }
}
