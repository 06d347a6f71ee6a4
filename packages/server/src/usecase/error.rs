//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{
    CampaignId, ChallengeId, CharacterId, DicePoolError, DieId, MAX_DAILY_DICE, RepositoryError,
};

/// ダイスプール操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DicePoolUseCaseError {
    #[error(transparent)]
    InvalidPool(#[from] DicePoolError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ロール記録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRollError {
    #[error("die {die_id} does not belong to character {character_id}")]
    DieNotOwned {
        die_id: DieId,
        character_id: CharacterId,
    },

    #[error("challenge {challenge_id} does not belong to campaign {campaign_id}")]
    ChallengeNotInCampaign {
        challenge_id: ChallengeId,
        campaign_id: CampaignId,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// キャンペーン操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("campaign name is required")]
    EmptyName,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// キャラクター操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("character name is required")]
    EmptyName,

    #[error("max daily dice must be between 1 and {max}, got {0}", max = MAX_DAILY_DICE)]
    DailyDiceOutOfRange(u32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// チャレンジ操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("challenge description is required")]
    EmptyDescription,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
