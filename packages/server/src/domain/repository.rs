//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    Campaign, CampaignId, Challenge, ChallengeId, Character, CharacterId, CharacterUpdate,
    DicePool, DieId,
    NewCampaign, NewChallenge, NewCharacter, NewRollRecord, PoolDie, PoolDraft, PoolId,
    RepositoryError, RollHistoryScope, RollRecord,
};

/// Campaign Repository trait
///
/// Store for campaigns and everything that hangs off them. UseCase 層はこの trait に依存し、
/// Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn create_campaign(&self, campaign: NewCampaign) -> Result<Campaign, RepositoryError>;

    async fn get_campaign(&self, id: CampaignId) -> Result<Campaign, RepositoryError>;

    /// Every campaign, newest first.
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, RepositoryError>;

    /// Advance the campaign's day and return the updated campaign.
    async fn increment_day(&self, id: CampaignId) -> Result<Campaign, RepositoryError>;

    /// Fails with `CampaignNotFound` when the campaign does not exist.
    async fn create_character(&self, character: NewCharacter)
    -> Result<Character, RepositoryError>;

    async fn get_character(&self, id: CharacterId) -> Result<Character, RepositoryError>;

    async fn update_character(
        &self,
        id: CharacterId,
        update: CharacterUpdate,
    ) -> Result<Character, RepositoryError>;

    async fn list_characters(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Character>, RepositoryError>;

    /// Store a new pool; it becomes the character's current pool.
    async fn create_pool(
        &self,
        character_id: CharacterId,
        draft: PoolDraft,
        rolled_at: DateTime<Utc>,
    ) -> Result<DicePool, RepositoryError>;

    /// Most recently rolled pool of the character.
    async fn current_pool(&self, character_id: CharacterId) -> Result<DicePool, RepositoryError>;

    async fn get_pool(&self, id: PoolId) -> Result<DicePool, RepositoryError>;

    async fn get_pool_die(&self, id: DieId) -> Result<PoolDie, RepositoryError>;

    /// Flip the die's `is_used` flag; fails if it was already used.
    async fn mark_die_used(&self, id: DieId) -> Result<PoolDie, RepositoryError>;

    async fn record_roll(&self, roll: NewRollRecord) -> Result<RollRecord, RepositoryError>;

    /// Rolls in the scope, newest first, capped at the scope's limit.
    async fn roll_history(
        &self,
        scope: RollHistoryScope,
    ) -> Result<Vec<RollRecord>, RepositoryError>;

    async fn create_challenge(&self, challenge: NewChallenge)
    -> Result<Challenge, RepositoryError>;

    async fn get_challenge(&self, id: ChallengeId) -> Result<Challenge, RepositoryError>;

    /// Mark the challenge inactive; fails if it was already completed.
    async fn complete_challenge(&self, id: ChallengeId) -> Result<Challenge, RepositoryError>;

    async fn list_challenges(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Challenge>, RepositoryError>;
}
