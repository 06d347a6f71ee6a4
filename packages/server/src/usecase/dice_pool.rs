//! UseCase: ダイスプールの生成と消費
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ランダム / 手入力によるプール生成と `dice_pool_updated` の配信
//! - 現在のプール取得とダイスの使用
//!
//! ### どのような状況を想定しているか
//! - 正常系：キャラクターの 1 日のダイス数だけ振られ、キャンペーンのルームへ配信される
//! - 異常系：空の手入力、範囲外の値、存在しないキャラクター（いずれも配信なし）
//! - エッジケース：使用済みダイスの再使用

use std::sync::{Arc, Mutex, PoisonError};

use rand::{SeedableRng, rngs::StdRng};
use sleeper_shared::time::Clock;

use crate::domain::{
    CampaignRepository, Character, CharacterId, DicePool, DicePoolUpdatedPayload, DieId, PoolDie,
    PoolDraft, SessionBroadcaster, SessionEvent, SessionMessage,
};

use super::error::DicePoolUseCaseError;

/// ダイスプールのユースケース
pub struct DicePoolUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn CampaignRepository>,
    /// Broadcaster（キャンペーンのルームへの配信）
    broadcaster: Arc<dyn SessionBroadcaster>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl DicePoolUseCase {
    /// 新しい DicePoolUseCase を作成（乱数は OS のエントロピーで初期化）
    pub fn new(
        repository: Arc<dyn CampaignRepository>,
        broadcaster: Arc<dyn SessionBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_rng(repository, broadcaster, clock, StdRng::from_os_rng())
    }

    /// 乱数生成器を指定して作成（テストでシード固定に使う）
    pub fn with_rng(
        repository: Arc<dyn CampaignRepository>,
        broadcaster: Arc<dyn SessionBroadcaster>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            repository,
            broadcaster,
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Roll the character's daily dice and make them the current pool.
    pub async fn roll_random(
        &self,
        character_id: CharacterId,
    ) -> Result<DicePool, DicePoolUseCaseError> {
        let character = self.repository.get_character(character_id).await?;
        let draft = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            PoolDraft::random(character.max_daily_dice, &mut *rng)?
        };
        self.store(&character, draft).await
    }

    /// Store dice rolled at the table. Nothing is stored if any value is invalid.
    pub async fn roll_manual(
        &self,
        character_id: CharacterId,
        results: &[i64],
    ) -> Result<DicePool, DicePoolUseCaseError> {
        let draft = PoolDraft::manual(results)?;
        let character = self.repository.get_character(character_id).await?;
        self.store(&character, draft).await
    }

    pub async fn current_pool(
        &self,
        character_id: CharacterId,
    ) -> Result<DicePool, DicePoolUseCaseError> {
        Ok(self.repository.current_pool(character_id).await?)
    }

    /// Spend a die without recording a roll.
    pub async fn use_die(&self, die_id: DieId) -> Result<PoolDie, DicePoolUseCaseError> {
        let die = self.repository.mark_die_used(die_id).await?;
        tracing::debug!("Die {} (pool {}) marked used", die.id, die.pool_id);
        Ok(die)
    }

    async fn store(
        &self,
        character: &Character,
        draft: PoolDraft,
    ) -> Result<DicePool, DicePoolUseCaseError> {
        let pool = self
            .repository
            .create_pool(character.id, draft, self.clock.now())
            .await?;

        tracing::info!(
            "Character {} rolled pool {} with {} dice",
            character.id,
            pool.id,
            pool.dice.len()
        );

        self.broadcaster.broadcast(SessionMessage::new(
            character.campaign_id,
            SessionEvent::DicePoolUpdated(DicePoolUpdatedPayload {
                character_id: character.id,
                pool: pool.clone(),
            }),
        ));

        Ok(pool)
    }
}
