//! UseCase: ロールの解決と記録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RecordRollUseCase::execute()：プールのダイスを消費し、判定して記録し、`roll_complete` を配信
//! - RecordRollUseCase::history()：キャラクター / キャンペーン単位の履歴
//!
//! ### どのような状況を想定しているか
//! - 正常系：スキル修正の有無による判定の違い
//! - 異常系：使用済みダイス、他人のダイス、別キャンペーンまたは存在しないチャレンジ
//!   （いずれも記録・配信なし、ダイスも消費されない）

use std::sync::Arc;

use sleeper_shared::time::Clock;

use crate::domain::{
    CampaignRepository, ChallengeId, CharacterId, DieId, NewRollRecord, RollCompletePayload,
    RollHistoryScope, RollInput, RollRecord, SessionBroadcaster, SessionEvent, SessionMessage,
    resolve,
};

use super::error::RecordRollError;

/// A roll made by spending one pool die.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollRequest {
    pub character_id: CharacterId,
    pub pool_dice_id: DieId,
    /// The d20 result the modified die is graded against.
    pub secondary_roll: i64,
    pub action_type: Option<String>,
    pub notes: Option<String>,
    pub challenge_id: Option<ChallengeId>,
    pub skill_applied: bool,
    pub other_modifiers: i64,
}

/// ロール記録のユースケース
pub struct RecordRollUseCase {
    repository: Arc<dyn CampaignRepository>,
    broadcaster: Arc<dyn SessionBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl RecordRollUseCase {
    pub fn new(
        repository: Arc<dyn CampaignRepository>,
        broadcaster: Arc<dyn SessionBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            broadcaster,
            clock,
        }
    }

    /// ロールを解決して記録する
    ///
    /// # Returns
    ///
    /// * `Ok(RollRecord)` - 記録されたロール
    /// * `Err(RecordRollError)` - キャラクター / ダイス / チャレンジが見つからない、
    ///   ダイスが使用済みまたは別のキャラクターのもの、チャレンジが別キャンペーンのもの
    pub async fn execute(&self, request: RollRequest) -> Result<RollRecord, RecordRollError> {
        // 1. キャラクターとダイスの所有関係を確認
        let character = self.repository.get_character(request.character_id).await?;
        let die = self.repository.get_pool_die(request.pool_dice_id).await?;
        let pool = self.repository.get_pool(die.pool_id).await?;
        if pool.character_id != character.id {
            return Err(RecordRollError::DieNotOwned {
                die_id: die.id,
                character_id: character.id,
            });
        }

        // 2. チャレンジが同じキャンペーンのものか確認（ダイス消費の前に検証する）
        if let Some(challenge_id) = request.challenge_id {
            let challenge = self.repository.get_challenge(challenge_id).await?;
            if challenge.campaign_id != character.campaign_id {
                return Err(RecordRollError::ChallengeNotInCampaign {
                    challenge_id,
                    campaign_id: character.campaign_id,
                });
            }
        }

        // 3. ダイスを消費（使用済みならここで失敗する）
        let die = self.repository.mark_die_used(die.id).await?;

        // 4. 判定
        let input = RollInput {
            base_die: die.die_result,
            skill_applied: request.skill_applied,
            skill_modifier: character.skill_modifier,
            other_modifiers: request.other_modifiers,
            secondary_roll: request.secondary_roll,
        };
        let resolved = resolve(&input);
        tracing::debug!(
            "Modified die {} (base {}, skill applied: {}, other: {}) vs {} -> {}",
            resolved.modified_die,
            input.base_die,
            input.skill_applied,
            input.other_modifiers,
            input.secondary_roll,
            resolved.outcome
        );

        // 5. 記録
        let record = self
            .repository
            .record_roll(NewRollRecord {
                character_id: character.id,
                pool_dice_id: die.id,
                secondary_roll: request.secondary_roll,
                action_type: request.action_type,
                outcome: resolved.outcome,
                notes: request.notes,
                challenge_id: request.challenge_id,
                skill_applied: request.skill_applied,
                other_modifiers: request.other_modifiers,
                modified_die: resolved.modified_die,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            "Character {} rolled {} with die {}",
            character.id,
            record.outcome,
            die.id
        );

        // 6. キャンペーンのルームへ配信
        self.broadcaster.broadcast(SessionMessage::new(
            character.campaign_id,
            SessionEvent::RollComplete(RollCompletePayload {
                roll: record.clone(),
                character_name: character.name,
                character_id: character.id,
            }),
        ));

        Ok(record)
    }

    /// Rolls in the scope, newest first.
    pub async fn history(
        &self,
        scope: RollHistoryScope,
    ) -> Result<Vec<RollRecord>, RecordRollError> {
        Ok(self.repository.roll_history(scope).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            CampaignId, Challenge, Character, DicePool, DicePoolError, MockSessionBroadcaster,
            NewCampaign, NewChallenge, NewCharacter, Outcome, PoolDraft, RepositoryError, UserId,
        },
        infrastructure::repository::InMemoryCampaignRepository,
    };
    use sleeper_shared::time::FixedClock;

    const NOW_MILLIS: i64 = 1_700_000_000_000;

    struct Fixture {
        repository: Arc<InMemoryCampaignRepository>,
        character: Character,
        pool: DicePool,
    }

    /// スキル修正 +2 のキャラクターと、手入力のプールを用意する
    async fn setup(results: &[i64]) -> Fixture {
        let repository = Arc::new(InMemoryCampaignRepository::new());
        let now = FixedClock::from_millis(NOW_MILLIS).now();
        let campaign = repository
            .create_campaign(NewCampaign {
                name: "Sleeper".to_string(),
                gm_user_id: UserId::new(1).unwrap(),
                created_at: now,
            })
            .await
            .unwrap();
        let character = repository
            .create_character(NewCharacter {
                campaign_id: campaign.id,
                user_id: UserId::new(2).unwrap(),
                name: "Ash".to_string(),
                skill_name: Some("Climbing".to_string()),
                skill_modifier: 2,
                weakness_name: None,
                weakness_modifier: 0,
                max_daily_dice: 6,
                created_at: now,
            })
            .await
            .unwrap();
        let pool = repository
            .create_pool(character.id, PoolDraft::manual(results).unwrap(), now)
            .await
            .unwrap();
        Fixture {
            repository,
            character,
            pool,
        }
    }

    fn usecase(fixture: &Fixture, broadcaster: MockSessionBroadcaster) -> RecordRollUseCase {
        RecordRollUseCase::new(
            fixture.repository.clone(),
            Arc::new(broadcaster),
            Arc::new(FixedClock::from_millis(NOW_MILLIS)),
        )
    }

    fn request(fixture: &Fixture, die: usize, secondary_roll: i64) -> RollRequest {
        RollRequest {
            character_id: fixture.character.id,
            pool_dice_id: fixture.pool.dice[die].id,
            secondary_roll,
            action_type: Some("climb".to_string()),
            notes: None,
            challenge_id: None,
            skill_applied: false,
            other_modifiers: 0,
        }
    }

    #[tokio::test]
    async fn test_execute_records_and_broadcasts() {
        // テスト項目: ロールが記録され、キャラクター名付きで配信される
        // given (前提条件):
        let fixture = setup(&[3, 3]).await;
        let campaign_id = fixture.character.campaign_id;
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster
            .expect_broadcast()
            .withf(move |message| {
                message.campaign_id == campaign_id
                    && matches!(
                        &message.event,
                        SessionEvent::RollComplete(payload)
                            if payload.character_name == "Ash"
                                && payload.roll.outcome == Outcome::Neutral
                    )
            })
            .times(1)
            .return_const(());
        let usecase = usecase(&fixture, broadcaster);

        // when (操作): 出目 3、修正なし、d20 = 10 → neutral
        let record = usecase.execute(request(&fixture, 0, 10)).await.unwrap();

        // then (期待する結果):
        assert_eq!(record.modified_die.value(), 3);
        assert_eq!(record.outcome, Outcome::Neutral);
        assert_eq!(record.success, None);
        assert_eq!(record.action_type.as_deref(), Some("climb"));
        let die = fixture
            .repository
            .get_pool_die(fixture.pool.dice[0].id)
            .await
            .unwrap();
        assert!(die.is_used);
    }

    #[tokio::test]
    async fn test_skill_modifier_applied_only_when_requested() {
        // テスト項目: スキル修正は skill_applied のときだけ加算される
        // given (前提条件): 出目 3、スキル +2
        let fixture = setup(&[3, 3]).await;
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().times(2).return_const(());
        let usecase = usecase(&fixture, broadcaster);
        let mut with_skill = request(&fixture, 0, 12);
        with_skill.skill_applied = true;
        let without_skill = request(&fixture, 1, 12);

        // when (操作):
        let boosted = usecase.execute(with_skill).await.unwrap();
        let plain = usecase.execute(without_skill).await.unwrap();

        // then (期待する結果): 3 + 2 = 5, d20 12 >= 11 → success / 3, d20 12 → neutral
        assert_eq!(boosted.modified_die.value(), 5);
        assert_eq!(boosted.outcome, Outcome::Success);
        assert_eq!(boosted.success, Some(true));
        assert_eq!(plain.modified_die.value(), 3);
        assert_eq!(plain.outcome, Outcome::Neutral);
    }

    #[tokio::test]
    async fn test_other_modifiers_are_clamped() {
        // テスト項目: 大きなマイナス修正でも修正後の出目は 1 に収まる
        let fixture = setup(&[6]).await;
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().times(1).return_const(());
        let usecase = usecase(&fixture, broadcaster);
        let mut roll = request(&fixture, 0, 3);
        roll.other_modifiers = -20;

        let record = usecase.execute(roll).await.unwrap();

        assert_eq!(record.modified_die.value(), 1);
        assert_eq!(record.outcome, Outcome::Failure);
        assert_eq!(record.success, Some(false));
    }

    #[tokio::test]
    async fn test_used_die_is_rejected() {
        // テスト項目: 使用済みのダイスではロールできず、二度目は配信されない
        // given (前提条件):
        let fixture = setup(&[4]).await;
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().times(1).return_const(());
        let usecase = usecase(&fixture, broadcaster);
        usecase.execute(request(&fixture, 0, 10)).await.unwrap();

        // when (操作):
        let again = usecase.execute(request(&fixture, 0, 10)).await;

        // then (期待する結果):
        assert_eq!(
            again,
            Err(RecordRollError::Repository(RepositoryError::DicePool(
                DicePoolError::DieAlreadyUsed(fixture.pool.dice[0].id)
            )))
        );
        let history = usecase
            .history(RollHistoryScope::Character(fixture.character.id))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_die_of_another_character_is_rejected() {
        // テスト項目: 他のキャラクターのダイスは使えず、ダイスも消費されない
        // given (前提条件):
        let fixture = setup(&[5]).await;
        let now = FixedClock::from_millis(NOW_MILLIS).now();
        let other = fixture
            .repository
            .create_character(NewCharacter {
                campaign_id: fixture.character.campaign_id,
                user_id: UserId::new(3).unwrap(),
                name: "Birch".to_string(),
                skill_name: None,
                skill_modifier: 0,
                weakness_name: None,
                weakness_modifier: 0,
                max_daily_dice: 6,
                created_at: now,
            })
            .await
            .unwrap();
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().never();
        let usecase = usecase(&fixture, broadcaster);
        let mut roll = request(&fixture, 0, 10);
        roll.character_id = other.id;

        // when (操作):
        let result = usecase.execute(roll).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RecordRollError::DieNotOwned {
                die_id: fixture.pool.dice[0].id,
                character_id: other.id
            })
        );
        let die = fixture
            .repository
            .get_pool_die(fixture.pool.dice[0].id)
            .await
            .unwrap();
        assert!(!die.is_used);
    }

    async fn create_challenge(fixture: &Fixture, campaign_id: CampaignId) -> Challenge {
        fixture
            .repository
            .create_challenge(NewChallenge {
                campaign_id,
                created_by_user_id: UserId::new(1).unwrap(),
                description: "Scale the wall".to_string(),
                difficulty_modifier: 0,
                is_group_challenge: false,
                created_at: FixedClock::from_millis(NOW_MILLIS).now(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_roll_against_challenge_of_same_campaign() {
        // テスト項目: 同じキャンペーンのチャレンジに紐づけてロールできる
        // given (前提条件):
        let fixture = setup(&[4]).await;
        let challenge = create_challenge(&fixture, fixture.character.campaign_id).await;
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().times(1).return_const(());
        let usecase = usecase(&fixture, broadcaster);
        let mut roll = request(&fixture, 0, 10);
        roll.challenge_id = Some(challenge.id);

        // when (操作):
        let record = usecase.execute(roll).await.unwrap();

        // then (期待する結果):
        assert_eq!(record.challenge_id, Some(challenge.id));
    }

    #[tokio::test]
    async fn test_foreign_or_missing_challenge_keeps_die_unused() {
        // テスト項目: 別キャンペーンや存在しないチャレンジは拒否され、ダイスは消費されない
        // given (前提条件):
        let fixture = setup(&[4]).await;
        let elsewhere = fixture
            .repository
            .create_campaign(NewCampaign {
                name: "Elsewhere".to_string(),
                gm_user_id: UserId::new(1).unwrap(),
                created_at: FixedClock::from_millis(NOW_MILLIS).now(),
            })
            .await
            .unwrap();
        let foreign = create_challenge(&fixture, elsewhere.id).await;
        let missing = ChallengeId::new(99).unwrap();
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().never();
        let usecase = usecase(&fixture, broadcaster);
        let mut foreign_roll = request(&fixture, 0, 10);
        foreign_roll.challenge_id = Some(foreign.id);
        let mut missing_roll = request(&fixture, 0, 10);
        missing_roll.challenge_id = Some(missing);

        // when (操作):
        let foreign_result = usecase.execute(foreign_roll).await;
        let missing_result = usecase.execute(missing_roll).await;

        // then (期待する結果):
        assert_eq!(
            foreign_result,
            Err(RecordRollError::ChallengeNotInCampaign {
                challenge_id: foreign.id,
                campaign_id: fixture.character.campaign_id
            })
        );
        assert_eq!(
            missing_result,
            Err(RecordRollError::Repository(
                RepositoryError::ChallengeNotFound(missing)
            ))
        );
        let die = fixture
            .repository
            .get_pool_die(fixture.pool.dice[0].id)
            .await
            .unwrap();
        assert!(!die.is_used);
    }

    #[tokio::test]
    async fn test_history_by_campaign_newest_first() {
        // テスト項目: キャンペーン単位の履歴は新しい順
        let fixture = setup(&[1, 2, 6]).await;
        let mut broadcaster = MockSessionBroadcaster::new();
        broadcaster.expect_broadcast().times(3).return_const(());
        let usecase = usecase(&fixture, broadcaster);
        for die in 0..3 {
            usecase.execute(request(&fixture, die, 15)).await.unwrap();
        }

        let history = usecase
            .history(RollHistoryScope::Campaign(fixture.character.campaign_id))
            .await
            .unwrap();

        let outcomes: Vec<Outcome> = history.iter().map(|roll| roll.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Success, Outcome::Neutral, Outcome::Neutral]
        );
    }
}
