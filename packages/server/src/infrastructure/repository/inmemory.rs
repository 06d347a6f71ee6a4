//! InMemory Campaign Repository 実装
//!
//! ドメイン層が定義する CampaignRepository trait の具体的な実装。
//! 一つの Mutex で保護した `Store` をインメモリ DB として使用します。
//!
//! ID は entity ごとの連番で、1 から払い出されます。
//! 一覧系の並び順:
//!
//! - キャンペーン: 新しい順
//! - キャラクター: 作成順
//! - チャレンジ: アクティブなもののみ、新しい順
//! - ロール履歴: 新しい順、スコープごとの上限まで

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    Campaign, CampaignId, CampaignRepository, Challenge, ChallengeId, Character, CharacterId,
    CharacterUpdate, DicePool, DieId, NewCampaign, NewChallenge, NewCharacter, NewRollRecord,
    PoolDie, PoolDraft, PoolId, RepositoryError, RollHistoryScope, RollId, RollRecord,
};

/// Id sequences, one per entity.
struct Sequences {
    campaign: CampaignId,
    character: CharacterId,
    pool: PoolId,
    die: DieId,
    roll: RollId,
    challenge: ChallengeId,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            campaign: CampaignId::FIRST,
            character: CharacterId::FIRST,
            pool: PoolId::FIRST,
            die: DieId::FIRST,
            roll: RollId::FIRST,
            challenge: ChallengeId::FIRST,
        }
    }
}

/// Hand out the current value of a sequence and advance it.
fn issue<T: Copy>(slot: &mut T, advance: impl Fn(T) -> T) -> T {
    let id = *slot;
    *slot = advance(id);
    id
}

#[derive(Default)]
struct Store {
    sequences: Sequences,
    campaigns: HashMap<CampaignId, Campaign>,
    characters: BTreeMap<CharacterId, Character>,
    pools: HashMap<PoolId, DicePool>,
    /// Latest pool per character.
    current_pools: HashMap<CharacterId, PoolId>,
    /// Owning pool of every die.
    die_index: HashMap<DieId, PoolId>,
    /// Append-only, oldest first.
    rolls: Vec<RollRecord>,
    challenges: BTreeMap<ChallengeId, Challenge>,
}

impl Store {
    fn campaign_mut(&mut self, id: CampaignId) -> Result<&mut Campaign, RepositoryError> {
        self.campaigns
            .get_mut(&id)
            .ok_or(RepositoryError::CampaignNotFound(id))
    }

    fn ensure_campaign(&self, id: CampaignId) -> Result<(), RepositoryError> {
        if self.campaigns.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::CampaignNotFound(id))
        }
    }

    fn character(&self, id: CharacterId) -> Result<&Character, RepositoryError> {
        self.characters
            .get(&id)
            .ok_or(RepositoryError::CharacterNotFound(id))
    }

    fn pool_of_die(&self, id: DieId) -> Result<PoolId, RepositoryError> {
        self.die_index
            .get(&id)
            .copied()
            .ok_or(RepositoryError::DieNotFound(id))
    }

    fn die(&self, id: DieId) -> Result<&PoolDie, RepositoryError> {
        let pool_id = self.pool_of_die(id)?;
        self.pools
            .get(&pool_id)
            .and_then(|pool| pool.die(id))
            .ok_or(RepositoryError::DieNotFound(id))
    }

    fn die_mut(&mut self, id: DieId) -> Result<&mut PoolDie, RepositoryError> {
        let pool_id = self.pool_of_die(id)?;
        self.pools
            .get_mut(&pool_id)
            .and_then(|pool| pool.die_mut(id))
            .ok_or(RepositoryError::DieNotFound(id))
    }
}

/// インメモリ Campaign Repository 実装
///
/// Campaign とそれにぶら下がる全データを保持し、ドメイン層の CampaignRepository trait を
/// 実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemoryCampaignRepository {
    store: Mutex<Store>,
}

impl InMemoryCampaignRepository {
    /// 新しい空の InMemoryCampaignRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn create_campaign(&self, campaign: NewCampaign) -> Result<Campaign, RepositoryError> {
        let mut store = self.store.lock().await;
        let id = issue(&mut store.sequences.campaign, CampaignId::next);
        let campaign = Campaign {
            id,
            name: campaign.name,
            gm_user_id: campaign.gm_user_id,
            current_day: 1,
            created_at: campaign.created_at,
        };
        store.campaigns.insert(id, campaign.clone());
        Ok(campaign)
    }

    async fn get_campaign(&self, id: CampaignId) -> Result<Campaign, RepositoryError> {
        let store = self.store.lock().await;
        store
            .campaigns
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::CampaignNotFound(id))
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let store = self.store.lock().await;
        let mut campaigns: Vec<Campaign> = store.campaigns.values().cloned().collect();
        campaigns.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(campaigns)
    }

    async fn increment_day(&self, id: CampaignId) -> Result<Campaign, RepositoryError> {
        let mut store = self.store.lock().await;
        let campaign = store.campaign_mut(id)?;
        campaign.increment_day();
        Ok(campaign.clone())
    }

    async fn create_character(
        &self,
        character: NewCharacter,
    ) -> Result<Character, RepositoryError> {
        let mut store = self.store.lock().await;
        store.ensure_campaign(character.campaign_id)?;

        let id = issue(&mut store.sequences.character, CharacterId::next);
        let character = Character {
            id,
            campaign_id: character.campaign_id,
            user_id: character.user_id,
            name: character.name,
            skill_name: character.skill_name,
            skill_modifier: character.skill_modifier,
            weakness_name: character.weakness_name,
            weakness_modifier: character.weakness_modifier,
            max_daily_dice: character.max_daily_dice,
            created_at: character.created_at,
        };
        store.characters.insert(id, character.clone());
        Ok(character)
    }

    async fn get_character(&self, id: CharacterId) -> Result<Character, RepositoryError> {
        let store = self.store.lock().await;
        store.character(id).cloned()
    }

    async fn update_character(
        &self,
        id: CharacterId,
        update: CharacterUpdate,
    ) -> Result<Character, RepositoryError> {
        let mut store = self.store.lock().await;
        let character = store
            .characters
            .get_mut(&id)
            .ok_or(RepositoryError::CharacterNotFound(id))?;
        character.apply(update);
        Ok(character.clone())
    }

    async fn list_characters(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Character>, RepositoryError> {
        let store = self.store.lock().await;
        store.ensure_campaign(campaign_id)?;
        Ok(store
            .characters
            .values()
            .filter(|character| character.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    async fn create_pool(
        &self,
        character_id: CharacterId,
        draft: PoolDraft,
        rolled_at: DateTime<Utc>,
    ) -> Result<DicePool, RepositoryError> {
        let mut guard = self.store.lock().await;
        let store = &mut *guard;
        store.character(character_id)?;

        let pool_id = issue(&mut store.sequences.pool, PoolId::next);
        let next_die = &mut store.sequences.die;
        let pool = draft.into_pool(pool_id, character_id, rolled_at, || {
            issue(&mut *next_die, DieId::next)
        });

        for die in &pool.dice {
            store.die_index.insert(die.id, pool_id);
        }
        store.current_pools.insert(character_id, pool_id);
        store.pools.insert(pool_id, pool.clone());
        Ok(pool)
    }

    async fn current_pool(&self, character_id: CharacterId) -> Result<DicePool, RepositoryError> {
        let store = self.store.lock().await;
        store
            .current_pools
            .get(&character_id)
            .and_then(|pool_id| store.pools.get(pool_id))
            .cloned()
            .ok_or(RepositoryError::NoCurrentPool(character_id))
    }

    async fn get_pool(&self, id: PoolId) -> Result<DicePool, RepositoryError> {
        let store = self.store.lock().await;
        store
            .pools
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::PoolNotFound(id))
    }

    async fn get_pool_die(&self, id: DieId) -> Result<PoolDie, RepositoryError> {
        let store = self.store.lock().await;
        store.die(id).cloned()
    }

    async fn mark_die_used(&self, id: DieId) -> Result<PoolDie, RepositoryError> {
        let mut store = self.store.lock().await;
        let die = store.die_mut(id)?;
        die.mark_used()?;
        Ok(die.clone())
    }

    async fn record_roll(&self, roll: NewRollRecord) -> Result<RollRecord, RepositoryError> {
        let mut store = self.store.lock().await;
        store.character(roll.character_id)?;
        store.pool_of_die(roll.pool_dice_id)?;

        let id = issue(&mut store.sequences.roll, RollId::next);
        let record = RollRecord {
            id,
            character_id: roll.character_id,
            pool_dice_id: roll.pool_dice_id,
            secondary_roll: roll.secondary_roll,
            action_type: roll.action_type,
            success: roll.outcome.legacy_success(),
            outcome: roll.outcome,
            notes: roll.notes,
            challenge_id: roll.challenge_id,
            skill_applied: roll.skill_applied,
            other_modifiers: roll.other_modifiers,
            modified_die: roll.modified_die,
            created_at: roll.created_at,
        };
        store.rolls.push(record.clone());
        Ok(record)
    }

    async fn roll_history(
        &self,
        scope: RollHistoryScope,
    ) -> Result<Vec<RollRecord>, RepositoryError> {
        let store = self.store.lock().await;
        let in_scope: Box<dyn Fn(&RollRecord) -> bool + '_> = match scope {
            RollHistoryScope::Character(character_id) => {
                store.character(character_id)?;
                Box::new(move |roll| roll.character_id == character_id)
            }
            RollHistoryScope::Campaign(campaign_id) => {
                store.ensure_campaign(campaign_id)?;
                let characters = &store.characters;
                Box::new(move |roll| {
                    characters
                        .get(&roll.character_id)
                        .is_some_and(|character| character.campaign_id == campaign_id)
                })
            }
        };

        Ok(store
            .rolls
            .iter()
            .rev()
            .filter(|roll| in_scope(roll))
            .take(scope.limit())
            .cloned()
            .collect())
    }

    async fn create_challenge(
        &self,
        challenge: NewChallenge,
    ) -> Result<Challenge, RepositoryError> {
        let mut store = self.store.lock().await;
        store.ensure_campaign(challenge.campaign_id)?;

        let id = issue(&mut store.sequences.challenge, ChallengeId::next);
        let challenge = Challenge {
            id,
            campaign_id: challenge.campaign_id,
            created_by_user_id: challenge.created_by_user_id,
            description: challenge.description,
            difficulty_modifier: challenge.difficulty_modifier,
            is_group_challenge: challenge.is_group_challenge,
            is_active: true,
            created_at: challenge.created_at,
        };
        store.challenges.insert(id, challenge.clone());
        Ok(challenge)
    }

    async fn get_challenge(&self, id: ChallengeId) -> Result<Challenge, RepositoryError> {
        let store = self.store.lock().await;
        store
            .challenges
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::ChallengeNotFound(id))
    }

    async fn complete_challenge(&self, id: ChallengeId) -> Result<Challenge, RepositoryError> {
        let mut store = self.store.lock().await;
        let challenge = store
            .challenges
            .get_mut(&id)
            .ok_or(RepositoryError::ChallengeNotFound(id))?;
        challenge.complete()?;
        Ok(challenge.clone())
    }

    async fn list_challenges(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Challenge>, RepositoryError> {
        let store = self.store.lock().await;
        store.ensure_campaign(campaign_id)?;
        Ok(store
            .challenges
            .values()
            .rev()
            .filter(|challenge| challenge.campaign_id == campaign_id && challenge.is_active)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DicePoolError, DieFace, Outcome, UserId};
    use sleeper_shared::time::{Clock, FixedClock};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryCampaignRepository の各 entity の作成・取得
    // - ダイスプールの「現在のプール」管理と使用済みフラグの一方向性
    // - ロール履歴の並び順と上限
    //
    // 【どのようなシナリオをテストするか】
    // 1. キャンペーン作成と日数の進行
    // 2. 存在しないキャンペーン・キャラクターへの操作（エラーケース）
    // 3. プールの作成で現在のプールが置き換わる
    // 4. ダイスの二重使用（エラーケース）
    // 5. ロール履歴のスコープと上限
    // 6. チャレンジの完了と一覧からの除外
    // ========================================

    fn now() -> DateTime<Utc> {
        FixedClock::from_millis(1_700_000_000_000).now()
    }

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn create_campaign(repo: &InMemoryCampaignRepository, name: &str) -> Campaign {
        repo.create_campaign(NewCampaign {
            name: name.to_string(),
            gm_user_id: user(1),
            created_at: now(),
        })
        .await
        .unwrap()
    }

    async fn create_character(
        repo: &InMemoryCampaignRepository,
        campaign_id: CampaignId,
        name: &str,
    ) -> Character {
        repo.create_character(NewCharacter {
            campaign_id,
            user_id: user(2),
            name: name.to_string(),
            skill_name: Some("Lockpicking".to_string()),
            skill_modifier: 1,
            weakness_name: None,
            weakness_modifier: 0,
            max_daily_dice: 6,
            created_at: now(),
        })
        .await
        .unwrap()
    }

    fn new_roll(character_id: CharacterId, die_id: DieId, secondary: i64) -> NewRollRecord {
        NewRollRecord {
            character_id,
            pool_dice_id: die_id,
            secondary_roll: secondary,
            action_type: None,
            outcome: Outcome::Neutral,
            notes: None,
            challenge_id: None,
            skill_applied: false,
            other_modifiers: 0,
            modified_die: DieFace::new(3).unwrap(),
            created_at: now(),
        }
    }

    #[tokio::test]
    async fn test_create_campaign_and_increment_day() {
        // テスト項目: キャンペーンは 1 日目から始まり、日数を進められる
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;

        // when (操作):
        let updated = repo.increment_day(campaign.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(campaign.id.value(), 1);
        assert_eq!(campaign.current_day, 1);
        assert_eq!(updated.current_day, 2);
        assert_eq!(repo.get_campaign(campaign.id).await.unwrap().current_day, 2);
    }

    #[tokio::test]
    async fn test_missing_campaign_is_not_found() {
        // テスト項目: 存在しないキャンペーンへの操作は CampaignNotFound になる
        let repo = InMemoryCampaignRepository::new();
        let missing = CampaignId::new(99).unwrap();

        assert_eq!(
            repo.get_campaign(missing).await,
            Err(RepositoryError::CampaignNotFound(missing))
        );
        assert_eq!(
            repo.increment_day(missing).await,
            Err(RepositoryError::CampaignNotFound(missing))
        );
        assert_eq!(
            repo.list_characters(missing).await,
            Err(RepositoryError::CampaignNotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_list_campaigns_newest_first() {
        // テスト項目: キャンペーン一覧は新しい順に返る（同時刻なら後に作成した方が先）
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let older = repo
            .create_campaign(NewCampaign {
                name: "Older".to_string(),
                gm_user_id: user(1),
                created_at: now() - chrono::Duration::days(1),
            })
            .await
            .unwrap();
        let first = create_campaign(&repo, "First").await;
        let second = create_campaign(&repo, "Second").await;

        // when (操作):
        let campaigns = repo.list_campaigns().await.unwrap();

        // then (期待する結果):
        assert_eq!(campaigns, vec![second, first, older]);
    }

    #[tokio::test]
    async fn test_update_character_keeps_owner_and_dice() {
        // テスト項目: キャラクター更新は名前・スキル・弱点のみを置き換える
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let character = create_character(&repo, campaign.id, "Ash").await;

        // when (操作):
        let updated = repo
            .update_character(
                character.id,
                CharacterUpdate {
                    name: "Ash the Bold".to_string(),
                    skill_name: Some("Climbing".to_string()),
                    skill_modifier: 2,
                    weakness_name: Some("Fire".to_string()),
                    weakness_modifier: -2,
                },
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(updated.name, "Ash the Bold");
        assert_eq!(updated.skill_modifier, 2);
        assert_eq!(updated.weakness_name.as_deref(), Some("Fire"));
        assert_eq!(updated.user_id, character.user_id);
        assert_eq!(updated.max_daily_dice, character.max_daily_dice);
        assert_eq!(repo.get_character(character.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_character_is_not_found() {
        // テスト項目: 存在しないキャラクターの更新は CharacterNotFound になる
        let repo = InMemoryCampaignRepository::new();
        let missing = CharacterId::new(8).unwrap();

        let result = repo
            .update_character(
                missing,
                CharacterUpdate {
                    name: "Nobody".to_string(),
                    skill_name: None,
                    skill_modifier: 0,
                    weakness_name: None,
                    weakness_modifier: 0,
                },
            )
            .await;

        assert_eq!(result, Err(RepositoryError::CharacterNotFound(missing)));
    }

    #[tokio::test]
    async fn test_list_characters_in_creation_order() {
        // テスト項目: キャラクター一覧はキャンペーンごとに作成順で返る
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let first = create_campaign(&repo, "First").await;
        let second = create_campaign(&repo, "Second").await;
        create_character(&repo, first.id, "Ash").await;
        create_character(&repo, second.id, "Birch").await;
        create_character(&repo, first.id, "Cedar").await;

        // when (操作):
        let names: Vec<String> = repo
            .list_characters(first.id)
            .await
            .unwrap()
            .into_iter()
            .map(|character| character.name)
            .collect();

        // then (期待する結果):
        assert_eq!(names, vec!["Ash", "Cedar"]);
    }

    #[tokio::test]
    async fn test_create_pool_replaces_current_pool() {
        // テスト項目: 新しいプールを作るとそれが現在のプールになる
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let character = create_character(&repo, campaign.id, "Ash").await;
        let first = repo
            .create_pool(character.id, PoolDraft::manual(&[1, 2]).unwrap(), now())
            .await
            .unwrap();

        // when (操作):
        let second = repo
            .create_pool(character.id, PoolDraft::manual(&[4, 6, 2]).unwrap(), now())
            .await
            .unwrap();
        let current = repo.current_pool(character.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(current, second);
        assert_ne!(first.id, second.id);
        let die_ids: Vec<i64> = second.dice.iter().map(|die| die.id.value()).collect();
        assert_eq!(die_ids, vec![3, 4, 5]);
        // 古いプールも ID で取得できる
        assert_eq!(repo.get_pool(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_current_pool_missing() {
        // テスト項目: プール未作成のキャラクターは NoCurrentPool になる
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let character = create_character(&repo, campaign.id, "Ash").await;

        assert_eq!(
            repo.current_pool(character.id).await,
            Err(RepositoryError::NoCurrentPool(character.id))
        );
    }

    #[tokio::test]
    async fn test_create_pool_for_missing_character() {
        // テスト項目: 存在しないキャラクターにはプールを作れない
        let repo = InMemoryCampaignRepository::new();
        let missing = CharacterId::new(5).unwrap();

        let result = repo
            .create_pool(missing, PoolDraft::manual(&[3]).unwrap(), now())
            .await;

        assert_eq!(result, Err(RepositoryError::CharacterNotFound(missing)));
    }

    #[tokio::test]
    async fn test_mark_die_used_once() {
        // テスト項目: ダイスは一度だけ使用済みにでき、二度目はエラーになる
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let character = create_character(&repo, campaign.id, "Ash").await;
        let pool = repo
            .create_pool(character.id, PoolDraft::manual(&[5, 2]).unwrap(), now())
            .await
            .unwrap();
        let die_id = pool.dice[0].id;

        // when (操作):
        let used = repo.mark_die_used(die_id).await.unwrap();
        let second = repo.mark_die_used(die_id).await;

        // then (期待する結果):
        assert!(used.is_used);
        assert_eq!(used.die_result.value(), 5);
        assert_eq!(
            second,
            Err(RepositoryError::DicePool(DicePoolError::DieAlreadyUsed(die_id)))
        );
        let current = repo.current_pool(character.id).await.unwrap();
        assert_eq!(current.remaining(), 1);
        assert!(repo.get_pool_die(die_id).await.unwrap().is_used);
    }

    #[tokio::test]
    async fn test_unknown_die_is_not_found() {
        // テスト項目: 存在しないダイス ID は DieNotFound になる
        let repo = InMemoryCampaignRepository::new();
        let missing = DieId::new(42).unwrap();

        assert_eq!(
            repo.mark_die_used(missing).await,
            Err(RepositoryError::DieNotFound(missing))
        );
        assert_eq!(
            repo.get_pool_die(missing).await,
            Err(RepositoryError::DieNotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_record_roll_sets_legacy_success() {
        // テスト項目: 記録したロールには outcome から導出した success が入る
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let character = create_character(&repo, campaign.id, "Ash").await;
        let pool = repo
            .create_pool(character.id, PoolDraft::manual(&[6]).unwrap(), now())
            .await
            .unwrap();
        let mut roll = new_roll(character.id, pool.dice[0].id, 4);
        roll.outcome = Outcome::Success;

        // when (操作):
        let record = repo.record_roll(roll).await.unwrap();

        // then (期待する結果):
        assert_eq!(record.id.value(), 1);
        assert_eq!(record.success, Some(true));
        assert_eq!(record.outcome, Outcome::Success);
    }

    #[tokio::test]
    async fn test_roll_history_scopes_newest_first() {
        // テスト項目: ロール履歴は新しい順で、キャラクター/キャンペーン単位で絞り込まれる
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let other_campaign = create_campaign(&repo, "Other").await;
        let ash = create_character(&repo, campaign.id, "Ash").await;
        let birch = create_character(&repo, campaign.id, "Birch").await;
        let stranger = create_character(&repo, other_campaign.id, "Stranger").await;
        for character in [&ash, &birch, &stranger] {
            let pool = repo
                .create_pool(character.id, PoolDraft::manual(&[3, 3]).unwrap(), now())
                .await
                .unwrap();
            for die in &pool.dice {
                repo.record_roll(new_roll(character.id, die.id, 10))
                    .await
                    .unwrap();
            }
        }

        // when (操作):
        let by_character = repo
            .roll_history(RollHistoryScope::Character(ash.id))
            .await
            .unwrap();
        let by_campaign = repo
            .roll_history(RollHistoryScope::Campaign(campaign.id))
            .await
            .unwrap();

        // then (期待する結果):
        let ids = |rolls: &[RollRecord]| rolls.iter().map(|r| r.id.value()).collect::<Vec<_>>();
        assert_eq!(ids(&by_character), vec![2, 1]);
        assert_eq!(ids(&by_campaign), vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_roll_history_is_capped() {
        // テスト項目: キャラクター単位の履歴は 50 件までに制限される
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let character = create_character(&repo, campaign.id, "Ash").await;
        let pool = repo
            .create_pool(character.id, PoolDraft::manual(&[2]).unwrap(), now())
            .await
            .unwrap();
        for _ in 0..60 {
            repo.record_roll(new_roll(character.id, pool.dice[0].id, 1))
                .await
                .unwrap();
        }

        // when (操作):
        let history = repo
            .roll_history(RollHistoryScope::Character(character.id))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].id.value(), 60);
        assert_eq!(history[49].id.value(), 11);
    }

    #[tokio::test]
    async fn test_complete_challenge_hides_it_from_list() {
        // テスト項目: 完了したチャレンジは一覧から外れ、二度目の完了はエラーになる
        // given (前提条件):
        let repo = InMemoryCampaignRepository::new();
        let campaign = create_campaign(&repo, "Sleeper").await;
        let new_challenge = |description: &str| NewChallenge {
            campaign_id: campaign.id,
            created_by_user_id: user(1),
            description: description.to_string(),
            difficulty_modifier: -1,
            is_group_challenge: false,
            created_at: now(),
        };
        let bridge = repo
            .create_challenge(new_challenge("Cross the bridge"))
            .await
            .unwrap();
        let gate = repo
            .create_challenge(new_challenge("Open the gate"))
            .await
            .unwrap();

        // when (操作):
        let completed = repo.complete_challenge(bridge.id).await.unwrap();
        let again = repo.complete_challenge(bridge.id).await;
        let active = repo.list_challenges(campaign.id).await.unwrap();

        // then (期待する結果):
        assert!(bridge.is_active);
        assert!(!completed.is_active);
        assert!(matches!(again, Err(RepositoryError::ChallengeState(_))));
        assert_eq!(active, vec![gate]);
        assert_eq!(repo.get_challenge(bridge.id).await, Ok(completed));
        let missing = ChallengeId::new(99).unwrap();
        assert_eq!(
            repo.get_challenge(missing).await,
            Err(RepositoryError::ChallengeNotFound(missing))
        );
    }
}
