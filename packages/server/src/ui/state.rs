//! Shared application state.

use std::sync::Arc;

use sleeper_shared::time::Clock;

use crate::{
    domain::{CampaignRepository, SessionBroadcaster},
    infrastructure::{
        hub::{ConnectionConfig, SessionHub},
        repository::InMemoryCampaignRepository,
    },
    usecase::{
        CampaignUseCase, ChallengeUseCase, CharacterUseCase, DicePoolUseCase, RecordRollUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub campaign_usecase: CampaignUseCase,
    pub character_usecase: CharacterUseCase,
    pub dice_pool_usecase: DicePoolUseCase,
    pub record_roll_usecase: RecordRollUseCase,
    pub challenge_usecase: ChallengeUseCase,
    /// Session hub（WebSocket 接続の登録先）
    pub hub: SessionHub,
    /// Per-connection limits applied to every new WebSocket
    pub connection_config: ConnectionConfig,
}

impl AppState {
    /// Wire every use case to the given repository, with the hub as broadcaster.
    pub fn new(
        repository: Arc<dyn CampaignRepository>,
        hub: SessionHub,
        clock: Arc<dyn Clock>,
        connection_config: ConnectionConfig,
    ) -> Self {
        let broadcaster: Arc<dyn SessionBroadcaster> = Arc::new(hub.clone());
        Self {
            campaign_usecase: CampaignUseCase::new(
                repository.clone(),
                broadcaster.clone(),
                clock.clone(),
            ),
            character_usecase: CharacterUseCase::new(repository.clone(), clock.clone()),
            dice_pool_usecase: DicePoolUseCase::new(
                repository.clone(),
                broadcaster.clone(),
                clock.clone(),
            ),
            record_roll_usecase: RecordRollUseCase::new(
                repository.clone(),
                broadcaster.clone(),
                clock.clone(),
            ),
            challenge_usecase: ChallengeUseCase::new(repository, broadcaster, clock),
            hub,
            connection_config,
        }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory(
        hub: SessionHub,
        clock: Arc<dyn Clock>,
        connection_config: ConnectionConfig,
    ) -> Self {
        Self::new(
            Arc::new(InMemoryCampaignRepository::new()),
            hub,
            clock,
            connection_config,
        )
    }
}
