//! UseCase: キャンペーンの作成・一覧と日数の進行

use std::sync::Arc;

use sleeper_shared::time::Clock;

use crate::domain::{
    Campaign, CampaignId, CampaignRepository, DayIncrementedPayload, NewCampaign,
    SessionBroadcaster, SessionEvent, SessionMessage, UserId,
};

use super::error::CampaignError;

/// キャンペーンのユースケース
pub struct CampaignUseCase {
    repository: Arc<dyn CampaignRepository>,
    broadcaster: Arc<dyn SessionBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl CampaignUseCase {
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

    pub async fn create(&self, name: &str, gm_user_id: UserId) -> Result<Campaign, CampaignError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CampaignError::EmptyName);
        }
        let campaign = self
            .repository
            .create_campaign(NewCampaign {
                name: name.to_string(),
                gm_user_id,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!("Campaign {} '{}' created", campaign.id, campaign.name);
        Ok(campaign)
    }

    pub async fn get(&self, id: CampaignId) -> Result<Campaign, CampaignError> {
        Ok(self.repository.get_campaign(id).await?)
    }

    /// All campaigns, newest first.
    pub async fn list(&self) -> Result<Vec<Campaign>, CampaignError> {
        Ok(self.repository.list_campaigns().await?)
    }

    /// Advance the in-game day and announce it to the campaign room.
    pub async fn increment_day(&self, id: CampaignId) -> Result<Campaign, CampaignError> {
        let campaign = self.repository.increment_day(id).await?;
        tracing::info!("Campaign {} advanced to day {}", id, campaign.current_day);

        self.broadcaster.broadcast(SessionMessage::new(
            campaign.id,
            SessionEvent::DayIncremented(DayIncrementedPayload {
                campaign_id: campaign.id,
                current_day: campaign.current_day,
            }),
        ));

        Ok(campaign)
    }
}
