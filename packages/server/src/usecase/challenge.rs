//! UseCase: GM が出すチャレンジ

use std::sync::Arc;

use sleeper_shared::time::Clock;

use crate::domain::{
    CampaignId, CampaignRepository, Challenge, ChallengeAction, ChallengeId,
    ChallengeUpdatePayload, NewChallenge, SessionBroadcaster, SessionEvent, SessionMessage, UserId,
};

use super::error::ChallengeError;

/// Fields supplied when posing a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeDraft {
    pub campaign_id: CampaignId,
    pub created_by_user_id: UserId,
    pub description: String,
    pub difficulty_modifier: i64,
    pub is_group_challenge: bool,
}

/// チャレンジのユースケース
pub struct ChallengeUseCase {
    repository: Arc<dyn CampaignRepository>,
    broadcaster: Arc<dyn SessionBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl ChallengeUseCase {
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

    pub async fn create(&self, draft: ChallengeDraft) -> Result<Challenge, ChallengeError> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(ChallengeError::EmptyDescription);
        }
        let challenge = self
            .repository
            .create_challenge(NewChallenge {
                campaign_id: draft.campaign_id,
                created_by_user_id: draft.created_by_user_id,
                description: description.to_string(),
                difficulty_modifier: draft.difficulty_modifier,
                is_group_challenge: draft.is_group_challenge,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(
            "Challenge {} posed in campaign {}",
            challenge.id,
            challenge.campaign_id
        );
        self.announce(ChallengeAction::Created, &challenge);
        Ok(challenge)
    }

    pub async fn complete(&self, id: ChallengeId) -> Result<Challenge, ChallengeError> {
        let challenge = self.repository.complete_challenge(id).await?;
        tracing::info!("Challenge {} completed", challenge.id);
        self.announce(ChallengeAction::Completed, &challenge);
        Ok(challenge)
    }

    /// Active challenges of the campaign, newest first.
    pub async fn list(&self, campaign_id: CampaignId) -> Result<Vec<Challenge>, ChallengeError> {
        Ok(self.repository.list_challenges(campaign_id).await?)
    }

    fn announce(&self, action: ChallengeAction, challenge: &Challenge) {
        self.broadcaster.broadcast(SessionMessage::new(
            challenge.campaign_id,
            SessionEvent::ChallengeUpdate(ChallengeUpdatePayload {
                action,
                challenge: challenge.clone(),
            }),
        ));
    }
}
