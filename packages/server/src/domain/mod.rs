//! Domain layer: value objects, entities, the dice engine and the ports the
//! use cases depend on.

pub mod broadcaster;
pub mod dice_pool;
pub mod entity;
pub mod error;
pub mod event;
pub mod repository;
pub mod resolution;
pub mod value_object;

pub use broadcaster::SessionBroadcaster;
#[cfg(test)]
pub use broadcaster::MockSessionBroadcaster;
pub use dice_pool::{DEFAULT_MAX_DAILY_DICE, DicePool, MAX_DAILY_DICE, PoolDie, PoolDraft};
pub use entity::{
    Campaign, Challenge, Character, CharacterUpdate, NewCampaign, NewChallenge, NewCharacter,
    NewRollRecord, RollHistoryScope, RollRecord,
};
pub use error::{ChallengeStateError, DicePoolError, RepositoryError, ValueObjectError};
pub use event::{
    ChallengeAction, ChallengeUpdatePayload, DayIncrementedPayload, DicePoolUpdatedPayload,
    MessageType, RollCompletePayload, SessionEvent, SessionMessage,
};
pub use repository::CampaignRepository;
pub use resolution::{Outcome, RollInput, RollOutcome, grade, modified_die, resolve};
pub use value_object::{
    CampaignId, ChallengeId, CharacterId, ConnectionId, DieFace, DieId, PoolId, RollId, UserId,
};
