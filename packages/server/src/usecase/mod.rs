//! UseCase 層
//!
//! 各ユースケースは Repository に永続化してから、SessionBroadcaster でキャンペーンの
//! ルームへイベントを配信します。

pub mod campaign;
pub mod challenge;
pub mod character;
pub mod dice_pool;
pub mod error;
pub mod record_roll;

pub use campaign::CampaignUseCase;
pub use challenge::{ChallengeDraft, ChallengeUseCase};
pub use character::{CharacterProfile, CharacterUseCase};
pub use dice_pool::DicePoolUseCase;
pub use error::{
    CampaignError, ChallengeError, CharacterError, DicePoolUseCaseError, RecordRollError,
};
pub use record_roll::{RecordRollUseCase, RollRequest};
