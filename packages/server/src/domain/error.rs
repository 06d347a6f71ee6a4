//! Domain errors.

use thiserror::Error;

use super::value_object::{CampaignId, ChallengeId, CharacterId, DieId, PoolId};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{kind} must be a positive integer, got {value}")]
    NonPositiveId { kind: &'static str, value: i64 },

    #[error("{kind} is not an integer: '{input}'")]
    Malformed { kind: &'static str, input: String },

    #[error("die results must be between 1 and 6, got {0}")]
    DieOutOfRange(i64),
}

/// Dice pool errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DicePoolError {
    /// A manual pool was submitted without any dice.
    #[error("at least one die result required")]
    EmptyPool,

    /// A manual die result lies outside 1..=6.
    #[error("die at position {position} must be between 1 and 6, got {value}")]
    DieOutOfRange { position: usize, value: i64 },

    /// More dice than a pool may hold.
    #[error("a pool holds at most {max} dice, got {count}")]
    TooManyDice { count: usize, max: u32 },

    /// The die has already been consumed by a roll.
    #[error("die {0} has already been used")]
    DieAlreadyUsed(DieId),
}

/// Challenge state errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeStateError {
    #[error("challenge {0} is already completed")]
    AlreadyCompleted(ChallengeId),
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("campaign {0} not found")]
    CampaignNotFound(CampaignId),

    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),

    #[error("no dice pool found for character {0}")]
    NoCurrentPool(CharacterId),

    #[error("dice pool {0} not found")]
    PoolNotFound(PoolId),

    #[error("pool die {0} not found")]
    DieNotFound(DieId),

    #[error("challenge {0} not found")]
    ChallengeNotFound(ChallengeId),

    #[error(transparent)]
    DicePool(#[from] DicePoolError),

    #[error(transparent)]
    ChallengeState(#[from] ChallengeStateError),
}
