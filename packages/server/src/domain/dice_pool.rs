//! Dice pools: a character's batch of d6 results, consumed one die per roll.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    error::DicePoolError,
    value_object::{CharacterId, DIE_MAX, DIE_MIN, DieFace, DieId, PoolId},
};

/// Default number of dice a character rolls per day.
pub const DEFAULT_MAX_DAILY_DICE: u32 = 6;

/// Largest pool a character may roll, at random or by hand.
pub const MAX_DAILY_DICE: u32 = 100;

/// Die results for a pool that has not been stored yet.
///
/// Either rolled at random or entered by hand from physical dice. The order of `results`
/// becomes the 1-based position of each die.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDraft {
    results: Vec<DieFace>,
}

impl PoolDraft {
    /// Roll `count` dice uniformly from 1..=6.
    pub fn random<R: Rng>(count: u32, rng: &mut R) -> Result<Self, DicePoolError> {
        if count == 0 {
            return Err(DicePoolError::EmptyPool);
        }
        if count > MAX_DAILY_DICE {
            return Err(DicePoolError::TooManyDice {
                count: count as usize,
                max: MAX_DAILY_DICE,
            });
        }
        let results = (0..count)
            .map(|_| DieFace::clamped(i64::from(rng.random_range(DIE_MIN..=DIE_MAX))))
            .collect();
        Ok(Self { results })
    }

    /// Build a pool from manually entered results.
    ///
    /// The whole draft is rejected if the list is empty, longer than [`MAX_DAILY_DICE`], or any
    /// value is outside 1..=6.
    pub fn manual(values: &[i64]) -> Result<Self, DicePoolError> {
        if values.is_empty() {
            return Err(DicePoolError::EmptyPool);
        }
        if values.len() > MAX_DAILY_DICE as usize {
            return Err(DicePoolError::TooManyDice {
                count: values.len(),
                max: MAX_DAILY_DICE,
            });
        }
        let results = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                DieFace::new(value).map_err(|_| DicePoolError::DieOutOfRange {
                    position: index + 1,
                    value,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { results })
    }

    pub fn results(&self) -> &[DieFace] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Turn the draft into a stored pool, taking one die id per result from `die_ids`.
    pub fn into_pool(
        self,
        id: PoolId,
        character_id: CharacterId,
        rolled_at: DateTime<Utc>,
        mut die_ids: impl FnMut() -> DieId,
    ) -> DicePool {
        let dice = self
            .results
            .into_iter()
            .enumerate()
            .map(|(index, die_result)| PoolDie {
                id: die_ids(),
                pool_id: id,
                die_result,
                is_used: false,
                position: index as u32 + 1,
            })
            .collect();
        DicePool {
            id,
            character_id,
            rolled_at,
            dice,
        }
    }
}

/// One die in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDie {
    pub id: DieId,
    pub pool_id: PoolId,
    pub die_result: DieFace,
    pub is_used: bool,
    /// 1-based position within the pool.
    pub position: u32,
}

impl PoolDie {
    /// Consume the die. A die can be used once; the result is never changed.
    pub fn mark_used(&mut self) -> Result<(), DicePoolError> {
        if self.is_used {
            return Err(DicePoolError::DieAlreadyUsed(self.id));
        }
        self.is_used = true;
        Ok(())
    }
}

/// A stored pool together with its dice, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    pub id: PoolId,
    pub character_id: CharacterId,
    pub rolled_at: DateTime<Utc>,
    pub dice: Vec<PoolDie>,
}

impl DicePool {
    pub fn die(&self, die_id: DieId) -> Option<&PoolDie> {
        self.dice.iter().find(|die| die.id == die_id)
    }

    pub fn die_mut(&mut self, die_id: DieId) -> Option<&mut PoolDie> {
        self.dice.iter_mut().find(|die| die.id == die_id)
    }

    /// Number of dice not yet consumed.
    pub fn remaining(&self) -> usize {
        self.dice.iter().filter(|die| !die.is_used).count()
    }
}
