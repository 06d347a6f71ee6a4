//! Value objects shared across the domain.
//!
//! Identifiers are positive integers assigned by the store. They are validated on
//! construction and on deserialization, so a value of one of these types is always
//! well-formed.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Create an identifier, rejecting zero and negative values.
            pub fn new(value: i64) -> Result<Self, ValueObjectError> {
                if value <= 0 {
                    return Err(ValueObjectError::NonPositiveId {
                        kind: $label,
                        value,
                    });
                }
                Ok(Self(value))
            }

            pub fn value(&self) -> i64 {
                self.0
            }

            /// First identifier handed out by a store.
            pub const FIRST: Self = Self(1);

            /// The identifier following this one.
            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl TryFrom<i64> for $name {
            type Error = ValueObjectError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValueObjectError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|_| ValueObjectError::Malformed {
                    kind: $label,
                    input: s.to_string(),
                })?;
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Campaign identifier. Also identifies the campaign's session room.
    CampaignId,
    "campaign id"
);
entity_id!(
    /// User identifier, supplied by the caller when joining a session.
    UserId,
    "user id"
);
entity_id!(CharacterId, "character id");
entity_id!(PoolId, "pool id");
entity_id!(DieId, "die id");
entity_id!(RollId, "roll id");
entity_id!(ChallengeId, "challenge id");

/// Lowest face of a six-sided die.
pub const DIE_MIN: u8 = 1;
/// Highest face of a six-sided die.
pub const DIE_MAX: u8 = 6;

/// The face value of a six-sided die, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct DieFace(u8);

impl DieFace {
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        if !(i64::from(DIE_MIN)..=i64::from(DIE_MAX)).contains(&value) {
            return Err(ValueObjectError::DieOutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Clamp an arbitrary integer onto the die faces.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(DIE_MIN), i64::from(DIE_MAX)) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for DieFace {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> Self {
        face.0
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one live session connection.
///
/// A user may hold several connections to the same campaign; each gets its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
