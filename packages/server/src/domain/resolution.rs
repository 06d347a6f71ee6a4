//! Dice resolution engine.
//!
//! A roll combines a d6 taken from the character's pool with a secondary d20. The d6 is
//! adjusted by the character's skill modifier (when the player applies the skill) and by any
//! other situational modifiers, clamped back onto the die faces, and then graded against the
//! d20 using a fixed threshold table:
//!
//! | modified d6 | success        | neutral        | otherwise |
//! |-------------|----------------|----------------|-----------|
//! | 6           | always         |                |           |
//! | 5           | d20 >= 11      | d20 <= 10      |           |
//! | 3, 4        | d20 >= 16      | d20 >= 6       | failure   |
//! | 1, 2        |                | d20 >= 11      | failure   |
//!
//! The secondary roll is compared as given. Values outside 1..=20 are not rejected; they
//! land in whichever tier the comparisons above select.

use serde::{Deserialize, Serialize};

use super::value_object::{DIE_MAX, DIE_MIN, DieFace};

/// Graded result of a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Neutral,
    Failure,
}

impl Outcome {
    /// The pre-tier boolean kept for older clients: `Some(true)` for success,
    /// `Some(false)` for failure and `None` for neutral.
    pub fn legacy_success(self) -> Option<bool> {
        match self {
            Outcome::Success => Some(true),
            Outcome::Failure => Some(false),
            Outcome::Neutral => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Neutral => "neutral",
            Outcome::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to resolve one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollInput {
    pub base_die: DieFace,
    pub skill_applied: bool,
    pub skill_modifier: i64,
    pub other_modifiers: i64,
    pub secondary_roll: i64,
}

/// Result of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollOutcome {
    pub modified_die: DieFace,
    pub outcome: Outcome,
}

impl RollOutcome {
    pub fn legacy_success(&self) -> Option<bool> {
        self.outcome.legacy_success()
    }
}

/// Apply modifiers to the base die and clamp the sum onto 1..=6.
///
/// The skill modifier only counts when `skill_applied` is set. Saturating arithmetic keeps
/// extreme modifiers from wrapping around.
pub fn modified_die(
    base_die: DieFace,
    skill_applied: bool,
    skill_modifier: i64,
    other_modifiers: i64,
) -> DieFace {
    let skill = if skill_applied { skill_modifier } else { 0 };
    // i128 holds the exact sum of three i64 values.
    let total = i128::from(base_die.value()) + i128::from(skill) + i128::from(other_modifiers);
    let clamped = total.clamp(i128::from(DIE_MIN), i128::from(DIE_MAX)) as i64;
    DieFace::clamped(clamped)
}

/// Grade a modified die against the secondary roll.
pub fn grade(modified_die: DieFace, secondary_roll: i64) -> Outcome {
    match modified_die.value() {
        6 => Outcome::Success,
        5 if secondary_roll >= 11 => Outcome::Success,
        5 => Outcome::Neutral,
        3 | 4 if secondary_roll >= 16 => Outcome::Success,
        3 | 4 if secondary_roll >= 6 => Outcome::Neutral,
        3 | 4 => Outcome::Failure,
        _ if secondary_roll >= 11 => Outcome::Neutral,
        _ => Outcome::Failure,
    }
}

/// Resolve a roll. Deterministic and side-effect free.
pub fn resolve(input: &RollInput) -> RollOutcome {
    let modified_die = modified_die(
        input.base_die,
        input.skill_applied,
        input.skill_modifier,
        input.other_modifiers,
    );
    RollOutcome {
        modified_die,
        outcome: grade(modified_die, input.secondary_roll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(value: i64) -> DieFace {
        DieFace::new(value).unwrap()
    }

    fn input(base: i64, secondary_roll: i64) -> RollInput {
        RollInput {
            base_die: face(base),
            skill_applied: false,
            skill_modifier: 0,
            other_modifiers: 0,
            secondary_roll,
        }
    }

    #[test]
    fn test_six_always_succeeds() {
        // テスト項目: 修正後の d6 が 6 ならば d20 に関係なく成功
        for secondary_roll in [-50, 0, 1, 5, 10, 11, 20, 99] {
            assert_eq!(grade(face(6), secondary_roll), Outcome::Success);
        }
    }

    #[test]
    fn test_five_threshold() {
        // テスト項目: d6 = 5 は d20 >= 11 で成功、それ以外は中立
        assert_eq!(grade(face(5), 11), Outcome::Success);
        assert_eq!(grade(face(5), 20), Outcome::Success);
        assert_eq!(grade(face(5), 10), Outcome::Neutral);
        assert_eq!(grade(face(5), 1), Outcome::Neutral);
    }

    #[test]
    fn test_three_and_four_thresholds() {
        // テスト項目: d6 = 3, 4 は d20 >= 16 で成功、>= 6 で中立、それ以外は失敗
        for die in [3, 4] {
            assert_eq!(grade(face(die), 16), Outcome::Success);
            assert_eq!(grade(face(die), 15), Outcome::Neutral);
            assert_eq!(grade(face(die), 6), Outcome::Neutral);
            assert_eq!(grade(face(die), 5), Outcome::Failure);
        }
    }

    #[test]
    fn test_one_and_two_thresholds() {
        // テスト項目: d6 = 1, 2 は成功しない。d20 >= 11 で中立、それ以外は失敗
        for die in [1, 2] {
            assert_eq!(grade(face(die), 20), Outcome::Neutral);
            assert_eq!(grade(face(die), 11), Outcome::Neutral);
            assert_eq!(grade(face(die), 10), Outcome::Failure);
        }
    }

    #[test]
    fn test_out_of_range_secondary_roll_follows_comparisons() {
        // テスト項目: 1..=20 の範囲外の d20 もそのまま比較される
        assert_eq!(grade(face(3), 100), Outcome::Success);
        assert_eq!(grade(face(3), 0), Outcome::Failure);
        assert_eq!(grade(face(1), 25), Outcome::Neutral);
    }

    #[test]
    fn test_modified_die_applies_skill_only_when_requested() {
        // テスト項目: スキル修正値は skill_applied のときだけ加算される
        assert_eq!(modified_die(face(3), true, 2, 0).value(), 5);
        assert_eq!(modified_die(face(3), false, 2, 0).value(), 3);
        assert_eq!(modified_die(face(3), false, 2, -1).value(), 2);
        assert_eq!(modified_die(face(3), true, 2, -1).value(), 4);
    }

    #[test]
    fn test_modified_die_sums_exactly_when_modifiers_overflow() {
        // テスト項目: 修正値の合計が i64 を超える途中経過でも、最終的な和で丸められる
        // given (前提条件): 3 + i64::MAX + i64::MIN = 2
        let base = face(3);

        // when (操作):
        let result = modified_die(base, true, i64::MAX, i64::MIN);

        // then (期待する結果):
        assert_eq!(result.value(), 2);
        assert_eq!(modified_die(face(1), true, i64::MIN, i64::MAX).value(), 1);
        assert_eq!(modified_die(face(6), true, i64::MIN, i64::MAX).value(), 5);
    }

    #[test]
    fn test_modified_die_clamps_every_integer_input() {
        // テスト項目: 修正後の値は常に 1..=6 に収まる（オーバーフローも含む）
        for base in 1..=6 {
            for skill in [-1000, -7, -1, 0, 1, 7, 1000, i64::MIN, i64::MAX] {
                for other in [-1000, -3, 0, 3, 1000, i64::MIN, i64::MAX] {
                    for applied in [true, false] {
                        let result = modified_die(face(base), applied, skill, other);
                        let expected = (base as i128
                            + if applied { skill as i128 } else { 0 }
                            + other as i128)
                            .clamp(1, 6);
                        assert_eq!(i128::from(result.value()), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_legacy_success_mapping() {
        // テスト項目: 旧来の success フラグは成功=true、失敗=false、中立=None
        assert_eq!(Outcome::Success.legacy_success(), Some(true));
        assert_eq!(Outcome::Failure.legacy_success(), Some(false));
        assert_eq!(Outcome::Neutral.legacy_success(), None);
    }

    #[test]
    fn test_resolve_combines_modifiers_and_grading() {
        // テスト項目: resolve が修正と判定を組み合わせて結果を返す
        // given (前提条件): 基本値 2 + スキル 3 = 5、d20 = 12
        let roll = RollInput {
            skill_applied: true,
            skill_modifier: 3,
            ..input(2, 12)
        };

        // when (操作):
        let result = resolve(&roll);

        // then (期待する結果):
        assert_eq!(result.modified_die.value(), 5);
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.legacy_success(), Some(true));
    }

    #[test]
    fn test_resolve_clamps_before_grading() {
        // テスト項目: 下限を下回る修正は 1 に丸めてから判定される
        let roll = RollInput {
            other_modifiers: -10,
            ..input(4, 10)
        };

        let result = resolve(&roll);

        assert_eq!(result.modified_die.value(), 1);
        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(result.legacy_success(), Some(false));
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        // テスト項目: Outcome は小文字の文字列としてシリアライズされる
        assert_eq!(
            serde_json::to_string(&Outcome::Neutral).unwrap(),
            "\"neutral\""
        );
    }
}
