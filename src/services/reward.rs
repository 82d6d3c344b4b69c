// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward calculation for identification attempts.
//!
//! Confidence is a plain percentage. XP is kept small (0-10) so that frequent
//! identifications stay a supplement to completing stories.

use crate::models::Reward;

/// Convert a raw top-result score into confidence and XP.
///
/// The score is clamped into [0, 1] first (NaN counts as 0). Both values use
/// round-half-up.
pub fn calculate_reward(raw_score: f64) -> Reward {
    let score = if raw_score.is_nan() {
        0.0
    } else {
        raw_score.clamp(0.0, 1.0)
    };

    Reward {
        confidence_percent: round_half_up(score * 100.0),
        xp_earned: round_half_up(score * 10.0),
    }
}

fn round_half_up(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typical_score() {
        let reward = calculate_reward(0.92);
        assert_eq!(reward.confidence_percent, 92);
        assert_eq!(reward.xp_earned, 9);
    }

    #[test]
    fn test_zero_score() {
        let reward = calculate_reward(0.0);
        assert_eq!(reward.confidence_percent, 0);
        assert_eq!(reward.xp_earned, 0);
    }

    #[test]
    fn test_perfect_score() {
        let reward = calculate_reward(1.0);
        assert_eq!(reward.confidence_percent, 100);
        assert_eq!(reward.xp_earned, 10);
    }

    #[test]
    fn test_halves_round_up() {
        // 0.25 and 0.125 are exact in binary
        assert_eq!(calculate_reward(0.25).xp_earned, 3);
        assert_eq!(calculate_reward(0.125).confidence_percent, 13);
        assert_eq!(calculate_reward(0.125).xp_earned, 1);
        assert_eq!(calculate_reward(0.5).xp_earned, 5);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(
            calculate_reward(1.7),
            Reward {
                confidence_percent: 100,
                xp_earned: 10
            }
        );
        assert_eq!(
            calculate_reward(-0.3),
            Reward {
                confidence_percent: 0,
                xp_earned: 0
            }
        );
    }

    #[test]
    fn test_nan_score_is_zero() {
        let reward = calculate_reward(f64::NAN);
        assert_eq!(reward.confidence_percent, 0);
        assert_eq!(reward.xp_earned, 0);
    }
}
