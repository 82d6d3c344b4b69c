// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ranking.
//!
//! Stateless: every call ranks the snapshots it is given.

use crate::models::{LeaderboardEntry, ProgressionState, UserRank};
use std::cmp::Ordering;

/// Leaderboard order: XP desc, streak desc, earliest registration, user id.
fn compare(a: &ProgressionState, b: &ProgressionState) -> Ordering {
    b.xp()
        .cmp(&a.xp())
        .then_with(|| b.streak().cmp(&a.streak()))
        .then_with(|| a.registration_seq().cmp(&b.registration_seq()))
        .then_with(|| a.user_id().cmp(b.user_id()))
}

/// Rank every user. Positions are 1-based with no gaps and no shared ranks.
pub fn rank_users(states: &[ProgressionState]) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&ProgressionState> = states.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, state)| LeaderboardEntry {
            position: i as u32 + 1,
            user_id: state.user_id().to_string(),
            display_name: state.display_name().to_string(),
            avatar: state.avatar().to_string(),
            xp: state.xp(),
            streak: state.streak(),
        })
        .collect()
}

/// Position of `user_id` among `states`.
///
/// Counts the users that sort ahead instead of building the whole board.
pub fn user_rank(states: &[ProgressionState], user_id: &str) -> UserRank {
    let Some(user) = states.iter().find(|s| s.user_id() == user_id) else {
        return UserRank::Unranked;
    };

    let ahead = states
        .iter()
        .filter(|other| compare(other, user) == Ordering::Less)
        .count();
    UserRank::Ranked(ahead as u32 + 1)
}
