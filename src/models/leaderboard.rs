// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard view models.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One row of the leaderboard. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    /// 1-based, unique within one ranking computation
    pub position: u32,
    pub user_id: String,
    pub display_name: String,
    pub avatar: String,
    pub xp: u32,
    pub streak: u32,
}

/// A user's position on the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRank {
    Ranked(u32),
    Unranked,
}

impl UserRank {
    pub fn position(self) -> Option<u32> {
        match self {
            UserRank::Ranked(position) => Some(position),
            UserRank::Unranked => None,
        }
    }
}
