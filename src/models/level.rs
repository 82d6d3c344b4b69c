// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Experience levels derived from XP.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Level ladder as (minimum XP, title), ascending.
pub const LEVELS: &[(u32, &str)] = &[
    (0, "Seedling"),
    (250, "Sapling"),
    (500, "Nature Explorer"),
    (1000, "Expert Explorer"),
    (1500, "Master Naturalist"),
];

/// Where a user stands on the level ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LevelProgress {
    /// 1-based level number
    pub level: u32,
    pub title: String,
    pub next_title: Option<String>,
    /// XP required for the next level (None at the top of the ladder)
    pub next_level_xp: Option<u32>,
    pub xp_to_next: Option<u32>,
}

impl LevelProgress {
    pub fn for_xp(xp: u32) -> Self {
        let index = LEVELS
            .iter()
            .rposition(|(min, _)| xp >= *min)
            .unwrap_or(0);
        let next = LEVELS.get(index + 1);

        Self {
            level: index as u32 + 1,
            title: LEVELS[index].1.to_string(),
            next_title: next.map(|(_, title)| title.to_string()),
            next_level_xp: next.map(|(min, _)| *min),
            xp_to_next: next.map(|(min, _)| min - xp),
        }
    }
}
