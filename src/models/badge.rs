// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badges awarded for progression milestones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Streak length that earns the "Streak Keeper" badge.
pub const STREAK_KEEPER_DAYS: u32 = 7;

/// Prefix for per-section mastery badge ids.
const SECTION_MASTER_PREFIX: &str = "section_master:";

/// A badge held by a user. Badges are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub awarded_at: DateTime<Utc>,
}

/// Badge rules evaluated after every progression mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeKind {
    /// First identification recorded
    FirstDiscovery,
    /// First story completed
    FirstStory,
    /// Streak reached [`STREAK_KEEPER_DAYS`]
    StreakKeeper,
    /// First bonus unit completed
    BonusHunter,
    /// Every unit of a section completed
    SectionMaster(String),
}

impl BadgeKind {
    /// Stable identifier stored in the user's badge set.
    pub fn id(&self) -> String {
        match self {
            BadgeKind::FirstDiscovery => "first_discovery".to_string(),
            BadgeKind::FirstStory => "first_story".to_string(),
            BadgeKind::StreakKeeper => "streak_keeper".to_string(),
            BadgeKind::BonusHunter => "bonus_hunter".to_string(),
            BadgeKind::SectionMaster(section) => format!("{SECTION_MASTER_PREFIX}{section}"),
        }
    }

    /// Parse a stored badge id back into its kind.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "first_discovery" => Some(BadgeKind::FirstDiscovery),
            "first_story" => Some(BadgeKind::FirstStory),
            "streak_keeper" => Some(BadgeKind::StreakKeeper),
            "bonus_hunter" => Some(BadgeKind::BonusHunter),
            other => other
                .strip_prefix(SECTION_MASTER_PREFIX)
                .map(|section| BadgeKind::SectionMaster(section.to_string())),
        }
    }

    pub fn name(&self) -> String {
        match self {
            BadgeKind::FirstDiscovery => "First Discovery".to_string(),
            BadgeKind::FirstStory => "First Chapter".to_string(),
            BadgeKind::StreakKeeper => "Streak Keeper".to_string(),
            BadgeKind::BonusHunter => "Bonus Hunter".to_string(),
            BadgeKind::SectionMaster(section) => format!("{section} Master"),
        }
    }

    pub fn description(&self) -> String {
        match self {
            BadgeKind::FirstDiscovery => "Identified your first tree".to_string(),
            BadgeKind::FirstStory => "Finished your first story".to_string(),
            BadgeKind::StreakKeeper => format!("{STREAK_KEEPER_DAYS}-day learning streak"),
            BadgeKind::BonusHunter => "Completed a bonus challenge".to_string(),
            BadgeKind::SectionMaster(section) => format!("Completed every lesson in {section}"),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeKind::FirstDiscovery => "🎯",
            BadgeKind::FirstStory => "📖",
            BadgeKind::StreakKeeper => "🔥",
            BadgeKind::BonusHunter => "🌰",
            BadgeKind::SectionMaster(_) => "🌳",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_id_round_trip_for_section_master() {
        let kind = BadgeKind::SectionMaster("Conifer Kingdom".to_string());
        assert_eq!(kind.id(), "section_master:Conifer Kingdom");
        assert_eq!(BadgeKind::from_id(&kind.id()), Some(kind));
    }

    #[test]
    fn test_unknown_badge_id() {
        assert_eq!(BadgeKind::from_id("golden_acorn"), None);
    }

    #[test]
    fn test_streak_keeper_description_uses_threshold() {
        assert_eq!(
            BadgeKind::StreakKeeper.description(),
            "7-day learning streak"
        );
    }
}
