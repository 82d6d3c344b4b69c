// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user progression state.
//!
//! The state is only changed through [`ProgressionState::complete_unit`] and
//! [`ProgressionState::record_identification`]. Both register a qualifying
//! day of activity for the streak and evaluate badge rules.
//!
//! XP invariant: `xp` equals the sum of `xp_reward` over the completed units
//! (each counted once) plus every `xp_earned` ever recorded.

use crate::models::badge::{Badge, BadgeKind, STREAK_KEEPER_DAYS};
use crate::models::catalog::{ContentUnit, UnitKind};
use crate::services::CatalogService;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Progression record owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    pub(crate) user_id: String,
    #[serde(default)]
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) avatar: String,
    /// When the user's first session started
    pub(crate) registered_at: DateTime<Utc>,
    /// Monotonic registration counter (earlier users sort first on ties)
    pub(crate) registration_seq: u64,

    #[serde(default)]
    pub(crate) completed_unit_ids: HashSet<String>,
    #[serde(default)]
    pub(crate) xp: u32,
    #[serde(default)]
    pub(crate) streak: u32,
    #[serde(default)]
    pub(crate) badges: Vec<Badge>,
    #[serde(default)]
    pub(crate) identification_count: u32,
    /// UTC day of the last qualifying activity
    #[serde(default)]
    pub(crate) last_active_day: Option<NaiveDate>,
}

/// Result of a `complete_unit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// `false` when the unit had already been completed
    pub newly_completed: bool,
    pub xp_awarded: u32,
    /// XP total after the call
    pub xp: u32,
    pub badges_awarded: Vec<Badge>,
}

/// Result of a `record_identification` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationOutcome {
    /// XP total after the call
    pub xp: u32,
    pub badges_awarded: Vec<Badge>,
}

impl ProgressionState {
    /// Fresh state for a user's first session.
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        avatar: impl Into<String>,
        registration_seq: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            avatar: avatar.into(),
            registered_at: now,
            registration_seq,
            completed_unit_ids: HashSet::new(),
            xp: 0,
            streak: 0,
            badges: Vec::new(),
            identification_count: 0,
            last_active_day: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn registration_seq(&self) -> u64 {
        self.registration_seq
    }

    pub fn completed_unit_ids(&self) -> &HashSet<String> {
        &self.completed_unit_ids
    }

    pub fn is_completed(&self, unit_id: &str) -> bool {
        self.completed_unit_ids.contains(unit_id)
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn has_badge(&self, kind: &BadgeKind) -> bool {
        let id = kind.id();
        self.badges.iter().any(|b| b.id == id)
    }

    pub fn identification_count(&self) -> u32 {
        self.identification_count
    }

    pub fn last_active_day(&self) -> Option<NaiveDate> {
        self.last_active_day
    }

    /// Mark a unit as completed.
    ///
    /// Set-union semantics: a unit that is already completed is left alone,
    /// grants no XP, and does not count as activity for the streak.
    pub fn complete_unit(
        &mut self,
        unit: &ContentUnit,
        catalog: &CatalogService,
        now: DateTime<Utc>,
    ) -> CompletionOutcome {
        if !self.completed_unit_ids.insert(unit.id.clone()) {
            return CompletionOutcome {
                newly_completed: false,
                xp_awarded: 0,
                xp: self.xp,
                badges_awarded: Vec::new(),
            };
        }

        self.xp = self.xp.saturating_add(unit.xp_reward);
        self.register_activity(now.date_naive());

        let mut earned = Vec::new();
        match unit.kind {
            UnitKind::Story => earned.push(BadgeKind::FirstStory),
            UnitKind::Bonus => earned.push(BadgeKind::BonusHunter),
            UnitKind::Task | UnitKind::Quiz => {}
        }
        let section_done = catalog
            .section_unit_ids(&unit.section)
            .all(|id| self.completed_unit_ids.contains(id));
        if section_done {
            earned.push(BadgeKind::SectionMaster(unit.section.clone()));
        }
        if self.streak >= STREAK_KEEPER_DAYS {
            earned.push(BadgeKind::StreakKeeper);
        }

        CompletionOutcome {
            newly_completed: true,
            xp_awarded: unit.xp_reward,
            xp: self.xp,
            badges_awarded: self.award_all(earned, now),
        }
    }

    /// Add the XP earned by an identification attempt.
    ///
    /// Identifications have no deduplication key: every call adds its reward.
    pub fn record_identification(
        &mut self,
        xp_earned: u32,
        now: DateTime<Utc>,
    ) -> IdentificationOutcome {
        self.xp = self.xp.saturating_add(xp_earned);
        self.identification_count = self.identification_count.saturating_add(1);
        self.register_activity(now.date_naive());

        let mut earned = vec![BadgeKind::FirstDiscovery];
        if self.streak >= STREAK_KEEPER_DAYS {
            earned.push(BadgeKind::StreakKeeper);
        }

        IdentificationOutcome {
            xp: self.xp,
            badges_awarded: self.award_all(earned, now),
        }
    }

    /// Count `day` towards the consecutive-day streak.
    fn register_activity(&mut self, day: NaiveDate) {
        match self.last_active_day {
            Some(last) if day <= last => {
                // Same day (or a clock running behind): streak unchanged
            }
            Some(last) if last.succ_opt() == Some(day) => {
                self.streak = self.streak.saturating_add(1);
                self.last_active_day = Some(day);
            }
            _ => {
                self.streak = 1;
                self.last_active_day = Some(day);
            }
        }
    }

    /// Append badges not already held. Returns the newly awarded ones.
    fn award_all(&mut self, kinds: Vec<BadgeKind>, now: DateTime<Utc>) -> Vec<Badge> {
        let mut awarded = Vec::new();
        for kind in kinds {
            if self.has_badge(&kind) {
                continue;
            }
            let badge = Badge {
                id: kind.id(),
                awarded_at: now,
            };
            self.badges.push(badge.clone());
            awarded.push(badge);
        }
        awarded
    }
}
