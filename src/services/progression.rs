// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progression engine: the operations the presentation layer calls.
//!
//! Handles:
//! - First-session registration
//! - Unlocked catalog views
//! - Unit completion (idempotent, XP granted once)
//! - Identification submission (recognition call, reward, XP)
//! - Leaderboard, rank and profile views

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::{
    CompletionOutcome, IdentificationResult, LeaderboardEntry, LevelProgress, MapPinView,
    ProgressionState, SpeciesMatch, UnitView, UserRank,
};
use crate::services::map::MapService;
use crate::services::ranking::{rank_users, user_rank};
use crate::services::recognition::RecognitionService;
use crate::services::reward::calculate_reward;
use crate::services::CatalogService;
use chrono::Utc;
use geo::Point;
use std::sync::Arc;

/// Profile summary for one user.
#[derive(Debug, Clone)]
pub struct Profile {
    pub state: ProgressionState,
    pub level: LevelProgress,
    /// Completed units that exist in the current catalog
    pub completed_units: u32,
    pub total_units: u32,
    /// 0..=100
    pub progress_percent: u32,
    pub rank: UserRank,
}

/// Progression engine over a shared store.
#[derive(Clone)]
pub struct ProgressionService {
    catalog: Arc<CatalogService>,
    map: Arc<MapService>,
    db: MemoryDb,
    recognition: RecognitionService,
}

impl ProgressionService {
    pub fn new(
        catalog: Arc<CatalogService>,
        map: Arc<MapService>,
        db: MemoryDb,
        recognition: RecognitionService,
    ) -> Self {
        Self {
            catalog,
            map,
            db,
            recognition,
        }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn db(&self) -> &MemoryDb {
        &self.db
    }

    pub fn recognition(&self) -> &RecognitionService {
        &self.recognition
    }

    fn require_user(&self, user_id: &str) -> Result<ProgressionState> {
        self.db
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    // ─── Session ─────────────────────────────────────────────────

    /// Start a session, creating an empty progression on first visit.
    pub fn start_session(
        &self,
        user_id: &str,
        display_name: &str,
        avatar: &str,
    ) -> (ProgressionState, bool) {
        let (state, created) = self
            .db
            .get_or_create(user_id, display_name, avatar, Utc::now());
        if created {
            tracing::info!(user_id, seq = state.registration_seq(), "New user registered");
        }
        (state, created)
    }

    // ─── Catalog ─────────────────────────────────────────────────

    /// Every catalog unit with lock and completion flags for this user.
    pub fn get_unlocked_catalog(&self, user_id: &str) -> Result<Vec<UnitView>> {
        let state = self.require_user(user_id)?;
        Ok(self.catalog.resolve_unlocks(state.completed_unit_ids()))
    }

    /// Map pins for this user, optionally within `radius_km` of `near`.
    pub fn get_map_pins(
        &self,
        user_id: &str,
        near: Option<(Point<f64>, f64)>,
    ) -> Result<Vec<MapPinView>> {
        let state = self.require_user(user_id)?;
        Ok(self
            .map
            .views(&self.catalog, state.completed_unit_ids(), near))
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Complete a unit. Unknown units are rejected without any change.
    pub fn complete_unit(&self, user_id: &str, unit_id: &str) -> Result<CompletionOutcome> {
        let unit = self
            .catalog
            .get(unit_id)
            .ok_or_else(|| AppError::UnknownUnit(unit_id.to_string()))?;

        let outcome = self
            .db
            .update(user_id, |state| {
                state.complete_unit(unit, &self.catalog, Utc::now())
            })
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if outcome.newly_completed {
            tracing::info!(
                user_id,
                unit_id,
                xp_awarded = outcome.xp_awarded,
                xp = outcome.xp,
                badges = outcome.badges_awarded.len(),
                "Unit completed"
            );
        } else {
            tracing::debug!(user_id, unit_id, "Unit already completed (idempotent skip)");
        }

        Ok(outcome)
    }

    /// Identify an image and apply the reward.
    ///
    /// The user and unit are checked before the recognition call. Any
    /// recognition failure leaves the progression untouched.
    pub async fn submit_identification(
        &self,
        user_id: &str,
        unit_id: Option<&str>,
        image: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<IdentificationResult> {
        self.require_user(user_id)?;
        if let Some(id) = unit_id {
            if !self.catalog.contains(id) {
                return Err(AppError::UnknownUnit(id.to_string()));
            }
        }

        tracing::info!(user_id, unit_id, bytes = image.len(), "Submitting identification");
        let matches = self.recognition.identify(image, content_type).await?;

        self.apply_matches(user_id, unit_id, matches)
    }

    /// Apply a ranked recognition response to the user's progression.
    ///
    /// Only the top candidate counts. An empty list is `NoMatchFound` and
    /// changes nothing.
    pub fn apply_matches(
        &self,
        user_id: &str,
        unit_id: Option<&str>,
        matches: Vec<SpeciesMatch>,
    ) -> Result<IdentificationResult> {
        let Some(top) = matches.into_iter().next() else {
            tracing::info!(user_id, "No species found");
            return Err(AppError::NoMatchFound);
        };

        let reward = calculate_reward(top.score);
        let outcome = self
            .db
            .update(user_id, |state| {
                state.record_identification(reward.xp_earned, Utc::now())
            })
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        tracing::info!(
            user_id,
            species = %top.scientific_name,
            confidence = reward.confidence_percent,
            xp_earned = reward.xp_earned,
            xp = outcome.xp,
            "Identification rewarded"
        );

        Ok(IdentificationResult {
            species: top.scientific_name,
            common_names: top.common_names,
            confidence_percent: reward.confidence_percent,
            xp_earned: reward.xp_earned,
            unit_id: unit_id.map(str::to_string),
            xp_total: outcome.xp,
            badges_awarded: outcome.badges_awarded.into_iter().map(|b| b.id).collect(),
        })
    }

    // ─── Ranking ─────────────────────────────────────────────────

    /// Leaderboard over every known user, recomputed on each call.
    pub fn get_leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let mut board = rank_users(&self.db.snapshot_all());
        if let Some(limit) = limit {
            board.truncate(limit);
        }
        board
    }

    pub fn get_user_rank(&self, user_id: &str) -> UserRank {
        user_rank(&self.db.snapshot_all(), user_id)
    }

    /// Profile with level, catalog progress and rank.
    pub fn get_profile(&self, user_id: &str) -> Result<Profile> {
        let states = self.db.snapshot_all();
        let state = states
            .iter()
            .find(|s| s.user_id() == user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let completed_units = self.catalog.count_completed(state.completed_unit_ids()) as u32;
        let total_units = self.catalog.units().len() as u32;
        let progress_percent = if total_units == 0 {
            0
        } else {
            // Integer round-half-up
            (completed_units * 200 + total_units) / (total_units * 2)
        };

        Ok(Profile {
            level: LevelProgress::for_xp(state.xp()),
            completed_units,
            total_units,
            progress_percent,
            rank: user_rank(&states, user_id),
            state,
        })
    }
}
