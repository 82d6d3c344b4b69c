// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Species identification model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One candidate returned by the recognition service, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesMatch {
    /// Scientific name (e.g., "Quercus robur")
    pub scientific_name: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    /// Raw score in [0, 1] (not guaranteed by the service)
    pub score: f64,
}

/// Reward derived from the top recognition score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    /// 0..=100
    pub confidence_percent: u32,
    /// 0..=10
    pub xp_earned: u32,
}

/// Result of a successful identification attempt.
///
/// Ephemeral: the reward is applied to the user's progression and the
/// result is returned to the caller, but it is not stored on its own.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IdentificationResult {
    pub species: String,
    pub common_names: Vec<String>,
    pub confidence_percent: u32,
    pub xp_earned: u32,
    /// Unit the user was practicing, as supplied by the caller
    pub unit_id: Option<String>,
    /// XP total after the reward was applied
    pub xp_total: u32,
    /// Ids of badges awarded by this attempt
    pub badges_awarded: Vec<String>,
}
