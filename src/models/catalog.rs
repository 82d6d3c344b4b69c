// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content unit model for the learning catalog.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of learning content a unit represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum UnitKind {
    Story,
    Task,
    Quiz,
    Bonus,
}

/// One addressable piece of learning content with a fixed catalog position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContentUnit {
    /// Stable identifier, unchanged across catalog revisions
    pub id: String,
    /// Thematic arc (e.g., "Forest Foundations")
    pub section: String,
    /// Sub-grouping within the section
    pub unit: u32,
    /// Global position in the prerequisite chain
    pub order: u32,
    pub kind: UnitKind,
    /// XP granted the first time the unit is completed
    pub xp_reward: u32,
    pub title: String,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub banner_image: Option<String>,
}

/// A content unit as seen by a particular user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UnitView {
    #[serde(flatten)]
    pub unit: ContentUnit,
    pub is_locked: bool,
    pub is_completed: bool,
}
