// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod badge;
pub mod catalog;
pub mod identification;
pub mod leaderboard;
pub mod level;
pub mod map;
pub mod progression;

pub use badge::{Badge, BadgeKind};
pub use catalog::{ContentUnit, UnitKind, UnitView};
pub use identification::{IdentificationResult, Reward, SpeciesMatch};
pub use leaderboard::{LeaderboardEntry, UserRank};
pub use level::LevelProgress;
pub use map::{MapPin, MapPinView};
pub use progression::{CompletionOutcome, IdentificationOutcome, ProgressionState};
