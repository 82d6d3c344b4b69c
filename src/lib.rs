// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TreeQuest: progression and rewards for tree-identification stories
//!
//! This crate provides the backend API that decides which stories are
//! unlocked, turns PlantNet identification scores into XP, and ranks
//! explorers on the leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ProgressionService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub progression: ProgressionService,
}
