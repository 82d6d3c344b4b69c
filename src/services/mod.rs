// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod map;
pub mod progression;
pub mod ranking;
pub mod recognition;
pub mod reward;

pub use catalog::{CatalogError, CatalogService};
pub use map::{MapError, MapService};
pub use progression::{Profile, ProgressionService};
pub use recognition::{MockReply, RecognitionError, RecognitionService};
