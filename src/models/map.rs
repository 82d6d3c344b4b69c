// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map pin model linking catalog units to real-world locations.

use geo::Point;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A location on the exploration map tied to a content unit.
#[derive(Debug, Clone)]
pub struct MapPin {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    /// x = longitude, y = latitude
    pub location: Point<f64>,
}

/// A map pin as seen by a particular user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapPinView {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub completed: bool,
    pub is_locked: bool,
    /// Distance from the query point, when one was given
    pub distance_km: Option<f64>,
}
