// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map pin loading and proximity queries.

use crate::models::map::{MapPin, MapPinView};
use crate::services::CatalogService;
use geo::{Distance, Haversine, Point};
use geojson::GeoJson;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Service for loading map pins and building per-user map views.
#[derive(Debug, Default, Clone)]
pub struct MapService {
    pins: Vec<MapPin>,
}

impl MapService {
    /// Load pins from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        catalog: &CatalogService,
    ) -> Result<Self, MapError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| MapError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data, catalog)
    }

    /// Load pins from a GeoJSON string.
    ///
    /// Pins pointing at units missing from the catalog are skipped.
    pub fn load_from_json(json_data: &str, catalog: &CatalogService) -> Result<Self, MapError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| MapError::ParseError(e.to_string()))?;

        let mut pins = Vec::new();

        if let GeoJson::FeatureCollection(collection) = geojson {
            for feature in collection.features {
                let prop = |key: &str| {
                    feature
                        .property(key)
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string()
                };
                let id = prop("id");
                let unit_id = prop("unit_id");
                let title = prop("title");

                if !catalog.contains(&unit_id) {
                    tracing::warn!(pin = %id, unit_id = %unit_id, "Skipping pin for unknown unit");
                    continue;
                }

                if let Some(geom) = feature.geometry {
                    let location: Point<f64> = geom
                        .value
                        .try_into()
                        .map_err(|_| MapError::UnsupportedGeometry)?;
                    pins.push(MapPin {
                        id,
                        unit_id,
                        title,
                        location,
                    });
                }
            }
        }

        tracing::info!(count = pins.len(), "Loaded map pins");
        Ok(Self { pins })
    }

    pub fn pins(&self) -> &[MapPin] {
        &self.pins
    }

    /// Map as seen by a user, optionally filtered to `radius_km` around `near`.
    ///
    /// With a query point, pins are sorted nearest first.
    pub fn views(
        &self,
        catalog: &CatalogService,
        completed: &HashSet<String>,
        near: Option<(Point<f64>, f64)>,
    ) -> Vec<MapPinView> {
        let mut views: Vec<MapPinView> = self
            .pins
            .iter()
            .filter_map(|pin| {
                let distance_km = near.map(|(origin, _)| distance_km(origin, pin.location));
                if let (Some(d), Some((_, radius))) = (distance_km, near) {
                    if d > radius {
                        return None;
                    }
                }
                Some(MapPinView {
                    id: pin.id.clone(),
                    unit_id: pin.unit_id.clone(),
                    title: pin.title.clone(),
                    lat: pin.location.y(),
                    lng: pin.location.x(),
                    completed: completed.contains(&pin.unit_id),
                    is_locked: catalog.is_locked(&pin.unit_id, completed).unwrap_or(true),
                    distance_km,
                })
            })
            .collect();

        if near.is_some() {
            views.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        views
    }
}

fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b) / 1000.0
}

/// Errors from map pin loading.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Unsupported geometry type (expected Point)")]
    UnsupportedGeometry,
}
