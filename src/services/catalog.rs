// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content catalog loading and unlock resolution.

use crate::models::catalog::{ContentUnit, UnitView};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Catalog file layout.
#[derive(Deserialize)]
struct CatalogFile {
    units: Vec<RawUnit>,
}

/// Unit as written in the catalog file, before integrity checks.
#[derive(Deserialize)]
struct RawUnit {
    id: String,
    section: String,
    unit: u32,
    order: Option<u32>,
    kind: crate::models::UnitKind,
    xp_reward: u32,
    title: String,
    #[serde(default)]
    blurb: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    banner_image: Option<String>,
}

/// Validated catalog, sorted by `order`.
#[derive(Debug, Default, Clone)]
pub struct CatalogService {
    units: Vec<ContentUnit>,
    index: HashMap<String, usize>,
    revision: String,
}

impl CatalogService {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    ///
    /// Fails on any integrity problem: missing or duplicate `order`,
    /// duplicate or empty ids.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json_data).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut seen_orders: HashMap<u32, String> = HashMap::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut units = Vec::with_capacity(file.units.len());

        for raw in file.units {
            if raw.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen_ids.insert(raw.id.clone()) {
                return Err(CatalogError::DuplicateId(raw.id));
            }
            let order = raw
                .order
                .ok_or_else(|| CatalogError::MissingOrder(raw.id.clone()))?;
            if let Some(first) = seen_orders.insert(order, raw.id.clone()) {
                return Err(CatalogError::DuplicateOrder {
                    order,
                    first,
                    second: raw.id,
                });
            }

            units.push(ContentUnit {
                id: raw.id,
                section: raw.section,
                unit: raw.unit,
                order,
                kind: raw.kind,
                xp_reward: raw.xp_reward,
                title: raw.title,
                blurb: raw.blurb,
                content: raw.content,
                thumbnail: raw.thumbnail,
                banner_image: raw.banner_image,
            });
        }

        units.sort_by_key(|u| u.order);
        let index = units
            .iter()
            .enumerate()
            .map(|(i, u)| (u.id.clone(), i))
            .collect();
        let revision = hex::encode(Sha256::digest(json_data.as_bytes()));

        tracing::info!(count = units.len(), revision = %revision, "Loaded catalog");
        Ok(Self {
            units,
            index,
            revision,
        })
    }

    /// Units in prerequisite order.
    pub fn units(&self) -> &[ContentUnit] {
        &self.units
    }

    pub fn get(&self, unit_id: &str) -> Option<&ContentUnit> {
        self.index.get(unit_id).map(|&i| &self.units[i])
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.index.contains_key(unit_id)
    }

    /// SHA-256 of the catalog source (hex).
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Ids of every unit in a section.
    pub fn section_unit_ids<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a str> {
        self.units
            .iter()
            .filter(move |u| u.section == section)
            .map(|u| u.id.as_str())
    }

    /// Number of completed ids that refer to units in this catalog.
    pub fn count_completed(&self, completed: &HashSet<String>) -> usize {
        completed.iter().filter(|id| self.contains(id)).count()
    }

    /// Lock flag for every unit, in catalog order.
    ///
    /// The first unit is always open. Any other unit is open when it or its
    /// predecessor has been completed. Completed ids that are not in the
    /// catalog are ignored.
    pub fn resolve_locks(&self, completed: &HashSet<String>) -> Vec<bool> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                if i == 0 || completed.contains(&unit.id) {
                    return false;
                }
                !completed.contains(&self.units[i - 1].id)
            })
            .collect()
    }

    /// Catalog as seen by a user with the given completion set.
    pub fn resolve_unlocks(&self, completed: &HashSet<String>) -> Vec<UnitView> {
        self.units
            .iter()
            .zip(self.resolve_locks(completed))
            .map(|(unit, is_locked)| UnitView {
                unit: unit.clone(),
                is_locked,
                is_completed: completed.contains(&unit.id),
            })
            .collect()
    }

    /// Whether a single unit is locked for the given completion set.
    pub fn is_locked(&self, unit_id: &str, completed: &HashSet<String>) -> Option<bool> {
        let i = *self.index.get(unit_id)?;
        if i == 0 || completed.contains(unit_id) {
            return Some(false);
        }
        Some(!completed.contains(&self.units[i - 1].id))
    }
}

/// Catalog integrity errors. These are deployment defects and abort startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Duplicate order {order} (units {first} and {second})")]
    DuplicateOrder {
        order: u32,
        first: String,
        second: String,
    },

    #[error("Unit {0} has no order")]
    MissingOrder(String),

    #[error("Duplicate unit id: {0}")]
    DuplicateId(String),

    #[error("Unit with empty id")]
    EmptyId,
}
