// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory progression store with optional JSON snapshots.
//!
//! Each user's state lives in one map entry. Mutations run while holding the
//! entry's write guard, so writes to one user are serialized and readers only
//! ever clone a complete state.

use crate::models::ProgressionState;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot file layout.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    next_registration_seq: u64,
    users: Vec<ProgressionState>,
}

/// Shared progression store.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, ProgressionState>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a consistent copy of a user's state.
    pub fn get(&self, user_id: &str) -> Option<ProgressionState> {
        self.users.get(user_id).map(|s| s.clone())
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Return the user's state, creating it on first session.
    ///
    /// Returns `true` alongside the state when it was newly created.
    pub fn get_or_create(
        &self,
        user_id: &str,
        display_name: &str,
        avatar: &str,
        now: DateTime<Utc>,
    ) -> (ProgressionState, bool) {
        match self.users.entry(user_id.to_string()) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                let state = ProgressionState::new(user_id, display_name, avatar, seq, now);
                slot.insert(state.clone());
                (state, true)
            }
        }
    }

    /// Run `f` against the user's state under the entry's write guard.
    ///
    /// Returns `None` if the user does not exist.
    pub fn update<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut ProgressionState) -> T,
    ) -> Option<T> {
        self.users
            .get_mut(user_id)
            .map(|mut state| f(state.value_mut()))
    }

    /// Copy of every user's state (each copy taken under its own read guard).
    pub fn snapshot_all(&self) -> Vec<ProgressionState> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }

    // ─── Snapshots ───────────────────────────────────────────────

    /// Build a store from a JSON snapshot.
    pub fn from_snapshot_json(json: &str) -> Result<Self, DbError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| DbError::Parse(e.to_string()))?;

        let max_seq = snapshot
            .users
            .iter()
            .map(|u| u.registration_seq() + 1)
            .max()
            .unwrap_or(0);

        let users = DashMap::new();
        for state in snapshot.users {
            let user_id = state.user_id().to_string();
            if users.insert(user_id.clone(), state).is_some() {
                return Err(DbError::Parse(format!("Duplicate user {}", user_id)));
            }
        }

        Ok(Self {
            users: Arc::new(users),
            next_seq: Arc::new(AtomicU64::new(snapshot.next_registration_seq.max(max_seq))),
        })
    }

    /// Serialize every user's state.
    pub fn to_snapshot_json(&self) -> Result<String, DbError> {
        let mut users = self.snapshot_all();
        users.sort_by_key(|u| u.registration_seq());
        let snapshot = Snapshot {
            next_registration_seq: self.next_seq.load(Ordering::SeqCst),
            users,
        };
        serde_json::to_string_pretty(&snapshot).map_err(|e| DbError::Parse(e.to_string()))
    }

    /// Load a snapshot file, or start empty if it does not exist yet.
    pub fn load_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path).map_err(|e| DbError::Io(e.to_string()))?;
        let db = Self::from_snapshot_json(&json)?;
        tracing::info!(path = %path.display(), users = db.user_count(), "Loaded snapshot");
        Ok(db)
    }

    /// Write a snapshot file (via a temp file and rename).
    pub fn save_snapshot_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DbError> {
        let path = path.as_ref();
        let json = self.to_snapshot_json()?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| DbError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| DbError::Io(e.to_string()))?;
        tracing::info!(path = %path.display(), users = self.user_count(), "Saved snapshot");
        Ok(())
    }
}

/// Snapshot errors.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Snapshot I/O error: {0}")]
    Io(String),

    #[error("Snapshot format error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_stable() {
        let db = MemoryDb::new();
        let now = Utc::now();

        let (first, created) = db.get_or_create("u1", "Explorer", "🌲", now);
        assert!(created);
        let (again, created_again) = db.get_or_create("u1", "Renamed", "🍂", now);
        assert!(!created_again);
        assert_eq!(again.display_name(), "Explorer");
        assert_eq!(again.registration_seq(), first.registration_seq());
    }

    #[test]
    fn test_registration_seq_increases() {
        let db = MemoryDb::new();
        let now = Utc::now();
        let (a, _) = db.get_or_create("a", "A", "", now);
        let (b, _) = db.get_or_create("b", "B", "", now);
        assert!(a.registration_seq() < b.registration_seq());
    }

    #[test]
    fn test_update_unknown_user() {
        let db = MemoryDb::new();
        assert!(db.update("ghost", |s| s.xp()).is_none());
    }

    #[test]
    fn test_snapshot_round_trip_keeps_sequence() {
        let db = MemoryDb::new();
        let now = Utc::now();
        db.get_or_create("a", "A", "", now);
        db.get_or_create("b", "B", "", now);
        db.update("a", |s| s.record_identification(7, now));

        let json = db.to_snapshot_json().unwrap();
        let restored = MemoryDb::from_snapshot_json(&json).unwrap();

        assert_eq!(restored.user_count(), 2);
        assert_eq!(restored.get("a").unwrap().xp(), 7);
        let (c, _) = restored.get_or_create("c", "C", "", now);
        assert_eq!(c.registration_seq(), 2);
    }

    #[test]
    fn test_duplicate_user_in_snapshot_rejected() {
        let db = MemoryDb::new();
        let now = Utc::now();
        db.get_or_create("a", "A", "", now);
        db.get_or_create("b", "B", "", now);

        // Rename "b" to "a" so the snapshot holds the same user twice
        let mut snapshot: serde_json::Value =
            serde_json::from_str(&db.to_snapshot_json().unwrap()).unwrap();
        snapshot["users"][1]["user_id"] = serde_json::json!("a");

        let err = MemoryDb::from_snapshot_json(&snapshot.to_string())
            .err()
            .unwrap();
        assert!(matches!(err, DbError::Parse(msg) if msg.contains("Duplicate user a")));
    }

    #[test]
    fn test_bad_snapshot_rejected() {
        let err = MemoryDb::from_snapshot_json("{\"users\": 3}").err().unwrap();
        assert!(matches!(err, DbError::Parse(_)));
    }
}
