// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progression snapshots survive a restart.

use treequest::db::MemoryDb;
use treequest::services::MockReply;

mod common;

fn temp_snapshot(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("treequest-{}-{}.json", name, std::process::id()))
}

#[tokio::test]
async fn test_snapshot_round_trip_preserves_progression_and_ranking() {
    let (_, state) = common::create_test_app();
    common::register(&state, "u1", "Ash");
    common::register(&state, "u2", "Birch");
    state.progression.complete_unit("u1", "1").unwrap();
    state.progression.complete_unit("u2", "1").unwrap();

    let path = temp_snapshot("round-trip");
    state.progression.db().save_snapshot_file(&path).unwrap();

    let restored = MemoryDb::load_snapshot_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    let (_, restored_state) = common::create_test_app_with(MockReply::Matches(vec![]), restored);

    let u1 = restored_state.progression.db().get("u1").unwrap();
    assert_eq!(u1.xp(), 100);
    assert!(u1.is_completed("1"));
    assert_eq!(u1.badges().len(), 1);

    // Tie on XP and streak still resolves by registration order
    let board = restored_state.progression.get_leaderboard(None);
    let order: Vec<&str> = board.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(order, vec!["u1", "u2"]);

    // New users keep registering after the restored ones
    let (u3, created) = restored_state.progression.start_session("u3", "Cedar", "🌲");
    assert!(created);
    assert_eq!(u3.registration_seq(), 2);

    // Completion stays idempotent across the restart
    let outcome = restored_state.progression.complete_unit("u1", "1").unwrap();
    assert!(!outcome.newly_completed);
}

#[test]
fn test_missing_snapshot_starts_empty() {
    let path = temp_snapshot("missing");
    let db = MemoryDb::load_snapshot_file(&path).unwrap();
    assert_eq!(db.user_count(), 0);
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    assert!(MemoryDb::from_snapshot_json("{\"users\": 7}").is_err());
}
