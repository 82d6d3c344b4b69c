// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent mutations on one user must not lose updates.

use std::sync::Arc;
use treequest::models::SpeciesMatch;

mod common;

const NUM_IDENTIFICATIONS: u32 = 50;
const COMPLETION_ROUNDS: usize = 10;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_keep_xp_consistent() {
    let (_, state) = common::create_test_app();
    common::register(&state, "fern", "Fern");

    let mut handles = vec![];

    // Every unit completed many times over, racing with itself
    for _ in 0..COMPLETION_ROUNDS {
        for unit in state.progression.catalog().units() {
            let state = Arc::clone(&state);
            let unit_id = unit.id.clone();
            handles.push(tokio::spawn(async move {
                state.progression.complete_unit("fern", &unit_id).map(|_| ())
            }));
        }
    }

    // Identifications racing with the completions; each earns 10 XP
    for _ in 0..NUM_IDENTIFICATIONS {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move {
            let top = SpeciesMatch {
                scientific_name: "Pinus sylvestris".to_string(),
                common_names: vec![],
                score: 1.0,
            };
            state
                .progression
                .apply_matches("fern", None, vec![top])
                .map(|_| ())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = state.progression.db().get("fern").unwrap();
    let catalog_xp: u32 = state
        .progression
        .catalog()
        .units()
        .iter()
        .map(|u| u.xp_reward)
        .sum();

    assert_eq!(stored.completed_unit_ids().len(), 6);
    assert_eq!(stored.identification_count(), NUM_IDENTIFICATIONS);
    assert_eq!(stored.xp(), catalog_xp + NUM_IDENTIFICATIONS * 10);

    // Each badge is held at most once
    let mut ids: Vec<&str> = stored.badges().iter().map(|b| b.id.as_str()).collect();
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_sessions_get_unique_sequence() {
    let (_, state) = common::create_test_app();

    let mut handles = vec![];
    for i in 0..20 {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move {
            // Two racing sessions per user
            let id = format!("user-{}", i % 10);
            state.progression.start_session(&id, "Racer", "🌲")
        }));
    }

    let mut created = 0;
    for handle in handles {
        let (_, was_created) = handle.await.unwrap();
        if was_created {
            created += 1;
        }
    }
    assert_eq!(created, 10);

    let mut seqs: Vec<u64> = state
        .progression
        .db()
        .snapshot_all()
        .iter()
        .map(|s| s.registration_seq())
        .collect();
    seqs.sort();
    assert_eq!(seqs, (0..10).collect::<Vec<u64>>());
}
