use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashSet;
use std::hint::black_box;
use treequest::models::ProgressionState;
use treequest::services::ranking::rank_users;
use treequest::services::CatalogService;

const NUM_USERS: u64 = 10_000;

fn benchmark_progression(c: &mut Criterion) {
    let catalog =
        CatalogService::load_from_file("data/catalog.json").expect("Failed to load catalog");
    let now = Utc::now();

    // Users spread over every prefix of the catalog, with many XP ties
    let states: Vec<ProgressionState> = (0..NUM_USERS)
        .map(|seq| {
            let id = format!("user-{}", seq);
            let mut state = ProgressionState::new(&id, "Explorer", "🌲", seq, now);
            let done = (seq as usize) % (catalog.units().len() + 1);
            for unit in &catalog.units()[..done] {
                state.complete_unit(unit, &catalog, now);
            }
            state
        })
        .collect();

    let half: HashSet<String> = catalog
        .units()
        .iter()
        .step_by(2)
        .map(|u| u.id.clone())
        .collect();

    let mut group = c.benchmark_group("progression");

    group.bench_function("resolve_unlocks", |b| {
        b.iter(|| catalog.resolve_unlocks(black_box(&half)))
    });

    group.bench_function("rank_10k_users", |b| {
        b.iter(|| rank_users(black_box(&states)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_progression);
criterion_main!(benches);
