use bracket::RequestContext;
use bracket::db::{MemoryStore, UserRepository};
use bracket::tournament::{NewTournament, TournamentManager, generate_schedule, parse_team_count};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

/// Benchmark schedule generation across team counts
fn bench_generate_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_schedule");

    for teams in [4u32, 16, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(teams), &teams, |b, &teams| {
            b.iter(|| generate_schedule(black_box(teams)));
        });
    }

    group.finish();
}

/// Benchmark raw team count parsing
fn bench_parse_team_count(c: &mut Criterion) {
    c.bench_function("parse_team_count", |b| {
        b.iter(|| parse_team_count(black_box(" 128 ")));
    });
}

/// Benchmark tournament creation (schedule + atomic persist) on the in-memory store
fn bench_create_tournament(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let store = Arc::new(MemoryStore::new());
    let owner = runtime
        .block_on(store.create_user("bench@example.com", "hash", "Bench"))
        .expect("bench user");
    let manager = TournamentManager::new(store);
    let ctx = RequestContext::new(owner.id);

    let mut group = c.benchmark_group("create_tournament");
    for teams in [8u32, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(teams), &teams, |b, &teams| {
            b.iter(|| {
                runtime.block_on(manager.create_tournament(
                    &ctx,
                    NewTournament {
                        name: "Bench Cup".to_string(),
                        sport: "chess".to_string(),
                        date: "2026-01-01".to_string(),
                        team_count: teams.to_string(),
                        description: String::new(),
                    },
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_generate_schedule,
    bench_parse_team_count,
    bench_create_tournament
);
criterion_main!(benches);
