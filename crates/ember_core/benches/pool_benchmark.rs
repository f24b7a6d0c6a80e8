//! # Particle Pool Benchmark
//!
//! TARGETS:
//! - 100,000 live particles aged in well under a frame
//! - Steady spawn/kill churn without scanning the whole pool
//! - 0 allocations during step
//!
//! Run with: `cargo bench --package ember_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ember_core::{
    Influencer, LifeRange, ParticlePool, ParticleRecord, ParticleRng, ParticleSystem,
    StaticSource, Vec3,
};

/// Fixed frame delta (60 Hz).
const DT: f32 = 1.0 / 60.0;

/// Constant downward pull, enough to give the update hook real work.
#[derive(Debug, Clone)]
struct Pull;

impl Influencer for Pull {
    fn on_create(&mut self, _: usize, _: &mut ParticleRecord, _: &mut ParticleRng) {}

    fn on_update(&mut self, _: usize, record: &mut ParticleRecord, dt: f32, _: &mut ParticleRng) {
        record.velocity += Vec3::new(0.0, -9.8, 0.0) * dt;
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(Pull)
    }
}

fn full_pool(capacity: usize) -> ParticlePool {
    let mut pool = ParticlePool::new(
        capacity,
        LifeRange::fixed(1_000.0),
        Box::new(StaticSource::new(Vec3::ZERO, Vec3::Y)),
    );
    pool.add_influencer(Box::new(Pull));
    let _ = pool.emit_all();
    pool
}

/// Benchmark: age a full pool by one frame.
fn bench_pool_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_step");

    for capacity in [1_000, 10_000, 100_000] {
        let mut pool = full_pool(capacity);
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            b.iter(|| black_box(pool.step(black_box(DT))));
        });
    }

    group.finish();
}

/// Benchmark: kill a scattered slot and refill it through the hint.
fn bench_emit_churn(c: &mut Criterion) {
    let capacity = 10_000;
    let mut pool = full_pool(capacity);
    let mut slot = 0;

    c.bench_function("emit_churn_10k", |b| {
        b.iter(|| {
            slot = (slot + 7_919) % capacity;
            pool.kill(slot);
            black_box(pool.emit_next())
        });
    });
}

/// Benchmark: a whole system running at steady state.
fn bench_system_frame(c: &mut Criterion) {
    let mut system = ParticleSystem::builder(50_000)
        .life(0.5, 1.5)
        .seed(42)
        .influencer(Pull)
        .build();

    c.bench_function("system_frame_50k", |b| {
        b.iter(|| {
            for _ in 0..500 {
                let _ = system.emit_next();
            }
            black_box(system.step(DT))
        });
    });
}

criterion_group!(benches, bench_pool_step, bench_emit_churn, bench_system_frame);
criterion_main!(benches);
