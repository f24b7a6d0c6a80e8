//! # Particle Lifecycle Tests
//!
//! Verifies the pool and system contract end to end: slot recycling, the
//! free-slot hint, life bookkeeping, influencer ordering, auto-disable and
//! duplicate determinism.

use std::cell::RefCell;
use std::rc::Rc;

use ember_core::{
    EmissionScheduler, Influencer, LifeRange, ParticlePool, ParticleRecord, ParticleRng,
    ParticleSource, ParticleSystem, StaticSource, Vec3, MAX_LIFE_PROGRESS,
};

/// Requests a fixed number of spawns per frame.
#[derive(Debug, Clone)]
struct Steady {
    per_frame: u32,
    auto_disable: bool,
}

impl EmissionScheduler for Steady {
    fn particles_to_spawn(&mut self, _dt: f32) -> u32 {
        self.per_frame
    }
    fn on_particle_death(&mut self, _slot: usize) {}
    fn should_auto_disable(&self) -> bool {
        self.auto_disable
    }
    fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
        Box::new(self.clone())
    }
}

/// Records every death notification.
#[derive(Debug, Clone, Default)]
struct Obituaries {
    slots: Rc<RefCell<Vec<usize>>>,
}

impl EmissionScheduler for Obituaries {
    fn particles_to_spawn(&mut self, _dt: f32) -> u32 {
        0
    }
    fn on_particle_death(&mut self, slot: usize) {
        self.slots.borrow_mut().push(slot);
    }
    fn should_auto_disable(&self) -> bool {
        false
    }
    fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
        Box::new(Self::default())
    }
}

#[derive(Debug, Clone)]
struct SetSize(f32);

impl Influencer for SetSize {
    fn on_create(&mut self, _: usize, record: &mut ParticleRecord, _: &mut ParticleRng) {
        record.size = self.0;
    }
    fn on_update(&mut self, _: usize, _: &mut ParticleRecord, _: f32, _: &mut ParticleRng) {}
    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
struct ScaleSize(f32);

impl Influencer for ScaleSize {
    fn on_create(&mut self, _: usize, record: &mut ParticleRecord, _: &mut ParticleRng) {
        record.size *= self.0;
    }
    fn on_update(&mut self, _: usize, _: &mut ParticleRecord, _: f32, _: &mut ParticleRng) {}
    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(self.clone())
    }
}

/// Random velocity, so determinism depends on the pool RNG.
#[derive(Debug, Clone)]
struct Spray;

impl ParticleSource for Spray {
    fn source_particle(&mut self, _: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        let velocity = rng.vec3_between(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 5.0, 1.0));
        record.place(Vec3::ZERO, velocity);
    }
    fn clone_for_system(&self) -> Box<dyn ParticleSource> {
        Box::new(Spray)
    }
}

fn pool(capacity: usize) -> ParticlePool {
    ParticlePool::new(capacity, LifeRange::new(0.5, 1.5), Box::new(StaticSource::default()))
}

fn live_count(records: &[ParticleRecord]) -> usize {
    records.iter().filter(|r| r.active).count()
}

/// Test: kill_all empties the pool and emit_all fills it.
#[test]
fn test_kill_all_then_emit_all() {
    let mut pool = pool(32);
    for _ in 0..10 {
        let _ = pool.emit_next();
    }

    pool.kill_all();
    assert_eq!(pool.active_count(), 0);
    assert_eq!(live_count(pool.records()), 0);

    assert_eq!(pool.emit_all(), 32);
    assert_eq!(pool.active_count(), 32);
    assert_eq!(pool.next_free_hint(), None);
}

/// Test: exactly `capacity` emissions succeed from empty.
#[test]
fn test_emit_next_until_exhausted() {
    let capacity = 17;
    let mut pool = pool(capacity);

    let slots: Vec<usize> = (0..capacity).map_while(|_| pool.emit_next()).collect();
    assert_eq!(slots, (0..capacity).collect::<Vec<_>>());
    assert_eq!(pool.emit_next(), None);
    assert_eq!(pool.emit_next_at(Vec3::ZERO, Vec3::ZERO), None);
}

/// Test: the hint lands on a freshly killed lower slot.
#[test]
fn test_next_emit_reuses_killed_slot() {
    let mut pool = pool(10);
    for _ in 0..6 {
        let _ = pool.emit_next();
    }

    pool.kill(2);
    assert_eq!(pool.emit_next(), Some(2));
}

/// Test: a full pool that loses one particle emits into that slot.
#[test]
fn test_full_pool_recovers_after_kill() {
    let mut pool = pool(5);
    assert_eq!(pool.emit_all(), 5);

    pool.kill(3);
    assert_eq!(pool.next_free_hint(), Some(3));
    assert_eq!(pool.emit_next(), Some(3));
    assert_eq!(pool.emit_next(), None);
}

/// Test: active_count and life bookkeeping hold across random operations.
#[test]
fn test_invariants_under_random_churn() {
    let mut pool = pool(64);
    pool.reseed(2024);
    let mut driver = ParticleRng::seeded(7);

    for _ in 0..2_000 {
        match driver.index(5) {
            0 | 1 => {
                let _ = pool.emit_next();
            }
            2 => pool.kill(driver.index(64)),
            3 => {
                let _ = pool.step(driver.between(0.0, 0.2));
            }
            _ => {
                if driver.index(20) == 0 {
                    pool.kill_all();
                }
            }
        }

        assert_eq!(pool.active_count(), live_count(pool.records()));
        if let Some(hint) = pool.next_free_hint() {
            assert!(!pool.record(hint).active, "hint {hint} points at a live slot");
        }
        for record in pool.records().iter().filter(|r| r.active) {
            assert!(record.remaining_life > 0.0);
            assert!(record.remaining_life <= record.start_life);
            assert!((0.0..=MAX_LIFE_PROGRESS).contains(&record.life_progress));
        }
    }
}

/// Test: influencer creation hooks run in registration order.
#[test]
fn test_influencer_order_changes_result() {
    let set_then_scale = ParticleSystem::builder(1)
        .influencer(SetSize(2.0))
        .influencer(ScaleSize(3.0))
        .build();
    let scale_then_set = ParticleSystem::builder(1)
        .influencer(ScaleSize(3.0))
        .influencer(SetSize(2.0))
        .build();

    let mut a = set_then_scale;
    let mut b = scale_then_set;
    let _ = a.emit_next();
    let _ = b.emit_next();

    assert_eq!(a.records()[0].size, 6.0);
    assert_eq!(b.records()[0].size, 2.0);
}

/// Test: a one-shot system disables itself once its last particle dies.
#[test]
fn test_auto_disable_after_last_death() {
    let mut system = ParticleSystem::builder(8)
        .fixed_life(0.1)
        .scheduler(Steady { per_frame: 0, auto_disable: true })
        .build();

    assert_eq!(system.emit_next_at(Vec3::ZERO, Vec3::Y), Some(0));

    let report = system.step(0.05).expect("enabled system steps");
    assert_eq!(report.updated, 1);
    assert!(system.is_enabled());

    let report = system.step(0.1).expect("enabled system steps");
    assert_eq!(report.died, 1);
    assert!(report.auto_disabled);
    assert!(!system.is_enabled());

    // Further steps are no-ops until something is spawned again.
    assert_eq!(system.step(0.1), None);
}

/// Test: a system that never auto-disables stays enabled while empty.
#[test]
fn test_empty_system_stays_enabled_without_auto_disable() {
    let mut system = ParticleSystem::builder(8)
        .scheduler(Steady { per_frame: 0, auto_disable: false })
        .build();
    for _ in 0..10 {
        let _ = system.step(0.1);
    }
    assert!(system.is_enabled());
}

/// Test: duplicates with the same seed produce identical particles.
#[test]
fn test_duplicate_is_deterministic_with_equal_seeds() {
    let original = ParticleSystem::builder(128)
        .life(0.2, 1.2)
        .seed(99)
        .source(Spray)
        .scheduler(Steady { per_frame: 5, auto_disable: false })
        .influencer(SetSize(0.5))
        .build();

    let mut a = original.duplicate_with_seed(1234);
    let mut b = original.duplicate_with_seed(1234);
    assert_eq!(a.active_count(), 0);

    for _ in 0..120 {
        let ra = a.step(1.0 / 60.0);
        let rb = b.step(1.0 / 60.0);
        assert_eq!(ra, rb);
    }
    assert_eq!(a.records(), b.records());
    assert!(a.active_count() > 0);
}

/// Test: different seeds diverge.
#[test]
fn test_duplicate_with_other_seed_diverges() {
    let original = ParticleSystem::builder(16).source(Spray).build();
    let mut a = original.duplicate_with_seed(1);
    let mut b = original.duplicate_with_seed(2);
    let _ = a.emit_all();
    let _ = b.emit_all();
    assert_ne!(a.records(), b.records());
}

/// Test: killing an already inactive slot notifies the scheduler again.
#[test]
fn test_killing_inactive_slot_double_notifies() {
    let obituaries = Obituaries::default();
    let slots = obituaries.slots.clone();
    let mut pool = pool(4);
    pool.set_scheduler(Some(Box::new(obituaries)));

    let _ = pool.emit_next();
    pool.kill(0);
    pool.kill(0);
    pool.kill(3);

    assert_eq!(*slots.borrow(), vec![0, 0, 3]);
    assert_eq!(pool.active_count(), 0);
}

/// Test: aging reports deaths through the scheduler.
#[test]
fn test_expiry_notifies_scheduler() {
    let obituaries = Obituaries::default();
    let slots = obituaries.slots.clone();
    let mut pool = ParticlePool::new(3, LifeRange::fixed(0.5), Box::new(StaticSource::default()));
    pool.set_scheduler(Some(Box::new(obituaries)));

    let _ = pool.emit_all();
    let report = pool.step(1.0);

    assert_eq!(report.died, 3);
    assert_eq!(*slots.borrow(), vec![0, 1, 2]);
    assert_eq!(pool.next_free_hint(), Some(0));
}

/// Test: zero dt changes nothing but progress recomputation.
#[test]
fn test_zero_dt_keeps_particles() {
    let mut pool = ParticlePool::new(
        2,
        LifeRange::fixed(1.0),
        Box::new(StaticSource::new(Vec3::ZERO, Vec3::X)),
    );
    let _ = pool.emit_next();
    let report = pool.step(0.0);
    assert_eq!(report.updated, 1);
    assert_eq!(pool.record(0).position, Vec3::ZERO);
    assert_eq!(pool.record(0).remaining_life, 1.0);
}

/// Test: a zero-life particle dies on the first step.
#[test]
fn test_zero_life_dies_immediately() {
    let mut pool = ParticlePool::new(2, LifeRange::fixed(0.0), Box::new(StaticSource::default()));
    let _ = pool.emit_next();
    assert_eq!(pool.record(0).life_progress, 0.0);
    let report = pool.step(0.0);
    assert_eq!(report.died, 1);
}

/// Test: negative dt is a contract violation.
#[test]
#[should_panic(expected = "delta time")]
fn test_negative_dt_panics() {
    let _ = pool(2).step(-0.1);
}

/// Test: inverted life bounds are a contract violation.
#[test]
#[should_panic(expected = "invalid life range")]
fn test_inverted_life_range_panics() {
    let _ = ParticleSystem::builder(4).life(2.0, 1.0);
}

/// Test: zero capacity is a contract violation.
#[test]
#[should_panic(expected = "Capacity must be greater than zero")]
fn test_zero_capacity_system_panics() {
    let _ = ParticleSystem::builder(0).build();
}
