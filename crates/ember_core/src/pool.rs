//! # Particle Pool
//!
//! Fixed-capacity slot pool for particles that are spawned and killed every
//! frame.
//!
//! ## Free-Slot Hint
//!
//! The pool keeps a single cursor instead of a free list:
//!
//! - `kill(i)` lowers the cursor to `i` when `i` is below it (or when no free
//!   slot was known). The cursor is a lower-bound hint, not always the lowest
//!   free index.
//! - A successful emission into the cursor slot scans forward circularly from
//!   `cursor + 1` for the next inactive slot. If the scan comes back to its
//!   start the cursor becomes `None` (pool believed full).
//!
//! Steady turnover therefore emits in O(1) amortized without a full scan.

use crate::error::{EmberError, EmberResult};
use crate::influencer::{Influencer, InfluencerChain};
use crate::math::Vec3;
use crate::record::ParticleRecord;
use crate::rng::ParticleRng;
use crate::scheduler::{EmissionScheduler, NullScheduler};
use crate::source::ParticleSource;

/// Lifespan bounds for new particles, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifeRange {
    min: f32,
    max: f32,
}

impl LifeRange {
    /// Creates a life range.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are negative, not finite, or `max < min`.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        match Self::try_new(min, max) {
            Ok(range) => range,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a life range from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidLifeRange`] if the bounds are negative,
    /// not finite, or `max < min`.
    pub fn try_new(min: f32, max: f32) -> EmberResult<Self> {
        let valid = min.is_finite() && max.is_finite() && min >= 0.0 && min <= max;
        if valid {
            Ok(Self { min, max })
        } else {
            Err(EmberError::InvalidLifeRange { min, max })
        }
    }

    /// Every particle lives exactly `life` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `life` is negative or not finite.
    #[must_use]
    pub fn fixed(life: f32) -> Self {
        Self::new(life, life)
    }

    /// Minimum life in seconds.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Maximum life in seconds.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// `min + (max - min) * uniform`.
    #[inline]
    pub fn sample(&self, rng: &mut ParticleRng) -> f32 {
        self.min + (self.max - self.min) * rng.unit()
    }
}

/// Counts from one aging pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Records that survived and were updated.
    pub updated: usize,
    /// Records whose life ran out this pass.
    pub died: usize,
}

/// A fixed-size pool of particle records.
///
/// The record array is allocated once in [`ParticlePool::new`] and reused
/// for the pool's whole lifetime. The pool also owns the collaborators the
/// spawn and kill paths invoke: the source, the emission scheduler and the
/// influencer chain, plus the RNG they all draw from.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is driven from one thread per frame.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = ParticlePool::new(1000, LifeRange::new(1.0, 2.0), Box::new(StaticSource::default()));
///
/// // Spawn into the hinted free slot - O(1) amortized, no heap allocation
/// let slot = pool.emit_next();
///
/// // Age every live particle
/// pool.step(0.016);
/// ```
#[derive(Debug)]
pub struct ParticlePool {
    /// The slot array.
    records: Box<[ParticleRecord]>,
    /// Number of records with `active == true`.
    active_count: usize,
    /// Free-slot hint. `None` means no free slot is known.
    next_free: Option<usize>,
    /// Lifespan assigned at spawn.
    life: LifeRange,
    /// Shared randomness for life, source and influencers.
    rng: ParticleRng,
    /// Initial placement.
    source: Box<dyn ParticleSource>,
    /// Spawn counts and death notifications.
    scheduler: Box<dyn EmissionScheduler>,
    /// Ordered mutators.
    influencers: InfluencerChain,
}

impl ParticlePool {
    /// Creates a new pool with all slots inactive.
    ///
    /// The scheduler defaults to [`NullScheduler`], the influencer chain is
    /// empty and the RNG is seeded with 0.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of live particles
    /// * `life` - Lifespan bounds for new particles
    /// * `source` - Initial placement of new particles
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize, life: LifeRange, source: Box<dyn ParticleSource>) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            records: vec![ParticleRecord::default(); capacity].into_boxed_slice(),
            active_count: 0,
            next_free: Some(0),
            life,
            rng: ParticleRng::default(),
            source,
            scheduler: Box::new(NullScheduler),
            influencers: InfluencerChain::new(),
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Returns the number of live particles.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Returns the current free-slot hint.
    #[inline]
    #[must_use]
    pub const fn next_free_hint(&self) -> Option<usize> {
        self.next_free
    }

    /// The whole record array, one entry per slot.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    /// The record in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    #[inline]
    #[must_use]
    pub fn record(&self, slot: usize) -> &ParticleRecord {
        self.check_slot(slot);
        &self.records[slot]
    }

    /// Lifespan bounds for new particles.
    #[inline]
    #[must_use]
    pub const fn life_range(&self) -> LifeRange {
        self.life
    }

    /// Changes the lifespan of future particles. Live ones keep theirs.
    pub fn set_life_range(&mut self, life: LifeRange) {
        self.life = life;
    }

    /// The current source.
    #[must_use]
    pub fn source(&self) -> &dyn ParticleSource {
        self.source.as_ref()
    }

    /// Replaces the source. Existing particles are not affected.
    pub fn set_source(&mut self, source: Box<dyn ParticleSource>) {
        self.source = source;
    }

    /// The current scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &dyn EmissionScheduler {
        self.scheduler.as_ref()
    }

    /// Mutable access to the current scheduler.
    pub fn scheduler_mut(&mut self) -> &mut dyn EmissionScheduler {
        self.scheduler.as_mut()
    }

    /// Replaces the scheduler; `None` installs [`NullScheduler`].
    pub fn set_scheduler(&mut self, scheduler: Option<Box<dyn EmissionScheduler>>) {
        self.scheduler = scheduler.unwrap_or_else(|| Box::new(NullScheduler));
    }

    /// The influencer chain.
    #[must_use]
    pub fn influencers(&self) -> &InfluencerChain {
        &self.influencers
    }

    /// Appends an influencer to the end of the chain.
    pub fn add_influencer(&mut self, influencer: Box<dyn Influencer>) {
        self.influencers.push(influencer);
    }

    /// Replaces the RNG with a fresh one seeded with `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ParticleRng::seeded(seed);
    }

    /// Seed of the current RNG.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Spawns a particle into `slot` using the source.
    ///
    /// Runs the source, assigns a random life, resets orientation, sprite and
    /// size, then runs every creation hook in order.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn spawn(&mut self, slot: usize) {
        self.check_slot(slot);
        self.source.source_particle(slot, &mut self.records[slot], &mut self.rng);
        self.activate(slot);
        self.refresh_hint_after_spawn(slot);
    }

    /// Spawns a particle into `slot` at the given placement, bypassing the source.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn spawn_at(&mut self, slot: usize, position: Vec3, velocity: Vec3) {
        self.check_slot(slot);
        self.records[slot].place(position, velocity);
        self.activate(slot);
        self.refresh_hint_after_spawn(slot);
    }

    /// Kills the particle in `slot`.
    ///
    /// The death is always reported to the scheduler, even when the slot was
    /// already inactive; `active_count` only drops for a live slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn kill(&mut self, slot: usize) {
        self.check_slot(slot);

        let record = &mut self.records[slot];
        if record.active {
            record.active = false;
            self.active_count -= 1;
        }

        self.lower_hint(slot);
        self.scheduler.on_particle_death(slot);
    }

    /// Kills every slot, in index order.
    pub fn kill_all(&mut self) {
        for slot in 0..self.records.len() {
            self.kill(slot);
        }
    }

    /// Spawns into the hinted free slot.
    ///
    /// Returns the slot spawned into, or `None` if no free slot is known.
    pub fn emit_next(&mut self) -> Option<usize> {
        let slot = self.next_free?;
        self.spawn(slot);
        Some(slot)
    }

    /// Spawns into the hinted free slot at the given placement.
    ///
    /// Returns the slot spawned into, or `None` if no free slot is known.
    pub fn emit_next_at(&mut self, position: Vec3, velocity: Vec3) -> Option<usize> {
        let slot = self.next_free?;
        self.spawn_at(slot, position, velocity);
        Some(slot)
    }

    /// Spawns into every inactive slot. Returns how many were spawned.
    pub fn emit_all(&mut self) -> usize {
        let mut spawned = 0;
        for slot in 0..self.records.len() {
            if !self.records[slot].active {
                self.source.source_particle(slot, &mut self.records[slot], &mut self.rng);
                self.activate(slot);
                spawned += 1;
            }
        }
        self.next_free = None;
        spawned
    }

    /// Ages every live particle by `dt` seconds.
    ///
    /// Each active slot loses `dt` of life. Slots reaching zero are killed;
    /// the others get their `life_progress` recomputed, run every per-frame
    /// hook in order, then integrate `position += velocity * dt`. A hook that
    /// clears `active` retires the particle through [`ParticlePool::kill`].
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite.
    pub fn step(&mut self, dt: f32) -> StepReport {
        assert!(dt.is_finite() && dt >= 0.0, "delta time must be finite and >= 0, got {dt}");

        let mut report = StepReport::default();

        for slot in 0..self.records.len() {
            if !self.records[slot].active {
                continue;
            }

            let expired = {
                let record = &mut self.records[slot];
                record.remaining_life -= dt;
                record.remaining_life <= 0.0
            };

            if expired {
                self.kill(slot);
                report.died += 1;
                continue;
            }

            let record = &mut self.records[slot];
            record.refresh_progress();
            self.influencers.apply_update(slot, record, dt, &mut self.rng);

            if !record.active {
                // Retired by an influencer; route it through kill.
                record.active = true;
                self.kill(slot);
                report.died += 1;
                continue;
            }

            record.integrate(dt);
            report.updated += 1;
        }

        report
    }

    /// Fresh, all-inactive pool with deep copies of every collaborator.
    #[must_use]
    pub fn duplicate(&self, seed: u64) -> Self {
        let mut pool = Self::new(self.capacity(), self.life, self.source.clone_for_system());
        pool.scheduler = self.scheduler.clone_for_system();
        pool.influencers = self.influencers.clone_for_system();
        pool.reseed(seed);
        pool
    }

    fn activate(&mut self, slot: usize) {
        let life = self.life.sample(&mut self.rng);
        let record = &mut self.records[slot];
        let was_active = record.active;

        record.activate(life);
        self.influencers.apply_create(slot, record, &mut self.rng);
        // Creation hooks cannot veto the spawn.
        record.active = true;

        if !was_active {
            self.active_count += 1;
        }
    }

    fn lower_hint(&mut self, slot: usize) {
        match self.next_free {
            Some(hint) if hint <= slot => {}
            _ => self.next_free = Some(slot),
        }
    }

    fn refresh_hint_after_spawn(&mut self, slot: usize) {
        if self.next_free == Some(slot) {
            self.advance_hint(slot);
        }
    }

    /// Circular forward scan for the next inactive slot after `from`.
    fn advance_hint(&mut self, from: usize) {
        let capacity = self.records.len();
        let mut search = from;
        loop {
            search = (search + 1) % capacity;
            if search == from {
                self.next_free = None;
                return;
            }
            if !self.records[search].active {
                self.next_free = Some(search);
                return;
            }
        }
    }

    #[inline]
    fn check_slot(&self, slot: usize) {
        assert!(
            slot < self.records.len(),
            "slot {slot} out of range for pool of capacity {}",
            self.records.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn pool(capacity: usize) -> ParticlePool {
        ParticlePool::new(capacity, LifeRange::fixed(1.0), Box::new(StaticSource::default()))
    }

    #[derive(Debug, Default, Clone)]
    struct DeathLog {
        deaths: std::rc::Rc<std::cell::RefCell<Vec<usize>>>,
    }

    impl EmissionScheduler for DeathLog {
        fn particles_to_spawn(&mut self, _dt: f32) -> u32 {
            0
        }
        fn on_particle_death(&mut self, slot: usize) {
            self.deaths.borrow_mut().push(slot);
        }
        fn should_auto_disable(&self) -> bool {
            false
        }
        fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
            Box::new(Self::default())
        }
    }

    #[test]
    fn test_emit_until_full() {
        let mut pool = pool(4);

        for expected in 0..4 {
            assert_eq!(pool.emit_next(), Some(expected));
        }
        assert_eq!(pool.active_count(), 4);
        assert_eq!(pool.next_free_hint(), None);
        assert_eq!(pool.emit_next(), None);
    }

    #[test]
    fn test_kill_lowers_hint() {
        let mut pool = pool(10);
        for _ in 0..6 {
            let _ = pool.emit_next();
        }
        assert_eq!(pool.next_free_hint(), Some(6));

        pool.kill(2);
        assert_eq!(pool.next_free_hint(), Some(2));

        // Killing a higher slot leaves the lower hint alone.
        pool.kill(4);
        assert_eq!(pool.next_free_hint(), Some(2));

        assert_eq!(pool.emit_next(), Some(2));
        assert_eq!(pool.next_free_hint(), Some(4));
    }

    #[test]
    fn test_hint_wraps_around() {
        let mut pool = pool(3);
        pool.emit_all();
        pool.kill(0);
        // Hint is 0; emitting there scans 1, 2 (both live), wraps to 0 and gives up.
        assert_eq!(pool.emit_next(), Some(0));
        assert_eq!(pool.next_free_hint(), None);

        pool.kill(2);
        pool.kill(1);
        assert_eq!(pool.next_free_hint(), Some(1));
        assert_eq!(pool.emit_next(), Some(1));
        // Scan from 2 finds the free slot right away.
        assert_eq!(pool.next_free_hint(), Some(2));
    }

    #[test]
    fn test_spawn_on_hint_slot_advances_hint() {
        let mut pool = pool(4);
        pool.spawn(0);
        assert_eq!(pool.next_free_hint(), Some(1));
        pool.spawn(3);
        assert_eq!(pool.next_free_hint(), Some(1));
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_step_kills_expired() {
        let mut pool = pool(2);
        let _ = pool.emit_next();

        let report = pool.step(0.5);
        assert_eq!(report, StepReport { updated: 1, died: 0 });
        assert!((pool.record(0).life_progress - 0.5).abs() < 1e-6);

        let report = pool.step(0.5);
        assert_eq!(report, StepReport { updated: 0, died: 1 });
        assert_eq!(pool.active_count(), 0);
        assert!(!pool.record(0).active);
        assert_eq!(pool.next_free_hint(), Some(0));
    }

    #[test]
    fn test_step_integrates_after_influencers() {
        let mut pool = ParticlePool::new(
            1,
            LifeRange::fixed(10.0),
            Box::new(StaticSource::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0))),
        );
        let _ = pool.emit_next();
        pool.step(0.5);
        assert_eq!(pool.record(0).position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_kill_inactive_slot_still_notifies() {
        let log = DeathLog::default();
        let deaths = log.deaths.clone();
        let mut pool = pool(3);
        pool.set_scheduler(Some(Box::new(log)));

        let _ = pool.emit_next();
        pool.kill(0);
        pool.kill(0);

        assert_eq!(*deaths.borrow(), vec![0, 0]);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_life_sampled_within_range() {
        let mut pool = ParticlePool::new(64, LifeRange::new(0.5, 1.5), Box::new(StaticSource::default()));
        pool.reseed(99);
        pool.emit_all();
        for record in pool.records() {
            assert!(record.start_life >= 0.5 && record.start_life <= 1.5);
            assert_eq!(record.remaining_life, record.start_life);
        }
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than zero")]
    fn test_zero_capacity_rejected() {
        let _ = pool(0);
    }

    /// Retires particles halfway through their life; refuses spawns.
    #[derive(Debug, Clone)]
    struct HalfLife;

    impl Influencer for HalfLife {
        fn on_create(&mut self, _: usize, record: &mut ParticleRecord, _: &mut ParticleRng) {
            record.active = false;
        }
        fn on_update(&mut self, _: usize, record: &mut ParticleRecord, _: f32, _: &mut ParticleRng) {
            if record.life_progress >= 0.5 {
                record.active = false;
            }
        }
        fn clone_for_system(&self) -> Box<dyn Influencer> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_influencer_can_retire_particles() {
        let log = DeathLog::default();
        let deaths = log.deaths.clone();
        let mut pool = pool(4);
        pool.set_scheduler(Some(Box::new(log)));
        pool.add_influencer(Box::new(HalfLife));

        assert_eq!(pool.emit_all(), 4);
        assert_eq!(pool.active_count(), 4);
        assert!(pool.records().iter().all(|r| r.active));

        let report = pool.step(0.25);
        assert_eq!(report, StepReport { updated: 4, died: 0 });

        let report = pool.step(0.25);
        assert_eq!(report, StepReport { updated: 0, died: 4 });
        assert_eq!(pool.active_count(), 0);
        assert_eq!(*deaths.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(pool.next_free_hint(), Some(0));
        assert_eq!(pool.emit_next(), Some(0));
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_kill_out_of_range() {
        pool(2).kill(2);
    }

    #[test]
    fn test_life_range_validation() {
        assert!(LifeRange::try_new(2.0, 1.0).is_err());
        assert!(LifeRange::try_new(-1.0, 1.0).is_err());
        assert!(LifeRange::try_new(f32::NAN, 1.0).is_err());
        assert_eq!(LifeRange::try_new(1.0, 1.0), Ok(LifeRange::fixed(1.0)));
    }
}
