//! # Particle System
//!
//! Ties a pool, its collaborators and a mesh collaborator together and runs
//! the per-frame protocol:
//!
//! ```text
//! step(dt):
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. AGE      pool.step(dt): decrement life, kill, influence,   │
//! │             integrate                                         │
//! │ 2. ASK      scheduler.particles_to_spawn(dt)                  │
//! │ 3. SPAWN    emit_next() that many times (each call consumes   │
//! │             the free-slot hint)                               │
//! │ 4. HAND OFF mesh.update(camera, records)                      │
//! │ 5. IDLE?    auto-disable if the scheduler wants it and no     │
//! │             particle is alive                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A disabled system ignores `step` entirely: no life decays, no spawns.

use tracing::{debug, trace};

use crate::influencer::Influencer;
use crate::math::Vec3;
use crate::mesh::{CameraView, MeshSync};
use crate::pool::{LifeRange, ParticlePool};
use crate::record::ParticleRecord;
use crate::scheduler::EmissionScheduler;
use crate::source::{ParticleSource, StaticSource};

/// What happened during one enabled step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Records that survived the aging pass.
    pub updated: usize,
    /// Records that died during the aging pass.
    pub died: usize,
    /// Spawn count the scheduler asked for.
    pub requested: u32,
    /// Particles actually spawned (less than requested when the pool filled).
    pub spawned: u32,
    /// Live particles at the end of the step.
    pub active: usize,
    /// True if the step ended by disabling the system.
    pub auto_disabled: bool,
}

/// The particle orchestrator.
///
/// Exclusively owns its record array. Mesh collaborators read it through
/// [`ParticleSystem::records`] between steps; they must not mutate it.
#[derive(Debug)]
pub struct ParticleSystem {
    /// Name for logs and host attachment.
    name: String,
    /// Slots and collaborators.
    pool: ParticlePool,
    /// Simulation gate.
    enabled: bool,
    /// Render collaborator.
    mesh: Option<Box<dyn MeshSync>>,
    /// Last view supplied by the host.
    camera: Option<CameraView>,
}

impl ParticleSystem {
    /// Starts building a system with `capacity` slots.
    #[must_use]
    pub fn builder(capacity: usize) -> SystemBuilder {
        SystemBuilder::new(capacity)
    }

    /// Wraps an existing pool. The system starts enabled.
    #[must_use]
    pub fn from_pool(name: impl Into<String>, pool: ParticlePool) -> Self {
        Self {
            name: name.into(),
            pool,
            enabled: true,
            mesh: None,
            camera: None,
        }
    }

    /// Runs one frame of the simulation.
    ///
    /// Returns `None` without touching anything when the system is disabled.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite.
    pub fn step(&mut self, dt: f32) -> Option<FrameReport> {
        if !self.enabled {
            return None;
        }

        let aged = self.pool.step(dt);

        let requested = self.pool.scheduler_mut().particles_to_spawn(dt);
        let mut spawned = 0;
        while spawned < requested {
            if self.pool.emit_next().is_none() {
                trace!(system = %self.name, requested, spawned, "pool full, dropping spawns");
                break;
            }
            spawned += 1;
        }

        if let Some(mesh) = self.mesh.as_mut() {
            mesh.update(self.camera.as_ref(), self.pool.records());
        }

        let auto_disabled =
            self.pool.scheduler().should_auto_disable() && self.pool.active_count() == 0;
        if auto_disabled {
            self.enabled = false;
            debug!(system = %self.name, "no live particles, auto-disabled");
        }

        Some(FrameReport {
            updated: aged.updated,
            died: aged.died,
            requested,
            spawned,
            active: self.pool.active_count(),
            auto_disabled,
        })
    }

    /// Is the simulation running?
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Resumes the simulation.
    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    /// Pauses the simulation. Live particles freeze in place.
    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Sets the simulation gate.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!(system = %self.name, enabled, "particle system toggled");
        }
        self.enabled = enabled;
    }

    /// Spawns into the next free slot using the source.
    ///
    /// Returns the slot, or `None` if the pool is full.
    pub fn emit_next(&mut self) -> Option<usize> {
        let slot = self.pool.emit_next();
        if slot.is_some() {
            self.wake_for_manual_spawn();
        }
        slot
    }

    /// Spawns into the next free slot at the given placement.
    ///
    /// Returns the slot, or `None` if the pool is full. Re-enables a system
    /// that went idle through auto-disable, so one-shot effects can be fired
    /// without tracking system state.
    pub fn emit_next_at(&mut self, position: Vec3, velocity: Vec3) -> Option<usize> {
        let slot = self.pool.emit_next_at(position, velocity);
        if slot.is_some() {
            self.wake_for_manual_spawn();
        }
        slot
    }

    /// Spawns into every free slot. Returns how many were spawned.
    pub fn emit_all(&mut self) -> usize {
        let spawned = self.pool.emit_all();
        if spawned > 0 {
            self.wake_for_manual_spawn();
        }
        spawned
    }

    /// Kills the particle in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn kill(&mut self, slot: usize) {
        self.pool.kill(slot);
    }

    /// Kills every particle.
    pub fn kill_all(&mut self) {
        self.pool.kill_all();
    }

    /// Name given to this system.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the system.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Live record array, one entry per slot.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[ParticleRecord] {
        self.pool.records()
    }

    /// Maximum number of live particles.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of live particles.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Read access to the pool.
    #[must_use]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Changes the lifespan of future particles.
    pub fn set_life_range(&mut self, life: LifeRange) {
        self.pool.set_life_range(life);
    }

    /// Replaces the source. Live particles are not affected.
    pub fn set_source(&mut self, source: Box<dyn ParticleSource>) {
        self.pool.set_source(source);
    }

    /// Replaces the scheduler; `None` installs the null scheduler.
    pub fn set_scheduler(&mut self, scheduler: Option<Box<dyn EmissionScheduler>>) {
        self.pool.set_scheduler(scheduler);
    }

    /// Appends an influencer to the chain.
    pub fn add_influencer(&mut self, influencer: Box<dyn Influencer>) {
        self.pool.add_influencer(influencer);
    }

    /// Installs (or removes) the render collaborator.
    pub fn set_mesh(&mut self, mesh: Option<Box<dyn MeshSync>>) {
        self.mesh = mesh;
    }

    /// The render collaborator, if any.
    #[must_use]
    pub fn mesh(&self) -> Option<&dyn MeshSync> {
        self.mesh.as_deref()
    }

    /// Updates the view handed to the mesh collaborator.
    pub fn set_camera(&mut self, camera: Option<CameraView>) {
        self.camera = camera;
    }

    /// Restarts the random sequence.
    pub fn reseed(&mut self, seed: u64) {
        self.pool.reseed(seed);
    }

    /// Deep copy of the configuration onto a fresh pool, reusing this
    /// system's seed.
    ///
    /// See [`ParticleSystem::duplicate_with_seed`].
    #[must_use]
    pub fn duplicate(&self) -> Self {
        self.duplicate_with_seed(self.pool.seed())
    }

    /// Deep copy of the configuration onto a fresh, all-inactive pool.
    ///
    /// Source, scheduler and influencers are cloned through their
    /// `clone_for_system` hooks, so the copy shares no mutable state with the
    /// original. The mesh collaborator is not carried over: the new owner
    /// installs its own with [`ParticleSystem::set_mesh`].
    #[must_use]
    pub fn duplicate_with_seed(&self, seed: u64) -> Self {
        debug!(system = %self.name, seed, "duplicating particle system");
        Self {
            name: self.name.clone(),
            pool: self.pool.duplicate(seed),
            enabled: self.enabled,
            mesh: None,
            camera: None,
        }
    }

    fn wake_for_manual_spawn(&mut self) {
        if !self.enabled && self.pool.scheduler().should_auto_disable() {
            debug!(system = %self.name, "manual spawn re-enabled system");
            self.enabled = true;
        }
    }
}

/// Builder for [`ParticleSystem`].
#[derive(Debug)]
pub struct SystemBuilder {
    capacity: usize,
    name: String,
    life: LifeRange,
    seed: u64,
    source: Option<Box<dyn ParticleSource>>,
    scheduler: Option<Box<dyn EmissionScheduler>>,
    influencers: Vec<Box<dyn Influencer>>,
    mesh: Option<Box<dyn MeshSync>>,
    enabled: bool,
}

impl SystemBuilder {
    /// Defaults: life 1-2 s, seed 0, a static source at the origin, no
    /// scheduler, no influencers, no mesh, enabled.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            name: String::from("particles"),
            life: LifeRange::new(1.0, 2.0),
            seed: 0,
            source: None,
            scheduler: None,
            influencers: Vec::new(),
            mesh: None,
            enabled: true,
        }
    }

    /// Sets the system name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lifespan bounds.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are negative, not finite, or `max < min`.
    #[must_use]
    pub fn life(mut self, min: f32, max: f32) -> Self {
        self.life = LifeRange::new(min, max);
        self
    }

    /// Every particle lives exactly `life` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `life` is negative or not finite.
    #[must_use]
    pub fn fixed_life(mut self, life: f32) -> Self {
        self.life = LifeRange::fixed(life);
        self
    }

    /// Seeds the system RNG.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn source(mut self, source: impl ParticleSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets an already boxed source.
    #[must_use]
    pub fn boxed_source(mut self, source: Box<dyn ParticleSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the scheduler.
    #[must_use]
    pub fn scheduler(mut self, scheduler: impl EmissionScheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Sets an already boxed scheduler; `None` keeps the null scheduler.
    #[must_use]
    pub fn boxed_scheduler(mut self, scheduler: Option<Box<dyn EmissionScheduler>>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Appends an influencer. Registration order is preserved.
    #[must_use]
    pub fn influencer(mut self, influencer: impl Influencer + 'static) -> Self {
        self.influencers.push(Box::new(influencer));
        self
    }

    /// Appends an already boxed influencer.
    #[must_use]
    pub fn boxed_influencer(mut self, influencer: Box<dyn Influencer>) -> Self {
        self.influencers.push(influencer);
        self
    }

    /// Sets the render collaborator.
    #[must_use]
    pub fn mesh(mut self, mesh: impl MeshSync + 'static) -> Self {
        self.mesh = Some(Box::new(mesh));
        self
    }

    /// Whether the system starts enabled.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builds the system.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    #[must_use]
    pub fn build(self) -> ParticleSystem {
        let source = self
            .source
            .unwrap_or_else(|| Box::new(StaticSource::new(Vec3::ZERO, Vec3::ZERO)));

        let mut pool = ParticlePool::new(self.capacity, self.life, source);
        pool.set_scheduler(self.scheduler);
        for influencer in self.influencers {
            pool.add_influencer(influencer);
        }
        pool.reseed(self.seed);

        let mut system = ParticleSystem::from_pool(self.name, pool);
        system.mesh = self.mesh;
        system.enabled = self.enabled;
        system
    }
}
