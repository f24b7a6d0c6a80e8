//! # Emission Schedulers
//!
//! Decide how many particles a system spawns each frame and get told when
//! one dies.

/// Controls the rate at which particles are spawned.
pub trait EmissionScheduler: std::fmt::Debug {
    /// Called exactly once per step, before any spawning for that frame.
    fn particles_to_spawn(&mut self, dt: f32) -> u32;

    /// Called synchronously whenever a slot is killed.
    fn on_particle_death(&mut self, slot: usize);

    /// If true the system disables itself once no particle is alive.
    fn should_auto_disable(&self) -> bool;

    /// Independent copy of this scheduler's configuration for a new system.
    fn clone_for_system(&self) -> Box<dyn EmissionScheduler>;
}

/// Spawns nothing and never requests auto-disable.
///
/// Used when no scheduler is supplied: particles are then only spawned by
/// explicit calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullScheduler;

impl EmissionScheduler for NullScheduler {
    fn particles_to_spawn(&mut self, _dt: f32) -> u32 {
        0
    }

    fn on_particle_death(&mut self, _slot: usize) {}

    fn should_auto_disable(&self) -> bool {
        false
    }

    fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
        Box::new(*self)
    }
}
