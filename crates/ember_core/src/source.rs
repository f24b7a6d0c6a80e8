//! # Particle Sources
//!
//! A source writes the initial position and velocity of a freshly spawned
//! record. It may query up to the pool's capacity times per frame.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::record::ParticleRecord;
use crate::rng::ParticleRng;

/// Supplies the initial placement of new particles.
pub trait ParticleSource: std::fmt::Debug {
    /// Writes at least `position` and `velocity` into `record`.
    fn source_particle(&mut self, slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng);

    /// Independent copy of this source's configuration for a new system.
    fn clone_for_system(&self) -> Box<dyn ParticleSource>;
}

/// Places every particle at a fixed position with a fixed velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSource {
    /// Spawn position.
    pub position: Vec3,
    /// Spawn velocity.
    pub velocity: Vec3,
}

impl StaticSource {
    /// Creates a new static source.
    #[must_use]
    pub const fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }
}

impl ParticleSource for StaticSource {
    fn source_particle(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        record.place(self.position, self.velocity);
    }

    fn clone_for_system(&self) -> Box<dyn ParticleSource> {
        Box::new(*self)
    }
}
