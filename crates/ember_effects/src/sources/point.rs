//! Point emitter.

use ember_core::{ParticleRecord, ParticleRng, ParticleSource, Vec3};
use serde::{Deserialize, Serialize};

/// Spawns at a single point with a per-axis random velocity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    /// Spawn position in local space.
    #[serde(default)]
    pub origin: Vec3,
    /// Lower velocity bound per axis.
    pub min_velocity: Vec3,
    /// Upper velocity bound per axis.
    pub max_velocity: Vec3,
}

impl PointSource {
    /// Creates a point source.
    #[must_use]
    pub const fn new(origin: Vec3, min_velocity: Vec3, max_velocity: Vec3) -> Self {
        Self { origin, min_velocity, max_velocity }
    }
}

impl Default for PointSource {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 5.0, 1.0))
    }
}

impl ParticleSource for PointSource {
    fn source_particle(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        let velocity = rng.vec3_between(self.min_velocity, self.max_velocity);
        record.place(self.origin, velocity);
    }

    fn clone_for_system(&self) -> Box<dyn ParticleSource> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_within_bounds() {
        let mut source = PointSource::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        let mut rng = ParticleRng::seeded(17);
        let mut record = ParticleRecord::default();

        for _ in 0..100 {
            source.source_particle(0, &mut record, &mut rng);
            assert_eq!(record.position, Vec3::new(1.0, 2.0, 3.0));
            assert!((-1.0..1.0).contains(&record.velocity.x));
            assert!((0.0..1.0).contains(&record.velocity.y));
            assert_eq!(record.velocity.z, 2.0);
        }
    }
}
