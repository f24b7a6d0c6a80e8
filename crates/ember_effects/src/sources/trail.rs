//! Spawning from another system's particles.
//!
//! The other system publishes its records each frame through a
//! [`SnapshotPublisher`](crate::render::SnapshotPublisher); this source reads
//! the latest snapshot. Chaining systems this way gives trails and secondary
//! sparks without either system borrowing the other.

use ember_core::{ParticleRecord, ParticleRng, ParticleSource, Transform, Vec3};

use crate::render::SharedRecords;

/// Spawns at the position of a random live particle of another system.
///
/// Position and velocity are copied and mapped into this system's space by
/// `to_local`. When the other system has no live particle the new one starts
/// at the origin at rest.
#[derive(Clone, Debug)]
pub struct ParticleParticleSource {
    snapshot: SharedRecords,
    to_local: Transform,
}

impl ParticleParticleSource {
    /// Reads from `snapshot`; `to_local` maps the other system's space into ours.
    #[must_use]
    pub fn new(snapshot: SharedRecords, to_local: Transform) -> Self {
        Self { snapshot, to_local }
    }

    /// Updates the mapping between the two systems.
    pub fn set_transform(&mut self, to_local: Transform) {
        self.to_local = to_local;
    }
}

impl ParticleSource for ParticleParticleSource {
    fn source_particle(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        let records = self.snapshot.read();
        let live = records.iter().filter(|r| r.active).count();
        if live == 0 {
            record.place(Vec3::ZERO, Vec3::ZERO);
            return;
        }

        let chosen = rng.index(live);
        if let Some(parent) = records.iter().filter(|r| r.active).nth(chosen) {
            record.place(
                self.to_local.transform_point(parent.position),
                self.to_local.transform_direction(parent.velocity),
            );
        }
    }

    /// The copy reads the same snapshot.
    fn clone_for_system(&self) -> Box<dyn ParticleSource> {
        Box::new(self.clone())
    }
}
