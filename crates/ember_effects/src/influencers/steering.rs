//! # Steering
//!
//! Influencers that bend velocity toward a goal as the particle ages. The
//! blend weight is `elapsed / start_life`, so a particle drifts freely at
//! spawn and is fully committed to the goal when its life runs out.
//!
//! These are simple linear blends: they converge unless the velocity points
//! exactly away from the goal.

use std::sync::Arc;

use ember_core::{Influencer, ParticleRecord, ParticleRng, Transform, Vec3};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Blends velocity toward `goal - position`, snapping once `weight >= 1`.
fn steer_toward(record: &mut ParticleRecord, goal: Vec3, weight: f32) {
    let desired = goal - record.position;
    record.velocity = if weight >= 1.0 {
        desired
    } else {
        record.velocity.lerp(desired, weight)
    };
}

/// `elapsed / start_life`, with an already finished blend for zero-life particles.
fn life_weight(record: &ParticleRecord) -> f32 {
    if record.start_life > 0.0 {
        record.elapsed() / record.start_life
    } else {
        1.0
    }
}

/// Steers every particle toward a fixed point in local space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferredDestinationInfluencer {
    /// Goal position.
    pub destination: Vec3,
}

impl PreferredDestinationInfluencer {
    /// Creates a fixed destination.
    #[must_use]
    pub const fn new(destination: Vec3) -> Self {
        Self { destination }
    }
}

impl Influencer for PreferredDestinationInfluencer {
    fn on_create(&mut self, _slot: usize, _record: &mut ParticleRecord, _rng: &mut ParticleRng) {}

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        steer_toward(record, self.destination, life_weight(record));
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// Turns the direction of travel toward `direction`, keeping speed.
///
/// The turn completes `time_before_end` seconds before the particle dies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferredDirectionInfluencer {
    /// Goal direction (expected to be unit length).
    pub direction: Vec3,
    /// Seconds before death at which the particle is fully aligned.
    #[serde(default = "default_time_before_end")]
    pub time_before_end: f32,
}

fn default_time_before_end() -> f32 {
    1.0
}

impl PreferredDirectionInfluencer {
    /// Creates a preferred direction.
    #[must_use]
    pub const fn new(direction: Vec3, time_before_end: f32) -> Self {
        Self { direction, time_before_end }
    }
}

impl Influencer for PreferredDirectionInfluencer {
    fn on_create(&mut self, _slot: usize, _record: &mut ParticleRecord, _rng: &mut ParticleRng) {}

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        let speed = record.velocity.length();
        if speed <= 0.0 {
            return;
        }

        let turn_time = record.start_life - self.time_before_end;
        let weight = if turn_time > 0.0 {
            record.elapsed() / turn_time
        } else {
            1.0
        };

        if weight >= 1.0 {
            record.velocity = self.direction * speed;
        } else {
            let blended = (record.velocity / speed).lerp(self.direction, weight);
            record.velocity = blended.normalize_or_zero() * speed;
        }
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// A world-space position moved by the host and read by particle systems.
///
/// Cloning the handle shares the position; [`SharedTarget::detached`]
/// makes an independent one.
#[derive(Clone, Debug, Default)]
pub struct SharedTarget(Arc<RwLock<Vec3>>);

impl SharedTarget {
    /// Creates a target at `position`.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self(Arc::new(RwLock::new(position)))
    }

    /// New handle starting at this target's current position.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self::new(self.get())
    }

    /// True if both handles move the same position.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Moves the target.
    pub fn set(&self, position: Vec3) {
        *self.0.write() = position;
    }

    /// Current position.
    #[must_use]
    pub fn get(&self) -> Vec3 {
        *self.0.read()
    }
}

/// Steers toward a [`SharedTarget`] that may move between frames.
///
/// `to_local` is the system's own world transform; the target's world
/// position is mapped through its inverse before steering.
///
/// The influencer follows the handle it was built with. Copies made with
/// `clone` or `clone_for_system` get their own target, starting where the
/// original's target is; [`TargetDestinationInfluencer::set_target`] binds
/// a copy to a handle the host moves.
#[derive(Debug)]
pub struct TargetDestinationInfluencer {
    target: SharedTarget,
    to_local: Transform,
}

impl TargetDestinationInfluencer {
    /// Follows `target`, with the system placed at `to_local` in the world.
    #[must_use]
    pub fn new(target: SharedTarget, to_local: Transform) -> Self {
        Self { target, to_local }
    }

    /// Updates the system's world transform.
    pub fn set_transform(&mut self, to_local: Transform) {
        self.to_local = to_local;
    }

    /// Follows `target` from now on.
    pub fn set_target(&mut self, target: SharedTarget) {
        self.target = target;
    }

    /// The followed target.
    #[must_use]
    pub fn target(&self) -> &SharedTarget {
        &self.target
    }
}

impl Clone for TargetDestinationInfluencer {
    fn clone(&self) -> Self {
        Self {
            target: self.target.detached(),
            to_local: self.to_local,
        }
    }
}

impl Influencer for TargetDestinationInfluencer {
    fn on_create(&mut self, _slot: usize, _record: &mut ParticleRecord, _rng: &mut ParticleRng) {}

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        let goal = self.to_local.inverse_transform_point(self.target.get());
        steer_toward(record, goal, life_weight(record));
    }

    /// The copy follows its own target, starting at the current position.
    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aged(start_life: f32, remaining_life: f32) -> ParticleRecord {
        ParticleRecord {
            start_life,
            remaining_life,
            active: true,
            ..ParticleRecord::default()
        }
    }

    #[test]
    fn test_destination_blend_and_snap() {
        let mut steer = PreferredDestinationInfluencer::new(Vec3::new(10.0, 0.0, 0.0));
        let mut rng = ParticleRng::seeded(0);

        let mut record = aged(2.0, 1.0);
        record.velocity = Vec3::new(0.0, 2.0, 0.0);
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::new(5.0, 1.0, 0.0));

        let mut record = aged(2.0, 0.0);
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_direction_keeps_speed() {
        let mut steer = PreferredDirectionInfluencer::new(Vec3::Y, 1.0);
        let mut rng = ParticleRng::seeded(0);

        let mut record = aged(3.0, 2.0);
        record.velocity = Vec3::new(3.0, 0.0, 0.0);
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert!((record.velocity.length() - 3.0).abs() < 1e-5);
        assert!(record.velocity.y > 0.0 && record.velocity.x > 0.0);

        // Aligned once only `time_before_end` remains.
        let mut record = aged(3.0, 1.0);
        record.velocity = Vec3::new(3.0, 0.0, 0.0);
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_direction_ignores_resting_particle() {
        let mut steer = PreferredDirectionInfluencer::new(Vec3::Y, 0.0);
        let mut rng = ParticleRng::seeded(0);
        let mut record = aged(1.0, 0.5);
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_target_is_followed_in_local_space() {
        let target = SharedTarget::new(Vec3::new(5.0, 0.0, 0.0));
        let mut steer = TargetDestinationInfluencer::new(
            target.clone(),
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        );
        let mut rng = ParticleRng::seeded(0);

        let mut record = aged(1.0, 0.0);
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::new(4.0, 0.0, 0.0));

        target.set(Vec3::new(1.0, 3.0, 0.0));
        steer.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_copies_own_their_target() {
        let target = SharedTarget::new(Vec3::new(0.0, 0.0, 5.0));
        let steer = TargetDestinationInfluencer::new(target.clone(), Transform::IDENTITY);
        assert!(steer.target().same_as(&target));

        let copy = steer.clone();
        target.set(Vec3::new(0.0, 0.0, 99.0));
        assert!(!copy.target().same_as(&target));
        assert_eq!(copy.target().get(), Vec3::new(0.0, 0.0, 5.0));

        let mut boxed = steer.clone_for_system();
        let mut rng = ParticleRng::seeded(0);
        let mut record = aged(1.0, 0.0);
        target.set(Vec3::new(0.0, 0.0, -7.0));
        boxed.on_update(0, &mut record, 0.1, &mut rng);
        assert_eq!(record.velocity, Vec3::new(0.0, 0.0, 99.0));
    }

    #[test]
    fn test_copy_can_rejoin_shared_target() {
        let target = SharedTarget::new(Vec3::ZERO);
        let steer = TargetDestinationInfluencer::new(target.clone(), Transform::IDENTITY);
        let mut copy = steer.clone();
        copy.set_target(steer.target().clone());

        target.set(Vec3::Y);
        assert_eq!(copy.target().get(), Vec3::Y);
    }
}
