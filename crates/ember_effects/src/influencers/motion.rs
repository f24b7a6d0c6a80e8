//! Velocity and spin.

use ember_core::{Influencer, ParticleRecord, ParticleRng, Quaternion, Vec3};
use serde::{Deserialize, Serialize};

/// Constant acceleration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GravityInfluencer {
    /// Acceleration in units per second squared.
    pub gravity: Vec3,
}

impl GravityInfluencer {
    /// Creates a gravity pull.
    #[must_use]
    pub const fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl Default for GravityInfluencer {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -1.0, 0.0))
    }
}

impl Influencer for GravityInfluencer {
    fn on_create(&mut self, _slot: usize, _record: &mut ParticleRecord, _rng: &mut ParticleRng) {}

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, dt: f32, _rng: &mut ParticleRng) {
        record.velocity += self.gravity * dt;
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// Keeps the direction of travel but rescales speed over life.
///
/// A particle at rest has no direction and stays at rest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedInfluencer {
    /// Speed at spawn.
    pub start: f32,
    /// Speed at the end of life.
    pub end: f32,
}

impl SpeedInfluencer {
    /// Creates a speed ramp.
    #[must_use]
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

impl Influencer for SpeedInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        record.velocity = record.velocity.normalize_or_zero() * self.start;
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        let speed = self.start + (self.end - self.start) * record.life_progress;
        record.velocity = record.velocity.normalize_or_zero() * speed;
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// Random spin assigned at spawn, applied every frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationInfluencer {
    /// Lower bound of the angular velocity per axis (rad/s).
    pub min: Vec3,
    /// Upper bound of the angular velocity per axis (rad/s).
    pub max: Vec3,
    /// Flip the sign of each axis on a coin toss.
    #[serde(default)]
    pub random_flip: bool,
}

impl RotationInfluencer {
    /// Creates a spin range.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3, random_flip: bool) -> Self {
        Self { min, max, random_flip }
    }
}

impl Influencer for RotationInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        let mut spin = rng.vec3_between(self.min, self.max);
        if self.random_flip {
            if rng.coin() {
                spin.x = -spin.x;
            }
            if rng.coin() {
                spin.y = -spin.y;
            }
            if rng.coin() {
                spin.z = -spin.z;
            }
        }
        record.angular_velocity = spin;
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, dt: f32, _rng: &mut ParticleRng) {
        let step = record.angular_velocity * dt;
        record.orientation = (record.orientation * Quaternion::from_angles(step.x, step.y, step.z)).normalize();
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// When a [`RandomImpulseInfluencer`] pushes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpulseTiming {
    /// Once, at spawn.
    Create,
    /// Every frame, scaled by `dt`.
    Update,
    /// Both.
    #[default]
    Always,
}

/// Random velocity kicks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomImpulseInfluencer {
    /// When the impulse is applied.
    #[serde(default)]
    pub when: ImpulseTiming,
    /// Lower bound per axis.
    pub min: Vec3,
    /// Upper bound per axis.
    pub max: Vec3,
}

impl RandomImpulseInfluencer {
    /// Creates a random impulse.
    #[must_use]
    pub const fn new(when: ImpulseTiming, min: Vec3, max: Vec3) -> Self {
        Self { when, min, max }
    }
}

impl Influencer for RandomImpulseInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        if self.when != ImpulseTiming::Update {
            record.velocity += rng.vec3_between(self.min, self.max);
        }
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, dt: f32, rng: &mut ParticleRng) {
        if self.when != ImpulseTiming::Create {
            record.velocity += rng.vec3_between(self.min, self.max) * dt;
        }
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}
