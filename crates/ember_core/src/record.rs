//! # Particle Record
//!
//! One slot of the particle pool. Records are never allocated or freed
//! individually: "creation" and "destruction" flip `active`.

use serde::{Deserialize, Serialize};

use crate::math::{Color, Quaternion, Vec3};

/// Largest `f32` strictly below 1.0.
///
/// `life_progress` is clamped to this so rounding never reports a live
/// particle as fully elapsed.
pub const MAX_LIFE_PROGRESS: f32 = 1.0 - f32::EPSILON / 2.0;

/// Simulated state of one particle slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// Position in the system's local space.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Render color.
    pub color: Color,
    /// Unit-less render scale.
    pub size: f32,
    /// Seconds of life left. Within `[0, start_life]` while active.
    pub remaining_life: f32,
    /// Seconds of life assigned at spawn.
    pub start_life: f32,
    /// `1 - remaining_life / start_life`, in `[0, 1)`.
    pub life_progress: f32,
    /// Current orientation (unit quaternion).
    pub orientation: Quaternion,
    /// Radians per second around each local axis.
    pub angular_velocity: Vec3,
    /// Sprite sheet column.
    pub sprite_column: u32,
    /// Sprite sheet row.
    pub sprite_row: u32,
    /// Whether the slot currently holds a live particle.
    pub active: bool,
}

impl ParticleRecord {
    /// Sets the initial placement of a particle.
    #[inline]
    pub fn place(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Activates the slot with the given lifespan.
    ///
    /// Resets orientation, angular velocity, sprite indices and size.
    /// Position, velocity and color are left to the source and influencers.
    pub fn activate(&mut self, life: f32) {
        self.angular_velocity = Vec3::ZERO;
        self.orientation = Quaternion::IDENTITY;

        self.remaining_life = life;
        self.start_life = life;
        self.life_progress = 0.0;

        self.active = true;
        self.size = 1.0;

        self.sprite_column = 0;
        self.sprite_row = 0;
    }

    /// Seconds since the particle was spawned.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.start_life - self.remaining_life
    }

    /// Recomputes `life_progress` from the remaining life.
    #[inline]
    pub fn refresh_progress(&mut self) {
        self.life_progress = if self.start_life > 0.0 {
            (1.0 - self.remaining_life / self.start_life).clamp(0.0, MAX_LIFE_PROGRESS)
        } else {
            0.0
        };
    }

    /// Explicit Euler step of the position.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl Default for ParticleRecord {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: Color::WHITE,
            size: 1.0,
            remaining_life: 0.0,
            start_life: 0.0,
            life_progress: 0.0,
            orientation: Quaternion::IDENTITY,
            angular_velocity: Vec3::ZERO,
            sprite_column: 0,
            sprite_row: 0,
            active: false,
        }
    }
}
