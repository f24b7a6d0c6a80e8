//! Size over life.

use std::f32::consts::PI;

use ember_core::{Influencer, ParticleRecord, ParticleRng};
use serde::{Deserialize, Serialize};

/// Grows or shrinks linearly from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeInfluencer {
    /// Size at spawn.
    pub start: f32,
    /// Size at the end of life.
    pub end: f32,
}

impl SizeInfluencer {
    /// Creates a linear size ramp.
    #[must_use]
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

impl Default for SizeInfluencer {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Influencer for SizeInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        record.size = self.start;
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        record.size = self.start + (self.end - self.start) * record.life_progress;
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// Pulses the size along a sine wave over life.
///
/// `size = min + (sin(progress * PI * cycles) + 1) * max / 2`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizePulsingInfluencer {
    /// Size at spawn and the wave's floor offset.
    pub min: f32,
    /// Wave amplitude scale.
    pub max: f32,
    /// Half-periods over the whole life.
    pub cycles: f32,
}

impl SizePulsingInfluencer {
    /// Creates a pulsing size.
    #[must_use]
    pub const fn new(min: f32, max: f32, cycles: f32) -> Self {
        Self { min, max, cycles }
    }
}

impl Influencer for SizePulsingInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        record.size = self.min;
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        let phase = record.life_progress * PI * self.cycles;
        record.size = self.min + (phase.sin() + 1.0) * self.max / 2.0;
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}
