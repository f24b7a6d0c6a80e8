//! Color over life.

use ember_core::{Color, EmberError, EmberResult, Influencer, ParticleRecord, ParticleRng};
use serde::{Deserialize, Serialize};

/// Fades linearly from `start` to `end` over the particle's life.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorInfluencer {
    /// Color at spawn.
    pub start: Color,
    /// Color at the end of life.
    pub end: Color,
}

impl ColorInfluencer {
    /// Creates a two-color fade.
    #[must_use]
    pub const fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }
}

impl Default for ColorInfluencer {
    fn default() -> Self {
        Self::new(Color::RED, Color::YELLOW)
    }
}

impl Influencer for ColorInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        record.color = self.start;
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        record.color = self.start.lerp(self.end, record.life_progress);
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

/// A point on a [`MultiColorInfluencer`] ramp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStage {
    /// Life progress at which `color` is reached, 0 at spawn and 1 at death.
    pub time: f32,
    /// Color at `time`.
    pub color: Color,
}

impl ColorStage {
    /// Creates a stage.
    #[must_use]
    pub const fn new(time: f32, color: Color) -> Self {
        Self { time, color }
    }
}

/// Piecewise linear color ramp over life.
///
/// Before the first stage the particle holds the first color, after the last
/// stage it holds the last color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiColorInfluencer {
    stages: Vec<ColorStage>,
}

impl MultiColorInfluencer {
    /// Creates a ramp.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidParameter`] if `stages` is empty or the
    /// stage times are not finite and non-decreasing.
    pub fn new(stages: Vec<ColorStage>) -> EmberResult<Self> {
        let ramp = Self { stages };
        ramp.validate()?;
        Ok(ramp)
    }

    /// The stages, in time order.
    #[must_use]
    pub fn stages(&self) -> &[ColorStage] {
        &self.stages
    }

    /// Checks the stage list.
    ///
    /// # Errors
    ///
    /// See [`MultiColorInfluencer::new`].
    pub fn validate(&self) -> EmberResult<()> {
        if self.stages.is_empty() {
            return Err(EmberError::InvalidParameter {
                name: "stages",
                reason: "at least one color stage is required".into(),
            });
        }
        let ordered = self
            .stages
            .windows(2)
            .all(|pair| pair[0].time <= pair[1].time);
        if !ordered || self.stages.iter().any(|s| !s.time.is_finite()) {
            return Err(EmberError::InvalidParameter {
                name: "stages",
                reason: "stage times must be finite and non-decreasing".into(),
            });
        }
        Ok(())
    }

    fn color_at(&self, progress: f32) -> Color {
        let Some(next) = self.stages.iter().position(|s| s.time > progress) else {
            return self.stages.last().map_or(Color::WHITE, |s| s.color);
        };
        if next == 0 {
            return self.stages[0].color;
        }
        let (from, to) = (self.stages[next - 1], self.stages[next]);
        from.color
            .lerp(to.color, (progress - from.time) / (to.time - from.time))
    }
}

impl Influencer for MultiColorInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        if let Some(first) = self.stages.first() {
            record.color = first.color;
        }
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        record.color = self.color_at(record.life_progress);
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(self.clone())
    }
}
