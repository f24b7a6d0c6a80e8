//! Sprite sheet selection.

use ember_core::{EmberError, EmberResult, Influencer, ParticleRecord, ParticleRng};
use serde::{Deserialize, Serialize};

/// Layout of a sprite atlas, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Cells per row.
    pub columns: u32,
    /// Rows of cells.
    pub rows: u32,
}

impl SpriteSheet {
    /// Creates a sheet layout.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidParameter`] if either dimension is zero
    /// or the cell count does not fit in a `u32`.
    pub fn new(columns: u32, rows: u32) -> EmberResult<Self> {
        let sheet = Self { columns, rows };
        sheet.validate()?;
        Ok(sheet)
    }

    /// Total number of frames, saturating at `u32::MAX`.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    /// Rejects empty sheets and sheets with more than `u32::MAX` cells.
    ///
    /// # Errors
    ///
    /// See [`SpriteSheet::new`].
    pub fn validate(&self) -> EmberResult<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(EmberError::InvalidParameter {
                name: "sheet",
                reason: format!("sprite sheet must be at least 1x1, got {}x{}", self.columns, self.rows),
            });
        }
        if self.columns.checked_mul(self.rows).is_none() {
            return Err(EmberError::InvalidParameter {
                name: "sheet",
                reason: format!("sprite sheet {}x{} has too many cells", self.columns, self.rows),
            });
        }
        Ok(())
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self { columns: 1, rows: 1 }
    }
}

/// Picks a random cell at spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSpriteInfluencer {
    /// Atlas to pick from.
    pub sheet: SpriteSheet,
}

impl RandomSpriteInfluencer {
    /// Creates a random picker over `sheet`.
    #[must_use]
    pub const fn new(sheet: SpriteSheet) -> Self {
        Self { sheet }
    }
}

impl Influencer for RandomSpriteInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        record.sprite_column = pick(rng, self.sheet.columns);
        record.sprite_row = pick(rng, self.sheet.rows);
    }

    fn on_update(&mut self, _slot: usize, _record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {}

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}

fn pick(rng: &mut ParticleRng, len: u32) -> u32 {
    if len <= 1 {
        return 0;
    }
    // Sheets are far smaller than u32::MAX cells per axis.
    u32::try_from(rng.index(len as usize)).unwrap_or(0)
}

/// Plays the sheet frame by frame, row-major, over the particle's age.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimationInfluencer {
    /// Atlas to play.
    pub sheet: SpriteSheet,
    /// Loop after the last frame instead of holding it.
    #[serde(default)]
    pub cycle: bool,
    /// Seconds each frame is shown.
    pub time_per_frame: f32,
}

impl SpriteAnimationInfluencer {
    /// Creates an animation.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidParameter`] for an empty sheet or a
    /// non-positive frame time.
    pub fn new(sheet: SpriteSheet, cycle: bool, time_per_frame: f32) -> EmberResult<Self> {
        let animation = Self { sheet, cycle, time_per_frame };
        animation.validate()?;
        Ok(animation)
    }

    /// Animation at `fps` frames per second.
    ///
    /// # Errors
    ///
    /// See [`SpriteAnimationInfluencer::new`].
    pub fn with_fps(sheet: SpriteSheet, cycle: bool, fps: f32) -> EmberResult<Self> {
        Self::new(sheet, cycle, 1.0 / fps)
    }

    /// Checks the sheet and frame time.
    ///
    /// # Errors
    ///
    /// See [`SpriteAnimationInfluencer::new`].
    pub fn validate(&self) -> EmberResult<()> {
        self.sheet.validate()?;
        if !(self.time_per_frame.is_finite() && self.time_per_frame > 0.0) {
            return Err(EmberError::InvalidParameter {
                name: "time_per_frame",
                reason: format!("must be finite and positive, got {}", self.time_per_frame),
            });
        }
        Ok(())
    }

    fn frame_at(&self, elapsed: f32) -> u32 {
        let frames = self.sheet.frames().max(1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frame = (elapsed / self.time_per_frame).max(0.0) as u32;
        if self.cycle {
            frame % frames
        } else {
            frame.min(frames - 1)
        }
    }
}

impl Influencer for SpriteAnimationInfluencer {
    fn on_create(&mut self, _slot: usize, record: &mut ParticleRecord, _rng: &mut ParticleRng) {
        record.sprite_column = 0;
        record.sprite_row = 0;
    }

    fn on_update(&mut self, _slot: usize, record: &mut ParticleRecord, _dt: f32, _rng: &mut ParticleRng) {
        let frame = self.frame_at(record.elapsed());
        let columns = self.sheet.columns.max(1);
        record.sprite_column = frame % columns;
        record.sprite_row = frame / columns;
    }

    fn clone_for_system(&self) -> Box<dyn Influencer> {
        Box::new(*self)
    }
}
