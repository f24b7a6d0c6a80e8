//! # Emission Schedulers
//!
//! How many particles a system spawns each frame.
//!
//! - [`RegularEmission`]: a steady rate, carrying fractional spawns over to
//!   the next frame.
//! - [`BurstEmission`]: a single burst, after which the system turns itself
//!   off once the burst has died out.

use ember_core::EmissionScheduler;
use serde::{Deserialize, Serialize};

/// Emits `per_second` particles per second of simulated time.
///
/// The accumulator carries the remainder between frames, so a rate of 10
/// stepped at 60 Hz spawns one particle every sixth frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegularEmission {
    per_second: u32,
    #[serde(skip)]
    accumulated: f32,
}

impl RegularEmission {
    /// Emits `per_second` particles each second. Zero never emits.
    #[must_use]
    pub const fn new(per_second: u32) -> Self {
        Self {
            per_second,
            accumulated: 0.0,
        }
    }

    /// The configured rate.
    #[inline]
    #[must_use]
    pub const fn per_second(&self) -> u32 {
        self.per_second
    }

    /// Changes the rate. The accumulated remainder is kept.
    pub fn set_per_second(&mut self, per_second: u32) {
        self.per_second = per_second;
    }
}

impl EmissionScheduler for RegularEmission {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn particles_to_spawn(&mut self, dt: f32) -> u32 {
        if self.per_second == 0 {
            return 0;
        }

        let rate = self.per_second as f32;
        self.accumulated += dt;

        let due = (self.accumulated * rate).floor();
        self.accumulated -= due / rate;

        due.clamp(0.0, u32::MAX as f32) as u32
    }

    fn on_particle_death(&mut self, _slot: usize) {}

    fn should_auto_disable(&self) -> bool {
        false
    }

    /// Same rate, empty accumulator.
    fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
        Box::new(Self::new(self.per_second))
    }
}

/// Emits `count` particles on the first frame after creation or
/// [`BurstEmission::rearm`], then nothing.
///
/// Asks the system to disable itself once no particle is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstEmission {
    count: u32,
    #[serde(skip, default = "armed")]
    armed: bool,
}

fn armed() -> bool {
    true
}

impl BurstEmission {
    /// Creates an armed burst.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self { count, armed: true }
    }

    /// Burst size.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Fires again on the next frame.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// Will the next frame fire?
    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }
}

impl EmissionScheduler for BurstEmission {
    fn particles_to_spawn(&mut self, _dt: f32) -> u32 {
        if self.armed {
            self.armed = false;
            self.count
        } else {
            0
        }
    }

    fn on_particle_death(&mut self, _slot: usize) {}

    fn should_auto_disable(&self) -> bool {
        true
    }

    /// Armed copy with the same size.
    fn clone_for_system(&self) -> Box<dyn EmissionScheduler> {
        Box::new(Self::new(self.count))
    }
}
