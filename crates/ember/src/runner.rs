//! # Effect Runner
//!
//! A minimal host loop for particle systems:
//!
//! ```text
//! tick(dt):
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. CLAMP    dt.min(MAX_FRAME_DT), so a stalled frame cannot fast-   │
//! │             forward every effect                                    │
//! │ 2. STEP     every enabled system, in registration order             │
//! │             (disabled systems are skipped without a call)           │
//! │ 3. RECORD   sum the frame reports into FrameStats                   │
//! │ 4. BUDGET   warn when the frame took longer than FRAME_BUDGET       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use ember_core::{CameraView, ParticleSystem};
use ember_effects::{EffectConfig, EffectResult};
use tracing::{debug, warn};

/// Largest step handed to a system, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Wall-clock microseconds a tick may take before it is reported (60 FPS).
pub const FRAME_BUDGET_US: u64 = 16_666;

/// [`FRAME_BUDGET_US`] as a duration.
pub const FRAME_BUDGET: Duration = Duration::from_micros(FRAME_BUDGET_US);

/// What one [`EffectRunner::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Step actually applied, after clamping.
    pub dt: f32,
    /// Systems that were enabled and stepped.
    pub systems_stepped: u32,
    /// Systems that disabled themselves this frame.
    pub auto_disabled: u32,
    /// Live particles across all systems after the frame.
    pub alive: usize,
    /// Particles spawned this frame.
    pub spawned: u32,
    /// Particles that expired this frame.
    pub died: usize,
    /// Wall-clock time spent stepping, in microseconds.
    pub step_us: u64,
}

/// Owns named particle systems and steps them together.
#[derive(Debug, Default)]
pub struct EffectRunner {
    /// Systems in registration order.
    systems: Vec<ParticleSystem>,
    /// View handed to every system.
    camera: Option<CameraView>,
    /// Frame counter.
    frame: u64,
    /// Totals over every tick.
    stats: StatsAccumulator,
    /// Log ticks that exceed [`FRAME_BUDGET`].
    warn_over_budget: bool,
}

impl EffectRunner {
    /// Creates an empty runner that warns on slow frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            warn_over_budget: true,
            ..Self::default()
        }
    }

    /// Enables or silences the slow-frame warning.
    pub fn set_warn_over_budget(&mut self, warn: bool) {
        self.warn_over_budget = warn;
    }

    /// Registers a system under its own name.
    ///
    /// A system already registered under that name is replaced and
    /// returned.
    pub fn add(&mut self, mut system: ParticleSystem) -> Option<ParticleSystem> {
        system.set_camera(self.camera);
        debug!(system = %system.name(), capacity = system.capacity(), "registered particle system");

        match self.position(system.name()) {
            Some(index) => Some(std::mem::replace(&mut self.systems[index], system)),
            None => {
                self.systems.push(system);
                None
            }
        }
    }

    /// Builds an effect and registers the resulting system.
    ///
    /// # Errors
    ///
    /// Returns whatever [`EffectConfig::build`] rejects; nothing is
    /// registered in that case.
    pub fn add_effect(&mut self, effect: &EffectConfig) -> EffectResult<Option<ParticleSystem>> {
        let system = effect.build()?;
        Ok(self.add(system))
    }

    /// Unregisters and returns a system.
    pub fn remove(&mut self, name: &str) -> Option<ParticleSystem> {
        let index = self.position(name)?;
        debug!(system = name, "unregistered particle system");
        Some(self.systems.remove(index))
    }

    /// Looks a system up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParticleSystem> {
        self.systems.iter().find(|s| s.name() == name)
    }

    /// Looks a system up by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParticleSystem> {
        self.systems.iter_mut().find(|s| s.name() == name)
    }

    /// Registered systems in registration order.
    #[must_use]
    pub fn systems(&self) -> &[ParticleSystem] {
        &self.systems
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// True if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Sets the view for every registered and future system.
    pub fn set_camera(&mut self, camera: Option<CameraView>) {
        self.camera = camera;
        for system in &mut self.systems {
            system.set_camera(camera);
        }
    }

    /// Runs one frame of every enabled system.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite.
    pub fn tick(&mut self, dt: f32) -> FrameStats {
        assert!(dt.is_finite() && dt >= 0.0, "delta time must be finite and non-negative, got {dt}");
        let dt = dt.min(MAX_FRAME_DT);

        let start = Instant::now();
        let mut stats = FrameStats {
            frame: self.frame,
            dt,
            ..FrameStats::default()
        };

        for system in &mut self.systems {
            // Disabled systems return `None` without touching their pool.
            let Some(report) = system.step(dt) else {
                continue;
            };
            stats.systems_stepped += 1;
            stats.spawned += report.spawned;
            stats.died += report.died;
            if report.auto_disabled {
                stats.auto_disabled += 1;
            }
        }
        stats.alive = self.systems.iter().map(ParticleSystem::active_count).sum();

        let elapsed = start.elapsed();
        stats.step_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        if self.warn_over_budget && elapsed > FRAME_BUDGET {
            warn!(
                frame = self.frame,
                elapsed_us = stats.step_us,
                budget_us = FRAME_BUDGET_US,
                "particle frame exceeded budget"
            );
        }

        self.frame += 1;
        self.stats.record(&stats);
        stats
    }

    /// Frames ticked so far.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Totals over every tick so far.
    #[must_use]
    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.systems.iter().position(|s| s.name() == name)
    }
}

/// Running totals of [`FrameStats`].
#[derive(Clone, Debug, PartialEq)]
pub struct StatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Particles spawned over all frames.
    pub total_spawned: u64,
    /// Particles expired over all frames.
    pub total_died: u64,
    /// Most particles alive after any one frame.
    pub peak_alive: usize,
    /// Sum of step times.
    pub step_us_sum: u64,
    /// Min step time.
    pub min_step_us: u64,
    /// Max step time.
    pub max_step_us: u64,
    /// Frames that exceeded [`FRAME_BUDGET`].
    pub frames_over_budget: u64,
}

impl StatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_spawned: 0,
            total_died: 0,
            peak_alive: 0,
            step_us_sum: 0,
            min_step_us: u64::MAX,
            max_step_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Adds a frame.
    pub fn record(&mut self, stats: &FrameStats) {
        self.frames_recorded += 1;
        self.total_spawned += u64::from(stats.spawned);
        self.total_died += stats.died as u64;
        self.peak_alive = self.peak_alive.max(stats.alive);
        self.step_us_sum += stats.step_us;
        self.min_step_us = self.min_step_us.min(stats.step_us);
        self.max_step_us = self.max_step_us.max(stats.step_us);

        if stats.step_us > FRAME_BUDGET_US {
            self.frames_over_budget += 1;
        }
    }

    /// Average step time in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn avg_step_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.step_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Fraction of frames over budget.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StatsAccumulator {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_step_us = if self.frames_recorded == 0 { 0 } else { self.min_step_us };
        writeln!(f, "┌─ PARTICLES ────────────────────────────────────────────────┐")?;
        writeln!(f, "│ Frames Recorded:    {}", self.frames_recorded)?;
        writeln!(f, "│ Spawned:            {}", self.total_spawned)?;
        writeln!(f, "│ Expired:            {}", self.total_died)?;
        writeln!(f, "│ Peak Alive:         {}", self.peak_alive)?;
        writeln!(f, "└────────────────────────────────────────────────────────────┘")?;
        writeln!(f, "┌─ TIMING ───────────────────────────────────────────────────┐")?;
        writeln!(f, "│ Average Step:       {:.3} ms", self.avg_step_ms())?;
        writeln!(f, "│ Min Step:           {:.3} ms", min_step_us as f64 / 1000.0)?;
        writeln!(f, "│ Max Step:           {:.3} ms", self.max_step_us as f64 / 1000.0)?;
        writeln!(
            f,
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        )?;
        write!(f, "└────────────────────────────────────────────────────────────┘")
    }
}
