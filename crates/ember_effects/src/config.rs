//! # Effect Files
//!
//! Declarative particle effects, loaded once at startup from TOML:
//!
//! ```toml
//! name = "sparks"
//! capacity = 256
//! life_min = 0.5
//! life_max = 1.5
//! seed = 7
//!
//! [scheduler]
//! kind = "regular"
//! per_second = 120
//!
//! [source]
//! kind = "point"
//! origin = { x = 0.0, y = 0.0, z = 0.0 }
//! min_velocity = { x = -1.0, y = 2.0, z = -1.0 }
//! max_velocity = { x = 1.0, y = 4.0, z = 1.0 }
//!
//! [[influencers]]
//! kind = "gravity"
//! gravity = { x = 0.0, y = -9.8, z = 0.0 }
//! ```
//!
//! Collaborators bound to live data (meshes, shared targets, other systems)
//! are attached in code after [`EffectConfig::build`].

use std::path::Path;

use ember_core::{
    validate_capacity, EmissionScheduler, Influencer, LifeRange, ParticleSource, ParticleSystem,
    StaticSource, Vec3,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EffectError, EffectResult};
use crate::influencers::{
    ColorInfluencer, GravityInfluencer, MultiColorInfluencer, PreferredDestinationInfluencer,
    PreferredDirectionInfluencer, RandomImpulseInfluencer, RandomSpriteInfluencer,
    RotationInfluencer, SizeInfluencer, SizePulsingInfluencer, SpeedInfluencer,
    SpriteAnimationInfluencer,
};
use crate::schedulers::{BurstEmission, RegularEmission};
use crate::sources::PointSource;

/// One influencer entry, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfluencerConfig {
    /// Two-color fade.
    Color(ColorInfluencer),
    /// Piecewise color ramp.
    MultiColor(MultiColorInfluencer),
    /// Constant acceleration.
    Gravity(GravityInfluencer),
    /// Linear size ramp.
    Size(SizeInfluencer),
    /// Sine size pulse.
    SizePulsing(SizePulsingInfluencer),
    /// Speed ramp.
    Speed(SpeedInfluencer),
    /// Random spin.
    Rotation(RotationInfluencer),
    /// Random velocity kicks.
    RandomImpulse(RandomImpulseInfluencer),
    /// Random sprite cell.
    RandomSprite(RandomSpriteInfluencer),
    /// Sprite animation.
    SpriteAnimation(SpriteAnimationInfluencer),
    /// Steer toward a point.
    PreferredDestination(PreferredDestinationInfluencer),
    /// Turn toward a direction.
    PreferredDirection(PreferredDirectionInfluencer),
}

impl InfluencerConfig {
    /// Checks the entry's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::Core`] for parameters the influencer rejects.
    pub fn validate(&self) -> EffectResult<()> {
        match self {
            Self::MultiColor(ramp) => ramp.validate()?,
            Self::RandomSprite(picker) => picker.sheet.validate()?,
            Self::SpriteAnimation(animation) => animation.validate()?,
            _ => {}
        }
        Ok(())
    }

    /// Creates the influencer.
    #[must_use]
    pub fn build(&self) -> Box<dyn Influencer> {
        match self {
            Self::Color(i) => Box::new(*i),
            Self::MultiColor(i) => Box::new(i.clone()),
            Self::Gravity(i) => Box::new(*i),
            Self::Size(i) => Box::new(*i),
            Self::SizePulsing(i) => Box::new(*i),
            Self::Speed(i) => Box::new(*i),
            Self::Rotation(i) => Box::new(*i),
            Self::RandomImpulse(i) => Box::new(*i),
            Self::RandomSprite(i) => Box::new(*i),
            Self::SpriteAnimation(i) => Box::new(*i),
            Self::PreferredDestination(i) => Box::new(*i),
            Self::PreferredDirection(i) => Box::new(*i),
        }
    }
}

/// The source entry, tagged by `kind`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Fixed position and velocity.
    Static(StaticSource),
    /// Point with random velocity.
    Point(PointSource),
}

impl SourceConfig {
    /// Creates the source.
    #[must_use]
    pub fn build(&self) -> Box<dyn ParticleSource> {
        match self {
            Self::Static(s) => Box::new(*s),
            Self::Point(s) => Box::new(*s),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Static(StaticSource::default())
    }
}

/// The scheduler entry, tagged by `kind`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedulerConfig {
    /// Steady rate.
    Regular(RegularEmission),
    /// One-shot burst.
    Burst(BurstEmission),
}

impl SchedulerConfig {
    /// Creates the scheduler.
    #[must_use]
    pub fn build(&self) -> Box<dyn EmissionScheduler> {
        match self {
            Self::Regular(s) => s.clone_for_system(),
            Self::Burst(s) => s.clone_for_system(),
        }
    }
}

/// A whole particle effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// System name.
    pub name: String,
    /// Maximum live particles.
    pub capacity: usize,
    /// Shortest particle life in seconds.
    pub life_min: f32,
    /// Longest particle life in seconds.
    pub life_max: f32,
    /// RNG seed.
    #[serde(default)]
    pub seed: u64,
    /// Whether the system starts running.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Emission schedule; absent means manual spawning only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerConfig>,
    /// Initial placement.
    #[serde(default)]
    pub source: SourceConfig,
    /// Influencers, applied in file order.
    #[serde(default)]
    pub influencers: Vec<InfluencerConfig>,
}

fn default_enabled() -> bool {
    true
}

impl Default for EffectConfig {
    /// A small fountain of sparks falling under gravity.
    fn default() -> Self {
        Self {
            name: String::from("sparks"),
            capacity: 256,
            life_min: 0.5,
            life_max: 1.5,
            seed: 7,
            enabled: true,
            scheduler: Some(SchedulerConfig::Regular(RegularEmission::new(120))),
            source: SourceConfig::Point(PointSource::new(
                Vec3::ZERO,
                Vec3::new(-1.0, 2.0, -1.0),
                Vec3::new(1.0, 4.0, 1.0),
            )),
            influencers: vec![
                InfluencerConfig::Gravity(GravityInfluencer::new(Vec3::new(0.0, -9.8, 0.0))),
                InfluencerConfig::Size(SizeInfluencer::new(0.2, 0.0)),
            ],
        }
    }
}

impl EffectConfig {
    /// Parses an effect from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::Parse`] for malformed TOML or unknown kinds.
    pub fn from_toml_str(text: &str) -> EffectResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses an effect file.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::Io`] if the file cannot be read, otherwise as
    /// [`EffectConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> EffectResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), effect = %config.name, "loaded effect file");
        Ok(config)
    }

    /// Writes the effect as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::Serialize`] if a value has no TOML form.
    pub fn to_toml_string(&self) -> EffectResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks every parameter without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::InvalidConfig`] for an empty name and
    /// [`EffectError::Core`] for values the engine rejects.
    pub fn validate(&self) -> EffectResult<()> {
        if self.name.trim().is_empty() {
            return Err(EffectError::InvalidConfig("effect name must not be empty".into()));
        }
        validate_capacity(self.capacity)?;
        LifeRange::try_new(self.life_min, self.life_max)?;
        for influencer in &self.influencers {
            influencer.validate()?;
        }
        Ok(())
    }

    /// Validates and builds the system.
    ///
    /// # Errors
    ///
    /// See [`EffectConfig::validate`].
    pub fn build(&self) -> EffectResult<ParticleSystem> {
        self.validate()?;

        let mut builder = ParticleSystem::builder(self.capacity)
            .name(self.name.clone())
            .life(self.life_min, self.life_max)
            .seed(self.seed)
            .enabled(self.enabled)
            .boxed_source(self.source.build())
            .boxed_scheduler(self.scheduler.as_ref().map(SchedulerConfig::build));
        for influencer in &self.influencers {
            builder = builder.boxed_influencer(influencer.build());
        }

        debug!(
            effect = %self.name,
            capacity = self.capacity,
            influencers = self.influencers.len(),
            "built particle system from effect"
        );
        Ok(builder.build())
    }
}
