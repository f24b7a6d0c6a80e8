//! # EMBER Effects
//!
//! Concrete behaviour for the EMBER particle engine.
//!
//! ## Contents
//!
//! 1. **Influencers** - color, size, motion, steering and sprite mutators
//! 2. **Sources** - point, mesh surface and particle-on-particle emitters
//! 3. **Schedulers** - regular rate and one-shot bursts
//! 4. **Render handoff** - `Pod` point vertices and shared record snapshots
//! 5. **Effect files** - TOML descriptions that build ready-to-run systems
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_effects::EffectConfig;
//!
//! let mut system = EffectConfig::from_toml_file("effects/sparks.toml")?.build()?;
//! system.set_mesh(Some(Box::new(PointBatch::new())));
//! system.step(1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod influencers;
pub mod render;
pub mod schedulers;
pub mod sources;

pub use config::{EffectConfig, InfluencerConfig, SchedulerConfig, SourceConfig};
pub use error::{EffectError, EffectResult};
pub use influencers::{
    ColorInfluencer, ColorStage, GravityInfluencer, ImpulseTiming, MultiColorInfluencer,
    PreferredDestinationInfluencer, PreferredDirectionInfluencer, RandomImpulseInfluencer,
    RandomSpriteInfluencer, RotationInfluencer, SharedTarget, SizeInfluencer,
    SizePulsingInfluencer, SpeedInfluencer, SpriteAnimationInfluencer, SpriteSheet,
    TargetDestinationInfluencer,
};
pub use render::{
    shared_records, MeshGroup, PointBatch, PointBuffer, PointVertex, SharedRecords,
    SnapshotPublisher,
};
pub use schedulers::{BurstEmission, RegularEmission};
pub use sources::{MeshSource, ParticleParticleSource, PointSource, TriangleMesh, WeightedMeshSource};
