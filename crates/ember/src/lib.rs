//! # EMBER
//!
//! The particle engine, its stock effects and a host loop in one crate.
//!
//! ## Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                              EMBER                                │
//! ├───────────────────────────────────────────────────────────────────┤
//! │                                                                   │
//! │  ┌──────────────────┐    ┌──────────────────┐    ┌─────────────┐  │
//! │  │   ember_core     │<───│  ember_effects   │<───│   runner    │  │
//! │  │                  │    │                  │    │             │  │
//! │  │  • ParticlePool  │    │  • Influencers   │    │  • tick(dt) │  │
//! │  │  • Traits        │    │  • Sources       │    │  • Stats    │  │
//! │  │  • ParticleSystem│    │  • Effect files  │    │             │  │
//! │  └──────────────────┘    └──────────────────┘    └─────────────┘  │
//! │                                                                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `runner`: steps named systems with frame clamping and per-frame stats

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod runner;

pub use ember_core as core;
pub use ember_effects as effects;

pub use ember_core::{
    CameraView, Color, EmberError, EmberResult, HostedSystem, ParticleHost, ParticleRecord,
    ParticleSystem, Quaternion, Transform, Vec3,
};
pub use ember_effects::{EffectConfig, EffectError, EffectResult, PointBatch};
pub use runner::{
    EffectRunner, FrameStats, StatsAccumulator, FRAME_BUDGET, FRAME_BUDGET_US, MAX_FRAME_DT,
};
