//! # EMBER Core Engine
//!
//! Particle lifecycle engine designed for:
//! - Fixed-capacity pools allocated once, recycled forever
//! - O(1) amortized spawning through a free-slot hint
//! - Deterministic simulation given a seed
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the per-frame path** - records live in one
//!    boxed slice created with the pool
//! 2. **Ordered mutation** - influencers run in registration order for both
//!    the creation and the update hook
//! 3. **Rendering is a collaborator** - the core never builds geometry, it
//!    hands records to a [`MeshSync`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_core::ParticleSystem;
//!
//! let mut system = ParticleSystem::builder(512).life(0.5, 1.5).seed(7).build();
//! system.emit_all();
//! system.step(1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod hosted;
pub mod influencer;
pub mod math;
pub mod mesh;
pub mod pool;
pub mod record;
pub mod rng;
pub mod scheduler;
pub mod source;
pub mod system;

pub use error::{validate_capacity, EmberError, EmberResult};
pub use hosted::{HostedSystem, ParticleHost};
pub use influencer::{Influencer, InfluencerChain};
pub use math::{Color, Quaternion, Transform, Vec3};
pub use mesh::{CameraView, MeshSync};
pub use pool::{LifeRange, ParticlePool, StepReport};
pub use record::{ParticleRecord, MAX_LIFE_PROGRESS};
pub use rng::ParticleRng;
pub use scheduler::{EmissionScheduler, NullScheduler};
pub use source::{ParticleSource, StaticSource};
pub use system::{FrameReport, ParticleSystem, SystemBuilder};
