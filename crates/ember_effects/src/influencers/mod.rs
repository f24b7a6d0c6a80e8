//! # Influencers
//!
//! Concrete per-particle mutators. Each one is registered on a system in
//! order; the creation hooks run at spawn and the update hooks every frame
//! before position integration.
//!
//! | Module | Influencers |
//! |--------|-------------|
//! | `color` | [`ColorInfluencer`], [`MultiColorInfluencer`] |
//! | `size` | [`SizeInfluencer`], [`SizePulsingInfluencer`] |
//! | `motion` | [`GravityInfluencer`], [`SpeedInfluencer`], [`RotationInfluencer`], [`RandomImpulseInfluencer`] |
//! | `steering` | [`PreferredDestinationInfluencer`], [`PreferredDirectionInfluencer`], [`TargetDestinationInfluencer`] |
//! | `sprite` | [`RandomSpriteInfluencer`], [`SpriteAnimationInfluencer`] |

pub mod color;
pub mod motion;
pub mod size;
pub mod sprite;
pub mod steering;

pub use color::{ColorInfluencer, ColorStage, MultiColorInfluencer};
pub use motion::{
    GravityInfluencer, ImpulseTiming, RandomImpulseInfluencer, RotationInfluencer,
    SpeedInfluencer,
};
pub use size::{SizeInfluencer, SizePulsingInfluencer};
pub use sprite::{RandomSpriteInfluencer, SpriteAnimationInfluencer, SpriteSheet};
pub use steering::{
    PreferredDestinationInfluencer, PreferredDirectionInfluencer, SharedTarget,
    TargetDestinationInfluencer,
};
