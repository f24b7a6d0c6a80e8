//! # Sources
//!
//! Where new particles appear and how fast they start moving.

pub mod mesh;
pub mod point;
pub mod trail;

pub use mesh::{MeshSource, TriangleMesh, WeightedMeshSource};
pub use point::PointSource;
pub use trail::ParticleParticleSource;
