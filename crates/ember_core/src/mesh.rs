//! # Render Boundary
//!
//! The system hands its record array to a [`MeshSync`] collaborator once per
//! frame. Collaborators read records between steps and never mutate them.

use serde::{Deserialize, Serialize};

use crate::math::{Quaternion, Vec3};
use crate::record::ParticleRecord;

/// The viewpoint a mesh collaborator may orient particles against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// Camera position in the system's local space.
    pub position: Vec3,
    /// Camera orientation.
    pub rotation: Quaternion,
}

/// Turns the live record array into render data.
pub trait MeshSync: std::fmt::Debug {
    /// Called after the frame's spawns.
    ///
    /// `records` has one entry per slot (its length is the pool capacity);
    /// inactive slots must be skipped or zeroed. `camera` is `None` until
    /// the host provides a view, and implementations must fall back to a
    /// default orientation instead of failing.
    fn update(&mut self, camera: Option<&CameraView>, records: &[ParticleRecord]);
}
