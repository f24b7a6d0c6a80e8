//! # Render Handoff
//!
//! [`MeshSync`] collaborators that turn the record array into data other
//! parts of the program read between frames:
//!
//! ```text
//! ParticleSystem::step ─► PointBatch ─────► Arc<RwLock<PointBuffer>> ─► renderer
//!                     └─► SnapshotPublisher ► SharedRecords ──────────► ParticleParticleSource
//! ```
//!
//! Both write behind a `parking_lot::RwLock`, so the reading side holds a
//! cheap handle instead of borrowing the system.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use ember_core::{CameraView, MeshSync, ParticleRecord};
use parking_lot::RwLock;

/// One particle, laid out for direct upload as a point-sprite vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    /// Position (xyz).
    pub position: [f32; 3],
    /// Render scale.
    pub size: f32,
    /// Color (rgba).
    pub color: [f32; 4],
    /// Orientation quaternion (xyzw).
    pub orientation: [f32; 4],
    /// Sprite sheet cell (column, row).
    pub sprite: [u32; 2],
    /// Life progress, 0 at spawn.
    pub life_progress: f32,
}

impl PointVertex {
    /// Size of a vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    fn from_record(record: &ParticleRecord, camera: Option<&CameraView>) -> Self {
        let orientation = match camera {
            Some(view) => view.rotation * record.orientation,
            None => record.orientation,
        };
        Self {
            position: record.position.to_array(),
            size: record.size,
            color: record.color.to_array(),
            orientation: [orientation.x, orientation.y, orientation.z, orientation.w],
            sprite: [record.sprite_column, record.sprite_row],
            life_progress: record.life_progress,
        }
    }
}

/// Vertex data produced by a [`PointBatch`], one vertex per slot.
///
/// Inactive slots are all-zero vertices (size 0), so the buffer can be
/// drawn whole without compaction.
#[derive(Debug, Default)]
pub struct PointBuffer {
    vertices: Vec<PointVertex>,
    live: usize,
    frame: u64,
}

impl PointBuffer {
    /// One vertex per slot.
    #[must_use]
    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    /// The vertices as raw bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Live particles in the last update.
    #[inline]
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Number of updates written so far.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

/// Packs records into [`PointVertex`]es each frame.
///
/// With a camera, each vertex orientation is the particle orientation seen
/// from the camera; without one it is the particle orientation unchanged.
#[derive(Debug, Clone, Default)]
pub struct PointBatch {
    buffer: Arc<RwLock<PointBuffer>>,
}

impl PointBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the renderer keeps to read the vertex data.
    #[must_use]
    pub fn buffer(&self) -> Arc<RwLock<PointBuffer>> {
        Arc::clone(&self.buffer)
    }
}

impl MeshSync for PointBatch {
    fn update(&mut self, camera: Option<&CameraView>, records: &[ParticleRecord]) {
        let mut buffer = self.buffer.write();
        // Resizes only when the pool capacity changes.
        buffer.vertices.resize(records.len(), PointVertex::zeroed());

        let mut live = 0;
        for (vertex, record) in buffer.vertices.iter_mut().zip(records) {
            if record.active {
                *vertex = PointVertex::from_record(record, camera);
                live += 1;
            } else {
                *vertex = PointVertex::zeroed();
            }
        }
        buffer.live = live;
        buffer.frame += 1;
    }
}

/// A system's records, published for other systems to read.
pub type SharedRecords = Arc<RwLock<Vec<ParticleRecord>>>;

/// Creates an empty [`SharedRecords`] handle.
#[must_use]
pub fn shared_records() -> SharedRecords {
    Arc::new(RwLock::new(Vec::new()))
}

/// Copies the record array into a [`SharedRecords`] every frame.
#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
    target: SharedRecords,
}

impl SnapshotPublisher {
    /// Publishes into `target`.
    #[must_use]
    pub fn new(target: SharedRecords) -> Self {
        Self { target }
    }

    /// The published handle.
    #[must_use]
    pub fn records(&self) -> SharedRecords {
        Arc::clone(&self.target)
    }
}

impl MeshSync for SnapshotPublisher {
    fn update(&mut self, _camera: Option<&CameraView>, records: &[ParticleRecord]) {
        let mut published = self.target.write();
        published.clear();
        published.extend_from_slice(records);
    }
}

/// Forwards each update to several collaborators, in order.
#[derive(Debug, Default)]
pub struct MeshGroup {
    members: Vec<Box<dyn MeshSync>>,
}

impl MeshGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collaborator.
    #[must_use]
    pub fn with(mut self, member: impl MeshSync + 'static) -> Self {
        self.members.push(Box::new(member));
        self
    }

    /// Number of collaborators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the group forwards to nobody.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl MeshSync for MeshGroup {
    fn update(&mut self, camera: Option<&CameraView>, records: &[ParticleRecord]) {
        for member in &mut self.members {
            member.update(camera, records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Color, Quaternion, Vec3};

    fn records() -> Vec<ParticleRecord> {
        let live = ParticleRecord {
            position: Vec3::new(1.0, 2.0, 3.0),
            size: 0.5,
            color: Color::RED,
            sprite_column: 2,
            sprite_row: 1,
            active: true,
            ..ParticleRecord::default()
        };
        vec![live, ParticleRecord::default(), live]
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(PointVertex::SIZE, 60);
    }

    #[test]
    fn test_batch_zeroes_inactive_slots() {
        let mut batch = PointBatch::new();
        let buffer = batch.buffer();

        batch.update(None, &records());

        let data = buffer.read();
        assert_eq!(data.vertices().len(), 3);
        assert_eq!(data.live(), 2);
        assert_eq!(data.frame(), 1);
        assert_eq!(data.vertices()[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(data.vertices()[0].sprite, [2, 1]);
        assert_eq!(data.vertices()[1], PointVertex::zeroed());
        assert_eq!(data.as_bytes().len(), 3 * PointVertex::SIZE);
    }

    #[test]
    fn test_camera_rotates_orientation() {
        let mut batch = PointBatch::new();
        let buffer = batch.buffer();
        let turn = Quaternion::from_axis_angle(Vec3::Y, 1.0);
        let camera = CameraView {
            position: Vec3::ZERO,
            rotation: turn,
        };

        batch.update(Some(&camera), &records());
        let orientation = buffer.read().vertices()[0].orientation;
        assert_eq!(orientation, [turn.x, turn.y, turn.z, turn.w]);
    }

    #[test]
    fn test_publisher_and_group() {
        let shared = shared_records();
        let batch = PointBatch::new();
        let buffer = batch.buffer();
        let mut group = MeshGroup::new()
            .with(batch)
            .with(SnapshotPublisher::new(Arc::clone(&shared)));
        assert_eq!(group.len(), 2);

        group.update(None, &records());

        assert_eq!(shared.read().len(), 3);
        assert_eq!(buffer.read().live(), 2);
    }
}
