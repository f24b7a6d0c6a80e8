//! # Mesh Emitters
//!
//! Spawn particles on the surface of a triangle mesh, moving along the face
//! normal. The mesh lives in its own space; `to_local` maps mesh space into
//! the particle system's local space.
//!
//! ```text
//!        v2
//!        /\          point = v0 + d1 * (v1 - v0) + d2 * (v2 - v0)
//!       /  \         with d1, d2 uniform in [0, 1) and reflected
//!      / .  \        (d1, d2) -> (1 - d1, 1 - d2) when d1 + d2 > 1
//!   v0 ------ v1
//! ```

use std::sync::Arc;

use ember_core::{
    EmberError, EmberResult, ParticleRecord, ParticleRng, ParticleSource, Transform, Vec3,
};

/// Indexed triangle list, shared read-only between sources.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidParameter`] if there are no triangles or
    /// an index points past the position list.
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> EmberResult<Self> {
        if indices.is_empty() {
            return Err(EmberError::InvalidParameter {
                name: "indices",
                reason: "mesh has no triangles".into(),
            });
        }
        let in_range = indices
            .iter()
            .flatten()
            .all(|&i| (i as usize) < positions.len());
        if !in_range {
            return Err(EmberError::InvalidParameter {
                name: "indices",
                reason: format!("index out of range for {} positions", positions.len()),
            });
        }
        Ok(Self { positions, indices })
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Corners of triangle `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.indices[index];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Area of triangle `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    #[must_use]
    pub fn area(&self, index: usize) -> f32 {
        let [a, b, c] = self.triangle(index);
        (b - a).cross(c - a).length() * 0.5
    }
}

/// Uniform random point on a triangle and the triangle's unit normal.
fn sample_triangle(corners: [Vec3; 3], rng: &mut ParticleRng) -> (Vec3, Vec3) {
    let [origin, b, c] = corners;
    let side1 = b - origin;
    let side2 = c - origin;

    let mut d1 = rng.unit();
    let mut d2 = rng.unit();
    if d1 + d2 > 1.0 {
        d1 = 1.0 - d1;
        d2 = 1.0 - d2;
    }

    let point = origin + side1 * d1 + side2 * d2;
    let normal = side1.cross(side2).normalize_or_zero();
    (point, normal)
}

fn place_on(record: &mut ParticleRecord, to_local: &Transform, point: Vec3, normal: Vec3) {
    record.place(
        to_local.transform_point(point),
        to_local.transform_direction(normal),
    );
}

/// Picks a triangle uniformly, regardless of its size.
///
/// Small triangles get as many particles as large ones; use
/// [`WeightedMeshSource`] for an even surface density.
#[derive(Clone, Debug)]
pub struct MeshSource {
    mesh: Arc<TriangleMesh>,
    to_local: Transform,
}

impl MeshSource {
    /// Emits from `mesh`, mapped into the system by `to_local`.
    #[must_use]
    pub fn new(mesh: Arc<TriangleMesh>, to_local: Transform) -> Self {
        Self { mesh, to_local }
    }

    /// The emitting mesh.
    #[must_use]
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Moves the mesh relative to the system.
    pub fn set_transform(&mut self, to_local: Transform) {
        self.to_local = to_local;
    }
}

impl ParticleSource for MeshSource {
    fn source_particle(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        let triangle = rng.index(self.mesh.triangle_count());
        let (point, normal) = sample_triangle(self.mesh.triangle(triangle), rng);
        place_on(record, &self.to_local, point, normal);
    }

    fn clone_for_system(&self) -> Box<dyn ParticleSource> {
        Box::new(self.clone())
    }
}

/// Picks a triangle with probability proportional to its area.
///
/// Keeps a cumulative area table. Call
/// [`WeightedMeshSource::recalculate_weights`] after swapping the mesh.
#[derive(Clone, Debug)]
pub struct WeightedMeshSource {
    mesh: Arc<TriangleMesh>,
    to_local: Transform,
    /// `cumulative[i]` is the summed area of triangles `0..=i`.
    cumulative: Vec<f32>,
}

impl WeightedMeshSource {
    /// Emits from `mesh`, mapped into the system by `to_local`.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidParameter`] if the mesh has zero total area.
    pub fn new(mesh: Arc<TriangleMesh>, to_local: Transform) -> EmberResult<Self> {
        let mut source = Self {
            mesh,
            to_local,
            cumulative: Vec::new(),
        };
        source.recalculate_weights()?;
        Ok(source)
    }

    /// Replaces the mesh and rebuilds the area table.
    ///
    /// # Errors
    ///
    /// See [`WeightedMeshSource::new`]. On error the previous mesh is kept.
    pub fn set_mesh(&mut self, mesh: Arc<TriangleMesh>) -> EmberResult<()> {
        let previous = std::mem::replace(&mut self.mesh, mesh);
        if let Err(err) = self.recalculate_weights() {
            self.mesh = previous;
            self.recalculate_weights()?;
            return Err(err);
        }
        Ok(())
    }

    /// Rebuilds the cumulative area table from the current mesh.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidParameter`] if the total area is zero or
    /// not finite.
    pub fn recalculate_weights(&mut self) -> EmberResult<()> {
        let mut total = 0.0;
        let cumulative: Vec<f32> = (0..self.mesh.triangle_count())
            .map(|i| {
                total += self.mesh.area(i);
                total
            })
            .collect();

        if !(total.is_finite() && total > 0.0) {
            return Err(EmberError::InvalidParameter {
                name: "mesh",
                reason: format!("weighted emission needs a positive surface area, got {total}"),
            });
        }
        self.cumulative = cumulative;
        Ok(())
    }

    /// Probability of each triangle being picked.
    #[must_use]
    pub fn weights(&self) -> Vec<f32> {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let mut previous = 0.0;
        self.cumulative
            .iter()
            .map(|&sum| {
                let weight = (sum - previous) / total;
                previous = sum;
                weight
            })
            .collect()
    }

    /// Moves the mesh relative to the system.
    pub fn set_transform(&mut self, to_local: Transform) {
        self.to_local = to_local;
    }

    fn pick_triangle(&self, rng: &mut ParticleRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let selector = rng.unit() * total;
        let index = self.cumulative.partition_point(|&sum| sum <= selector);
        index.min(self.cumulative.len().saturating_sub(1))
    }
}

impl ParticleSource for WeightedMeshSource {
    fn source_particle(&mut self, _slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        let triangle = self.pick_triangle(rng);
        let (point, normal) = sample_triangle(self.mesh.triangle(triangle), rng);
        place_on(record, &self.to_local, point, normal);
    }

    fn clone_for_system(&self) -> Box<dyn ParticleSource> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles in the XY plane, the second three times the area of the first.
    fn lopsided() -> Arc<TriangleMesh> {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(13.0, 0.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
        ];
        Arc::new(TriangleMesh::new(positions, vec![[0, 1, 2], [3, 4, 5]]).unwrap())
    }

    #[test]
    fn test_mesh_validation() {
        assert!(TriangleMesh::new(vec![Vec3::ZERO], Vec::new()).is_err());
        assert!(TriangleMesh::new(vec![Vec3::ZERO], vec![[0, 0, 1]]).is_err());
    }

    #[test]
    fn test_points_stay_on_triangle() {
        let mut source = MeshSource::new(lopsided(), Transform::IDENTITY);
        let mut rng = ParticleRng::seeded(8);
        let mut record = ParticleRecord::default();

        for _ in 0..200 {
            source.source_particle(0, &mut record, &mut rng);
            let p = record.position;
            assert_eq!(p.z, 0.0);
            let on_first = p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 + 1e-5;
            let on_second = p.x >= 10.0 && p.y >= 0.0 && (p.x - 10.0) / 3.0 + p.y <= 1.0 + 1e-5;
            assert!(on_first || on_second, "{p:?} is off the mesh");
            assert_eq!(record.velocity, Vec3::Z);
        }
    }

    #[test]
    fn test_to_local_moves_points() {
        let mut source = MeshSource::new(lopsided(), Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        let mut rng = ParticleRng::seeded(1);
        let mut record = ParticleRecord::default();
        source.source_particle(0, &mut record, &mut rng);
        assert_eq!(record.position.z, 5.0);
    }

    #[test]
    fn test_weights_follow_area() {
        let source = WeightedMeshSource::new(lopsided(), Transform::IDENTITY).unwrap();
        let weights = source.weights();
        assert!((weights[0] - 0.25).abs() < 1e-6);
        assert!((weights[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_pick_frequency() {
        let mut source = WeightedMeshSource::new(lopsided(), Transform::IDENTITY).unwrap();
        let mut rng = ParticleRng::seeded(21);
        let mut record = ParticleRecord::default();

        let samples = 4_000;
        let mut on_large = 0;
        for _ in 0..samples {
            source.source_particle(0, &mut record, &mut rng);
            if record.position.x >= 10.0 {
                on_large += 1;
            }
        }
        let share = f64::from(on_large) / f64::from(samples);
        assert!((share - 0.75).abs() < 0.05, "large triangle share {share}");
    }

    #[test]
    fn test_degenerate_mesh_rejected() {
        let flat = TriangleMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0], vec![[0, 1, 2]]).unwrap();
        assert!(WeightedMeshSource::new(Arc::new(flat), Transform::IDENTITY).is_err());
    }
}
