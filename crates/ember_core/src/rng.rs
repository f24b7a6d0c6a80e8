//! Deterministic random numbers for the particle pipeline.
//!
//! Every random draw made by a pool, its source or its influencers goes
//! through the pool's [`ParticleRng`], so two systems seeded alike produce
//! identical particles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::math::Vec3;

/// Seeded `ChaCha8` generator owned by a particle pool.
#[derive(Clone)]
pub struct ParticleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl ParticleRng {
    /// Creates a generator from a 64-bit seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform float in `[min, min + (max - min))`.
    #[inline]
    pub fn between(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    /// Per-axis uniform vector between `min` and `max`.
    pub fn vec3_between(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            self.between(min.x, max.x),
            self.between(min.y, max.y),
            self.between(min.z, max.z),
        )
    }

    /// Uniform index in `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick an index from an empty range");
        self.inner.gen_range(0..len)
    }

    /// Fair coin flip.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.inner.gen::<bool>()
    }
}

impl std::fmt::Debug for ParticleRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleRng").field("seed", &self.seed).finish_non_exhaustive()
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ParticleRng::seeded(42);
        let mut b = ParticleRng::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_unit_range() {
        let mut rng = ParticleRng::seeded(1);
        for _ in 0..10_000 {
            let v = rng.unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_index_bounds() {
        let mut rng = ParticleRng::seeded(3);
        for _ in 0..1000 {
            assert!(rng.index(7) < 7);
        }
    }
}
