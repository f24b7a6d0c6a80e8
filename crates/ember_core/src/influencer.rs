//! # Influencers
//!
//! Ordered mutators applied to a record when it is created and on every
//! frame it stays alive.
//!
//! ## Ordering
//!
//! Influencers run in registration order for both hooks, and each one sees
//! the writes of the influencers registered before it. The chain must never
//! be reordered.

use crate::record::ParticleRecord;
use crate::rng::ParticleRng;

/// A registered mutator of particle records.
pub trait Influencer: std::fmt::Debug {
    /// Called once per spawn, after life and orientation were reset.
    fn on_create(&mut self, slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng);

    /// Called once per frame for each live record, after the life decrement
    /// and before position integration.
    fn on_update(&mut self, slot: usize, record: &mut ParticleRecord, dt: f32, rng: &mut ParticleRng);

    /// Independent copy of this influencer's configuration for a new system.
    fn clone_for_system(&self) -> Box<dyn Influencer>;
}

/// Ordered list of influencers.
#[derive(Debug, Default)]
pub struct InfluencerChain {
    influencers: Vec<Box<dyn Influencer>>,
}

impl InfluencerChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an influencer at the end of the chain.
    pub fn push(&mut self, influencer: Box<dyn Influencer>) {
        self.influencers.push(influencer);
    }

    /// Number of registered influencers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.influencers.len()
    }

    /// True if no influencer is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.influencers.is_empty()
    }

    /// Runs every creation hook in order.
    #[inline]
    pub fn apply_create(&mut self, slot: usize, record: &mut ParticleRecord, rng: &mut ParticleRng) {
        for influencer in &mut self.influencers {
            influencer.on_create(slot, record, rng);
        }
    }

    /// Runs every per-frame hook in order.
    #[inline]
    pub fn apply_update(
        &mut self,
        slot: usize,
        record: &mut ParticleRecord,
        dt: f32,
        rng: &mut ParticleRng,
    ) {
        for influencer in &mut self.influencers {
            influencer.on_update(slot, record, dt, rng);
        }
    }

    /// Deep copy preserving registration order.
    #[must_use]
    pub fn clone_for_system(&self) -> Self {
        self.influencers
            .iter()
            .map(|influencer| influencer.clone_for_system())
            .collect()
    }
}

impl FromIterator<Box<dyn Influencer>> for InfluencerChain {
    fn from_iter<I: IntoIterator<Item = Box<dyn Influencer>>>(iter: I) -> Self {
        Self {
            influencers: iter.into_iter().collect(),
        }
    }
}
