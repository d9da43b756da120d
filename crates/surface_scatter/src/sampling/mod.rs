//! Candidate sampling strategies and random-number helpers.
//!
//! Samplers propose raw positions in the generator's local frame. Surface height
//! is left unresolved (y = 0 for uniform candidates); the validity pipeline
//! finds the actual surface with a probe.
use glam::{Vec2, Vec3};
use rand::Rng as RngCore;

pub mod clustered;
pub mod uniform;

pub use clustered::ClusterSampling;
pub use uniform::UniformSampling;

/// A raw candidate position in the generator's local frame, prior to validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Local-frame position.
    pub local_position: Vec3,
    /// Index of the cluster anchor the candidate was drawn from, if any.
    pub cluster: Option<usize>,
}

impl Candidate {
    pub fn new(local_position: Vec3) -> Self {
        Self {
            local_position,
            cluster: None,
        }
    }

    pub fn in_cluster(local_position: Vec3, cluster: usize) -> Self {
        Self {
            local_position,
            cluster: Some(cluster),
        }
    }
}

/// Trait for candidate sampling.
pub trait CandidateSampling {
    /// Draw one candidate inside a volume of the given `dimensions`, centered on the origin.
    ///
    /// Returns `None` when the strategy has nothing to offer right now (for example when
    /// every cluster is full). That is not an error; the caller counts the attempt and moves on.
    fn sample(&self, dimensions: Vec3, rng: &mut dyn RngCore) -> Option<Candidate>;
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float between `min` and `max`.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * rand01(rng)
}

/// Uniform index in `0..len`, or `None` for an empty range.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let scaled = (u64::from(rng.next_u32()) * len as u64) >> 32;
    Some(scaled as usize)
}

/// Uniform integer in `min..=max`.
#[inline]
pub(crate) fn rand_inclusive(rng: &mut dyn RngCore, min: usize, max: usize) -> usize {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    lo + rand_index(rng, hi - lo + 1).unwrap_or(0)
}

/// Uniform point inside the unit disk.
#[inline]
pub(crate) fn rand_unit_disk(rng: &mut dyn RngCore) -> Vec2 {
    let r = rand01(rng).sqrt();
    let theta = 2.0 * core::f32::consts::PI * rand01(rng);
    Vec2::new(r * theta.cos(), r * theta.sin())
}
