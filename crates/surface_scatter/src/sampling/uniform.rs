//! Uniform random candidate sampling over the horizontal extent of the volume.
use glam::Vec3;
use rand::Rng as RngCore;

use crate::sampling::{rand_range, Candidate, CandidateSampling};

/// Uniform i.i.d. sampling across the volume's width and depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSampling;

impl UniformSampling {
    pub fn new() -> Self {
        Self
    }
}

impl CandidateSampling for UniformSampling {
    fn sample(&self, dimensions: Vec3, rng: &mut dyn RngCore) -> Option<Candidate> {
        let half = dimensions * 0.5;
        let x = rand_range(rng, -half.x, half.x);
        let z = rand_range(rng, -half.z, half.z);
        Some(Candidate::new(Vec3::new(x, 0.0, z)))
    }
}
