//! Cluster-biased candidate sampling around planned anchors.
use glam::Vec3;
use rand::Rng as RngCore;

use crate::sampling::{rand_index, rand_unit_disk, Candidate, CandidateSampling};
use crate::scatter::cluster::ClusterPlan;

/// Picks a uniformly random active anchor and draws a point uniformly inside
/// its disk on the local horizontal plane.
#[derive(Debug, Clone, Copy)]
pub struct ClusterSampling<'a> {
    pub plan: &'a ClusterPlan,
}

impl<'a> ClusterSampling<'a> {
    pub fn new(plan: &'a ClusterPlan) -> Self {
        Self { plan }
    }
}

impl CandidateSampling for ClusterSampling<'_> {
    fn sample(&self, _dimensions: Vec3, rng: &mut dyn RngCore) -> Option<Candidate> {
        let pick = rand_index(rng, self.plan.active_count())?;
        let (index, anchor) = self.plan.active().nth(pick)?;
        let offset = rand_unit_disk(rng) * anchor.radius;
        Some(Candidate::in_cluster(
            anchor.center + Vec3::new(offset.x, 0.0, offset.y),
            index,
        ))
    }
}
