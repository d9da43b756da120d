//! Cluster anchor planning and per-anchor fill bookkeeping.
//!
//! Anchors are rejection-sampled over the horizontal extent of the volume, snapped
//! onto the surface with a vertical probe and kept apart by a minimum horizontal
//! distance. Planning never fails: a shortfall is reported and the run continues
//! with whatever anchors were found.
use glam::{Vec3, Vec3Swizzles};
use rand::Rng as RngCore;

use crate::query::SpatialQuery;
use crate::sampling::rand_range;
use crate::scatter::config::{ClusterSettings, ScatterConfig};
use crate::scatter::Frame;

/// Attempt ceiling per requested anchor.
pub const CLUSTER_ATTEMPTS_PER_ANCHOR: usize = 100;

/// A planned cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAnchor {
    /// Surface position of the anchor in the generator's local frame.
    pub center: Vec3,
    pub radius: f32,
    /// Number of placements this anchor should receive.
    pub target: usize,
    /// Number of placements accepted so far.
    pub placed: usize,
    /// False once `placed` reaches `target`.
    pub active: bool,
}

impl ClusterAnchor {
    pub fn new(center: Vec3, radius: f32, target: usize) -> Self {
        Self {
            center,
            radius,
            target,
            placed: 0,
            active: target > 0,
        }
    }
}

/// How well the anchors were filled at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterFillReport {
    pub anchors: usize,
    pub empty: usize,
    pub overfilled: usize,
    pub placed: usize,
    pub target: usize,
}

/// The anchors of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterPlan {
    anchors: Vec<ClusterAnchor>,
}

impl ClusterPlan {
    pub fn new(anchors: Vec<ClusterAnchor>) -> Self {
        Self { anchors }
    }

    pub fn anchors(&self) -> &[ClusterAnchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Active anchors with their indices.
    pub fn active(&self) -> impl Iterator<Item = (usize, &ClusterAnchor)> + '_ {
        self.anchors.iter().enumerate().filter(|(_, a)| a.active)
    }

    pub fn active_count(&self) -> usize {
        self.anchors.iter().filter(|a| a.active).count()
    }

    /// Sum of per-anchor targets.
    pub fn total_target(&self) -> usize {
        self.anchors.iter().map(|a| a.target).sum()
    }

    /// Records an accepted placement in anchor `index`.
    ///
    /// Returns true if this placement filled the anchor.
    pub fn record_placement(&mut self, index: usize) -> bool {
        let Some(anchor) = self.anchors.get_mut(index) else {
            return false;
        };
        anchor.placed += 1;
        let was_active = anchor.active;
        anchor.active = anchor.placed < anchor.target;
        was_active && !anchor.active
    }

    pub fn fill_report(&self) -> ClusterFillReport {
        let mut report = ClusterFillReport {
            anchors: self.anchors.len(),
            ..Default::default()
        };
        for a in &self.anchors {
            report.placed += a.placed;
            report.target += a.target;
            if a.placed == 0 {
                report.empty += 1;
            } else if a.placed > a.target {
                report.overfilled += 1;
            }
        }
        report
    }
}

/// Outcome of [`plan_clusters`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPlanning {
    pub plan: ClusterPlan,
    /// Anchors requested (cluster count, capped by population).
    pub requested: usize,
    /// Anchors that could not be placed.
    pub shortfall: usize,
    /// Candidate anchor positions tried.
    pub attempts: usize,
}

impl ClusterPlanning {
    /// Human-readable diagnostics about the plan, relative to `population`.
    pub fn warnings(&self, population: usize) -> Vec<String> {
        let mut out = Vec::new();
        if self.shortfall > 0 {
            out.push(format!(
                "Only {}/{} clusters were placed; enlarge the volume or lower the minimum cluster distance",
                self.plan.len(),
                self.requested
            ));
        }
        let total = self.plan.total_target();
        if total < population {
            out.push(format!(
                "Cluster targets sum to {total}, below the population of {population}; raise objects per cluster"
            ));
        } else if total > population.saturating_mul(2) {
            out.push(format!(
                "Cluster targets sum to {total}, far above the population of {population}; lower objects per cluster"
            ));
        }
        out
    }
}

/// Plans cluster anchors for a run.
pub fn plan_clusters<Q: SpatialQuery + ?Sized>(
    config: &ScatterConfig,
    settings: &ClusterSettings,
    frame: &Frame,
    query: &Q,
    rng: &mut dyn RngCore,
) -> ClusterPlanning {
    let requested = settings.count.min(config.population);
    let max_attempts = settings.count.saturating_mul(CLUSTER_ATTEMPTS_PER_ANCHOR);
    let half = config.half_extents();
    let height = config.dimensions.y;

    let mut anchors: Vec<ClusterAnchor> = Vec::with_capacity(requested);
    let mut attempts = 0;

    while anchors.len() < requested && attempts < max_attempts {
        attempts += 1;

        let local = Vec3::new(
            rand_range(rng, -half.x, half.x),
            0.0,
            rand_range(rng, -half.z, half.z),
        );
        let origin = frame.to_world(local) + Vec3::Y * height;
        let Some(hit) = query.raycast(origin, Vec3::NEG_Y, height * 2.0, config.surface_mask)
        else {
            continue;
        };

        let surface = frame.to_local(hit.point);
        let spaced = anchors
            .iter()
            .all(|a| a.center.xz().distance(surface.xz()) >= settings.min_distance);
        if !spaced {
            continue;
        }

        let radius = settings.radius.sample(rng);
        let target = settings.objects_per_cluster.sample(rng);
        anchors.push(ClusterAnchor::new(surface, radius, target));
    }

    let shortfall = requested - anchors.len();
    ClusterPlanning {
        plan: ClusterPlan::new(anchors),
        requested,
        shortfall,
        attempts,
    }
}
