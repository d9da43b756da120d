//! Incremental generation driver.
//!
//! [`Scatterer`] owns the run state and advances it one bounded batch per
//! [`Scatterer::step`]. A host calls `step` once per frame (or in a loop via
//! [`Scatterer::run_to_completion`]) and may [`Scatterer::cancel`] between steps.
use rand::Rng as RngCore;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::query::SpatialQuery;
use crate::sampling::{CandidateSampling, ClusterSampling, UniformSampling};
use crate::scatter::cluster::{self, ClusterFillReport, ClusterPlan};
use crate::scatter::config::ScatterConfig;
use crate::scatter::events::{EventSink, ScatterEvent, ScatterEventKind};
use crate::scatter::instantiate::Instantiator;
use crate::scatter::spacing::SpacingIndex;
use crate::scatter::validity::ValidityPipeline;
use crate::scatter::{FailureStatistics, Frame, Placement, PlacementOutcome, RejectionReason};

/// Accepted placements a single step tries to produce.
pub const DEFAULT_PLACEMENTS_PER_STEP: usize = 25;

/// Share of the population that should land in clusters; completion warns below it.
pub const CLUSTER_FILL_WARNING_RATIO: f32 = 0.7;

/// Lifecycle of a [`Scatterer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Counts describing a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Accepted placements.
    pub placed: usize,
    /// Requested placements.
    pub population: usize,
    /// Raw attempts, including those that produced no candidate.
    pub attempts: usize,
    pub steps: usize,
    /// Total tallied rejections.
    pub rejections: usize,
}

/// Step-driven placement generator.
pub struct Scatterer<R: RngCore> {
    config: ScatterConfig,
    frame: Frame,
    rng: R,
    placements_per_step: usize,
    state: GenerationState,
    placements: Vec<Placement>,
    spacing: SpacingIndex,
    statistics: FailureStatistics,
    clusters: Option<ClusterPlan>,
    total_attempts: usize,
    steps: usize,
    pending_warnings: Vec<String>,
}

impl<R: RngCore> Scatterer<R> {
    pub fn new(config: ScatterConfig, rng: R) -> Self {
        let spacing = SpacingIndex::new(config.min_distance);
        Self {
            config,
            frame: Frame::IDENTITY,
            rng,
            placements_per_step: DEFAULT_PLACEMENTS_PER_STEP,
            state: GenerationState::Idle,
            placements: Vec::new(),
            spacing,
            statistics: FailureStatistics::new(),
            clusters: None,
            total_attempts: 0,
            steps: 0,
            pending_warnings: Vec::new(),
        }
    }

    /// Places the generator volume in world space.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Overrides [`DEFAULT_PLACEMENTS_PER_STEP`]. Values below 1 are raised to 1.
    pub fn with_placements_per_step(mut self, placements: usize) -> Self {
        self.placements_per_step = placements.max(1);
        self
    }

    pub fn config(&self) -> &ScatterConfig {
        &self.config
    }

    /// Replaces the config. Refused while a run is in progress.
    pub fn set_config(&mut self, config: ScatterConfig) -> Result<()> {
        if self.is_running() {
            return Err(Error::Busy);
        }
        self.config = config;
        Ok(())
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Moves the generator volume. Refused while a run is in progress.
    pub fn set_frame(&mut self, frame: Frame) -> Result<()> {
        if self.is_running() {
            return Err(Error::Busy);
        }
        self.frame = frame;
        Ok(())
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GenerationState::Running
    }

    /// Accepted placements of the current (or last completed) run.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn statistics(&self) -> &FailureStatistics {
        &self.statistics
    }

    pub fn total_attempts(&self) -> usize {
        self.total_attempts
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Cluster anchors, once planned.
    pub fn clusters(&self) -> Option<&ClusterPlan> {
        self.clusters.as_ref()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            placed: self.placements.len(),
            population: self.config.population,
            attempts: self.total_attempts,
            steps: self.steps,
            rejections: self.statistics.total(),
        }
    }

    /// Starts a new run.
    ///
    /// Does nothing while a run is already in progress. A refused start leaves
    /// the previous results and state untouched.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        if let Some(blocker) = self.config.start_blocker() {
            warn!("Cannot start generation: {blocker}.");
            return Err(blocker.into());
        }
        self.config.validate()?;

        self.reset();
        if self.config.masks_conflict() {
            let message = format!(
                "Obstacle mask {:?} overlaps surface mask {:?}; hits on shared layers are rejected",
                self.config.obstacle_mask, self.config.surface_mask
            );
            warn!("{message}");
            self.pending_warnings.push(message);
        }
        self.state = GenerationState::Running;
        info!(
            "Generation started | population: {} | attempt ceiling: {} | clustered: {}.",
            self.config.population,
            self.config.attempt_ceiling(),
            self.config.clustering.is_some(),
        );
        Ok(())
    }

    /// Advances a running generation by one batch and returns the resulting state.
    ///
    /// Outside the running state this is a no-op.
    pub fn step<Q: SpatialQuery + ?Sized>(
        &mut self,
        query: &Q,
        instantiator: &mut dyn Instantiator,
        sink: &mut dyn EventSink,
    ) -> Result<GenerationState> {
        if !self.is_running() {
            return Ok(self.state);
        }

        let step = self.steps;
        self.steps += 1;
        if step == 0 && sink.wants(ScatterEventKind::RunStarted) {
            sink.send(ScatterEvent::RunStarted {
                population: self.config.population,
                attempt_ceiling: self.config.attempt_ceiling(),
                clustered: self.config.clustering.is_some(),
            });
        }

        let quota = self
            .placements_per_step
            .min(self.config.population.saturating_sub(self.placements.len()));
        if sink.wants(ScatterEventKind::StepStarted) {
            sink.send(ScatterEvent::StepStarted { step, quota });
        }
        for message in self.pending_warnings.drain(..) {
            send_warning(sink, "masks", message);
        }

        if self.config.clustering.is_some() && self.clusters.is_none() {
            self.plan_clusters(query, sink);
        }

        let exhausted_clusters = self
            .clusters
            .as_ref()
            .is_some_and(|plan| plan.active_count() == 0);
        let (accepted, attempts) = if exhausted_clusters {
            let message = if self.clusters.as_ref().is_some_and(ClusterPlan::is_empty) {
                "No cluster anchors could be planned; ending the run"
            } else {
                "All clusters are full; ending the run"
            };
            emit_warning(sink, "clusters", message.into());
            (0, 0)
        } else {
            self.run_batch(query, quota, sink)?
        };

        debug!(
            "Step {}: accepted {}/{} in {} attempts | total {}/{}.",
            step,
            accepted,
            quota,
            attempts,
            self.placements.len(),
            self.config.population,
        );
        if sink.wants(ScatterEventKind::StepFinished) {
            sink.send(ScatterEvent::StepFinished {
                step,
                accepted,
                attempts,
            });
        }

        if exhausted_clusters
            || self.placements.len() >= self.config.population
            || self.total_attempts >= self.config.attempt_ceiling()
        {
            self.complete(instantiator, sink);
        }
        Ok(self.state)
    }

    /// Starts a run (if needed) and steps it until it stops running.
    pub fn run_to_completion<Q: SpatialQuery + ?Sized>(
        &mut self,
        query: &Q,
        instantiator: &mut dyn Instantiator,
        sink: &mut dyn EventSink,
    ) -> Result<RunSummary> {
        self.start()?;
        while self.step(query, instantiator, sink)? == GenerationState::Running {}
        Ok(self.summary())
    }

    /// Stops a running generation and discards its partial results.
    ///
    /// Nothing is handed to the instantiator. Returns false if no run was in progress.
    pub fn cancel(&mut self, sink: &mut dyn EventSink) -> bool {
        if !self.is_running() {
            return false;
        }
        let discarded = self.placements.len();
        self.reset();
        self.state = GenerationState::Cancelled;
        info!("Generation cancelled | discarded: {discarded}.");
        if sink.wants(ScatterEventKind::RunCancelled) {
            sink.send(ScatterEvent::RunCancelled { discarded });
        }
        true
    }

    /// Drops all results and statistics and returns to idle, cancelling a running generation.
    pub fn clear(&mut self) {
        if self.is_running() {
            debug!("Clearing a running generation.");
        }
        self.reset();
        self.state = GenerationState::Idle;
    }

    fn reset(&mut self) {
        self.placements.clear();
        self.spacing = SpacingIndex::new(self.config.min_distance);
        self.statistics.clear();
        self.clusters = None;
        self.total_attempts = 0;
        self.steps = 0;
        self.pending_warnings.clear();
    }

    fn plan_clusters<Q: SpatialQuery + ?Sized>(&mut self, query: &Q, sink: &mut dyn EventSink) {
        let Some(settings) = self.config.clustering else {
            return;
        };
        let planning =
            cluster::plan_clusters(&self.config, &settings, &self.frame, query, &mut self.rng);

        if planning.shortfall > 0 {
            self.statistics
                .record_many(RejectionReason::ClusterFailed, planning.shortfall);
        }
        info!(
            "Planned {}/{} clusters in {} attempts | target objects: {}.",
            planning.plan.len(),
            planning.requested,
            planning.attempts,
            planning.plan.total_target(),
        );
        for message in planning.warnings(self.config.population) {
            emit_warning(sink, "clusters", message);
        }
        if sink.wants(ScatterEventKind::ClustersPlanned) {
            sink.send(ScatterEvent::ClustersPlanned {
                requested: planning.requested,
                centers: planning
                    .plan
                    .anchors()
                    .iter()
                    .map(|a| self.frame.to_world(a.center))
                    .collect(),
            });
        }
        self.clusters = Some(planning.plan);
    }

    fn run_batch<Q: SpatialQuery + ?Sized>(
        &mut self,
        query: &Q,
        quota: usize,
        sink: &mut dyn EventSink,
    ) -> Result<(usize, usize)> {
        let Self {
            config,
            frame,
            rng,
            placements,
            spacing,
            statistics,
            clusters,
            total_attempts,
            ..
        } = self;

        let pipeline = ValidityPipeline::try_new(config, frame, query)?;
        let ceiling = config.attempt_ceiling();
        let budget = quota.saturating_mul(config.max_attempts_per_point);
        let mut accepted = 0;
        let mut attempts = 0;

        while accepted < quota && attempts < budget && *total_attempts < ceiling {
            attempts += 1;
            *total_attempts += 1;

            let candidate = match clusters.as_ref() {
                Some(plan) => ClusterSampling::new(plan).sample(config.dimensions, &mut *rng),
                None => UniformSampling.sample(config.dimensions, &mut *rng),
            };
            let Some(candidate) = candidate else {
                continue;
            };

            match pipeline.validate(&candidate, spacing, &mut *rng) {
                PlacementOutcome::Valid(placement) => {
                    spacing.insert(placement.position);
                    if let (Some(plan), Some(index)) = (clusters.as_mut(), placement.cluster) {
                        if plan.record_placement(index) {
                            debug!("Cluster {index} reached its target.");
                        }
                    }
                    if sink.wants(ScatterEventKind::PlacementAccepted) {
                        sink.send(ScatterEvent::PlacementAccepted {
                            placement: placement.clone(),
                        });
                    }
                    placements.push(placement);
                    accepted += 1;
                }
                PlacementOutcome::Invalid(rejection) => {
                    statistics.record(rejection.reason);
                    if sink.wants(ScatterEventKind::PlacementRejected) {
                        sink.send(ScatterEvent::PlacementRejected { rejection });
                    }
                }
            }
        }

        Ok((accepted, attempts))
    }

    fn complete(&mut self, instantiator: &mut dyn Instantiator, sink: &mut dyn EventSink) {
        for placement in &self.placements {
            instantiator.instantiate(placement);
            if sink.wants(ScatterEventKind::ObjectPlaced) {
                sink.send(ScatterEvent::ObjectPlaced {
                    placement: placement.clone(),
                });
            }
        }

        let fill = self.clusters.as_ref().map(ClusterPlan::fill_report);
        if let Some(report) = &fill {
            report_cluster_fill(report, self.config.population, sink);
        }

        let summary = self.summary();
        if summary.placed < summary.population {
            warn!(
                "Placed {}/{} objects | rejections: {}.",
                summary.placed, summary.population, self.statistics
            );
        }
        info!(
            "Generation complete | placed: {}/{} | attempts: {} | steps: {}.",
            summary.placed, summary.population, summary.attempts, summary.steps,
        );
        if sink.wants(ScatterEventKind::RunCompleted) {
            sink.send(ScatterEvent::RunCompleted {
                summary,
                clusters: fill,
            });
        }
        self.state = GenerationState::Completed;
    }
}

fn report_cluster_fill(report: &ClusterFillReport, population: usize, sink: &mut dyn EventSink) {
    if report.empty > 0 {
        emit_warning(
            sink,
            "clusters",
            format!("{}/{} clusters received no objects", report.empty, report.anchors),
        );
    }
    if report.overfilled > 0 {
        emit_warning(
            sink,
            "clusters",
            format!("{} clusters exceeded their target", report.overfilled),
        );
    }
    if population > 0 {
        let ratio = report.placed as f32 / population as f32;
        if ratio < CLUSTER_FILL_WARNING_RATIO {
            emit_warning(
                sink,
                "clusters",
                format!(
                    "Only {:.0}% of the population landed in clusters ({}/{})",
                    ratio * 100.0,
                    report.placed,
                    population
                ),
            );
        }
    }
}

fn emit_warning(sink: &mut dyn EventSink, context: &str, message: String) {
    warn!("{message}.");
    send_warning(sink, context, message);
}

fn send_warning(sink: &mut dyn EventSink, context: &str, message: String) {
    if sink.wants(ScatterEventKind::Warning) {
        sink.send(ScatterEvent::Warning {
            context: context.into(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec3Swizzles};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::StartBlocker;
    use crate::query::{LayerMask, PrimitiveWorld, Shape};
    use crate::scatter::config::{ClusterSettings, CountRange, FloatRange};
    use crate::scatter::events::VecSink;

    const GROUND: u8 = 0;

    fn flat() -> PrimitiveWorld {
        PrimitiveWorld::new().with(Shape::ground(0.0), GROUND)
    }

    fn field_config(population: usize) -> ScatterConfig {
        ScatterConfig::new(Vec3::new(100.0, 10.0, 100.0), population)
            .with_variants(["rock", "bush", "stump"])
            .with_surface_mask(LayerMask::layer(GROUND))
            .with_min_distance(5.0)
    }

    fn scatterer(config: ScatterConfig, seed: u64) -> Scatterer<StdRng> {
        Scatterer::new(config, StdRng::seed_from_u64(seed))
    }

    fn assert_spaced(placements: &[Placement], min: f32) {
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                assert!(
                    a.position.distance(b.position) >= min,
                    "{:?} and {:?} closer than {min}",
                    a.position,
                    b.position
                );
            }
        }
    }

    #[test]
    fn flat_field_fills_population() {
        let mut runner = scatterer(field_config(50), 42);
        let mut placed: Vec<Placement> = Vec::new();
        let mut sink = VecSink::new();
        let summary = runner
            .run_to_completion(&flat(), &mut placed, &mut sink)
            .expect("run");

        assert_eq!(runner.state(), GenerationState::Completed);
        assert_eq!(summary.placed, 50);
        assert_eq!(runner.placements().len(), 50);
        assert_eq!(placed.len(), 50);
        assert_eq!(summary.steps, 2);
        assert!(summary.attempts <= runner.config().attempt_ceiling());
        assert_spaced(runner.placements(), 5.0);
        for p in runner.placements() {
            assert!(p.position.x.abs() <= 50.0 && p.position.z.abs() <= 50.0);
            assert!(p.position.y.abs() < 1e-4);
            assert!(p.variant_index < 3);
        }

        assert_eq!(sink.count(ScatterEventKind::RunStarted), 1);
        assert_eq!(sink.count(ScatterEventKind::StepStarted), 2);
        assert_eq!(sink.count(ScatterEventKind::PlacementAccepted), 50);
        assert_eq!(sink.count(ScatterEventKind::ObjectPlaced), 50);
        assert_eq!(sink.count(ScatterEventKind::RunCompleted), 1);
        assert_eq!(
            sink.count(ScatterEventKind::PlacementRejected),
            runner.statistics().total()
        );
        assert!(runner
            .statistics()
            .iter()
            .all(|(reason, _)| reason == RejectionReason::TooCloseToOther));
    }

    #[test]
    fn same_seed_same_results() {
        let run = |seed| {
            let mut runner = scatterer(field_config(30), seed);
            runner.run_to_completion(&flat(), &mut (), &mut ()).expect("run");
            runner.placements().to_vec()
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }

    #[test]
    fn clear_resets_everything() {
        let mut runner = scatterer(field_config(20), 1);
        runner.run_to_completion(&flat(), &mut (), &mut ()).expect("run");
        assert!(!runner.placements().is_empty());

        runner.clear();
        assert_eq!(runner.state(), GenerationState::Idle);
        assert!(runner.placements().is_empty());
        assert!(runner.statistics().is_empty());
        assert_eq!(runner.total_attempts(), 0);
        assert_eq!(runner.steps(), 0);
        assert!(runner.clusters().is_none());
    }

    #[test]
    fn empty_surface_mask_refuses_without_mutation() {
        let mut runner = scatterer(field_config(10), 3);
        runner.run_to_completion(&flat(), &mut (), &mut ()).expect("run");
        let before = runner.placements().to_vec();

        runner.set_config(field_config(10).with_surface_mask(LayerMask::NONE))
            .expect("idle config change");
        let err = runner.start().expect_err("empty surface mask");
        assert!(matches!(
            err,
            Error::CannotStart(StartBlocker::NoSurfaceMask)
        ));
        assert_eq!(runner.state(), GenerationState::Completed);
        assert_eq!(runner.placements(), &before[..]);
    }

    #[test]
    fn missing_variants_refuse_to_start() {
        let mut runner = scatterer(field_config(10).with_variants(Vec::<String>::new()), 3);
        assert!(matches!(
            runner.start(),
            Err(Error::CannotStart(StartBlocker::NoVariants))
        ));
        assert_eq!(runner.state(), GenerationState::Idle);
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut runner = scatterer(field_config(10).with_min_distance(-2.0), 3);
        assert!(matches!(runner.start(), Err(Error::InvalidConfig(_))));
        assert_eq!(runner.state(), GenerationState::Idle);
    }

    #[test]
    fn surface_masked_as_obstacle_places_nothing() {
        let config = field_config(10)
            .with_obstacle_mask(LayerMask::layer(GROUND))
            .with_avoidance_radius(0.0);
        let mut runner = scatterer(config, 9);
        let mut sink = VecSink::only([ScatterEventKind::Warning]);
        let summary = runner
            .run_to_completion(&flat(), &mut (), &mut sink)
            .expect("run");

        assert_eq!(summary.placed, 0);
        assert_eq!(summary.attempts, runner.config().attempt_ceiling());
        let stats = runner.statistics();
        assert_eq!(stats.get(RejectionReason::InvalidLayer), summary.attempts);
        assert_eq!(stats.total(), summary.attempts);
        assert!(sink.count(ScatterEventKind::Warning) >= 1);
    }

    #[test]
    fn count_never_exceeds_population() {
        for population in [1, 7, 26, 60] {
            let mut runner = scatterer(field_config(population).with_min_distance(1.0), 5);
            let summary = runner
                .run_to_completion(&flat(), &mut (), &mut ())
                .expect("run");
            assert!(summary.placed <= population);
            assert_eq!(summary.placed, runner.placements().len());
        }
    }

    #[test]
    fn cancel_discards_partial_results() {
        let mut runner = scatterer(field_config(80), 11);
        let mut placed: Vec<Placement> = Vec::new();
        runner.start().expect("start");
        let state = runner.step(&flat(), &mut placed, &mut ()).expect("step");
        assert_eq!(state, GenerationState::Running);
        assert_eq!(runner.placements().len(), DEFAULT_PLACEMENTS_PER_STEP);

        let mut sink = VecSink::new();
        assert!(runner.cancel(&mut sink));
        assert_eq!(runner.state(), GenerationState::Cancelled);
        assert!(runner.placements().is_empty());
        assert!(placed.is_empty());
        assert_eq!(sink.count(ScatterEventKind::RunCancelled), 1);
        assert!(!runner.cancel(&mut ()));

        let state = runner.step(&flat(), &mut placed, &mut ()).expect("idle step");
        assert_eq!(state, GenerationState::Cancelled);
        assert!(placed.is_empty());
    }

    #[test]
    fn start_while_running_is_a_no_op_and_config_is_locked() {
        let mut runner = scatterer(field_config(80), 2);
        runner.start().expect("start");
        runner.step(&flat(), &mut (), &mut ()).expect("step");
        let placed = runner.placements().len();

        runner.start().expect("no-op start");
        assert_eq!(runner.placements().len(), placed);
        assert_eq!(runner.steps(), 1);
        assert!(matches!(
            runner.set_config(field_config(5)),
            Err(Error::Busy)
        ));
        assert!(matches!(runner.set_frame(Frame::IDENTITY), Err(Error::Busy)));
    }

    #[test]
    fn unreachable_surface_stops_at_attempt_ceiling() {
        let config = field_config(100).with_max_attempts_per_point(4);
        let mut runner = scatterer(config, 6).with_placements_per_step(10);
        let summary = runner
            .run_to_completion(&PrimitiveWorld::new(), &mut (), &mut ())
            .expect("run");

        assert_eq!(runner.state(), GenerationState::Completed);
        assert_eq!(summary.placed, 0);
        assert_eq!(summary.attempts, 400);
        assert_eq!(summary.steps, 10);
        assert_eq!(runner.statistics().get(RejectionReason::NoHit), 400);
    }

    #[test]
    fn clustered_run_places_inside_anchors() {
        let settings = ClusterSettings {
            count: 4,
            radius: FloatRange::new(5.0, 8.0),
            objects_per_cluster: CountRange::new(3, 5),
            min_distance: 20.0,
        };
        let config = field_config(12)
            .with_min_distance(1.0)
            .with_clustering(settings);
        let mut runner = scatterer(config, 21);
        let mut sink = VecSink::only([ScatterEventKind::ClustersPlanned]);
        let summary = runner
            .run_to_completion(&flat(), &mut (), &mut sink)
            .expect("run");

        assert_eq!(sink.count(ScatterEventKind::ClustersPlanned), 1);
        let plan = runner.clusters().expect("planned clusters");
        assert_eq!(plan.len(), 4);
        assert!(summary.placed > 0 && summary.placed <= 12);
        assert_spaced(runner.placements(), 1.0);
        for p in runner.placements() {
            let index = p.cluster.expect("clustered placement");
            let anchor = &plan.anchors()[index];
            assert!(p.position.xz().distance(anchor.center.xz()) <= anchor.radius + 1e-3);
        }
        for anchor in plan.anchors() {
            assert!(anchor.placed <= anchor.target);
        }
    }

    #[test]
    fn cluster_shortfall_is_tallied_and_reported() {
        let settings = ClusterSettings {
            count: 5,
            min_distance: 1000.0,
            ..Default::default()
        };
        let config = field_config(20)
            .with_min_distance(0.5)
            .with_clustering(settings);
        let mut runner = scatterer(config, 4);
        let mut sink = VecSink::only([ScatterEventKind::Warning]);
        runner.run_to_completion(&flat(), &mut (), &mut sink)
            .expect("run");

        let plan = runner.clusters().expect("planned clusters");
        assert!(plan.len() <= 1);
        assert!(runner.statistics().get(RejectionReason::ClusterFailed) >= 4);
        assert!(sink.count(ScatterEventKind::Warning) >= 1);
        assert_eq!(runner.state(), GenerationState::Completed);
    }

    fn warnings(sink: &VecSink) -> Vec<String> {
        sink.as_slice()
            .iter()
            .filter_map(|event| match event {
                ScatterEvent::Warning { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn fully_populated_clustered_run_has_no_fill_warning() {
        let settings = ClusterSettings {
            count: 4,
            radius: FloatRange::new(8.0, 10.0),
            objects_per_cluster: CountRange::new(4, 6),
            min_distance: 20.0,
        };
        let config = field_config(10)
            .with_min_distance(1.0)
            .with_clustering(settings);
        let mut runner = scatterer(config, 13);
        let mut sink = VecSink::only([ScatterEventKind::Warning]);
        let summary = runner
            .run_to_completion(&flat(), &mut (), &mut sink)
            .expect("run");

        let report = runner.clusters().expect("planned clusters").fill_report();
        assert!(report.target > summary.population);
        assert_eq!(summary.placed, 10);
        assert_eq!(report.placed, 10);
        assert!(warnings(&sink)
            .iter()
            .all(|message| !message.contains("landed in clusters")));
    }

    #[test]
    fn sparse_clusters_warn_about_population_share() {
        let settings = ClusterSettings {
            count: 1,
            radius: FloatRange::new(5.0, 5.0),
            objects_per_cluster: CountRange::new(3, 3),
            min_distance: 20.0,
        };
        let config = field_config(10)
            .with_min_distance(1.0)
            .with_clustering(settings);
        let mut runner = scatterer(config, 13);
        let mut sink = VecSink::only([ScatterEventKind::Warning]);
        let summary = runner
            .run_to_completion(&flat(), &mut (), &mut sink)
            .expect("run");

        assert_eq!(summary.placed, 3);
        assert!(warnings(&sink)
            .iter()
            .any(|message| message.contains("30% of the population landed in clusters")));
    }

    #[test]
    fn clustering_without_anchors_ends_with_planning_warning() {
        let config = field_config(10).with_clustering(ClusterSettings::default());
        let mut runner = scatterer(config, 2);
        let mut sink = VecSink::only([ScatterEventKind::Warning]);
        let summary = runner
            .run_to_completion(&PrimitiveWorld::new(), &mut (), &mut sink)
            .expect("run");

        assert_eq!(runner.state(), GenerationState::Completed);
        assert_eq!(summary.placed, 0);
        assert!(runner.clusters().is_some_and(ClusterPlan::is_empty));
        let messages = warnings(&sink);
        assert!(messages
            .iter()
            .any(|message| message.starts_with("No cluster anchors could be planned")));
        assert!(messages
            .iter()
            .all(|message| !message.starts_with("All clusters are full")));
    }

    #[test]
    fn frame_moves_results_into_world_space() {
        let frame = Frame::from_translation(Vec3::new(500.0, 0.0, -300.0));
        let mut runner = scatterer(field_config(10), 8).with_frame(frame);
        runner.run_to_completion(&flat(), &mut (), &mut ()).expect("run");
        assert_eq!(runner.placements().len(), 10);
        for p in runner.placements() {
            assert!((p.position.x - 500.0).abs() <= 50.0);
            assert!((p.position.z + 300.0).abs() <= 50.0);
        }
    }
}
