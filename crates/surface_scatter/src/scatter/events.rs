//! Event types and sinks for observing generation runs.
//!
//! This module defines [`ScatterEvent`] and a set of sinks to emit, filter or
//! collect events while a [`crate::scatter::scheduler::Scatterer`] is stepped.
use glam::Vec3;

use crate::scatter::cluster::ClusterFillReport;
use crate::scatter::scheduler::RunSummary;
use crate::scatter::{Placement, Rejection};

/// Describes events emitted during generation.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ScatterEvent {
    /// Emitted when a run enters the running state.
    RunStarted {
        /// Target number of placements.
        population: usize,
        /// Attempt ceiling for the whole run.
        attempt_ceiling: usize,
        /// Whether candidates are drawn around cluster anchors.
        clustered: bool,
    },

    /// Emitted at the beginning of each step.
    StepStarted {
        /// Zero-based step index.
        step: usize,
        /// Placements this step tries to produce.
        quota: usize,
    },

    /// Emitted once the cluster anchors were planned.
    ClustersPlanned {
        /// Anchors requested.
        requested: usize,
        /// Anchor centers in world space.
        centers: Vec<Vec3>,
    },

    /// Emitted for each accepted candidate.
    PlacementAccepted {
        /// The accepted placement.
        placement: Placement,
    },

    /// Emitted for each rejected candidate.
    PlacementRejected {
        /// The rejected candidate.
        rejection: Rejection,
    },

    /// Emitted at the end of each step.
    StepFinished {
        /// Zero-based step index.
        step: usize,
        /// Placements accepted during this step.
        accepted: usize,
        /// Candidates tried during this step.
        attempts: usize,
    },

    /// Emitted for each placement handed to the instantiator when a run completes.
    ObjectPlaced {
        /// The instantiated placement.
        placement: Placement,
    },

    /// Emitted when a run completes.
    RunCompleted {
        /// Final counts.
        summary: RunSummary,
        /// Cluster fill, if clustering was used.
        clusters: Option<ClusterFillReport>,
    },

    /// Emitted when a running generation is cancelled.
    RunCancelled {
        /// Placements discarded by the cancellation.
        discarded: usize,
    },

    /// Non-fatal warning generated during a run.
    Warning {
        /// Context string (e.g. "clusters").
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of a [`ScatterEvent`], used to filter what a sink receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScatterEventKind {
    RunStarted,
    StepStarted,
    ClustersPlanned,
    PlacementAccepted,
    PlacementRejected,
    StepFinished,
    ObjectPlaced,
    RunCompleted,
    RunCancelled,
    Warning,
}

impl ScatterEvent {
    pub fn kind(&self) -> ScatterEventKind {
        match self {
            ScatterEvent::RunStarted { .. } => ScatterEventKind::RunStarted,
            ScatterEvent::StepStarted { .. } => ScatterEventKind::StepStarted,
            ScatterEvent::ClustersPlanned { .. } => ScatterEventKind::ClustersPlanned,
            ScatterEvent::PlacementAccepted { .. } => ScatterEventKind::PlacementAccepted,
            ScatterEvent::PlacementRejected { .. } => ScatterEventKind::PlacementRejected,
            ScatterEvent::StepFinished { .. } => ScatterEventKind::StepFinished,
            ScatterEvent::ObjectPlaced { .. } => ScatterEventKind::ObjectPlaced,
            ScatterEvent::RunCompleted { .. } => ScatterEventKind::RunCompleted,
            ScatterEvent::RunCancelled { .. } => ScatterEventKind::RunCancelled,
            ScatterEvent::Warning { .. } => ScatterEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`ScatterEvent`]s.
pub trait EventSink {
    /// Whether events of `kind` should be built and sent at all.
    ///
    /// Emitters skip constructing per-candidate events a sink does not want.
    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        true
    }

    fn send(&mut self, event: ScatterEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ScatterEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        false
    }

    #[inline]
    fn send(&mut self, _event: ScatterEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn wants(&self, kind: ScatterEventKind) -> bool {
        (**self).wants(kind)
    }

    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (**self).send(event);
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ScatterEvent>,
    only: Option<Vec<ScatterEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only events whose kind is listed.
    pub fn only(kinds: impl IntoIterator<Item = ScatterEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<ScatterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ScatterEvent] {
        &self.events
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: ScatterEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }

    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }
}
