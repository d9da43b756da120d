#![forbid(unsafe_code)]
//! surface_scatter: Surface-aware object placement by rejection sampling.
//!
//! Modules:
//! - query: the spatial query seam (raycasts, sphere casts, overlaps) and an analytic primitive world
//! - sampling: candidate generation (uniform, cluster-biased)
//! - scatter: configuration, validity pipeline, cluster planning, spacing, step scheduler, events
//!
//! For examples and docs, see README.
pub mod error;
pub mod query;
pub mod sampling;
pub mod scatter;

/// Convenient re-exports for common types. Import with `use surface_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result, StartBlocker};
    pub use crate::query::{
        Collider, LayerIndex, LayerMask, PrimitiveWorld, Shape, SpatialQuery, SurfaceHit,
    };
    pub use crate::sampling::{Candidate, CandidateSampling, ClusterSampling, UniformSampling};
    pub use crate::scatter::cluster::{ClusterAnchor, ClusterFillReport, ClusterPlan};
    pub use crate::scatter::config::{
        CastShape, ClusterSettings, CountRange, FloatRange, RayOrigin, RaySettings,
        ScatterConfig, StabilitySettings,
    };
    pub use crate::scatter::events::{
        EventSink, FnSink, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::scatter::instantiate::{FnInstantiator, Instantiator};
    pub use crate::scatter::scheduler::{
        GenerationState, RunSummary, Scatterer, DEFAULT_PLACEMENTS_PER_STEP,
    };
    pub use crate::scatter::spacing::SpacingIndex;
    pub use crate::scatter::validity::ValidityPipeline;
    pub use crate::scatter::{
        FailureStatistics, Frame, Placement, PlacementOutcome, Rejection, RejectionReason,
        VariantId,
    };
}
