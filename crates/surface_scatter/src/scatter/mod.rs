//! Placement engine: configuration, validity pipeline, clustering and the step scheduler.
use glam::{Quat, Vec3};

pub mod cluster;
pub mod config;
pub mod events;
pub mod instantiate;
pub mod scheduler;
pub mod spacing;
pub mod stats;
pub mod validity;

pub use stats::{FailureStatistics, RejectionReason};

pub type VariantId = String;

/// Placement and orientation of the generator volume in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Frame {
    pub const IDENTITY: Frame = Frame {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Accepts any math type convertible through `mint`.
    pub fn new(
        translation: impl Into<mint::Vector3<f32>>,
        rotation: impl Into<mint::Quaternion<f32>>,
    ) -> Self {
        Self {
            translation: Vec3::from(translation.into()),
            rotation: Quat::from(rotation.into()).normalize(),
        }
    }

    pub fn from_translation(translation: impl Into<mint::Vector3<f32>>) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.translation
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.translation)
    }
}

/// An accepted placement, ready for instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// World-space position, including the vertical offset.
    pub position: Vec3,
    pub rotation: Quat,
    /// Isotropic scale, quantized to 0.1.
    pub scale: f32,
    /// Index into [`config::ScatterConfig::variants`].
    pub variant_index: usize,
    pub variant_id: VariantId,
    /// Cluster anchor the placement belongs to, if clustering was used.
    pub cluster: Option<usize>,
}

/// A rejected candidate and why it failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rejection {
    /// World-space position of the candidate.
    pub position: Vec3,
    pub reason: RejectionReason,
}

/// Result of validating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Valid(Placement),
    Invalid(Rejection),
}

impl PlacementOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, PlacementOutcome::Valid(_))
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            PlacementOutcome::Valid(_) => None,
            PlacementOutcome::Invalid(r) => Some(r.reason),
        }
    }
}
