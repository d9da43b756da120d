//! Spatial-query seam between the placement engine and a collision world.
//!
//! The engine never intersects geometry itself. Every surface probe, sphere cast
//! and proximity test goes through [`SpatialQuery`], which a host implements on
//! top of its physics backend. [`primitives::PrimitiveWorld`] is a small analytic
//! implementation used by tests, benches and the examples.
use std::fmt;
use std::ops::{BitAnd, BitOr};

use glam::Vec3;

pub mod primitives;

pub use primitives::{Collider, PrimitiveWorld, Shape};

/// Index of a collision layer (0..32).
pub type LayerIndex = u8;

/// Bit set of collision layers.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask containing a single layer. Layers above 31 yield an empty mask.
    pub const fn layer(layer: LayerIndex) -> Self {
        if layer < 32 {
            LayerMask(1 << layer)
        } else {
            LayerMask::NONE
        }
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, layer: LayerIndex) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn with_layer(self, layer: LayerIndex) -> Self {
        LayerMask(self.0 | LayerMask::layer(layer).0)
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = LayerMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 & rhs.0)
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerMask({:#034b})", self.0)
    }
}

/// Result of a successful ray or sphere cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space contact point on the struck surface.
    pub point: Vec3,
    /// Unit surface normal at the contact point.
    pub normal: Vec3,
    /// Distance travelled along the cast direction.
    pub distance: f32,
    /// Layer of the struck collider.
    pub layer: LayerIndex,
}

/// Queries against a layered collision world.
///
/// Directions are expected to be normalized. Implementations return the closest
/// hit within `max_distance`, considering only colliders whose layer is in `mask`.
pub trait SpatialQuery {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;
}

impl<Q: SpatialQuery + ?Sized> SpatialQuery for &Q {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        (**self).sphere_cast(origin, radius, direction, max_distance, mask)
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        (**self).overlap_sphere(center, radius, mask)
    }
}
