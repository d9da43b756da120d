//! Generation settings: volume, population, variation ranges, probes and clustering.
//!
//! A [`ScatterConfig`] is fixed for the duration of a run. [`ScatterConfig::validate`]
//! checks the numeric invariants; [`ScatterConfig::start_blocker`] reports the two
//! preconditions that keep a run from starting at all.
use glam::Vec3;
use rand::Rng as RngCore;

use crate::error::{Error, Result, StartBlocker};
use crate::query::LayerMask;
use crate::sampling::{rand_inclusive, rand_range};
use crate::scatter::VariantId;

/// Inclusive float range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const ZERO: FloatRange = FloatRange { min: 0.0, max: 0.0 };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate range containing a single value.
    pub const fn point(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        rand_range(rng, self.min, self.max)
    }

    fn check(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidConfig(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "{name}: min ({}) must be <= max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Uniform count in `min..=max`.
    pub fn sample(&self, rng: &mut dyn RngCore) -> usize {
        rand_inclusive(rng, self.min, self.max)
    }
}

/// Where surface probes start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RayOrigin {
    /// Straight above the candidate, on the top face of the volume.
    #[default]
    TopFace,
    /// Center of a random side face, at a random height.
    SideFaces,
    /// Random point inside the volume.
    InsideVolume,
}

/// Geometry of the surface probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastShape {
    /// Thin ray.
    #[default]
    Ray,
    /// Sphere swept with the avoidance radius.
    Sphere,
}

/// Surface probe settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RaySettings {
    pub origin: RayOrigin,
    pub shape: CastShape,
    /// Range of the maximum deviation from straight down, in degrees. `(0, 0)` disables tilting.
    pub angle_degrees: FloatRange,
}

impl Default for RaySettings {
    fn default() -> Self {
        Self {
            origin: RayOrigin::TopFace,
            shape: CastShape::Ray,
            angle_degrees: FloatRange::ZERO,
        }
    }
}

/// Local surface stability check around the hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StabilitySettings {
    /// Probe ring radius. `0` disables the check.
    pub radius: f32,
    /// Number of probes on the ring.
    pub ray_count: usize,
    /// Base height tolerance along the surface normal.
    pub max_height_difference: f32,
    /// Percentage of probes that must pass, in [0, 100].
    pub min_success_percent: f32,
}

impl Default for StabilitySettings {
    fn default() -> Self {
        Self {
            radius: 0.0,
            ray_count: 8,
            max_height_difference: 0.1,
            min_success_percent: 100.0,
        }
    }
}

/// Clustered placement settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterSettings {
    /// Number of cluster anchors to plan.
    pub count: usize,
    /// Radius range for each anchor.
    pub radius: FloatRange,
    /// Inclusive range of target objects per anchor.
    pub objects_per_cluster: CountRange,
    /// Minimum horizontal distance between anchor centers.
    pub min_distance: f32,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            count: 10,
            radius: FloatRange::new(5.0, 15.0),
            objects_per_cluster: CountRange::new(3, 8),
            min_distance: 20.0,
        }
    }
}

/// Configuration of a generation run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScatterConfig {
    /// Volume size: x = width, y = probe height, z = depth.
    pub dimensions: Vec3,
    /// Target number of placements.
    pub population: usize,
    /// Attempt budget per requested placement.
    pub max_attempts_per_point: usize,
    /// Variants to choose from for each placement.
    pub variants: Vec<VariantId>,
    /// Isotropic scale range.
    pub scale: FloatRange,
    /// Yaw range in degrees.
    pub rotation_degrees: FloatRange,
    /// Vertical offset applied to the hit point.
    pub vertical_offset: FloatRange,
    /// Layers that count as placeable surface.
    pub surface_mask: LayerMask,
    /// Layers to avoid.
    pub obstacle_mask: LayerMask,
    /// Tilt placements to the surface normal.
    pub align_to_surface: bool,
    /// Obstacle proximity radius (also the sphere-cast radius). `0` disables proximity checks.
    pub avoidance_radius: f32,
    pub ray: RaySettings,
    /// Length of the floor-hole probe. `0` disables it.
    pub floor_check_distance: f32,
    /// Reject candidates with an obstacle overhead.
    pub check_ceiling: bool,
    pub stability: StabilitySettings,
    /// Minimum distance between placements. `0` disables spacing.
    pub min_distance: f32,
    /// Clustered placement, if enabled.
    pub clustering: Option<ClusterSettings>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            dimensions: Vec3::new(100.0, 10.0, 100.0),
            population: 100,
            max_attempts_per_point: 10,
            variants: Vec::new(),
            scale: FloatRange::new(0.8, 1.2),
            rotation_degrees: FloatRange::new(0.0, 360.0),
            vertical_offset: FloatRange::ZERO,
            surface_mask: LayerMask::ALL,
            obstacle_mask: LayerMask::NONE,
            align_to_surface: true,
            avoidance_radius: 3.5,
            ray: RaySettings::default(),
            floor_check_distance: 0.0,
            check_ceiling: false,
            stability: StabilitySettings::default(),
            min_distance: 5.0,
            clustering: None,
        }
    }
}

impl ScatterConfig {
    /// Creates a config for a volume of `dimensions` with `population` targets.
    pub fn new(dimensions: Vec3, population: usize) -> Self {
        Self {
            dimensions,
            population,
            ..Default::default()
        }
    }

    pub fn with_variants<I, V>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<VariantId>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_attempts_per_point(mut self, attempts: usize) -> Self {
        self.max_attempts_per_point = attempts;
        self
    }

    pub fn with_scale(mut self, scale: FloatRange) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation_degrees(mut self, rotation: FloatRange) -> Self {
        self.rotation_degrees = rotation;
        self
    }

    pub fn with_vertical_offset(mut self, offset: FloatRange) -> Self {
        self.vertical_offset = offset;
        self
    }

    pub fn with_surface_mask(mut self, mask: LayerMask) -> Self {
        self.surface_mask = mask;
        self
    }

    pub fn with_obstacle_mask(mut self, mask: LayerMask) -> Self {
        self.obstacle_mask = mask;
        self
    }

    pub fn with_align_to_surface(mut self, align: bool) -> Self {
        self.align_to_surface = align;
        self
    }

    pub fn with_avoidance_radius(mut self, radius: f32) -> Self {
        self.avoidance_radius = radius;
        self
    }

    pub fn with_ray(mut self, ray: RaySettings) -> Self {
        self.ray = ray;
        self
    }

    pub fn with_floor_check_distance(mut self, distance: f32) -> Self {
        self.floor_check_distance = distance;
        self
    }

    pub fn with_check_ceiling(mut self, check: bool) -> Self {
        self.check_ceiling = check;
        self
    }

    pub fn with_stability(mut self, stability: StabilitySettings) -> Self {
        self.stability = stability;
        self
    }

    pub fn with_min_distance(mut self, distance: f32) -> Self {
        self.min_distance = distance;
        self
    }

    pub fn with_clustering(mut self, clustering: ClusterSettings) -> Self {
        self.clustering = Some(clustering);
        self
    }

    /// Half of [`Self::dimensions`].
    pub fn half_extents(&self) -> Vec3 {
        self.dimensions * 0.5
    }

    /// Upper bound on raw sampling attempts for a whole run.
    pub fn attempt_ceiling(&self) -> usize {
        self.population.saturating_mul(self.max_attempts_per_point)
    }

    /// Looks up a variant by index.
    pub fn variant(&self, index: usize) -> Option<&VariantId> {
        self.variants.get(index)
    }

    /// True when surfaces can also count as obstacles.
    pub fn masks_conflict(&self) -> bool {
        self.surface_mask.intersects(self.obstacle_mask)
    }

    /// Returns the precondition that keeps a run from starting, if any.
    pub fn start_blocker(&self) -> Option<StartBlocker> {
        if self.variants.is_empty() {
            Some(StartBlocker::NoVariants)
        } else if self.surface_mask.is_empty() {
            Some(StartBlocker::NoSurfaceMask)
        } else {
            None
        }
    }

    /// Validates numeric invariants, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.dimensions.is_finite() || self.dimensions.min_element() <= 0.0 {
            return Err(Error::InvalidConfig(
                "dimensions must be finite and > 0 in every component".into(),
            ));
        }
        if self.population == 0 {
            return Err(Error::InvalidConfig("population must be >= 1".into()));
        }
        if self.max_attempts_per_point == 0 {
            return Err(Error::InvalidConfig(
                "max_attempts_per_point must be >= 1".into(),
            ));
        }

        self.scale.check("scale")?;
        if self.scale.min < 0.0 {
            return Err(Error::InvalidConfig("scale must be >= 0".into()));
        }
        self.rotation_degrees.check("rotation_degrees")?;
        self.vertical_offset.check("vertical_offset")?;
        self.ray.angle_degrees.check("ray.angle_degrees")?;
        if self.ray.angle_degrees.min < 0.0 || self.ray.angle_degrees.max > 90.0 {
            return Err(Error::InvalidConfig(
                "ray.angle_degrees must lie within [0, 90]".into(),
            ));
        }

        non_negative("avoidance_radius", self.avoidance_radius)?;
        non_negative("floor_check_distance", self.floor_check_distance)?;
        non_negative("min_distance", self.min_distance)?;
        non_negative("stability.radius", self.stability.radius)?;
        non_negative(
            "stability.max_height_difference",
            self.stability.max_height_difference,
        )?;
        if self.stability.radius > 0.0 && self.stability.ray_count == 0 {
            return Err(Error::InvalidConfig(
                "stability.ray_count must be >= 1 when the check is enabled".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.stability.min_success_percent) {
            return Err(Error::InvalidConfig(
                "stability.min_success_percent must lie within [0, 100]".into(),
            ));
        }

        if let Some(clusters) = &self.clustering {
            if clusters.count == 0 {
                return Err(Error::InvalidConfig("clustering.count must be >= 1".into()));
            }
            clusters.radius.check("clustering.radius")?;
            non_negative("clustering.radius", clusters.radius.min)?;
            non_negative("clustering.min_distance", clusters.min_distance)?;
            let per = clusters.objects_per_cluster;
            if per.min == 0 || per.min > per.max {
                return Err(Error::InvalidConfig(
                    "clustering.objects_per_cluster must satisfy 1 <= min <= max".into(),
                ));
            }
        }

        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidConfig(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}
