//! Ordered validity checks that turn a raw candidate into a placement or a rejection.
//!
//! Stages run in a fixed order and the first failing stage decides the
//! [`RejectionReason`]:
//!
//! 1. surface probe (ray or sphere cast) → `NoHit`
//! 2. obstacle proximity at the hit, ray casts only → `NearObstacle`
//! 3. local stability ring → `EdgeCheck`
//! 4. overhead obstacle → `CeilingCheck`
//! 5. floor gap below the hit → `FloorCheck`
//! 6. hit layer is an obstacle → `InvalidLayer`, then proximity → `NearObstacle`
//! 7. hit outside the volume → `OutOfBounds`
//! 8. minimum spacing → `TooCloseToOther`
use glam::{Quat, Vec3};
use rand::Rng as RngCore;

use crate::error::Result;
use crate::query::{SpatialQuery, SurfaceHit};
use crate::sampling::{rand_index, rand_range, Candidate};
use crate::scatter::config::{CastShape, RayOrigin, ScatterConfig};
use crate::scatter::spacing::SpacingIndex;
use crate::scatter::{Frame, Placement, PlacementOutcome, Rejection, RejectionReason};

/// Height above the ring point where a stability probe starts, along the surface normal.
pub const STABILITY_PROBE_LIFT: f32 = 2.0;
/// Length of each stability probe.
pub const STABILITY_PROBE_LENGTH: f32 = 4.0;
/// Lift above the hit point for the floor-hole probe.
pub const FLOOR_PROBE_LIFT: f32 = 0.1;
/// Reach multiplier for tilted surface probes.
pub const TILTED_PROBE_REACH: f32 = 1.5;
/// Scale values are rounded to multiples of this step.
pub const SCALE_STEP: f32 = 0.1;

/// Scales the stability height tolerance with the surface tilt.
///
/// Up to 15° the base tolerance is used; between 15° and 45° it grows linearly to
/// 1.5×; steeper surfaces get 2×.
pub fn adaptive_tolerance(base: f32, tilt_degrees: f32) -> f32 {
    if tilt_degrees <= 15.0 {
        base
    } else if tilt_degrees <= 45.0 {
        base * (1.0 + (tilt_degrees - 15.0) / 60.0)
    } else {
        base * 2.0
    }
}

/// Orthonormal tangent and bitangent for a unit `normal`.
pub fn tangent_basis(normal: Vec3) -> (Vec3, Vec3) {
    let mut tangent = normal.cross(Vec3::Y);
    if tangent.length() < 0.1 {
        tangent = normal.cross(Vec3::Z);
    }
    let tangent = tangent.normalize_or(Vec3::X);
    let bitangent = normal.cross(tangent).normalize_or(Vec3::Z);
    (tangent, bitangent)
}

fn quantize_scale(value: f32) -> f32 {
    (value / SCALE_STEP).round() * SCALE_STEP
}

/// Validates candidates against a spatial query.
pub struct ValidityPipeline<'a, Q: SpatialQuery + ?Sized> {
    config: &'a ScatterConfig,
    frame: &'a Frame,
    query: &'a Q,
}

impl<'a, Q: SpatialQuery + ?Sized> ValidityPipeline<'a, Q> {
    /// Builds a pipeline, refusing configs without variants or surface layers.
    pub fn try_new(config: &'a ScatterConfig, frame: &'a Frame, query: &'a Q) -> Result<Self> {
        if let Some(blocker) = config.start_blocker() {
            return Err(blocker.into());
        }
        Ok(Self {
            config,
            frame,
            query,
        })
    }

    pub fn validate(
        &self,
        candidate: &Candidate,
        spacing: &SpacingIndex,
        rng: &mut dyn RngCore,
    ) -> PlacementOutcome {
        let cfg = self.config;
        let candidate_world = self.frame.to_world(candidate.local_position);
        let reject = move |reason| {
            PlacementOutcome::Invalid(Rejection {
                position: candidate_world,
                reason,
            })
        };

        let Some(hit) = self.probe_surface(candidate, rng) else {
            return reject(RejectionReason::NoHit);
        };

        if cfg.ray.shape == CastShape::Ray
            && cfg.avoidance_radius > 0.0
            && self
                .query
                .overlap_sphere(hit.point, cfg.avoidance_radius, cfg.obstacle_mask)
        {
            return reject(RejectionReason::NearObstacle);
        }

        if cfg.stability.radius > 0.0 && !self.is_stable(&hit) {
            return reject(RejectionReason::EdgeCheck);
        }

        if cfg.check_ceiling && !cfg.obstacle_mask.is_empty() && self.has_ceiling(&hit) {
            return reject(RejectionReason::CeilingCheck);
        }

        if cfg.floor_check_distance > 0.0
            && !cfg.obstacle_mask.is_empty()
            && self.has_floor_hole(&hit)
        {
            return reject(RejectionReason::FloorCheck);
        }

        if cfg.obstacle_mask.contains(hit.layer) {
            return reject(RejectionReason::InvalidLayer);
        }
        if cfg.avoidance_radius > 0.0
            && !cfg.obstacle_mask.is_empty()
            && self
                .query
                .overlap_sphere(hit.point, cfg.avoidance_radius, cfg.obstacle_mask)
        {
            return reject(RejectionReason::NearObstacle);
        }

        if !self.is_inside_volume(hit.point) {
            return reject(RejectionReason::OutOfBounds);
        }

        let position = hit.point + Vec3::Y * cfg.vertical_offset.sample(rng);
        if spacing.is_too_close(position) {
            return reject(RejectionReason::TooCloseToOther);
        }

        PlacementOutcome::Valid(self.finish(position, &hit, candidate, rng))
    }

    fn probe_surface(&self, candidate: &Candidate, rng: &mut dyn RngCore) -> Option<SurfaceHit> {
        let cfg = self.config;
        let origin = self.probe_origin(candidate, rng);
        let (direction, distance) = self.probe_direction(rng);
        match cfg.ray.shape {
            CastShape::Ray => self
                .query
                .raycast(origin, direction, distance, cfg.surface_mask),
            CastShape::Sphere => self.query.sphere_cast(
                origin,
                cfg.avoidance_radius,
                direction,
                distance,
                cfg.surface_mask,
            ),
        }
    }

    fn probe_origin(&self, candidate: &Candidate, rng: &mut dyn RngCore) -> Vec3 {
        let half = self.config.half_extents();
        let local = match self.config.ray.origin {
            RayOrigin::TopFace => Vec3::new(
                candidate.local_position.x,
                half.y,
                candidate.local_position.z,
            ),
            RayOrigin::SideFaces => {
                let side = rand_index(rng, 4).unwrap_or(0);
                let y = rand_range(rng, -half.y, half.y);
                match side {
                    0 => Vec3::new(-half.x, y, 0.0),
                    1 => Vec3::new(half.x, y, 0.0),
                    2 => Vec3::new(0.0, y, -half.z),
                    _ => Vec3::new(0.0, y, half.z),
                }
            }
            RayOrigin::InsideVolume => Vec3::new(
                rand_range(rng, -half.x, half.x),
                rand_range(rng, -half.y, half.y),
                rand_range(rng, -half.z, half.z),
            ),
        };
        self.frame.to_world(local)
    }

    fn probe_direction(&self, rng: &mut dyn RngCore) -> (Vec3, f32) {
        let distance = self.config.dimensions.y;
        let angles = self.config.ray.angle_degrees;
        if angles.is_zero() {
            return (Vec3::NEG_Y, distance);
        }
        let angle = angles.sample(rng);
        let tilt_x = rand_range(rng, -angle, angle).to_radians();
        let tilt_z = rand_range(rng, -angle, angle).to_radians();
        let tilt = Quat::from_rotation_x(tilt_x) * Quat::from_rotation_z(tilt_z);
        (tilt * Vec3::NEG_Y, distance * TILTED_PROBE_REACH)
    }

    fn is_stable(&self, hit: &SurfaceHit) -> bool {
        let settings = &self.config.stability;
        if settings.ray_count == 0 {
            return true;
        }

        let normal = hit.normal.normalize_or(Vec3::Y);
        let tilt = normal.angle_between(Vec3::Y).to_degrees();
        let tolerance = adaptive_tolerance(settings.max_height_difference, tilt);
        let (tangent, bitangent) = tangent_basis(normal);

        let step = std::f32::consts::TAU / settings.ray_count as f32;
        let successes = (0..settings.ray_count)
            .filter(|&i| {
                let (sin, cos) = (i as f32 * step).sin_cos();
                let along = (tangent * cos + bitangent * sin).normalize_or_zero();
                let start = hit.point + along * settings.radius + normal * STABILITY_PROBE_LIFT;
                self.query
                    .raycast(
                        start,
                        -normal,
                        STABILITY_PROBE_LENGTH,
                        self.config.surface_mask,
                    )
                    .is_some_and(|probe| (probe.point - hit.point).dot(normal).abs() <= tolerance)
            })
            .count();

        let percent = successes as f32 / settings.ray_count as f32 * 100.0;
        percent >= settings.min_success_percent
    }

    fn has_ceiling(&self, hit: &SurfaceHit) -> bool {
        let top = self.frame.translation.y + self.config.half_extents().y;
        let up = top - hit.point.y;
        up > 0.0
            && self
                .query
                .raycast(hit.point, Vec3::Y, up, self.config.obstacle_mask)
                .is_some()
    }

    fn has_floor_hole(&self, hit: &SurfaceHit) -> bool {
        let start = hit.point + Vec3::Y * FLOOR_PROBE_LIFT;
        let reach = self.config.floor_check_distance + FLOOR_PROBE_LIFT;
        self.query
            .raycast(start, Vec3::NEG_Y, reach, self.config.surface_mask)
            .is_none()
    }

    /// Loose containment: the vertical bound is twice the half height.
    fn is_inside_volume(&self, world: Vec3) -> bool {
        let local = self.frame.to_local(world);
        let half = self.config.half_extents();
        local.x.abs() <= half.x && local.z.abs() <= half.z && local.y.abs() <= half.y * 2.0
    }

    fn finish(
        &self,
        position: Vec3,
        hit: &SurfaceHit,
        candidate: &Candidate,
        rng: &mut dyn RngCore,
    ) -> Placement {
        let cfg = self.config;
        let yaw = Quat::from_rotation_y(cfg.rotation_degrees.sample(rng).to_radians());
        let rotation = if cfg.align_to_surface {
            Quat::from_rotation_arc(Vec3::Y, hit.normal.normalize_or(Vec3::Y)) * yaw
        } else {
            yaw
        };
        let scale = quantize_scale(cfg.scale.sample(rng));
        let variant_index = rand_index(rng, cfg.variants.len()).unwrap_or(0);

        Placement {
            position,
            rotation,
            scale,
            variant_index,
            variant_id: cfg.variant(variant_index).cloned().unwrap_or_default(),
            cluster: candidate.cluster,
        }
    }
}
