//! Analytic collision world made of half-spaces, axis-aligned boxes and balls.
//!
//! Sphere casts are answered by casting a ray against each shape inflated by the
//! sphere radius. That is exact for half-spaces and balls and slightly
//! conservative near box edges and corners.
use glam::Vec3;

use crate::query::{LayerIndex, LayerMask, SpatialQuery, SurfaceHit};

const PARALLEL_EPSILON: f32 = 1e-6;

/// Solid primitive shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Everything on the negative side of the plane `normal · p = offset` is solid.
    HalfSpace {
        /// Unit outward normal.
        normal: Vec3,
        /// Plane offset along `normal`.
        offset: f32,
    },
    /// Axis-aligned box.
    Cuboid {
        /// Minimum corner.
        min: Vec3,
        /// Maximum corner.
        max: Vec3,
    },
    /// Solid ball.
    Ball {
        /// Ball center.
        center: Vec3,
        /// Ball radius.
        radius: f32,
    },
}

impl Shape {
    /// Horizontal ground whose surface sits at `height`.
    pub fn ground(height: f32) -> Self {
        Shape::HalfSpace {
            normal: Vec3::Y,
            offset: height,
        }
    }

    /// Plane through `point` with the given outward `normal`.
    pub fn plane(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or(Vec3::Y);
        Shape::HalfSpace {
            normal,
            offset: normal.dot(point),
        }
    }

    /// Box from a center and half extents.
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Shape::Cuboid {
            min: center - half,
            max: center + half,
        }
    }

    pub fn ball(center: Vec3, radius: f32) -> Self {
        Shape::Ball {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Casts a sphere of `inflate` radius (zero for a ray). Returns `(distance, normal)`.
    fn cast(&self, origin: Vec3, direction: Vec3, inflate: f32) -> Option<(f32, Vec3)> {
        match *self {
            Shape::HalfSpace { normal, offset } => {
                let denom = normal.dot(direction);
                if denom > -PARALLEL_EPSILON {
                    return None;
                }
                let height = normal.dot(origin) - (offset + inflate);
                if height < 0.0 {
                    return None;
                }
                Some((height / -denom, normal))
            }
            Shape::Ball { center, radius } => {
                let r = radius + inflate;
                let oc = origin - center;
                let c = oc.length_squared() - r * r;
                if c < 0.0 {
                    return None;
                }
                let b = oc.dot(direction);
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let t = -b - disc.sqrt();
                if t < 0.0 {
                    return None;
                }
                let normal = (origin + direction * t - center).normalize_or(Vec3::Y);
                Some((t, normal))
            }
            Shape::Cuboid { min, max } => {
                let min = min - Vec3::splat(inflate);
                let max = max + Vec3::splat(inflate);
                let mut t_near = f32::NEG_INFINITY;
                let mut t_far = f32::INFINITY;
                let mut normal = Vec3::Y;

                for axis in 0..3 {
                    let o = origin[axis];
                    let d = direction[axis];
                    if d.abs() < PARALLEL_EPSILON {
                        if o < min[axis] || o > max[axis] {
                            return None;
                        }
                        continue;
                    }
                    let t1 = (min[axis] - o) / d;
                    let t2 = (max[axis] - o) / d;
                    let (near, far, sign) = if t1 < t2 {
                        (t1, t2, -1.0)
                    } else {
                        (t2, t1, 1.0)
                    };
                    if near > t_near {
                        t_near = near;
                        normal = Vec3::ZERO;
                        normal[axis] = sign;
                    }
                    t_far = t_far.min(far);
                    if t_near > t_far {
                        return None;
                    }
                }

                // Origins inside the box report no hit.
                if t_near < 0.0 {
                    return None;
                }
                Some((t_near, normal))
            }
        }
    }

    fn surface_point(&self, sphere_center: Vec3, normal: Vec3, inflate: f32) -> Vec3 {
        match *self {
            Shape::Ball { center, radius } => center + normal * radius,
            _ => sphere_center - normal * inflate,
        }
    }

    fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        match *self {
            Shape::HalfSpace { normal, offset } => normal.dot(point) - offset <= radius,
            Shape::Ball {
                center,
                radius: ball_radius,
            } => point.distance_squared(center) <= (radius + ball_radius).powi(2),
            Shape::Cuboid { min, max } => {
                point.clamp(min, max).distance_squared(point) <= radius * radius
            }
        }
    }
}

/// A shape assigned to a collision layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub layer: LayerIndex,
}

impl Collider {
    pub fn new(shape: Shape, layer: LayerIndex) -> Self {
        Self { shape, layer }
    }
}

/// A [`SpatialQuery`] over a flat list of analytic colliders.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveWorld {
    colliders: Vec<Collider>,
}

impl PrimitiveWorld {
    pub fn new() -> Self {
        Self {
            colliders: Vec::new(),
        }
    }

    /// Adds a collider (builder-style).
    pub fn with(mut self, shape: Shape, layer: LayerIndex) -> Self {
        self.push(shape, layer);
        self
    }

    pub fn push(&mut self, shape: Shape, layer: LayerIndex) {
        self.colliders.push(Collider::new(shape, layer));
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn closest_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance < 0.0 {
            return None;
        }

        let mut best: Option<SurfaceHit> = None;
        for collider in self.colliders.iter().filter(|c| mask.contains(c.layer)) {
            let Some((distance, normal)) = collider.shape.cast(origin, direction, radius) else {
                continue;
            };
            if distance > max_distance || best.is_some_and(|b| b.distance <= distance) {
                continue;
            }
            let sphere_center = origin + direction * distance;
            best = Some(SurfaceHit {
                point: collider.shape.surface_point(sphere_center, normal, radius),
                normal,
                distance,
                layer: collider.layer,
            });
        }
        best
    }
}

impl SpatialQuery for PrimitiveWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.closest_cast(origin, 0.0, direction, max_distance, mask)
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.closest_cast(origin, radius.max(0.0), direction, max_distance, mask)
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        self.colliders
            .iter()
            .filter(|c| mask.contains(c.layer))
            .any(|c| c.shape.overlaps(center, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn ray_hits_ground_from_above_only() {
        let world = PrimitiveWorld::new().with(Shape::ground(2.0), 0);
        let hit = world
            .raycast(Vec3::new(1.0, 10.0, -3.0), Vec3::NEG_Y, 20.0, LayerMask::ALL)
            .expect("ground hit");
        assert!((hit.point - Vec3::new(1.0, 2.0, -3.0)).length() < EPS);
        assert!((hit.distance - 8.0).abs() < EPS);
        assert_eq!(hit.normal, Vec3::Y);

        assert!(world
            .raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, 20.0, LayerMask::ALL)
            .is_none());
        assert!(world
            .raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 5.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn mask_filters_colliders() {
        let world = PrimitiveWorld::new()
            .with(Shape::ground(0.0), 0)
            .with(Shape::cuboid(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE), 3);
        let top = Vec3::new(0.0, 10.0, 0.0);

        let hit = world
            .raycast(top, Vec3::NEG_Y, 20.0, LayerMask::ALL)
            .expect("box hit");
        assert_eq!(hit.layer, 3);
        assert!((hit.point.y - 2.0).abs() < EPS);

        let hit = world
            .raycast(top, Vec3::NEG_Y, 20.0, LayerMask::layer(0))
            .expect("ground hit");
        assert_eq!(hit.layer, 0);
        assert!(hit.point.y.abs() < EPS);
    }

    #[test]
    fn cuboid_reports_face_normals() {
        let world = PrimitiveWorld::new().with(Shape::cuboid(Vec3::ZERO, Vec3::splat(1.0)), 0);
        let hit = world
            .raycast(Vec3::new(-5.0, 0.2, 0.1), Vec3::X, 10.0, LayerMask::ALL)
            .expect("side hit");
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert!((hit.point.x + 1.0).abs() < EPS);

        // Rays starting inside report nothing.
        assert!(world
            .raycast(Vec3::ZERO, Vec3::Y, 10.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn ball_hit_and_overlap() {
        let world = PrimitiveWorld::new().with(Shape::ball(Vec3::new(0.0, 0.0, 0.0), 2.0), 1);
        let hit = world
            .raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 20.0, LayerMask::ALL)
            .expect("ball hit");
        assert!((hit.point.y - 2.0).abs() < EPS);
        assert!((hit.normal - Vec3::Y).length() < EPS);

        assert!(world.overlap_sphere(Vec3::new(3.0, 0.0, 0.0), 1.5, LayerMask::ALL));
        assert!(!world.overlap_sphere(Vec3::new(4.0, 0.0, 0.0), 1.5, LayerMask::ALL));
        assert!(!world.overlap_sphere(Vec3::new(3.0, 0.0, 0.0), 1.5, LayerMask::layer(0)));
    }

    #[test]
    fn sphere_cast_contacts_earlier_than_ray() {
        let world = PrimitiveWorld::new().with(Shape::ground(0.0), 0);
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let hit = world
            .sphere_cast(origin, 1.0, Vec3::NEG_Y, 20.0, LayerMask::ALL)
            .expect("sphere hit");
        assert!((hit.distance - 9.0).abs() < EPS);
        assert!(hit.point.y.abs() < EPS);
    }

    #[test]
    fn closest_hit_wins() {
        let world = PrimitiveWorld::new()
            .with(Shape::ground(0.0), 0)
            .with(Shape::ground(5.0), 1);
        let hit = world
            .raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 20.0, LayerMask::ALL)
            .expect("hit");
        assert_eq!(hit.layer, 1);
    }

    #[test]
    fn tilted_plane_normal_is_normalized() {
        let world = PrimitiveWorld::new().with(Shape::plane(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)), 0);
        let hit = world
            .raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 20.0, LayerMask::ALL)
            .expect("hit");
        assert!((hit.normal.length() - 1.0).abs() < EPS);
        assert!(hit.point.y.abs() < EPS);
    }
}
