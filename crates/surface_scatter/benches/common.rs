use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec3;
use surface_scatter::prelude::{LayerMask, PrimitiveWorld, ScatterConfig, Shape};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const GROUND: u8 = 0;
pub const OBSTACLE: u8 = 1;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Flat ground with a regular field of boulders on the obstacle layer.
#[allow(dead_code)]
pub fn boulder_field(extent: f32, spacing: f32) -> PrimitiveWorld {
    let mut world = PrimitiveWorld::new().with(Shape::ground(0.0), GROUND);
    let half = extent * 0.5;
    let mut x = -half + spacing * 0.5;
    while x < half {
        let mut z = -half + spacing * 0.5;
        while z < half {
            world.push(Shape::ball(Vec3::new(x, 0.5, z), 1.0), OBSTACLE);
            z += spacing;
        }
        x += spacing;
    }
    world
}

#[allow(dead_code)]
pub fn field_config(extent: f32, population: usize) -> ScatterConfig {
    ScatterConfig::new(Vec3::new(extent, 10.0, extent), population)
        .with_variants(["rock", "bush", "stump"])
        .with_surface_mask(LayerMask::layer(GROUND))
        .with_obstacle_mask(LayerMask::layer(OBSTACLE))
        .with_avoidance_radius(1.5)
        .with_min_distance(2.0)
}
