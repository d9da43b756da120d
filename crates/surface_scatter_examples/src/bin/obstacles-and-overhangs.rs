use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_scene_to_png, RenderConfig, VariantStyle};

const GROUND: LayerIndex = 0;
const ROCK: LayerIndex = 1;

/// Terrain with a raised plateau, a ramp, an overhanging slab and a few pillars.
fn build_world() -> PrimitiveWorld {
    let ramp_normal = Quat::from_rotation_z(20f32.to_radians()) * Vec3::Y;
    PrimitiveWorld::new()
        .with(Shape::ground(0.0), GROUND)
        .with(
            Shape::cuboid(Vec3::new(-25.0, 1.0, 0.0), Vec3::new(12.0, 3.0, 30.0)),
            GROUND,
        )
        .with(Shape::plane(Vec3::new(30.0, 0.0, 0.0), ramp_normal), GROUND)
        .with(
            Shape::cuboid(Vec3::new(5.0, 6.0, -20.0), Vec3::new(10.0, 0.5, 8.0)),
            ROCK,
        )
        .with(Shape::ball(Vec3::new(0.0, 0.0, 20.0), 4.0), ROCK)
        .with(Shape::ball(Vec3::new(12.0, 0.0, 10.0), 2.5), ROCK)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let world = build_world();

    let config = ScatterConfig::new(Vec3::new(100.0, 20.0, 100.0), 200)
        .with_variants(["grass", "flower"])
        .with_surface_mask(LayerMask::layer(GROUND))
        .with_obstacle_mask(LayerMask::layer(ROCK))
        .with_avoidance_radius(1.0)
        .with_check_ceiling(true)
        .with_floor_check_distance(0.5)
        .with_min_distance(2.0)
        .with_stability(StabilitySettings {
            radius: 1.0,
            ray_count: 8,
            max_height_difference: 0.15,
            min_success_percent: 75.0,
        })
        .with_ray(RaySettings {
            angle_degrees: FloatRange::new(0.0, 10.0),
            ..Default::default()
        });

    let mut sink = VecSink::only([ScatterEventKind::PlacementRejected]);
    let mut placements: Vec<Placement> = Vec::new();
    let mut scatterer = Scatterer::new(config, StdRng::seed_from_u64(1234));
    let summary = scatterer.run_to_completion(&world, &mut placements, &mut sink)?;

    println!("placed {}/{}", summary.placed, summary.population);
    for (reason, count) in scatterer.statistics().iter() {
        println!("  {reason:>20}: {count}");
    }

    let rejections: Vec<Rejection> = sink
        .into_inner()
        .into_iter()
        .filter_map(|event| match event {
            ScatterEvent::PlacementRejected { rejection } => Some(rejection),
            _ => None,
        })
        .collect();

    let mut rc = RenderConfig::new((1000, 1000), Vec2::new(100.0, 100.0))
        .with_obstacles(LayerMask::layer(ROCK))
        .with_rejections(true);
    rc.set_variant_style("grass", VariantStyle { color: [60, 140, 60], radius: 4 });
    rc.set_variant_style("flower", VariantStyle { color: [220, 120, 180], radius: 4 });
    render_scene_to_png(&world, &placements, &rejections, &rc, "obstacles-and-overhangs.png")?;

    Ok(())
}
