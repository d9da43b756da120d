use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_scene_to_png, RenderConfig, VariantStyle};

const GROUND: LayerIndex = 0;
const BOULDERS: LayerIndex = 1;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Ground with a ring of boulders around the center.
    let mut world = PrimitiveWorld::new().with(Shape::ground(0.0), GROUND);
    for i in 0..12 {
        let angle = i as f32 / 12.0 * std::f32::consts::TAU;
        let center = Vec3::new(angle.cos() * 35.0, 1.0, angle.sin() * 35.0);
        world.push(Shape::ball(center, 3.0), BOULDERS);
    }

    let config = ScatterConfig::new(Vec3::new(120.0, 20.0, 120.0), 90)
        .with_variants(["fern", "mushroom", "moss"])
        .with_surface_mask(LayerMask::layer(GROUND))
        .with_obstacle_mask(LayerMask::layer(BOULDERS))
        .with_avoidance_radius(1.5)
        .with_min_distance(1.5)
        .with_max_attempts_per_point(20)
        .with_clustering(ClusterSettings {
            count: 8,
            radius: FloatRange::new(4.0, 9.0),
            objects_per_cluster: CountRange::new(8, 14),
            min_distance: 25.0,
        });

    let mut sink = VecSink::only([
        ScatterEventKind::ClustersPlanned,
        ScatterEventKind::PlacementRejected,
        ScatterEventKind::Warning,
    ]);
    let mut placements: Vec<Placement> = Vec::new();
    let mut scatterer = Scatterer::new(config, StdRng::seed_from_u64(7));
    let summary = scatterer.run_to_completion(&world, &mut placements, &mut sink)?;

    let mut rejections = Vec::new();
    for event in sink.into_inner() {
        match event {
            ScatterEvent::ClustersPlanned { requested, centers } => {
                println!("planned {}/{} clusters", centers.len(), requested);
            }
            ScatterEvent::PlacementRejected { rejection } => rejections.push(rejection),
            ScatterEvent::Warning { context, message } => println!("[{context}] {message}"),
            _ => {}
        }
    }
    println!(
        "placed {}/{} | rejections: {}",
        summary.placed,
        summary.population,
        scatterer.statistics()
    );
    if let Some(plan) = scatterer.clusters() {
        for (i, anchor) in plan.anchors().iter().enumerate() {
            println!("  cluster {i}: {}/{}", anchor.placed, anchor.target);
        }
    }

    let mut rc = RenderConfig::new((900, 900), Vec2::new(120.0, 120.0))
        .with_obstacles(LayerMask::layer(BOULDERS))
        .with_rejections(true);
    rc.set_variant_style("fern", VariantStyle { color: [40, 120, 60], radius: 5 });
    rc.set_variant_style("mushroom", VariantStyle { color: [190, 60, 40], radius: 4 });
    rc.set_variant_style("moss", VariantStyle { color: [110, 150, 70], radius: 3 });
    render_scene_to_png(&world, &placements, &rejections, &rc, "clustered-boulders.png")?;

    Ok(())
}
