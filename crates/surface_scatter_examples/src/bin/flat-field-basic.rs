use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_scene_to_png, RenderConfig, VariantStyle};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Flat ground on layer 0, nothing to avoid.
    let world = PrimitiveWorld::new().with(Shape::ground(0.0), 0);

    let config = ScatterConfig::new(Vec3::new(100.0, 10.0, 100.0), 50)
        .with_variants(["pine", "birch"])
        .with_surface_mask(LayerMask::layer(0))
        .with_min_distance(5.0);

    let mut scatterer = Scatterer::new(config, StdRng::seed_from_u64(42));
    let mut placements: Vec<Placement> = Vec::new();
    let summary = scatterer.run_to_completion(&world, &mut placements, &mut ())?;
    println!(
        "placed {}/{} in {} attempts ({} steps) | rejections: {}",
        summary.placed,
        summary.population,
        summary.attempts,
        summary.steps,
        scatterer.statistics()
    );

    let mut rc = RenderConfig::new((800, 800), Vec2::new(100.0, 100.0));
    rc.set_variant_style(
        "pine",
        VariantStyle {
            color: [30, 90, 50],
            radius: 10,
        },
    );
    rc.set_variant_style(
        "birch",
        VariantStyle {
            color: [150, 170, 60],
            radius: 8,
        },
    );
    render_scene_to_png(&world, &placements, &[], &rc, "flat-field-basic.png")?;

    Ok(())
}
