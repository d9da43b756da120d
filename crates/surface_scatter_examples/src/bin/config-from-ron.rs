use std::path::PathBuf;

use anyhow::Context;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_scene_to_png, RenderConfig};

/// Steps the host loop gives the generator before giving up and cancelling.
const STEP_BUDGET: usize = 64;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/meadow.ron"));
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: ScatterConfig =
        ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;

    let world = PrimitiveWorld::new()
        .with(Shape::ground(0.0), 0)
        .with(Shape::cuboid(Vec3::new(10.0, 0.0, 0.0), Vec3::new(6.0, 2.0, 6.0)), 2);
    // The volume is centered on the rock slab, away from the world origin.
    let frame = Frame::from_translation(Vec3::new(10.0, 0.0, 0.0));

    let extent = Vec2::new(config.dimensions.x, config.dimensions.z);
    let mut scatterer = Scatterer::new(config, StdRng::seed_from_u64(99)).with_frame(frame);
    let mut placed: Vec<Placement> = Vec::new();
    let mut sink = FnSink::new(|event: ScatterEvent| match event {
        ScatterEvent::StepFinished {
            step,
            accepted,
            attempts,
        } => println!("step {step}: +{accepted} ({attempts} attempts)"),
        ScatterEvent::RunCompleted { summary, .. } => {
            println!("completed: {}/{}", summary.placed, summary.population)
        }
        ScatterEvent::RunCancelled { discarded } => println!("cancelled, dropped {discarded}"),
        _ => {}
    });

    // Host-driven loop: one step per "frame".
    scatterer.start()?;
    let mut frames = 0;
    while scatterer.is_running() {
        if frames == STEP_BUDGET {
            scatterer.cancel(&mut sink);
            break;
        }
        scatterer.step(&world, &mut placed, &mut sink)?;
        frames += 1;
    }

    if scatterer.state() == GenerationState::Completed {
        let rc = RenderConfig::new((800, 800), extent)
            .with_center(Vec2::new(10.0, 0.0))
            .with_obstacles(LayerMask::layer(2));
        render_scene_to_png(&world, &placed, &[], &rc, "config-from-ron.png")?;
    }

    Ok(())
}
