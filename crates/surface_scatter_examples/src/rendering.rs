use std::collections::HashMap;
use std::path::Path;

use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use surface_scatter::prelude::{
    LayerMask, Placement, PrimitiveWorld, Rejection, RejectionReason, Shape,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How placements of one variant are drawn.
#[derive(Debug, Clone, Copy)]
pub struct VariantStyle {
    pub color: [u8; 3],
    /// Disk radius in pixels at scale 1.
    pub radius: i32,
}

impl Default for VariantStyle {
    fn default() -> Self {
        Self {
            color: [40, 40, 40],
            radius: 4,
        }
    }
}

/// Top-down (XZ) rendering settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World XZ position at the image center.
    pub center: Vec2,
    /// World XZ extent covered by the image.
    pub extent: Vec2,
    pub background: [u8; 3],
    pub obstacle_color: [u8; 3],
    /// Layers whose colliders are drawn underneath the placements.
    pub obstacle_mask: LayerMask,
    pub show_rejections: bool,
    variant_styles: HashMap<String, VariantStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), extent: Vec2) -> Self {
        Self {
            image_size,
            center: Vec2::ZERO,
            extent,
            background: [236, 232, 220],
            obstacle_color: [120, 110, 100],
            obstacle_mask: LayerMask::NONE,
            show_rejections: false,
            variant_styles: HashMap::new(),
        }
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_obstacles(mut self, mask: LayerMask) -> Self {
        self.obstacle_mask = mask;
        self
    }

    pub fn with_rejections(mut self, show: bool) -> Self {
        self.show_rejections = show;
        self
    }

    pub fn set_variant_style(&mut self, variant: impl Into<String>, style: VariantStyle) {
        self.variant_styles.insert(variant.into(), style);
    }

    fn style_for(&self, variant: &str) -> VariantStyle {
        self.variant_styles.get(variant).copied().unwrap_or_default()
    }

    fn pixels_per_unit(&self) -> f32 {
        self.image_size.0 as f32 / self.extent.x.max(f32::EPSILON)
    }

    fn to_pixel(&self, p: Vec3) -> (i32, i32) {
        let u = (p.x - self.center.x) / self.extent.x + 0.5;
        let v = (p.z - self.center.y) / self.extent.y + 0.5;
        (
            (u * self.image_size.0 as f32).round() as i32,
            (v * self.image_size.1 as f32).round() as i32,
        )
    }
}

fn reason_color(reason: RejectionReason) -> [u8; 3] {
    match reason {
        RejectionReason::NoHit => [160, 160, 160],
        RejectionReason::CeilingCheck => [150, 60, 200],
        RejectionReason::EdgeCheck => [230, 140, 20],
        RejectionReason::FloorCheck => [90, 60, 30],
        RejectionReason::NearObstacle => [220, 40, 40],
        RejectionReason::InvalidLayer => [200, 0, 120],
        RejectionReason::OutOfBounds => [0, 0, 0],
        RejectionReason::TooCloseToOther => [40, 120, 220],
        RejectionReason::ClusterFailed => [255, 255, 0],
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn draw_disk(img: &mut RgbImage, (cx, cy): (i32, i32), radius: i32, color: [u8; 3]) {
    let r = radius.max(1);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn fill_rect(img: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: [u8; 3]) {
    for y in y0.min(y1)..=y0.max(y1) {
        for x in x0.min(x1)..=x0.max(x1) {
            put(img, x, y, color);
        }
    }
}

/// Renders placements (and optionally obstacles and rejections) top-down into a PNG.
pub fn render_scene_to_png(
    world: &PrimitiveWorld,
    placements: &[Placement],
    rejections: &[Rejection],
    rc: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));
    let ppu = rc.pixels_per_unit();

    for collider in world
        .colliders()
        .iter()
        .filter(|c| rc.obstacle_mask.contains(c.layer))
    {
        match collider.shape {
            Shape::Ball { center, radius } => {
                let px = (radius * ppu).round() as i32;
                draw_disk(&mut img, rc.to_pixel(center), px, rc.obstacle_color);
            }
            Shape::Cuboid { min, max } => {
                fill_rect(&mut img, rc.to_pixel(min), rc.to_pixel(max), rc.obstacle_color);
            }
            Shape::HalfSpace { .. } => {}
        }
    }

    if rc.show_rejections {
        for r in rejections {
            draw_disk(&mut img, rc.to_pixel(r.position), 1, reason_color(r.reason));
        }
    }

    for p in placements {
        let style = rc.style_for(&p.variant_id);
        let radius = (style.radius as f32 * p.scale).round() as i32;
        draw_disk(&mut img, rc.to_pixel(p.position), radius, style.color);
    }

    let out_path = out_path.as_ref();
    img.save(out_path)?;
    info!("Wrote {} ({} placements).", out_path.display(), placements.len());
    Ok(())
}
