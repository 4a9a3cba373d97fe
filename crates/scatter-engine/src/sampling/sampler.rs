//! Image sampling: where the image is drawn on the canvas and which of its
//! pixels become particles.

use glam::Vec2;

use crate::api::config::SimConfig;
use crate::sampling::raster::{RasterSource, RgbaRaster};

/// Canvas size in device units. The canvas always fills the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Where and how large the image is drawn for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawLayout {
    pub draw_width: u32,
    pub draw_height: u32,
    /// Canvas offset of the image's top-left pixel. Negative when the image
    /// is taller than the viewport.
    pub start_x: f32,
    pub start_y: f32,
}

impl DrawLayout {
    /// Fixed draw width, narrowed on small viewports, height from the aspect ratio.
    /// `None` when either draw dimension would be zero.
    pub fn compute(config: &SimConfig, image: (u32, u32), viewport: Viewport) -> Option<Self> {
        let (image_w, image_h) = image;
        if image_w == 0 || image_h == 0 {
            return None;
        }

        let draw_width = if viewport.width < config.narrow_viewport_width {
            viewport.width.saturating_sub(config.narrow_viewport_margin)
        } else {
            config.max_draw_width
        };
        let aspect = image_w as f64 / image_h as f64;
        let draw_height = (draw_width as f64 / aspect).floor() as u32;
        if draw_width == 0 || draw_height == 0 {
            return None;
        }

        Some(Self {
            draw_width,
            draw_height,
            start_x: (viewport.width as f32 - draw_width as f32) / 2.0,
            start_y: (viewport.height as f32 - draw_height as f32) / 2.0,
        })
    }
}

/// A pixel that survived the threshold: home position plus color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub origin: Vec2,
    pub color: [u8; 3],
}

/// Whether a pixel is opaque enough and not near-black.
pub fn keeps_pixel(px: [u8; 4], config: &SimConfig) -> bool {
    let [r, g, b, a] = px;
    a > config.alpha_threshold
        && (r > config.color_floor || g > config.color_floor || b > config.color_floor)
}

/// Scan a raster drawn at `layout` size, stride 1, row-major.
pub fn collect_seeds(raster: &RgbaRaster, layout: &DrawLayout, config: &SimConfig) -> Vec<Seed> {
    let width = raster.width() as usize;
    raster
        .pixels()
        .enumerate()
        .filter(|(_, px)| keeps_pixel(*px, config))
        .map(|(i, [r, g, b, _])| {
            let x = (i % width) as f32;
            let y = (i / width) as f32;
            Seed {
                origin: Vec2::new(layout.start_x + x, layout.start_y + y),
                color: [r, g, b],
            }
        })
        .collect()
}

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Default)]
pub struct Sampling {
    pub layout: Option<DrawLayout>,
    pub seeds: Vec<Seed>,
}

/// Rasterize `source` for `viewport` and collect its seeds.
///
/// Degenerate layouts and unavailable rasters produce no seeds.
pub fn sample<S: RasterSource + ?Sized>(source: &S, viewport: Viewport, config: &SimConfig) -> Sampling {
    let Some(layout) = DrawLayout::compute(config, source.dimensions(), viewport) else {
        log::debug!("no drawable layout for viewport {}x{}", viewport.width, viewport.height);
        return Sampling::default();
    };

    let Some(raster) = source.rasterize(layout.draw_width, layout.draw_height) else {
        log::warn!(
            "off-screen raster {}x{} unavailable, sampling nothing",
            layout.draw_width,
            layout.draw_height
        );
        return Sampling {
            layout: Some(layout),
            seeds: Vec::new(),
        };
    };

    Sampling {
        layout: Some(layout),
        seeds: collect_seeds(&raster, &layout, config),
    }
}
