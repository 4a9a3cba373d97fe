//! Drawing surfaces the frame loop paints particles onto.

use crate::core::particle::Particle;

/// A 2D target that can be cleared and filled with translucent squares.
pub trait Surface {
    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Fill the axis-aligned square with top-left (x, y) and side `size`.
    /// `alpha` above 1.0 draws as fully opaque.
    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: [u8; 3], alpha: f32);

    /// Draw one particle at its current position.
    fn draw_particle(&mut self, particle: &Particle) {
        let pos = particle.position();
        self.fill_square(pos.x, pos.y, particle.size(), particle.color(), particle.alpha());
    }
}

/// Software RGBA8 framebuffer (straight alpha, row-major).
///
/// Squares are rasterized with exact area coverage per pixel and composited
/// source-over, which is what a 2D canvas does for `fillRect`.
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0; 4]; width as usize * height as usize];
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Raw bytes, ready for `ImageData` or a PNG encoder.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn blend(&mut self, index: usize, color: [u8; 3], coverage: f32) {
        let dst = &mut self.pixels[index];
        let sa = coverage;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            *dst = [0; 4];
            return;
        }
        for c in 0..3 {
            let mixed = (color[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            dst[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Overlap of [start, end) with the unit cell [cell, cell + 1).
fn overlap(start: f32, end: f32, cell: f32) -> f32 {
    (end.min(cell + 1.0) - start.max(cell)).max(0.0)
}

impl Surface for PixelSurface {
    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: [u8; 3], alpha: f32) {
        let opacity = alpha.clamp(0.0, 1.0);
        if opacity <= 0.0 || size <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let (x1, y1) = (x + size, y + size);
        let col_start = x.floor().max(0.0) as u32;
        let col_end = (x1.ceil().max(0.0) as u32).min(self.width);
        let row_start = y.floor().max(0.0) as u32;
        let row_end = (y1.ceil().max(0.0) as u32).min(self.height);

        for row in row_start..row_end {
            let cover_y = overlap(y, y1, row as f32);
            if cover_y <= 0.0 {
                continue;
            }
            for col in col_start..col_end {
                let coverage = overlap(x, x1, col as f32) * cover_y * opacity;
                if coverage > 0.0 {
                    self.blend((row * self.width + col) as usize, color, coverage);
                }
            }
        }
    }
}
