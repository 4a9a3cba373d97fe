use bytemuck::{Pod, Zeroable};

use super::surface::Surface;

/// One recorded `fill_square` call. 8 floats = 32 bytes stride, laid out for
/// upload as a GPU instance buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Top-left X in canvas space.
    pub x: f32,
    /// Top-left Y in canvas space.
    pub y: f32,
    /// Side of the square.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity, clamped to [0, 1].
    pub alpha: f32,
    _pad: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// A [`Surface`] that records draw calls instead of rasterizing them.
///
/// No bundled host presents through it: the browser and CLI hosts paint a
/// [`PixelSurface`](super::surface::PixelSurface). It is the recording surface
/// for inspecting exactly what a frame drew (one record per particle, in draw
/// order), and the hand-off format for a host that renders instances on the GPU.
pub struct InstanceBuffer {
    instances: Vec<ParticleInstance>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Flat float view for zero-copy hand-off.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for InstanceBuffer {
    fn clear(&mut self) {
        self.instances.clear();
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: [u8; 3], alpha: f32) {
        self.instances.push(ParticleInstance {
            x,
            y,
            size,
            r: color[0] as f32 / 255.0,
            g: color[1] as f32 / 255.0,
            b: color[2] as f32 / 255.0,
            alpha: alpha.clamp(0.0, 1.0),
            _pad: 0.0,
        });
    }
}
