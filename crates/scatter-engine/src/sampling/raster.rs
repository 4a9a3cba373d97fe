//! Image sources the sampler can rasterize at an arbitrary size.

use image::imageops::FilterType;
use image::RgbaImage;

use crate::api::error::Result;

/// Largest off-screen raster, in pixels, a source will produce (4096 x 4096,
/// the smallest canvas area limit among major browsers).
pub const MAX_RASTER_PIXELS: u64 = 16_777_216;

/// Whether a `width` x `height` raster fits the off-screen budget.
pub fn raster_fits(width: u32, height: u32) -> bool {
    width != 0 && height != 0 && width as u64 * height as u64 <= MAX_RASTER_PIXELS
}

/// Tightly packed RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaRaster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaRaster {
    /// Wrap a pixel buffer. Returns `None` if its length does not match the size.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixels in scan order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Something that can be drawn into an off-screen buffer of a requested size.
///
/// `rasterize` returns `None` when no off-screen buffer could be acquired; the
/// sampler treats that as an empty particle set.
pub trait RasterSource {
    /// Natural size of the source image in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Draw the whole image scaled to exactly `width` × `height` and read it back.
    fn rasterize(&self, width: u32, height: u32) -> Option<RgbaRaster>;
}

/// A decoded image held in memory, scaled with a triangle filter.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: RgbaImage,
}

impl DecodedImage {
    /// Decode any format the `image` crate recognizes from its bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self { image })
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }
}

impl RasterSource for DecodedImage {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn rasterize(&self, width: u32, height: u32) -> Option<RgbaRaster> {
        if !raster_fits(width, height) || self.image.width() == 0 || self.image.height() == 0 {
            return None;
        }
        let scaled = if self.image.dimensions() == (width, height) {
            self.image.clone()
        } else {
            image::imageops::resize(&self.image, width, height, FilterType::Triangle)
        };
        RgbaRaster::new(width, height, scaled.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn raster_rejects_mismatched_buffer() {
        assert!(RgbaRaster::new(2, 2, vec![0; 15]).is_none());
        assert!(RgbaRaster::new(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn pixels_iterate_in_scan_order() {
        let raster = RgbaRaster::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let px: Vec<_> = raster.pixels().collect();
        assert_eq!(px, vec![[1, 2, 3, 4], [5, 6, 7, 8]]);
    }

    #[test]
    fn decoded_image_scales_uniform_color() {
        let source = DecodedImage::from_rgba(RgbaImage::from_pixel(10, 10, Rgba([0, 200, 0, 255])));
        let raster = source.rasterize(35, 35).unwrap();
        assert_eq!(raster.width(), 35);
        assert!(raster.pixels().all(|[r, g, b, a]| r == 0 && g >= 199 && b == 0 && a >= 254));
    }

    #[test]
    fn decoded_image_refuses_zero_size() {
        let source = DecodedImage::from_rgba(RgbaImage::new(4, 4));
        assert!(source.rasterize(0, 4).is_none());
    }

    #[test]
    fn raster_length_overflow_is_rejected() {
        assert!(RgbaRaster::new(u32::MAX, u32::MAX, Vec::new()).is_none());
    }

    #[test]
    fn oversized_raster_is_unavailable() {
        let source = DecodedImage::from_rgba(RgbaImage::from_pixel(1, 20, Rgba([255, 0, 0, 255])));
        assert!(source.rasterize(700, 14_000_000).is_none());
    }

    #[test]
    fn raster_budget_edges() {
        assert!(raster_fits(4096, 4096));
        assert!(!raster_fits(4096, 4097));
        assert!(!raster_fits(700, 14_000_000));
        assert!(!raster_fits(0, 10));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(DecodedImage::decode(b"definitely not an image").is_err());
    }
}
