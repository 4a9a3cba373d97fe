//! Command implementations

pub mod export;
pub mod inspect;
pub mod render;

#[cfg(test)]
pub(crate) mod testing {
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::path::{Path, PathBuf};

    /// Write a solid square PNG and return its path.
    pub fn solid_png(dir: &Path, side: u32, color: [u8; 4]) -> PathBuf {
        let path = dir.join("input.png");
        RgbaImage::from_pixel(side, side, Rgba(color))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }
}
