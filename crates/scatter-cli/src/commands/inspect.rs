//! `scatter inspect`: sampling summary for an image

use anyhow::Result;
use clap::Args;
use scatter_engine::{sample, RasterSource, Sampling, SimConfig, Viewport};
use std::path::PathBuf;

use crate::utils::{load_config, load_image, parse_viewport};

#[derive(Args)]
pub struct InspectArgs {
    /// Image to inspect
    pub image: PathBuf,

    /// Viewport to lay the image out on
    #[arg(long, default_value = "1000x800", value_parser = parse_viewport)]
    pub viewport: Viewport,

    /// Simulation config (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let (bytes, image) = load_image(&args.image)?;
    let sampling = sample(&image, args.viewport, &config);

    println!("Image: {}", args.image.display());
    println!("===================");
    let (width, height) = image.dimensions();
    println!("Encoded Size: {} bytes", bytes.len());
    println!("Dimensions: {width}x{height}");
    println!("Viewport: {}x{}", args.viewport.width, args.viewport.height);
    for line in summary(&sampling, &config) {
        println!("{line}");
    }
    Ok(())
}

fn summary(sampling: &Sampling, config: &SimConfig) -> Vec<String> {
    let Some(layout) = sampling.layout else {
        return vec!["Layout: nothing drawable on this viewport".to_string()];
    };

    let mut lines = vec![
        format!("Draw Size: {}x{}", layout.draw_width, layout.draw_height),
        format!("Draw Origin: ({}, {})", layout.start_x, layout.start_y),
        format!("Particles: {}", sampling.seeds.len()),
    ];
    let total = layout.draw_width as u64 * layout.draw_height as u64;
    if total > 0 {
        let kept = sampling.seeds.len() as f64 / total as f64 * 100.0;
        lines.push(format!(
            "Coverage: {kept:.1}% (alpha > {}, any channel > {})",
            config.alpha_threshold, config.color_floor
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use scatter_engine::DecodedImage;
    use image::{Rgba, RgbaImage};

    #[test]
    fn summary_reports_layout_and_count() {
        let image = DecodedImage::from_rgba(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])));
        let config = SimConfig::default();
        let sampling = sample(&image, Viewport::new(1000, 800), &config);
        let lines = summary(&sampling, &config);
        assert_eq!(lines[0], "Draw Size: 700x700");
        assert_eq!(lines[1], "Draw Origin: (150, 50)");
        assert_eq!(lines[2], "Particles: 490000");
        assert!(lines[3].starts_with("Coverage: 100.0%"));
    }

    #[test]
    fn summary_without_layout() {
        let image = DecodedImage::from_rgba(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let config = SimConfig::default();
        let sampling = sample(&image, Viewport::new(30, 30), &config);
        assert_eq!(summary(&sampling, &config).len(), 1);
    }

    #[test]
    fn execute_reads_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = crate::commands::testing::solid_png(dir.path(), 4, [0, 0, 255, 255]);
        execute(InspectArgs {
            image: path,
            viewport: Viewport::new(200, 100),
            config: None,
        })
        .unwrap();
    }
}
