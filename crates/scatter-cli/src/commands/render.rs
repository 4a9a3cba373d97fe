//! `scatter render`: headless simulation to a PNG snapshot

use anyhow::{Context, Result};
use clap::Args;
use image::{ImageFormat, RgbaImage};
use scatter_engine::{PixelSurface, PointerEvent, Session, Viewport};
use std::path::PathBuf;

use crate::utils::{load_config, load_image, parse_pointer, parse_viewport};

#[derive(Args)]
pub struct RenderArgs {
    /// Image to render
    pub image: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub out: PathBuf,

    /// Number of frames to simulate
    #[arg(long, default_value = "120")]
    pub frames: u32,

    /// Canvas size
    #[arg(long, default_value = "1000x800", value_parser = parse_viewport)]
    pub viewport: Viewport,

    /// Hold the pointer at X,Y for the whole run
    #[arg(long, value_parser = parse_pointer)]
    pub pointer: Option<(f32, f32)>,

    /// Seed for particle spawn positions and per-particle constants
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Simulation config (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let (_, image) = load_image(&args.image)?;

    let mut session = Session::new(config, args.seed);
    let count = session.resample(&image, args.viewport);
    if let Some((x, y)) = args.pointer {
        session.handle_pointer(PointerEvent::Move { x, y });
    }

    let mut surface = PixelSurface::new(args.viewport.width, args.viewport.height);
    let rendered = run_frames(&mut session, &mut surface, args.frames);

    let snapshot = RgbaImage::from_raw(surface.width(), surface.height(), surface.as_bytes().to_vec())
        .context("Surface size does not match its buffer")?;
    snapshot
        .save_with_format(&args.out, ImageFormat::Png)
        .with_context(|| format!("Failed to write PNG: {}", args.out.display()))?;

    println!(
        "Rendered {rendered} frames of {count} particles to {}",
        args.out.display()
    );
    if count > 0 {
        println!("Mean distance to origin: {:.2}", mean_distance(&session));
    }
    Ok(())
}

/// Run up to `frames` frames. Returns how many actually ran.
fn run_frames(session: &mut Session, surface: &mut PixelSurface, frames: u32) -> u32 {
    if frames == 0 || !session.start() {
        return 0;
    }
    let mut rendered = 0;
    while rendered < frames {
        let again = session.frame(surface);
        rendered += 1;
        if !again {
            break;
        }
    }
    rendered
}

fn mean_distance(session: &Session) -> f32 {
    let particles = session.particles();
    if particles.is_empty() {
        return 0.0;
    }
    particles.iter().map(|p| p.distance_to_origin()).sum::<f32>() / particles.len() as f32
}
