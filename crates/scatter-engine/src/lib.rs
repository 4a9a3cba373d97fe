pub mod api;
pub mod core;
pub mod input;
pub mod sampling;
pub mod renderer;
pub mod session;
pub mod export;

// Re-export key types at crate root for convenience
pub use api::config::{SimConfig, UniformRange, POINTER_ABSENT_DISTANCE};
pub use api::error::{Error, Result};
pub use core::field::ParticleField;
pub use core::particle::Particle;
pub use core::rng::Rng;
pub use input::pointer::{PointerEvent, PointerState, PointerTracker};
pub use sampling::raster::{raster_fits, DecodedImage, RasterSource, RgbaRaster, MAX_RASTER_PIXELS};
pub use sampling::sampler::{collect_seeds, keeps_pixel, sample, DrawLayout, Sampling, Seed, Viewport};
pub use renderer::{InstanceBuffer, ParticleInstance, PixelSurface, Surface};
pub use session::frame_loop::{FrameLoop, LoopState};
pub use session::simulation::Session;
pub use export::{export_artifact, extract_config, extract_payload, ExportOptions, ReplayRuntime};
