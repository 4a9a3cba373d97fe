pub mod surface;
pub mod instance;

pub use instance::{InstanceBuffer, ParticleInstance};
pub use surface::{PixelSurface, Surface};
