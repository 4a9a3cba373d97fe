use crate::api::config::SimConfig;
use crate::core::field::ParticleField;
use crate::core::particle::Particle;
use crate::core::rng::Rng;
use crate::input::pointer::{PointerEvent, PointerState, PointerTracker};
use crate::renderer::surface::Surface;
use crate::sampling::raster::RasterSource;
use crate::sampling::sampler::{sample, DrawLayout, Viewport};
use crate::session::frame_loop::{FrameLoop, LoopState};

/// One simulated image: its particle set, pointer state and frame loop.
///
/// Hosts own the clock and the drawing surface; the session owns everything
/// that must behave identically across hosts.
pub struct Session {
    config: SimConfig,
    rng: Rng,
    pointer: PointerTracker,
    field: ParticleField,
    frame_loop: FrameLoop,
    viewport: Viewport,
    layout: Option<DrawLayout>,
}

impl Session {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let pointer = PointerTracker::new(config.pointer_radius);
        Self {
            config,
            rng: Rng::new(seed),
            pointer,
            field: ParticleField::new(),
            frame_loop: FrameLoop::new(),
            viewport: Viewport::new(0, 0),
            layout: None,
        }
    }

    /// Rebuild the particle set for `viewport`. Returns the new particle count.
    ///
    /// The replacement set is fully built before it is swapped in. A source
    /// that cannot be rasterized leaves the session with no particles. A torn
    /// down session is left untouched and reports 0.
    pub fn resample<S: RasterSource + ?Sized>(&mut self, source: &S, viewport: Viewport) -> usize {
        if self.frame_loop.state() == LoopState::Cancelled {
            log::debug!("resample ignored after teardown");
            return 0;
        }
        let sampling = sample(source, viewport, &self.config);
        let canvas = viewport.size();
        let particles: Vec<Particle> = sampling
            .seeds
            .iter()
            .map(|seed| Particle::spawn(seed, canvas, &self.config, &mut self.rng))
            .collect();

        let count = particles.len();
        let generation = self.field.replace(particles);
        self.viewport = viewport;
        self.layout = sampling.layout;

        match sampling.layout {
            Some(layout) => log::info!(
                "resample #{generation}: {}x{} at ({}, {}) on {}x{}, {count} particles",
                layout.draw_width,
                layout.draw_height,
                layout.start_x,
                layout.start_y,
                viewport.width,
                viewport.height,
            ),
            None => log::info!("resample #{generation}: nothing drawable on {}x{}", viewport.width, viewport.height),
        }
        count
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.pointer.apply(event);
    }

    /// Begin producing frames. False once torn down.
    pub fn start(&mut self) -> bool {
        let started = self.frame_loop.start();
        if started {
            log::debug!("frame loop running with {} particles", self.field.len());
        }
        started
    }

    /// Run one frame: clear, then draw and step each particle in order.
    /// Returns whether the host should schedule another frame.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.frame_loop.begin_frame() {
            return false;
        }

        surface.clear();
        let pointer = self.pointer.state();
        let config = &self.config;
        for particle in self.field.iter_mut() {
            surface.draw_particle(particle);
            particle.step(&pointer, config);
        }

        self.frame_loop.should_reschedule()
    }

    /// Stop the loop for good and release the particle set.
    pub fn teardown(&mut self) {
        if self.frame_loop.state() != LoopState::Cancelled {
            log::info!("session torn down after {} frames", self.frame_loop.frames());
        }
        self.frame_loop.cancel();
        self.field.clear();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.as_slice()
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }

    pub fn generation(&self) -> u64 {
        self.field.generation()
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> Option<DrawLayout> {
        self.layout
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }
}
