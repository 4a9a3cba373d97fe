//! A single image particle: fixed home, per-instance constants and the
//! kinematic state the integrator advances.

use glam::Vec2;

use crate::api::config::SimConfig;
use crate::core::rng::Rng;
use crate::sampling::sampler::Seed;

/// A simulated point. Everything except position, velocity and alpha is fixed
/// at construction; those three only change through `Particle::step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) alpha: f32,
    origin: Vec2,
    color: [u8; 3],
    size: f32,
    friction: f32,
    ease: f32,
    weight: f32,
    angle_offset: f32,
    noise: f32,
    fade_speed: f32,
}

impl Particle {
    /// Spawn a particle for `seed` at a random point of a `canvas` sized surface.
    pub fn spawn(seed: &Seed, canvas: Vec2, config: &SimConfig, rng: &mut Rng) -> Self {
        let position = Vec2::new(rng.next_below(canvas.x), rng.next_below(canvas.y));
        Particle {
            position,
            velocity: Vec2::ZERO,
            alpha: 0.0,
            origin: seed.origin,
            color: seed.color,
            size: config.particle_size,
            friction: config.friction,
            ease: config.ease,
            weight: config.weight.sample(rng),
            angle_offset: config.angle_offset.sample(rng),
            noise: config.noise.sample(rng),
            fade_speed: config.fade_speed.sample(rng),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Current opacity. Can overshoot 1.0 by less than one fade step.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn ease(&self) -> f32 {
        self.ease
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn angle_offset(&self) -> f32 {
        self.angle_offset
    }

    pub fn noise(&self) -> f32 {
        self.noise
    }

    pub fn fade_speed(&self) -> f32 {
        self.fade_speed
    }

    pub fn distance_to_origin(&self) -> f32 {
        self.position.distance(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Seed {
        Seed {
            origin: Vec2::new(150.0, 50.0),
            color: [255, 0, 0],
        }
    }

    #[test]
    fn spawn_uses_config_constants() {
        let config = SimConfig::default();
        let mut rng = Rng::new(1);
        let p = Particle::spawn(&seed(), Vec2::new(1000.0, 800.0), &config, &mut rng);
        assert_eq!(p.origin(), Vec2::new(150.0, 50.0));
        assert_eq!(p.color(), [255, 0, 0]);
        assert_eq!(p.size(), 1.1);
        assert_eq!(p.friction(), 0.92);
        assert_eq!(p.ease(), 0.08);
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn spawn_draws_per_particle_values_in_range() {
        let config = SimConfig::default();
        let mut rng = Rng::new(2024);
        let canvas = Vec2::new(1000.0, 800.0);
        for _ in 0..500 {
            let p = Particle::spawn(&seed(), canvas, &config, &mut rng);
            assert!(config.weight.contains(p.weight()));
            assert!(config.angle_offset.contains(p.angle_offset()));
            assert!(config.noise.contains(p.noise()));
            assert!(config.fade_speed.contains(p.fade_speed()));
            assert!(p.position().x >= 0.0 && p.position().x <= canvas.x);
            assert!(p.position().y >= 0.0 && p.position().y <= canvas.y);
        }
    }

    #[test]
    fn spawn_is_deterministic_per_seed() {
        let config = SimConfig::default();
        let canvas = Vec2::new(640.0, 480.0);
        let a = Particle::spawn(&seed(), canvas, &config, &mut Rng::new(5));
        let b = Particle::spawn(&seed(), canvas, &config, &mut Rng::new(5));
        assert_eq!(a, b);
    }
}
