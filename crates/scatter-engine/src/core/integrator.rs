//! One fixed step of the particle force model.
//!
//! Order per step: fade in, pointer repulsion from the pre-step position,
//! spring toward origin, damping, then position integration. Reordering any of
//! these changes the trajectory.

use crate::api::config::SimConfig;
use crate::core::particle::Particle;
use crate::input::pointer::PointerState;

impl Particle {
    /// Advance by exactly one step. There is no delta-time scaling.
    pub fn step(&mut self, pointer: &PointerState, config: &SimConfig) {
        if self.alpha < 1.0 {
            self.alpha += self.fade_speed();
        }

        let (dx, dy, distance) = pointer.offset_from(self.position);
        let effective_radius = pointer.radius + self.noise();

        if distance < effective_radius {
            let force = effective_radius - distance;
            let angle = dy.atan2(dx) + self.angle_offset();
            let push_x = angle.cos() * force * self.weight();
            let push_y = angle.sin() * force * self.weight();
            self.velocity.x -= push_x * config.repulsion_scale;
            self.velocity.y -= push_y * config.repulsion_scale;
        }

        let home = self.origin() - self.position;
        self.velocity.x += home.x * self.ease();
        self.velocity.y += home.y * self.ease();

        self.velocity *= self.friction();
        self.position += self.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use crate::sampling::sampler::Seed;
    use glam::Vec2;

    fn particle(origin: Vec2, seed: u64) -> Particle {
        let seed_px = Seed {
            origin,
            color: [200, 100, 50],
        };
        Particle::spawn(&seed_px, Vec2::new(800.0, 600.0), &SimConfig::default(), &mut Rng::new(seed))
    }

    #[test]
    fn fixed_fields_survive_steps() {
        let config = SimConfig::default();
        let mut p = particle(Vec2::new(400.0, 300.0), 11);
        let before = p.clone();
        let pointer = PointerState::at(390.0, 310.0, config.pointer_radius);
        for _ in 0..200 {
            p.step(&pointer, &config);
        }
        assert_eq!(p.origin(), before.origin());
        assert_eq!(p.color(), before.color());
        assert_eq!(p.size(), before.size());
        assert_eq!(p.friction(), before.friction());
        assert_eq!(p.ease(), before.ease());
        assert_eq!(p.weight(), before.weight());
        assert_eq!(p.angle_offset(), before.angle_offset());
        assert_eq!(p.noise(), before.noise());
        assert_eq!(p.fade_speed(), before.fade_speed());
        assert_ne!(p.position(), before.position());
    }

    #[test]
    fn absent_pointer_first_steps_close_in_on_origin() {
        let config = SimConfig::default();
        let pointer = PointerState::absent(config.pointer_radius);
        for seed in 1..20 {
            let mut p = particle(Vec2::new(400.0, 300.0), seed);
            let mut last = p.distance_to_origin();
            // Starting at rest, motion is straight toward origin until the first
            // crossing, which takes more than four steps with the default constants.
            for _ in 0..4 {
                p.step(&pointer, &config);
                let d = p.distance_to_origin();
                assert!(d < last, "seed {seed}: distance grew from {last} to {d}");
                last = d;
            }
        }
    }

    #[test]
    fn absent_pointer_settles_at_origin() {
        let config = SimConfig::default();
        let pointer = PointerState::absent(config.pointer_radius);
        for seed in 1..20 {
            let mut p = particle(Vec2::new(400.0, 300.0), seed);
            // friction 0.92 with ease 0.08 is underdamped: the particle overshoots,
            // so compare the peak distance of successive windows instead.
            let mut previous_peak = f32::INFINITY;
            for _ in 0..8 {
                let mut peak = 0.0f32;
                for _ in 0..25 {
                    p.step(&pointer, &config);
                    peak = peak.max(p.distance_to_origin());
                }
                if previous_peak > 1e-2 {
                    assert!(peak < previous_peak, "seed {seed}: peak {peak} >= {previous_peak}");
                }
                previous_peak = peak;
            }
            for _ in 0..400 {
                p.step(&pointer, &config);
            }
            assert!(p.distance_to_origin() < 1e-2, "seed {seed}: {}", p.distance_to_origin());
        }
    }

    #[test]
    fn near_pointer_pushes_away() {
        let config = SimConfig::default();
        let mut p = particle(Vec2::new(400.0, 300.0), 3);
        p.position = Vec2::new(400.0, 300.0);
        // Pointer to the left, well inside the smallest effective radius.
        let pointer = PointerState::at(380.0, 300.0, config.pointer_radius);
        p.step(&pointer, &config);
        // Repulsion is rotated by at most one radian, so its x component still
        // points away from the pointer (+x).
        assert!(p.velocity().x > 0.0, "velocity {:?}", p.velocity());
    }

    #[test]
    fn repulsion_matches_force_formula() {
        let config = SimConfig::default();
        let mut p = particle(Vec2::new(100.0, 100.0), 8);
        p.position = Vec2::new(100.0, 100.0);
        let pointer = PointerState::at(130.0, 140.0, config.pointer_radius);

        let effective = config.pointer_radius + p.noise();
        let force = effective - 50.0;
        let angle = 40.0f32.atan2(30.0) + p.angle_offset();
        let vx = (-(angle.cos() * force * p.weight()) * 0.08) * 0.92;
        let vy = (-(angle.sin() * force * p.weight()) * 0.08) * 0.92;

        p.step(&pointer, &config);
        assert!((p.velocity().x - vx).abs() < 1e-4);
        assert!((p.velocity().y - vy).abs() < 1e-4);
        assert!((p.position().x - (100.0 + vx)).abs() < 1e-4);
    }

    #[test]
    fn pointer_outside_radius_has_no_effect() {
        let config = SimConfig::default();
        let mut a = particle(Vec2::new(100.0, 100.0), 4);
        let mut b = a.clone();
        a.step(&PointerState::at(10_000.0, 10_000.0, config.pointer_radius), &config);
        b.step(&PointerState::absent(config.pointer_radius), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn alpha_is_monotonic_and_reaches_one_within_fifty_steps() {
        let config = SimConfig::default();
        let pointer = PointerState::absent(config.pointer_radius);
        for seed in 1..50 {
            let mut p = particle(Vec2::new(10.0, 10.0), seed);
            assert_eq!(p.alpha(), 0.0);
            let mut last = p.alpha();
            for _ in 0..50 {
                p.step(&pointer, &config);
                assert!(p.alpha() >= last);
                last = p.alpha();
            }
            assert!(p.alpha() >= 1.0, "seed {seed}: alpha {}", p.alpha());
            p.step(&pointer, &config);
            assert_eq!(p.alpha(), last, "alpha keeps changing after reaching 1");
        }
    }
}
