use serde::{Deserialize, Serialize};

use crate::api::error::{Error, Result};
use crate::core::rng::Rng;

/// Distance reported for an absent pointer.
/// Any effective radius must stay below it so repulsion can never trigger.
pub const POINTER_ABSENT_DISTANCE: f32 = 10_000.0;

/// Closed interval a per-particle constant is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f32,
    pub max: f32,
}

impl UniformRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw one value from the range.
    pub fn sample(&self, rng: &mut Rng) -> f32 {
        self.min + rng.next_f32() * (self.max - self.min)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Simulation constants shared by the live host and replay artifacts.
///
/// Serialized into every exported artifact so a replay runs with exactly the
/// values of the session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Width the image is drawn at on wide viewports.
    pub max_draw_width: u32,
    /// Viewports narrower than this draw at `width - narrow_viewport_margin`.
    pub narrow_viewport_width: u32,
    /// Horizontal margin kept free on narrow viewports.
    pub narrow_viewport_margin: u32,
    /// Pixels need alpha strictly above this to become particles.
    pub alpha_threshold: u8,
    /// At least one channel must be strictly above this (drops near-black residue).
    pub color_floor: u8,
    /// Side of the drawn square, in device units.
    pub particle_size: f32,
    /// Velocity damping per step.
    pub friction: f32,
    /// Spring coefficient toward origin.
    pub ease: f32,
    /// Scale applied to the pointer push before it hits velocity.
    pub repulsion_scale: f32,
    /// Base pointer influence radius.
    pub pointer_radius: f32,
    pub weight: UniformRange,
    /// Radians added to the push direction.
    pub angle_offset: UniformRange,
    /// Added to `pointer_radius` per particle.
    pub noise: UniformRange,
    /// Alpha gained per step while fading in.
    pub fade_speed: UniformRange,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_draw_width: 700,
            narrow_viewport_width: 800,
            narrow_viewport_margin: 40,
            alpha_threshold: 128,
            color_floor: 15,
            particle_size: 1.1,
            friction: 0.92,
            ease: 0.08,
            repulsion_scale: 0.08,
            pointer_radius: 100.0,
            weight: UniformRange::new(0.5, 2.0),
            angle_offset: UniformRange::new(-1.0, 1.0),
            noise: UniformRange::new(-25.0, 25.0),
            fade_speed: UniformRange::new(0.02, 0.04),
        }
    }
}

impl SimConfig {
    /// Parse and validate a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("weight", self.weight),
            ("angle_offset", self.angle_offset),
            ("noise", self.noise),
            ("fade_speed", self.fade_speed),
        ];
        for (name, range) in ranges {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(Error::InvalidConfig(format!(
                    "{name} range [{}, {}] is empty or not finite",
                    range.min, range.max
                )));
            }
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "friction {} must lie in (0, 1]",
                self.friction
            )));
        }
        if self.particle_size <= 0.0 {
            return Err(Error::InvalidConfig("particle_size must be positive".into()));
        }
        if self.fade_speed.min <= 0.0 {
            return Err(Error::InvalidConfig("fade_speed must be positive".into()));
        }
        if self.pointer_radius + self.noise.max >= POINTER_ABSENT_DISTANCE {
            return Err(Error::InvalidConfig(format!(
                "pointer radius {} plus noise {} reaches the absent-pointer distance",
                self.pointer_radius, self.noise.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "pointer_radius": 150.0 }"#).unwrap();
        assert_eq!(config.pointer_radius, 150.0);
        assert_eq!(config.friction, 0.92);
        assert_eq!(config.max_draw_width, 700);
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let config = SimConfig {
            ease: 0.1,
            ..SimConfig::default()
        };
        let parsed = SimConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_inverted_range() {
        let json = r#"{ "weight": { "min": 2.0, "max": 0.5 } }"#;
        assert!(matches!(
            SimConfig::from_json(json),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_radius_reaching_absent_sentinel() {
        let config = SimConfig {
            pointer_radius: POINTER_ABSENT_DISTANCE,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(SimConfig::from_json("{"), Err(Error::Config(_))));
    }

    #[test]
    fn range_sample_stays_inside() {
        let mut rng = Rng::new(9);
        let range = UniformRange::new(0.5, 2.0);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }
}
