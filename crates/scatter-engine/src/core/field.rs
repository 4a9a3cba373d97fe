use crate::core::particle::Particle;

/// The session's particle set.
///
/// Never edited in place: every resample builds a complete replacement and
/// swaps it in with [`ParticleField::replace`], so a frame sees either the old
/// set or the new one.
pub struct ParticleField {
    particles: Vec<Particle>,
    generation: u64,
}

impl ParticleField {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            generation: 0,
        }
    }

    /// Swap in a freshly built set. Returns the new generation.
    pub fn replace(&mut self, particles: Vec<Particle>) -> u64 {
        self.particles = particles;
        self.generation += 1;
        self.generation
    }

    /// Drop every particle (teardown).
    pub fn clear(&mut self) {
        self.particles = Vec::new();
    }

    /// Bumped on every replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}
