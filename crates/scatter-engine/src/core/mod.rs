pub mod rng;
pub mod particle;
pub mod integrator;
pub mod field;
