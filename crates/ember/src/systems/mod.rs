pub mod emitter;
pub mod particle;
pub mod rng;
