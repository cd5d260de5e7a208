pub mod instance;

pub use instance::{ParticleBuffer, ParticleInstance};
