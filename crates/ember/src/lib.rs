pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use components::animation::ParticleAnimation;
pub use components::color::Rgba;
pub use components::emitter::{
    Bounds, BoundsBehaviour, ColorLoop, ConfigError, EmitterConfig, EmitterKind,
};
pub use crate::core::collision::{
    collision_response, BroadPhase, CollisionConfig, NarrowPhase, NoColliders, StaticCollider,
    StaticColliders,
};
pub use crate::core::shapes::{Aabb, Circle, ColliderShape};
pub use systems::emitter::ParticleEmitter;
pub use systems::particle::{MotionState, Particle};
pub use systems::rng::{RandomSource, Rng, SequenceRandom};
pub use renderer::instance::{ParticleBuffer, ParticleInstance};

#[cfg(feature = "physics")]
pub use crate::core::physics::{ColliderDesc, PhysicsWorld};
