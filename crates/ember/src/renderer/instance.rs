use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::systems::emitter::ParticleEmitter;
use crate::systems::particle::Particle;
use crate::systems::rng::RandomSource;
use crate::components::emitter::EmitterConfig;

/// Per-particle render data, laid out for direct GPU upload.
/// 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Particle size in world units (before `scale`).
    pub size: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Color channels normalized to 0.0..=1.0.
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// Sub-texture id of the current animation frame, or the spawn-time pick.
    pub frame: f32,
    /// 1.0 when the sprite should be mirrored horizontally.
    pub flip_x: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_particle(particle: &Particle, config: &EmitterConfig, root_position: Vec2) -> Self {
        let pos = particle.world_position(config, root_position);
        let [r, g, b, a] = particle.color().to_normalized();
        let scale = particle.scale();
        let frame = particle
            .frame_id(config)
            .unwrap_or(particle.sub_texture_id());
        Self {
            x: pos.x,
            y: pos.y,
            rotation: particle.rotation(),
            size: particle.size(),
            scale_x: scale.x,
            scale_y: scale.y,
            r,
            g,
            b,
            a,
            frame: frame as f32,
            flip_x: if particle.flip_x(config) { 1.0 } else { 0.0 },
        }
    }
}

/// Instance buffer rebuilt from an emitter each frame.
pub struct ParticleBuffer {
    pub instances: Vec<ParticleInstance>,
}

impl ParticleBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(512),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append one instance per live particle of `emitter`.
    pub fn extend_from<R: RandomSource>(&mut self, emitter: &ParticleEmitter<R>, root_position: Vec2) {
        let config = emitter.config();
        self.instances.extend(
            emitter
                .particles()
                .iter()
                .map(|p| ParticleInstance::from_particle(p, config, root_position)),
        );
    }

    /// Clear and refill from a single emitter.
    pub fn rebuild<R: RandomSource>(&mut self, emitter: &ParticleEmitter<R>, root_position: Vec2) {
        self.clear();
        self.extend_from(emitter, root_position);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw float view of the instance data.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for ParticleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
