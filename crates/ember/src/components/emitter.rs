use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::ParticleAnimation;
use super::color::Rgba;

/// Kinematic model used by every particle of an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmitterKind {
    /// Linear motion driven by gravity plus radial/tangential acceleration.
    #[default]
    Gravity,
    /// Orbit around the source at a radius that shrinks or grows over life.
    Radial,
}

/// How the color channel walks between start and finish color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorLoop {
    #[default]
    None,
    /// Start → finish → start within one lifetime.
    PingPong,
}

/// What happens to a particle leaving [`EmitterConfig::bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundsBehaviour {
    Destroy,
    #[default]
    Reflect,
}

/// Axis-aligned rectangle in emitter-local space. Zero width or height disables it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// Errors raised while loading an emitter configuration from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read emitter config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse emitter config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Declarative emission parameters shared by every particle of an emitter.
///
/// Most knobs come as a base value plus a variance; a particle samples
/// `base + variance * uniform(-1, 1)` once at spawn. Angles are in degrees.
/// Nothing here is validated on load: degenerate values are coerced where
/// the simulation reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Particles keep the anchor they spawned at instead of following the emitter transform.
    pub simulate_in_world_space: bool,

    pub source_position: Vec2,
    pub source_position_variance: Vec2,
    pub bounds: Bounds,
    pub bounds_behaviour: BoundsBehaviour,
    pub emitter_kind: EmitterKind,

    pub speed: f32,
    pub speed_variance: f32,
    /// Scale the start size by sampled speed (slow particles get `max_speed_scale`).
    pub scale_by_speed: bool,
    pub min_speed_scale: f32,
    pub max_speed_scale: f32,

    /// Seconds.
    pub particle_lifespan: f32,
    pub particle_lifespan_variance: f32,

    pub angle: f32,
    pub angle_variance: f32,
    pub gravity: Vec2,
    pub radial_acceleration: f32,
    pub radial_accel_variance: f32,
    pub tangential_acceleration: f32,
    pub tangential_accel_variance: f32,

    pub start_color: Rgba,
    pub start_color_variance: Rgba,
    pub finish_color: Rgba,
    pub finish_color_variance: Rgba,
    pub color_loop: ColorLoop,

    pub max_particles: u32,
    pub start_particle_size: f32,
    pub start_particle_size_variance: f32,
    pub finish_particle_size: f32,
    pub finish_particle_size_variance: f32,
    pub scale: Vec2,

    /// Seconds of emission; negative emits forever.
    pub duration: f32,
    /// Particles per second.
    pub emission_rate: f32,

    pub rotation_start: f32,
    pub rotation_start_variance: f32,
    pub rotation_end: f32,
    pub rotation_end_variance: f32,

    pub animations: Vec<ParticleAnimation>,
    /// Drive the frame index by lifetime fraction rather than remaining time.
    pub animation_by_lifetime: bool,
    /// Number of sub-textures a particle picks from at spawn.
    pub sub_texture_count: u32,
    pub flip_x_with_velocity: bool,

    // Radial emitters only.
    pub max_radius: f32,
    pub max_radius_variance: f32,
    pub min_radius: f32,
    pub min_radius_variance: f32,
    /// Degrees per second around the source.
    pub rotate_per_second: f32,
    pub rotate_per_second_variance: f32,

    pub parallax: Vec2,
    pub parallax_variance: Vec2,
    pub scale_by_parallax: bool,
    pub parallax_by_scale: bool,
    pub alpha_by_parallax: bool,
    pub parallax_scale_factor: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            simulate_in_world_space: true,
            source_position: Vec2::ZERO,
            source_position_variance: Vec2::new(5.0, 5.0),
            bounds: Bounds::default(),
            bounds_behaviour: BoundsBehaviour::Reflect,
            emitter_kind: EmitterKind::Gravity,
            speed: 5.0,
            speed_variance: 0.0,
            scale_by_speed: false,
            min_speed_scale: 1.0,
            max_speed_scale: 1.0,
            particle_lifespan: 1.0,
            particle_lifespan_variance: 0.0,
            angle: 360.0,
            angle_variance: 0.0,
            gravity: Vec2::ZERO,
            radial_acceleration: 0.0,
            radial_accel_variance: 0.0,
            tangential_acceleration: 0.0,
            tangential_accel_variance: 0.0,
            start_color: Rgba::WHITE,
            start_color_variance: Rgba::WHITE,
            finish_color: Rgba::BLACK,
            finish_color_variance: Rgba::BLACK,
            color_loop: ColorLoop::None,
            max_particles: 10,
            start_particle_size: 1.0,
            start_particle_size_variance: 0.0,
            finish_particle_size: 1.0,
            finish_particle_size_variance: 0.0,
            scale: Vec2::ONE,
            duration: -1.0,
            emission_rate: 1.0,
            rotation_start: 0.0,
            rotation_start_variance: 0.0,
            rotation_end: 0.0,
            rotation_end_variance: 0.0,
            animations: Vec::new(),
            animation_by_lifetime: false,
            sub_texture_count: 0,
            flip_x_with_velocity: false,
            max_radius: 0.0,
            max_radius_variance: 0.0,
            min_radius: 0.0,
            min_radius_variance: 0.0,
            rotate_per_second: 0.0,
            rotate_per_second_variance: 0.0,
            parallax: Vec2::ZERO,
            parallax_variance: Vec2::ZERO,
            scale_by_parallax: false,
            parallax_by_scale: false,
            alpha_by_parallax: false,
            parallax_scale_factor: 1.0,
        }
    }
}

impl EmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with source-position and color variances zeroed.
    pub fn exact() -> Self {
        Self {
            source_position_variance: Vec2::ZERO,
            start_color_variance: Rgba::TRANSPARENT,
            finish_color_variance: Rgba::TRANSPARENT,
            ..Self::default()
        }
    }

    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading emitter config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parallax scale factor as the simulation uses it: zero reads as one.
    pub fn effective_parallax_scale_factor(&self) -> f32 {
        if self.parallax_scale_factor == 0.0 {
            1.0
        } else {
            self.parallax_scale_factor
        }
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    // -- Builder pattern --

    pub fn with_kind(mut self, kind: EmitterKind) -> Self {
        self.emitter_kind = kind;
        self
    }

    pub fn with_source(mut self, position: Vec2, variance: Vec2) -> Self {
        self.source_position = position;
        self.source_position_variance = variance;
        self
    }

    pub fn with_lifespan(mut self, lifespan: f32, variance: f32) -> Self {
        self.particle_lifespan = lifespan;
        self.particle_lifespan_variance = variance;
        self
    }

    pub fn with_speed(mut self, speed: f32, variance: f32) -> Self {
        self.speed = speed;
        self.speed_variance = variance;
        self
    }

    pub fn with_angle(mut self, degrees: f32, variance: f32) -> Self {
        self.angle = degrees;
        self.angle_variance = variance;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_colors(mut self, start: Rgba, finish: Rgba) -> Self {
        self.start_color = start;
        self.finish_color = finish;
        self
    }

    pub fn with_color_loop(mut self, color_loop: ColorLoop) -> Self {
        self.color_loop = color_loop;
        self
    }

    pub fn with_sizes(mut self, start: f32, finish: f32) -> Self {
        self.start_particle_size = start;
        self.finish_particle_size = finish;
        self
    }

    pub fn with_rotation(mut self, start_degrees: f32, end_degrees: f32) -> Self {
        self.rotation_start = start_degrees;
        self.rotation_end = end_degrees;
        self
    }

    pub fn with_radius(mut self, max_radius: f32, min_radius: f32) -> Self {
        self.max_radius = max_radius;
        self.min_radius = min_radius;
        self
    }

    pub fn with_rotate_per_second(mut self, degrees: f32) -> Self {
        self.rotate_per_second = degrees;
        self
    }

    pub fn with_max_particles(mut self, max: u32) -> Self {
        self.max_particles = max;
        self
    }

    pub fn with_emission_rate(mut self, rate: f32) -> Self {
        self.emission_rate = rate;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_animation(mut self, animation: ParticleAnimation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds, behaviour: BoundsBehaviour) -> Self {
        self.bounds = bounds;
        self.bounds_behaviour = behaviour;
        self
    }

    pub fn with_world_space(mut self, world_space: bool) -> Self {
        self.simulate_in_world_space = world_space;
        self
    }
}
