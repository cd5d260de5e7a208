//! A single pooled particle: spawn-time sampling and the per-tick update.

use glam::Vec2;

use crate::components::color::Rgba;
use crate::components::emitter::{Bounds, ColorLoop, EmitterConfig, EmitterKind};
use crate::core::collision::{collision_response, BroadPhase, CollisionConfig, NarrowPhase};
use crate::core::math::{map_range, ping_pong};
use crate::core::shapes::Circle;
use super::rng::RandomSource;

/// Which motion rule drives the particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    /// Emitter kinematics (radial or gravity) move the particle.
    #[default]
    Free,
    /// The particle hit something and now flies ballistically under collision gravity.
    Collided,
}

/// One particle slot. Slots are recycled: [`Particle::spawn`] overwrites every field.
#[derive(Debug, Clone, Default)]
pub struct Particle {
    position: Vec2,
    spawn_position: Vec2,
    direction: Vec2,
    velocity: Vec2,
    state: MotionState,

    color: Rgba,
    start_color: Rgba,
    finish_color: Rgba,

    rotation: f32,
    rotation_delta: f32,
    radial_acceleration: f32,
    tangential_acceleration: f32,
    radius: f32,
    radius_delta: f32,
    angle: f32,
    angular_velocity: f32,

    size: f32,
    size_delta: f32,
    scale: Vec2,

    time_to_live: f32,
    lifetime: f32,

    sub_texture_id: u32,
    parallax: Vec2,
    animation_frame: usize,
    current_animation: usize,
}

/// `(to - from) / lifetime`, or zero for a zero lifetime.
fn per_second(from: f32, to: f32, lifetime: f32) -> f32 {
    if lifetime > 0.0 {
        (to - from) / lifetime
    } else {
        0.0
    }
}

fn sample_color<R: RandomSource + ?Sized>(rng: &mut R, base: Rgba, variance: Rgba) -> Rgba {
    Rgba {
        r: rng.vary(base.r, variance.r),
        g: rng.vary(base.g, variance.g),
        b: rng.vary(base.b, variance.b),
        a: rng.vary(base.a, variance.a),
    }
}

impl Particle {
    /// An empty slot, already expired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and spawn in one go.
    pub fn spawned<R: RandomSource + ?Sized>(config: &EmitterConfig, origin: Vec2, rng: &mut R) -> Self {
        let mut p = Self::new();
        p.spawn(config, origin, rng);
        p
    }

    /// Reinitialize this slot from the emitter config and fresh random draws.
    ///
    /// `origin` is the emitter's world position right now; it becomes the
    /// anchor for world-space simulation. The particle's own position is
    /// always relative to `config.source_position`.
    pub fn spawn<R: RandomSource + ?Sized>(&mut self, config: &EmitterConfig, origin: Vec2, rng: &mut R) {
        self.state = MotionState::Free;
        self.velocity = Vec2::ZERO;
        self.animation_frame = 0;

        self.sub_texture_id = if config.sub_texture_count > 1 {
            rng.below(config.sub_texture_count)
        } else {
            0
        };

        self.position = Vec2::new(
            rng.vary(config.source_position.x, config.source_position_variance.x),
            rng.vary(config.source_position.y, config.source_position_variance.y),
        );
        self.parallax = config.parallax + config.parallax_variance * rng.minus_one_to_one();

        self.current_animation = if config.animations.len() > 1 {
            rng.below(config.animations.len() as u32) as usize
        } else {
            0
        };

        self.spawn_position = origin;
        self.scale = config.scale;

        let heading = rng.vary(config.angle, config.angle_variance).to_radians();
        let speed = rng.vary(config.speed, config.speed_variance);
        self.direction = Vec2::from_angle(heading) * speed;

        self.time_to_live = rng
            .vary(config.particle_lifespan, config.particle_lifespan_variance)
            .max(0.0);
        self.lifetime = self.time_to_live;

        let start_radius = rng.vary(config.max_radius, config.max_radius_variance);
        let end_radius = rng.vary(config.min_radius, config.min_radius_variance);
        self.radius = start_radius;
        self.radius_delta = per_second(start_radius, end_radius, self.lifetime);
        self.angle = rng.vary(config.angle, config.angle_variance).to_radians();
        self.angular_velocity = rng
            .vary(config.rotate_per_second, config.rotate_per_second_variance)
            .to_radians();

        self.radial_acceleration = rng.vary(config.radial_acceleration, config.radial_accel_variance);
        self.tangential_acceleration =
            rng.vary(config.tangential_acceleration, config.tangential_accel_variance);

        let start_size = rng.vary(config.start_particle_size, config.start_particle_size_variance);
        let finish_size = rng.vary(config.finish_particle_size, config.finish_particle_size_variance);
        self.size_delta = per_second(start_size, finish_size, self.lifetime);
        self.size = start_size.max(0.0);

        if config.scale_by_speed {
            let slowest = config.speed - config.speed_variance;
            let fastest = config.speed + config.speed_variance;
            self.size *= map_range(speed, slowest, fastest, config.max_speed_scale, config.min_speed_scale);
        }

        // Channels stay unclamped here; the per-tick lerp clamps.
        self.start_color = sample_color(rng, config.start_color, config.start_color_variance);
        self.finish_color = sample_color(rng, config.finish_color, config.finish_color_variance);
        self.color = self.start_color.clamped();

        let start_rotation = rng
            .vary(config.rotation_start, config.rotation_start_variance)
            .to_radians();
        let end_rotation = rng
            .vary(config.rotation_end, config.rotation_end_variance)
            .to_radians();
        self.rotation = start_rotation;
        self.rotation_delta = per_second(start_rotation, end_rotation, self.lifetime);
    }

    /// Advance by `dt` seconds. Returns `true` once the particle has expired;
    /// an expired particle must not be advanced again until respawned.
    ///
    /// `root_position` is the emitter's current world position, used as the
    /// collision anchor when the config simulates in local space.
    pub fn advance<W>(
        &mut self,
        dt: f32,
        config: &EmitterConfig,
        collision: &CollisionConfig,
        root_position: Vec2,
        world: &W,
    ) -> bool
    where
        W: BroadPhase + NarrowPhase<<W as BroadPhase>::Collider>,
    {
        self.time_to_live -= dt;
        if self.time_to_live <= 0.0 {
            return true;
        }

        if self.state == MotionState::Free {
            match config.emitter_kind {
                EmitterKind::Radial => self.integrate_radial(dt),
                EmitterKind::Gravity => self.integrate_gravity(dt, config.gravity),
            }
        }

        let t = self.lifetime_fraction();
        let rt = match config.color_loop {
            ColorLoop::None => t,
            ColorLoop::PingPong => ping_pong(t),
        };
        self.color = Rgba::lerp_clamped(self.start_color, self.finish_color, rt);

        self.size = (self.size + self.size_delta * dt).max(0.0);
        self.rotation += self.rotation_delta * dt;

        self.update_animation_frame(config, t);
        self.apply_parallax(config);

        if collision.enabled {
            match self.state {
                MotionState::Collided => {
                    self.velocity += collision.gravity * dt;
                    self.position += self.velocity * dt;
                    if self.velocity.length_squared() < collision.min_kill_speed_squared {
                        return true;
                    }
                }
                MotionState::Free => self.detect_collision(config, collision, root_position, world),
            }
        }

        false
    }

    fn integrate_radial(&mut self, dt: f32) {
        self.angle += self.angular_velocity * dt;
        self.radius += self.radius_delta * dt;

        let next = Vec2::new(-self.angle.cos(), -self.angle.sin()) * self.radius;
        self.velocity = next - self.position;
        self.position = next;
    }

    fn integrate_gravity(&mut self, dt: f32, gravity: Vec2) {
        let mut accel = gravity;
        if let Some(radial) = self.position.try_normalize() {
            accel += radial * self.radial_acceleration
                + radial.perp() * self.tangential_acceleration;
        }

        self.direction += accel * dt;
        self.position += self.direction * dt;
        self.velocity = self.direction;
    }

    fn update_animation_frame(&mut self, config: &EmitterConfig, t: f32) {
        let Some(animation) = config.animations.get(self.current_animation) else {
            return;
        };
        let count = animation.frames.len();
        if count == 0 || (!config.animation_by_lifetime && animation.seconds_per_frame <= 0.0) {
            return;
        }

        let desired = if config.animation_by_lifetime {
            t * count as f32
        } else {
            self.time_to_live / animation.seconds_per_frame
        };
        // Float-to-int `as` truncates toward zero and saturates.
        let desired = desired as usize;
        if desired != self.animation_frame {
            self.animation_frame = desired % count;
        }
    }

    fn apply_parallax(&mut self, config: &EmitterConfig) {
        if config.alpha_by_parallax {
            self.color.a = (255.0 + self.parallax.x * 255.0).clamp(0.0, 255.0);
        }
        let factor = config.effective_parallax_scale_factor();
        if config.scale_by_parallax {
            self.size = (1.0 + self.parallax.x * config.start_particle_size * factor).max(0.0);
        }
        if config.parallax_by_scale {
            self.parallax.x = self.size * factor;
        }
    }

    fn detect_collision<W>(
        &mut self,
        config: &EmitterConfig,
        collision: &CollisionConfig,
        root_position: Vec2,
        world: &W,
    ) where
        W: BroadPhase + NarrowPhase<<W as BroadPhase>::Collider>,
    {
        let anchor = self.anchor(config, root_position);
        let probe = Circle::new(anchor + self.position, self.size * 0.5 * collision.radius_scale);

        let hit = world
            .query_neighbors(&probe, collision.collides_with_layers)
            .into_iter()
            .find_map(|neighbor| world.intersects(&probe, neighbor));

        if let Some(mtv) = hit {
            self.position -= mtv;
            self.velocity =
                collision_response(self.velocity, mtv, collision.friction, collision.elasticity);
            self.time_to_live -= self.time_to_live * collision.lifetime_loss;
            self.state = MotionState::Collided;
        }
    }

    /// Keep a particle inside `bounds` by flipping the motion component that points outward.
    pub fn reflect_within(&mut self, bounds: &Bounds) {
        let p = self.position;
        if p.x < bounds.left() {
            self.direction.x = self.direction.x.abs();
            self.velocity.x = self.velocity.x.abs();
        } else if p.x > bounds.right() {
            self.direction.x = -self.direction.x.abs();
            self.velocity.x = -self.velocity.x.abs();
        }
        if p.y < bounds.top() {
            self.direction.y = self.direction.y.abs();
            self.velocity.y = self.velocity.y.abs();
        } else if p.y > bounds.bottom() {
            self.direction.y = -self.direction.y.abs();
            self.velocity.y = -self.velocity.y.abs();
        }
    }

    /// World anchor: the spawn origin in world space, the live emitter position otherwise.
    pub fn anchor(&self, config: &EmitterConfig, root_position: Vec2) -> Vec2 {
        if config.simulate_in_world_space {
            self.spawn_position
        } else {
            root_position
        }
    }

    pub fn world_position(&self, config: &EmitterConfig, root_position: Vec2) -> Vec2 {
        self.anchor(config, root_position) + self.position
    }

    /// Elapsed share of the lifetime in [0, 1].
    pub fn lifetime_fraction(&self) -> f32 {
        if self.lifetime > 0.0 {
            ((self.lifetime - self.time_to_live) / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Sub-texture id of the current animation frame, if the emitter animates.
    pub fn frame_id(&self, config: &EmitterConfig) -> Option<u32> {
        config
            .animations
            .get(self.current_animation)
            .and_then(|a| a.frame(self.animation_frame))
    }

    /// Whether a renderer should mirror the sprite horizontally.
    pub fn flip_x(&self, config: &EmitterConfig) -> bool {
        config.flip_x_with_velocity && self.velocity.x < 0.0
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn has_collided(&self) -> bool {
        self.state == MotionState::Collided
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn start_color(&self) -> Rgba {
        self.start_color
    }

    pub fn finish_color(&self) -> Rgba {
        self.finish_color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn time_to_live(&self) -> f32 {
        self.time_to_live
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    pub fn animation_frame(&self) -> usize {
        self.animation_frame
    }

    pub fn current_animation(&self) -> usize {
        self.current_animation
    }

    pub fn sub_texture_id(&self) -> u32 {
        self.sub_texture_id
    }
}
