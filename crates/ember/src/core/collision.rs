//! Particle-vs-environment collision: settings, collaborator traits and
//! the velocity response applied when a particle hits something.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, ColliderShape};

/// Collision settings for one emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub enabled: bool,
    /// Gravity applied after the first hit, when the particle moves ballistically.
    pub gravity: Vec2,
    /// Fraction of tangential velocity removed per hit.
    pub friction: f32,
    /// 0 = no bounce, 1 = perfect bounce.
    pub elasticity: f32,
    /// A collided particle slower than this (squared) dies.
    pub min_kill_speed_squared: f32,
    /// Layer bits the particle collides with.
    pub collides_with_layers: u32,
    /// Fraction of remaining lifetime lost on impact.
    pub lifetime_loss: f32,
    /// Collision radius as a fraction of half the particle size.
    pub radius_scale: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            gravity: Vec2::new(0.0, 300.0),
            friction: 0.5,
            elasticity: 0.5,
            min_kill_speed_squared: f32::MIN,
            collides_with_layers: u32::MAX,
            lifetime_loss: 0.0,
            radius_scale: 0.8,
        }
    }
}

impl CollisionConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_material(mut self, friction: f32, elasticity: f32) -> Self {
        self.friction = friction;
        self.elasticity = elasticity;
        self
    }

    pub fn with_min_kill_speed(mut self, speed: f32) -> Self {
        self.min_kill_speed_squared = speed * speed;
        self
    }

    pub fn with_layers(mut self, mask: u32) -> Self {
        self.collides_with_layers = mask;
        self
    }

    pub fn with_lifetime_loss(mut self, fraction: f32) -> Self {
        self.lifetime_loss = fraction;
        self
    }

    pub fn with_radius_scale(mut self, scale: f32) -> Self {
        self.radius_scale = scale;
        self
    }
}

/// Spatial index returning obstacles near a particle.
pub trait BroadPhase {
    type Collider;

    /// Candidates whose bounds overlap `bounds` on any layer in `layer_mask`. Unordered.
    fn query_neighbors(&self, bounds: &Circle, layer_mask: u32) -> Vec<&Self::Collider>;
}

/// Exact overlap test between a particle circle and one obstacle.
pub trait NarrowPhase<C: ?Sized> {
    /// The MTV pointing from `probe` into `other`, or `None` on a miss.
    fn intersects(&self, probe: &Circle, other: &C) -> Option<Vec2>;
}

/// A world without obstacles.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColliders;

impl BroadPhase for NoColliders {
    type Collider = ();

    fn query_neighbors(&self, _bounds: &Circle, _layer_mask: u32) -> Vec<&()> {
        Vec::new()
    }
}

impl NarrowPhase<()> for NoColliders {
    fn intersects(&self, _probe: &Circle, _other: &()) -> Option<Vec2> {
        None
    }
}

/// An obstacle with a layer membership mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticCollider {
    pub shape: ColliderShape,
    pub layers: u32,
}

/// Flat list of static obstacles; the broad phase is a bounds scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticColliders {
    colliders: Vec<StaticCollider>,
}

impl StaticColliders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: ColliderShape, layers: u32) -> usize {
        self.colliders.push(StaticCollider { shape, layers });
        self.colliders.len() - 1
    }

    pub fn with(mut self, shape: ColliderShape, layers: u32) -> Self {
        self.add(shape, layers);
        self
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }
}

impl BroadPhase for StaticColliders {
    type Collider = StaticCollider;

    fn query_neighbors(&self, bounds: &Circle, layer_mask: u32) -> Vec<&StaticCollider> {
        let area = bounds.bounds();
        self.colliders
            .iter()
            .filter(|c| c.layers & layer_mask != 0 && c.shape.bounds().intersects(&area))
            .collect()
    }
}

impl NarrowPhase<StaticCollider> for StaticColliders {
    fn intersects(&self, probe: &Circle, other: &StaticCollider) -> Option<Vec2> {
        other.shape.collide(probe)
    }
}

/// Velocity after hitting a surface, given the MTV of the hit.
///
/// The velocity splits into a part along the surface normal and a
/// tangential part. Elasticity reflects the normal part, friction damps the
/// tangential part; the result is added to the incoming velocity as an impulse.
pub fn collision_response(velocity: Vec2, mtv: Vec2, friction: f32, elasticity: f32) -> Vec2 {
    let Some(normal) = (-mtv).try_normalize() else {
        return velocity;
    };

    let n = velocity.dot(normal);
    let mut normal_part = normal * n;
    let tangential_part = velocity - normal_part;

    // Already separating: only friction applies.
    if n > 0.0 {
        normal_part = Vec2::ZERO;
    }

    let response = -(1.0 + elasticity) * normal_part - friction * tangential_part;
    velocity + response
}
