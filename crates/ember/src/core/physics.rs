use glam::Vec2;
use rapier2d::parry::bounding_volume::{Aabb, BoundingVolume};
use rapier2d::parry::query;
use rapier2d::parry::shape::Ball;
use rapier2d::prelude::*;

use crate::core::collision::{BroadPhase, NarrowPhase};
use crate::core::shapes::{Circle, CONTACT_EPSILON};

// ---------------------------------------------------------------------------
// Conversion helpers (private), glam to nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn circle_aabb(circle: &Circle) -> Aabb {
    let r = circle.radius;
    Aabb::new(
        nalgebra::Point2::new(circle.center.x - r, circle.center.y - r),
        nalgebra::Point2::new(circle.center.x + r, circle.center.y + r),
    )
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Shape description for an obstacle collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
    CapsuleY { half_height: f32, radius: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
            ColliderDesc::CapsuleY { half_height, radius } => {
                ColliderBuilder::capsule_y(half_height, radius)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Static rapier colliders that particles bounce off.
///
/// Each collider carries a 32-bit layer membership; particle queries only
/// see colliders whose membership shares a bit with the query mask.
pub struct PhysicsWorld {
    colliders: ColliderSet,
    bodies: RigidBodySet,
    island_manager: IslandManager,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            colliders: ColliderSet::new(),
            bodies: RigidBodySet::new(),
            island_manager: IslandManager::new(),
        }
    }

    /// Insert a fixed collider at `position` rotated by `rotation` radians.
    pub fn add_collider(
        &mut self,
        desc: ColliderDesc,
        position: Vec2,
        rotation: f32,
        layers: u32,
    ) -> ColliderHandle {
        let collider = desc
            .build_collider()
            .translation(vec2_to_na(position))
            .rotation(rotation)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(layers),
                Group::ALL,
            ))
            .build();
        self.colliders.insert(collider)
    }

    /// Remove a collider. Returns false if it was already gone.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        self.colliders
            .remove(handle, &mut self.island_manager, &mut self.bodies, false)
            .is_some()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadPhase for PhysicsWorld {
    type Collider = Collider;

    fn query_neighbors(&self, bounds: &Circle, layer_mask: u32) -> Vec<&Collider> {
        let area = circle_aabb(bounds);
        self.colliders
            .iter()
            .map(|(_, collider)| collider)
            .filter(|collider| {
                collider.collision_groups().memberships.bits() & layer_mask != 0
                    && collider.compute_aabb().intersects(&area)
            })
            .collect()
    }
}

impl NarrowPhase<Collider> for PhysicsWorld {
    fn intersects(&self, probe: &Circle, other: &Collider) -> Option<Vec2> {
        let ball = Ball::new(probe.radius);
        let probe_pos = nalgebra::Isometry2::translation(probe.center.x, probe.center.y);
        let contact = query::contact(&probe_pos, &ball, other.position(), other.shape(), 0.0)
            .ok()
            .flatten()?;

        // `dist` is negative while penetrating; `normal1` points out of the probe.
        let depth = -contact.dist;
        if depth <= CONTACT_EPSILON {
            return None;
        }
        Some(na_to_vec2(&contact.normal1) * depth)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
