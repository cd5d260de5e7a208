//! Minimal 2D shapes and the narrow-phase tests between them.
//!
//! Every intersection routine returns the minimum translation vector (MTV)
//! pointing from the probe into the obstacle: subtracting it from the
//! probe's position separates the two shapes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Overlaps shallower than this count as touching, not colliding.
pub const CONTACT_EPSILON: f32 = 1e-4;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// World-space circle. Particles collide as circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(self.radius))
    }
}

/// Obstacle shape for the built-in collider set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Circle(Circle),
    Box(Aabb),
}

impl ColliderShape {
    pub fn bounds(&self) -> Aabb {
        match self {
            ColliderShape::Circle(c) => c.bounds(),
            ColliderShape::Box(b) => *b,
        }
    }

    /// MTV of `probe` against this shape, if they overlap.
    pub fn collide(&self, probe: &Circle) -> Option<Vec2> {
        match self {
            ColliderShape::Circle(c) => circle_vs_circle(probe, c),
            ColliderShape::Box(b) => circle_vs_aabb(probe, b),
        }
    }
}

/// Circle-circle overlap.
pub fn circle_vs_circle(probe: &Circle, other: &Circle) -> Option<Vec2> {
    let delta = other.center - probe.center;
    let reach = probe.radius + other.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    let overlap = reach - dist;
    if overlap <= CONTACT_EPSILON {
        return None;
    }
    // Coincident centers have no preferred axis; push along +X.
    let dir = if dist > 0.0 { delta / dist } else { Vec2::X };
    Some(dir * overlap)
}

/// Circle-box overlap, including a circle whose center is inside the box.
pub fn circle_vs_aabb(probe: &Circle, aabb: &Aabb) -> Option<Vec2> {
    let c = probe.center;
    let r = probe.radius;

    if !aabb.contains(c) {
        let closest = c.clamp(aabb.min, aabb.max);
        let to_center = c - closest;
        let dist = to_center.length();
        let overlap = r - dist;
        if overlap <= CONTACT_EPSILON {
            return None;
        }
        return Some(-to_center / dist * overlap);
    }

    // Center inside: leave through the nearest face.
    let left = c.x - aabb.min.x;
    let right = aabb.max.x - c.x;
    let top = c.y - aabb.min.y;
    let bottom = aabb.max.y - c.y;
    let nearest = left.min(right).min(top).min(bottom);
    let mtv = if nearest == left {
        Vec2::new(left + r, 0.0)
    } else if nearest == right {
        Vec2::new(-(right + r), 0.0)
    } else if nearest == top {
        Vec2::new(0.0, top + r)
    } else {
        Vec2::new(0.0, -(bottom + r))
    };
    Some(mtv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circles_apart_do_not_collide() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(3.0, 0.0), 1.0);
        assert_eq!(circle_vs_circle(&a, &b), None);
    }

    #[test]
    fn circle_mtv_points_into_obstacle() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(1.5, 0.0), 1.0);
        let mtv = circle_vs_circle(&a, &b).unwrap();
        assert!((mtv - Vec2::new(0.5, 0.0)).length() < 1e-5);

        let separated = Circle::new(a.center - mtv, a.radius);
        assert_eq!(circle_vs_circle(&separated, &b), None);
    }

    #[test]
    fn circle_against_box_face() {
        let wall = Aabb::new(Vec2::new(0.0, -10.0), Vec2::new(10.0, 10.0));
        let probe = Circle::new(Vec2::new(-0.5, 0.0), 1.0);
        let mtv = circle_vs_aabb(&probe, &wall).unwrap();
        assert!((mtv - Vec2::new(0.5, 0.0)).length() < 1e-5);

        let separated = Circle::new(probe.center - mtv, probe.radius);
        assert_eq!(circle_vs_aabb(&separated, &wall), None);
    }

    #[test]
    fn circle_center_inside_box_leaves_by_nearest_face() {
        let wall = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let probe = Circle::new(Vec2::new(1.0, 5.0), 1.0);
        let mtv = circle_vs_aabb(&probe, &wall).unwrap();
        assert_eq!(mtv, Vec2::new(2.0, 0.0));
        assert_eq!(probe.center - mtv, Vec2::new(-1.0, 5.0));
    }

    #[test]
    fn bounds_overlap() {
        let a = Circle::new(Vec2::ZERO, 2.0).bounds();
        assert!(a.intersects(&Aabb::new(Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0))));
        assert!(!a.intersects(&Aabb::new(Vec2::new(3.0, 3.0), Vec2::new(5.0, 5.0))));
    }
}
