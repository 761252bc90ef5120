use crate::math::vec2::Vec2;

use super::ColliderId;

/// A detected overlap between two colliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub collider_a: ColliderId,
    pub collider_b: ColliderId,
    /// Translation that separates `collider_a` from `collider_b`.
    pub mtv: Vec2,
    /// Either participant is a trigger; no physical response.
    pub is_trigger: bool,
}

impl Contact {
    /// Unit collision normal, pointing from A towards B.
    pub fn normal(&self) -> Vec2 {
        (-self.mtv).normalize()
    }

    /// Penetration depth along the normal.
    pub fn depth(&self) -> f64 {
        self.mtv.magnitude()
    }
}

/// Result of a raycast or collider cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// World-space point where the ray (or the swept shape) first touches.
    pub point: Vec2,
    /// Surface normal of the hit collider at `point`.
    pub normal: Vec2,
    /// Distance travelled along the cast direction.
    pub distance: f64,
    pub collider: ColliderId,
    /// For collider casts, which of the cast colliders made contact.
    pub cast_collider: Option<ColliderId>,
}
