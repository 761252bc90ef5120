use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Position, rotation and scale of an entity relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64, // Angle in radians
    pub scale: Vec2,
}

impl Transform {
    /// Creates a new unscaled transform.
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self { position, rotation, scale: Vec2::ONE }
    }

    /// Creates an identity transform (no translation, no rotation, unit scale).
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    pub fn from_position(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Whether the scale mirrors space (exactly one axis negative).
    pub fn is_mirrored(&self) -> bool {
        (self.scale.x < 0.0) != (self.scale.y < 0.0)
    }

    /// Applies the transform (scale, then rotation, then translation) to a point.
    pub fn apply(self, point: Vec2) -> Vec2 {
        point.scale(self.scale).rotate(self.rotation) + self.position
    }

    /// Applies the inverse transform to a point. `None` if a scale axis is zero.
    pub fn apply_inverse(self, point: Vec2) -> Option<Vec2> {
        self.inverse_vector(point - self.position)
    }

    /// Maps a world-space displacement into this transform's local space.
    /// `None` if a scale axis is zero.
    pub fn inverse_vector(self, vector: Vec2) -> Option<Vec2> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        let unrotated = vector.rotate(-self.rotation);
        Some(Vec2::new(unrotated.x / self.scale.x, unrotated.y / self.scale.y))
    }

    /// Composes a child's local transform onto this (parent) transform.
    pub fn compose(self, local: Transform) -> Transform {
        let rotation = if self.is_mirrored() {
            self.rotation - local.rotation
        } else {
            self.rotation + local.rotation
        };
        Transform {
            position: self.apply(local.position),
            rotation: wrap_angle(rotation),
            scale: self.scale.scale(local.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Wraps an angle in radians to the range [-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_transform_apply_combined() {
        // Rotation of (1,0) -> (0,1), then translation -> (10, 6)
        let t = Transform::new(Vec2::new(10.0, 5.0), PI / 2.0);
        let tp = t.apply(Vec2::new(1.0, 0.0));
        assert!((tp.x - 10.0).abs() < EPSILON);
        assert!((tp.y - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_transform_apply_scaled() {
        let t = Transform::new(Vec2::new(1.0, 1.0), 0.0).with_scale(Vec2::new(2.0, -3.0));
        let tp = t.apply(Vec2::new(1.0, 1.0));
        assert!((tp.x - 3.0).abs() < EPSILON);
        assert!((tp.y - -2.0).abs() < EPSILON);
    }

    #[test]
    fn test_transform_apply_inverse_round_trip() {
        let t = Transform::new(Vec2::new(10.0, 5.0), PI / 4.0).with_scale(Vec2::new(2.0, 0.5));
        let p_local = Vec2::new(1.0, 1.0);
        let p_local_again = t.apply_inverse(t.apply(p_local)).unwrap();
        assert!((p_local_again.x - p_local.x).abs() < EPSILON);
        assert!((p_local_again.y - p_local.y).abs() < EPSILON);
    }

    #[test]
    fn test_transform_inverse_of_collapsed_scale() {
        let t = Transform::new(Vec2::new(1.0, 1.0), 0.3).with_scale(Vec2::new(0.0, 2.0));
        assert_eq!(t.apply_inverse(Vec2::new(2.0, 2.0)), None);
        assert_eq!(t.inverse_vector(Vec2::X), None);
    }

    #[test]
    fn test_transform_compose_parent_child() {
        let parent = Transform::new(Vec2::new(5.0, 0.0), PI / 2.0);
        let child = Transform::new(Vec2::new(1.0, 0.0), 0.25);
        let world = parent.compose(child);
        assert!((world.position.x - 5.0).abs() < EPSILON);
        assert!((world.position.y - 1.0).abs() < EPSILON);
        assert!((world.rotation - (PI / 2.0 + 0.25)).abs() < EPSILON);
        assert_eq!(world.scale, Vec2::ONE);
    }

    #[test]
    fn test_transform_compose_mirrored_parent_flips_child_rotation() {
        let parent = Transform::identity().with_scale(Vec2::new(-1.0, 1.0));
        let child = Transform::new(Vec2::new(2.0, 0.0), 0.3);
        let world = parent.compose(child);
        assert!((world.position.x - -2.0).abs() < EPSILON);
        assert!((world.rotation - -0.3).abs() < EPSILON);
        assert!(world.is_mirrored());
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.0) - 0.0).abs() < EPSILON);
        assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < EPSILON);
        assert!((wrap_angle(-PI - 0.1) - (PI - 0.1)).abs() < EPSILON);
        assert!((wrap_angle(2.0 * PI) - 0.0).abs() < EPSILON);
    }
}
