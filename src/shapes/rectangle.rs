use rand::Rng;

use crate::collision::AABB;
use crate::math::transform::wrap_angle;
use crate::math::vec2::Vec2;

use super::CONTAINS_TOLERANCE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Offset from the owning entity's origin (world position once derived).
    pub center: Vec2,
    pub width: f64,
    pub height: f64,
    /// Radians, about `center`.
    pub rotation: f64,
}

impl Rectangle {
    pub fn new(center: Vec2, width: f64, height: f64) -> Self {
        assert!(
            width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "Rectangle dimensions must be positive, got {width}x{height}"
        );
        Self { center, width, height, rotation: 0.0 }
    }

    /// Rectangle centered on the entity origin.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(Vec2::ZERO, width, height)
    }

    pub fn rotated_by(mut self, rotation: f64) -> Self {
        self.rotation = wrap_angle(rotation);
        self
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// World corners, counter-clockwise starting bottom-left in local space.
    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.half_extents();
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|corner| self.center + corner.rotate(self.rotation))
    }

    /// Axis-aligned bounds. Collision tests treat rectangles as these bounds.
    pub fn bounds(&self) -> AABB {
        if self.rotation == 0.0 {
            return AABB::from_center(self.center, Vec2::new(self.width, self.height));
        }
        let corners = self.corners();
        AABB::from_points(&corners)
            .unwrap_or_else(|| AABB::from_center(self.center, Vec2::new(self.width, self.height)))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let local = (point - self.center).rotate(-self.rotation);
        let h = self.half_extents();
        local.x.abs() <= h.x + CONTAINS_TOLERANCE && local.y.abs() <= h.y + CONTAINS_TOLERANCE
    }

    /// Applies a (possibly negative) scale about the entity origin.
    ///
    /// A negative factor reflects the offset across that axis. The reflection
    /// also mirrors the orientation: the rectangle's local x-axis `(cos r, sin r)`
    /// maps to `(sx cos r, sy sin r)`, whose angle becomes the new rotation. For a
    /// single flipped axis that is a half-turn composed with negating the angle.
    ///
    /// Panics if either side collapses.
    pub fn scale(&mut self, factors: Vec2) {
        self.center = self.center.scale(factors);
        self.width *= factors.x.abs();
        self.height *= factors.y.abs();
        assert!(
            self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0,
            "Scaled rectangle dimensions must be positive, got {}x{} under {factors:?}",
            self.width,
            self.height
        );

        let flip_x = factors.x < 0.0;
        let flip_y = factors.y < 0.0;
        if flip_x || flip_y {
            let axis = Vec2::from_angle(self.rotation);
            let mirrored = Vec2::new(
                if flip_x { -axis.x } else { axis.x },
                if flip_y { -axis.y } else { axis.y },
            );
            self.rotation = wrap_angle(mirrored.angle());
        }
    }

    /// Uniformly distributed point inside the rectangle.
    pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let h = self.half_extents();
        let local = Vec2::new(rng.gen_range(-h.x..=h.x), rng.gen_range(-h.y..=h.y));
        self.center + local.rotate(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_rectangle_area_and_bounds() {
        let r = Rectangle::new(Vec2::new(1.0, 1.0), 4.0, 2.0);
        assert!((r.area() - 8.0).abs() < EPSILON);
        let b = r.bounds();
        assert_eq!(b.min, Vec2::new(-1.0, 0.0));
        assert_eq!(b.max, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_rotated_rectangle_bounds_swap_extents() {
        let r = Rectangle::with_size(4.0, 2.0).rotated_by(PI / 2.0);
        let b = r.bounds();
        assert!((b.size().x - 2.0).abs() < EPSILON);
        assert!((b.size().y - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_rectangle_contains_respects_rotation() {
        let r = Rectangle::with_size(4.0, 0.5).rotated_by(PI / 2.0);
        assert!(r.contains(Vec2::new(0.0, 1.9)));
        assert!(!r.contains(Vec2::new(1.9, 0.0)));
    }

    #[test]
    #[should_panic]
    fn test_rectangle_zero_width_panics() {
        Rectangle::with_size(0.0, 1.0);
    }

    #[test]
    #[should_panic]
    fn test_rectangle_zero_scale_panics() {
        Rectangle::with_size(2.0, 1.0).scale(Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_rectangle_negative_x_scale_mirrors_offset_and_rotation() {
        let mut r = Rectangle::new(Vec2::new(2.0, 1.0), 2.0, 1.0).rotated_by(0.3);
        r.scale(Vec2::new(-1.0, 1.0));
        assert_eq!(r.center, Vec2::new(-2.0, 1.0));
        assert!((r.rotation - (PI - 0.3)).abs() < EPSILON);
        assert_eq!((r.width, r.height), (2.0, 1.0));

        // A mirrored corner must land on the reflection of the original corner.
        let original = Rectangle::new(Vec2::new(2.0, 1.0), 2.0, 1.0).rotated_by(0.3);
        let reflected: Vec<Vec2> = original.corners().iter().map(|c| Vec2::new(-c.x, c.y)).collect();
        for corner in r.corners() {
            assert!(reflected.iter().any(|c| c.distance(corner) < 1e-9));
        }
    }

    #[test]
    fn test_rectangle_negative_y_scale_negates_rotation() {
        let mut r = Rectangle::with_size(2.0, 1.0).rotated_by(0.4);
        r.scale(Vec2::new(1.0, -2.0));
        assert!((r.rotation - -0.4).abs() < EPSILON);
        assert!((r.height - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_rectangle_double_flip_is_half_turn() {
        let mut r = Rectangle::new(Vec2::new(1.0, 1.0), 2.0, 1.0).rotated_by(0.4);
        r.scale(Vec2::new(-1.0, -1.0));
        assert_eq!(r.center, Vec2::new(-1.0, -1.0));
        assert!((wrap_angle(r.rotation - (0.4 + PI))).abs() < EPSILON);
    }
}
