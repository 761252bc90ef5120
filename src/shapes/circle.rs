use std::f64::consts::PI;

use rand::Rng;

use crate::collision::AABB;
use crate::math::vec2::Vec2;

use super::CONTAINS_TOLERANCE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Offset from the owning entity's origin (world position once derived).
    pub center: Vec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Vec2, radius: f64) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "Circle radius must be positive, got {radius}"
        );
        Self { center, radius }
    }

    /// Circle centered on the entity origin.
    pub fn with_radius(radius: f64) -> Self {
        Self::new(Vec2::ZERO, radius)
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius + CONTAINS_TOLERANCE
    }

    pub fn bounds(&self) -> AABB {
        AABB::from_center(self.center, Vec2::new(self.diameter(), self.diameter()))
    }

    /// Scales the offset component-wise. A circle stays a circle, so the radius
    /// grows by the larger absolute factor. Panics if the radius collapses.
    pub fn scale(&mut self, factors: Vec2) {
        self.center = self.center.scale(factors);
        self.radius *= factors.x.abs().max(factors.y.abs());
        assert!(
            self.radius.is_finite() && self.radius > 0.0,
            "Scaled circle radius must be positive, got {} under {factors:?}",
            self.radius
        );
    }

    /// Uniformly distributed point inside the circle.
    pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        // sqrt keeps the density uniform over the area rather than the radius
        let r = self.radius * rng.gen::<f64>().sqrt();
        let theta = rng.gen_range(0.0..2.0 * PI);
        self.center + Vec2::from_angle(theta) * r
    }
}
