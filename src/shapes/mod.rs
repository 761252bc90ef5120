pub mod circle;
pub mod rectangle;

pub use circle::Circle;
pub use rectangle::Rectangle;

use rand::Rng;

use crate::collision::{detection, AABB};
use crate::math::transform::{wrap_angle, Transform};
use crate::math::vec2::Vec2;

/// Points this close outside a boundary still count as contained.
pub(crate) const CONTAINS_TOLERANCE: f64 = 1e-9;

/// Geometry attached to a collider. Stored in body-local space; a world-space
/// copy is derived fresh for every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Rectangle(Rectangle),
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle(Circle::with_radius(radius))
    }

    pub fn rectangle(width: f64, height: f64) -> Self {
        Shape::Rectangle(Rectangle::with_size(width, height))
    }

    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.area(),
            Shape::Rectangle(r) => r.area(),
        }
    }

    /// Smallest extent of the shape: diameter for circles, shorter side for rectangles.
    pub fn min_dimension(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.diameter(),
            Shape::Rectangle(r) => r.width.min(r.height),
        }
    }

    pub fn max_dimension(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.diameter(),
            Shape::Rectangle(r) => r.width.max(r.height),
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Rectangle(r) => r.center,
        }
    }

    pub fn bounds(&self) -> AABB {
        match self {
            Shape::Circle(c) => c.bounds(),
            Shape::Rectangle(r) => r.bounds(),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle(c) => c.contains(point),
            Shape::Rectangle(r) => r.contains(point),
        }
    }

    /// Scales about the entity origin. Negative factors mirror the shape.
    pub fn scale(&mut self, factors: Vec2) {
        match self {
            Shape::Circle(c) => c.scale(factors),
            Shape::Rectangle(r) => r.scale(factors),
        }
    }

    /// Rotates about the entity origin.
    pub fn rotate(&mut self, angle: f64) {
        match self {
            Shape::Circle(c) => c.center = c.center.rotate(angle),
            Shape::Rectangle(r) => {
                r.center = r.center.rotate(angle);
                r.rotation = wrap_angle(r.rotation + angle);
            }
        }
    }

    pub fn displace(&mut self, offset: Vec2) {
        match self {
            Shape::Circle(c) => c.center += offset,
            Shape::Rectangle(r) => r.center += offset,
        }
    }

    /// World-space copy: scale, then rotation, then translation of `transform`.
    pub fn derived(&self, transform: &Transform) -> Shape {
        let mut shape = *self;
        shape.scale(transform.scale);
        shape.rotate(transform.rotation);
        shape.displace(transform.position);
        shape
    }

    /// Uniformly distributed point inside the shape.
    pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self {
            Shape::Circle(c) => c.sample_point(rng),
            Shape::Rectangle(r) => r.sample_point(rng),
        }
    }

    /// Minimum translation vector that moves `self` out of `other`, or `None`
    /// when the shapes do not overlap.
    pub fn mtv(&self, other: &Shape) -> Option<Vec2> {
        detection::shape_mtv(self, other)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Rectangle> for Shape {
    fn from(rectangle: Rectangle) -> Self {
        Shape::Rectangle(rectangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_shape_dimensions() {
        let c = Shape::circle(1.5);
        assert_eq!(c.min_dimension(), 3.0);
        assert_eq!(c.max_dimension(), 3.0);

        let r = Shape::rectangle(4.0, 0.5);
        assert_eq!(r.min_dimension(), 0.5);
        assert_eq!(r.max_dimension(), 4.0);
        assert!((r.area() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_shape_derived_applies_scale_rotation_translation() {
        let local = Shape::Rectangle(Rectangle::new(Vec2::new(1.0, 0.0), 2.0, 1.0));
        let transform = Transform::new(Vec2::new(10.0, 0.0), PI / 2.0).with_scale(Vec2::new(2.0, 2.0));
        let world = local.derived(&transform);
        match world {
            Shape::Rectangle(r) => {
                assert!((r.center.x - 10.0).abs() < EPSILON);
                assert!((r.center.y - 2.0).abs() < EPSILON);
                assert!((r.width - 4.0).abs() < EPSILON);
                assert!((r.height - 2.0).abs() < EPSILON);
                assert!((r.rotation - PI / 2.0).abs() < EPSILON);
            }
            Shape::Circle(_) => panic!("derived shape changed variant"),
        }
        // The local shape is untouched.
        assert_eq!(local.center(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_shape_derived_mirrors_offset_under_flipped_scale() {
        let local = Shape::Circle(Circle::new(Vec2::new(0.5, 0.25), 0.5));
        let transform = Transform::from_position(Vec2::new(3.0, 0.0)).with_scale(Vec2::new(-1.0, 1.0));
        let world = local.derived(&transform);
        assert!((world.center().x - 2.5).abs() < EPSILON);
        assert!((world.center().y - 0.25).abs() < EPSILON);
    }

    #[test]
    #[should_panic]
    fn test_shape_derived_under_zero_scale_panics() {
        let transform = Transform::identity().with_scale(Vec2::new(1.0, 0.0));
        Shape::rectangle(1.0, 1.0).derived(&transform);
    }

    #[test]
    fn test_sample_point_is_contained() {
        let mut rng = StdRng::seed_from_u64(7);
        let shapes = [
            Shape::Circle(Circle::new(Vec2::new(2.0, -1.0), 1.5)),
            Shape::Rectangle(Rectangle::new(Vec2::new(-3.0, 4.0), 2.0, 0.5)),
            Shape::Rectangle(Rectangle::new(Vec2::new(1.0, 1.0), 3.0, 1.0).rotated_by(0.7)),
        ];
        for shape in shapes {
            for _ in 0..1000 {
                let p = shape.sample_point(&mut rng);
                assert!(shape.contains(p), "{shape:?} does not contain sampled {p:?}");
            }
        }
    }
}
