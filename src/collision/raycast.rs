//! Ray and swept-shape queries against single shapes.
//!
//! Directions are expected to be unit length. Rectangles are tested through
//! their axis-aligned bounds, like the narrow phase.

use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Shape};

use super::aabb::AABB;

/// First contact of a swept shape with a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub distance: f64,
    /// Target surface normal, facing the moving shape.
    pub normal: Vec2,
    /// Contact point on the target surface.
    pub point: Vec2,
}

/// Ray against a circle. A ray starting inside reports distance `0`.
pub fn ray_circle(origin: Vec2, direction: Vec2, center: Vec2, radius: f64) -> Option<(f64, Vec2)> {
    let oc = origin - center;
    let c = oc.dot(oc) - radius * radius;
    if c <= 0.0 {
        return Some((0.0, -direction));
    }

    let b = oc.dot(direction);
    if b > 0.0 {
        // Outside and pointing away
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    let normal = (origin + direction * t - center).normalize();
    Some((t.max(0.0), normal))
}

/// Ray against any shape. Returns the entry distance and surface normal.
pub fn ray_shape(origin: Vec2, direction: Vec2, shape: &Shape) -> Option<(f64, Vec2)> {
    match shape {
        Shape::Circle(c) => ray_circle(origin, direction, c.center, c.radius),
        Shape::Rectangle(r) => r.bounds().ray_intersection(origin, direction),
    }
}

/// Sweeps `moving` along `direction` until it first touches `target`.
/// Shapes that already overlap report distance `0`.
pub fn sweep_shape(moving: &Shape, direction: Vec2, target: &Shape) -> Option<SweepHit> {
    match (moving, target) {
        (Shape::Circle(a), Shape::Circle(b)) => {
            let (distance, normal) = ray_circle(a.center, direction, b.center, a.radius + b.radius)?;
            let normal = if distance == 0.0 { (a.center - b.center).normalize() } else { normal };
            Some(SweepHit { distance, normal, point: b.center + normal * b.radius })
        }
        (Shape::Circle(a), Shape::Rectangle(r)) => sweep_circle_box(a, direction, &r.bounds()),
        (Shape::Rectangle(r), Shape::Circle(c)) => {
            // Relative motion: the circle sweeping backwards into the box.
            let hit = sweep_circle_box(c, -direction, &r.bounds())?;
            let normal = -hit.normal;
            Some(SweepHit { distance: hit.distance, normal, point: c.center + normal * c.radius })
        }
        (Shape::Rectangle(a), Shape::Rectangle(b)) => {
            let a_bounds = a.bounds();
            let target = b.bounds();
            let expanded = target.expanded(a_bounds.half_extents());
            let (distance, normal) = expanded.ray_intersection(a_bounds.center(), direction)?;
            let moved_center = a_bounds.center() + direction * distance;
            Some(SweepHit { distance, normal, point: target.clamp_point(moved_center) })
        }
    }
}

/// Circle swept against a box: the ray from the circle center against the box
/// grown by the radius, with rounded corners.
fn sweep_circle_box(circle: &Circle, direction: Vec2, target: &AABB) -> Option<SweepHit> {
    let origin = circle.center;
    let r = circle.radius;

    let wide = AABB::new(target.min - Vec2::new(r, 0.0), target.max + Vec2::new(r, 0.0));
    let tall = AABB::new(target.min - Vec2::new(0.0, r), target.max + Vec2::new(0.0, r));
    let corners = [
        target.min,
        Vec2::new(target.max.x, target.min.y),
        target.max,
        Vec2::new(target.min.x, target.max.y),
    ];

    let mut best: Option<(f64, Vec2)> = None;
    let mut consider = |candidate: Option<(f64, Vec2)>| {
        if let Some((t, n)) = candidate {
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, n));
            }
        }
    };
    consider(wide.ray_intersection(origin, direction));
    consider(tall.ray_intersection(origin, direction));
    for corner in corners {
        consider(ray_circle(origin, direction, corner, r));
    }

    let (distance, mut normal) = best?;
    let moved_center = origin + direction * distance;
    let point = target.clamp_point(moved_center);
    if distance == 0.0 {
        let away = moved_center - point;
        normal = if away.magnitude_squared() > 1e-20 { away.normalize() } else { -direction };
    }
    Some(SweepHit { distance, normal, point })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_circle_hit_and_miss() {
        let (t, n) = ray_circle(Vec2::ZERO, Vec2::X, Vec2::new(5.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-9);
        assert_relative_eq!(n.x, -1.0, epsilon = 1e-9);

        assert!(ray_circle(Vec2::ZERO, -Vec2::X, Vec2::new(5.0, 0.0), 1.0).is_none());
        assert!(ray_circle(Vec2::new(0.0, 2.0), Vec2::X, Vec2::new(5.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_shape_rectangle_slab() {
        let wall = Shape::Rectangle(Rectangle::new(Vec2::new(5.5, 0.0), 1.0, 2.0));
        let (t, n) = ray_shape(Vec2::ZERO, Vec2::X, &wall).unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-9);
        assert_eq!(n, -Vec2::X);
    }

    #[test]
    fn test_sweep_circle_into_thin_wall() {
        let ball = Shape::Circle(Circle::new(Vec2::ZERO, 0.5));
        let wall = Shape::Rectangle(Rectangle::new(Vec2::new(5.0, 0.0), 0.2, 4.0));
        let hit = sweep_shape(&ball, Vec2::X, &wall).unwrap();
        assert_relative_eq!(hit.distance, 4.4, epsilon = 1e-9);
        assert_eq!(hit.normal, -Vec2::X);
        assert_relative_eq!(hit.point.x, 4.9, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_circle_rounded_corner() {
        // Passes (1.45, 1.45): inside the square-expanded box, outside the rounded one.
        let ball = Shape::Circle(Circle::new(Vec2::new(0.45, 2.45), 0.5));
        let target = Shape::Rectangle(Rectangle::new(Vec2::ZERO, 2.0, 2.0));
        let direction = Vec2::new(1.0, -1.0).normalize();
        assert!(sweep_shape(&ball, direction, &target).is_none());

        let square = AABB::new(Vec2::new(-1.5, -1.5), Vec2::new(1.5, 1.5));
        assert!(square.ray_intersection(Vec2::new(0.45, 2.45), direction).is_some());
    }

    #[test]
    fn test_sweep_circle_circle() {
        let a = Shape::Circle(Circle::new(Vec2::ZERO, 1.0));
        let b = Shape::Circle(Circle::new(Vec2::new(10.0, 0.0), 2.0));
        let hit = sweep_shape(&a, Vec2::X, &b).unwrap();
        assert_relative_eq!(hit.distance, 7.0, epsilon = 1e-9);
        assert_relative_eq!(hit.point.x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_rect_into_circle_matches_reverse() {
        let crate_box = Shape::Rectangle(Rectangle::new(Vec2::ZERO, 2.0, 2.0));
        let ball = Shape::Circle(Circle::new(Vec2::new(6.0, 0.0), 1.0));
        let hit = sweep_shape(&crate_box, Vec2::X, &ball).unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-9);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(hit.point.x, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_rect_rect() {
        let a = Shape::Rectangle(Rectangle::new(Vec2::ZERO, 1.0, 1.0));
        let b = Shape::Rectangle(Rectangle::new(Vec2::new(0.0, -5.0), 4.0, 1.0));
        let hit = sweep_shape(&a, -Vec2::Y, &b).unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-9);
        assert_eq!(hit.normal, Vec2::Y);
        assert_relative_eq!(hit.point.y, -4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_starting_overlap_reports_zero() {
        let a = Shape::Circle(Circle::new(Vec2::ZERO, 1.0));
        let b = Shape::Circle(Circle::new(Vec2::new(1.0, 0.0), 1.0));
        let hit = sweep_shape(&a, Vec2::X, &b).unwrap();
        assert_eq!(hit.distance, 0.0);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-9);
    }
}
