//! Narrow phase: exact overlap tests and minimum translation vectors.
//!
//! Every `*_mtv` function returns the vector that moves the *first* shape out of
//! the second. Swapping the arguments negates the result, so a pair always
//! agrees on penetration depth. The direction of penetration seen from the
//! first shape, towards the second, is the negated MTV ([`Contact::normal`]).

use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Rectangle, Shape};

use super::aabb::AABB;
use super::manifold::Contact;
use super::ColliderId;

/// Dispatches the pairwise test on the two shape variants.
pub fn shape_mtv(a: &Shape, b: &Shape) -> Option<Vec2> {
    match (a, b) {
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle_mtv(ca, cb),
        (Shape::Rectangle(ra), Shape::Rectangle(rb)) => rect_rect_mtv(&ra.bounds(), &rb.bounds()),
        (Shape::Circle(c), Shape::Rectangle(r)) => circle_rect_mtv(c, &r.bounds()),
        (Shape::Rectangle(r), Shape::Circle(c)) => circle_rect_mtv(c, &r.bounds()).map(|mtv| -mtv),
    }
}

/// Circles overlap when the distance between centers is below the sum of radii.
pub fn circle_circle_mtv(a: &Circle, b: &Circle) -> Option<Vec2> {
    let dist_vec = a.center - b.center;
    let dist_sq = dist_vec.magnitude_squared();
    let radii_sum = a.radius + b.radius;

    if dist_sq >= radii_sum * radii_sum {
        return None;
    }

    let distance = dist_sq.sqrt();
    let direction = if distance > 1e-10 {
        dist_vec / distance
    } else {
        // Concentric circles have no preferred axis
        Vec2::X
    };
    Some(direction * (radii_sum - distance))
}

/// Axis-aligned boxes overlap when both axis projections overlap. The MTV is
/// the smaller of the two axis corrections, x winning ties.
pub fn rect_rect_mtv(a: &AABB, b: &AABB) -> Option<Vec2> {
    let overlap_x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let overlap_y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let delta = a.center() - b.center();
    if overlap_x <= overlap_y {
        Some(Vec2::new(push_sign(delta.x) * overlap_x, 0.0))
    } else {
        Some(Vec2::new(0.0, push_sign(delta.y) * overlap_y))
    }
}

/// Circle against an axis-aligned box, using the box point nearest the circle center.
/// The result moves the circle.
pub fn circle_rect_mtv(circle: &Circle, rect: &AABB) -> Option<Vec2> {
    let closest = rect.clamp_point(circle.center);
    let offset = circle.center - closest;
    let dist_sq = offset.magnitude_squared();

    if dist_sq > 1e-20 {
        if dist_sq >= circle.radius * circle.radius {
            return None;
        }
        let distance = dist_sq.sqrt();
        return Some(offset / distance * (circle.radius - distance));
    }

    // Center is inside the box: push out through the nearest face.
    let to_left = circle.center.x - rect.min.x;
    let to_right = rect.max.x - circle.center.x;
    let to_bottom = circle.center.y - rect.min.y;
    let to_top = rect.max.y - circle.center.y;

    let (x_depth, x_sign) = if to_left < to_right { (to_left, -1.0) } else { (to_right, 1.0) };
    let (y_depth, y_sign) = if to_bottom < to_top { (to_bottom, -1.0) } else { (to_top, 1.0) };

    if x_depth <= y_depth {
        Some(Vec2::new(x_sign * (x_depth + circle.radius), 0.0))
    } else {
        Some(Vec2::new(0.0, y_sign * (y_depth + circle.radius)))
    }
}

fn push_sign(delta: f64) -> f64 {
    if delta < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Tests two world-space collider shapes. The contact's MTV moves `a` out of `b`.
pub fn detect(
    collider_a: ColliderId,
    shape_a: &Shape,
    collider_b: ColliderId,
    shape_b: &Shape,
    is_trigger: bool,
) -> Option<Contact> {
    // Cheap bounds reject before the exact test
    if !shape_a.bounds().overlaps(&shape_b.bounds()) {
        return None;
    }
    shape_mtv(shape_a, shape_b).map(|mtv| Contact {
        collider_a,
        collider_b,
        mtv,
        is_trigger,
    })
}
