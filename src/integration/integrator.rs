use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{BodyType, RigidBody};

/// Advances a body by one step using semi-implicit Euler and returns the
/// world-space displacement to apply to its entity.
///
/// Dynamic bodies take gravity and air friction into their velocity before
/// moving. Kinematic bodies only move. Static bodies never move.
/// `world_position` is recorded as the body's last position for swept checks.
pub fn integrate(body: &mut RigidBody, world_position: Vec2, gravity: Vec2, dt: f64) -> Vec2 {
    body.last_position = world_position;

    match body.body_type() {
        BodyType::Static => Vec2::ZERO,
        BodyType::Kinematic => body.velocity * dt,
        BodyType::Dynamic => {
            body.velocity += gravity.scale(body.gravity_scale) * dt;
            body.velocity = apply_friction(body.velocity, body.air_friction, dt);
            body.velocity * dt
        }
    }
}

/// Decays the speed of `velocity` by `friction` per second without changing its
/// direction. Zero friction leaves it untouched; a friction of one stops it.
pub fn apply_friction(velocity: Vec2, friction: f64, dt: f64) -> Vec2 {
    if friction <= 0.0 {
        return velocity;
    }
    let retained = (1.0 - friction.min(1.0)).powf(dt);
    velocity * retained
}
