//! Impulse-based response for solid contacts.

use log::trace;

use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;

/// Tangential speeds below this are treated as no sliding.
const TANGENT_EPSILON: f64 = 1e-9;

/// Position corrections produced for the two bodies of a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub correction_a: Vec2,
    pub correction_b: Vec2,
}

/// Resolves a solid contact where `mtv` moves `a` out of `b`.
///
/// The MTV is split by inverse-mass share, then a normal impulse (restitution
/// from [`Material::combined_elasticity`](crate::common::Material::combined_elasticity))
/// and a Coulomb friction impulse are applied to the velocities. Returns `None`
/// when both bodies are immovable.
pub fn resolve(a: &mut RigidBody, b: &mut RigidBody, mtv: Vec2) -> Option<Resolution> {
    let inv_mass_a = a.inv_mass();
    let inv_mass_b = b.inv_mass();
    let inv_mass_sum = inv_mass_a + inv_mass_b;
    if inv_mass_sum <= 0.0 {
        return None;
    }

    let correction_a = mtv * (inv_mass_a / inv_mass_sum);
    let correction_b = -mtv * (inv_mass_b / inv_mass_sum);

    let normal = (-mtv).normalize();
    if normal != Vec2::ZERO {
        apply_contact_impulse(a, b, normal);
    }

    Some(Resolution { correction_a, correction_b })
}

/// Velocity response along `normal`, a unit vector pointing from `a` to `b`.
/// Does nothing when the bodies are already separating.
pub fn apply_contact_impulse(a: &mut RigidBody, b: &mut RigidBody, normal: Vec2) {
    let inv_mass_a = a.inv_mass();
    let inv_mass_b = b.inv_mass();
    let inv_mass_sum = inv_mass_a + inv_mass_b;
    if inv_mass_sum <= 0.0 {
        return;
    }

    let relative_velocity = b.velocity - a.velocity;
    let velocity_along_normal = relative_velocity.dot(normal);
    if velocity_along_normal > 0.0 {
        return;
    }

    let e = a.material.combined_elasticity(&b.material);
    let j = -(1.0 + e) * velocity_along_normal / inv_mass_sum;
    let impulse = normal * j;
    a.velocity -= impulse * inv_mass_a;
    b.velocity += impulse * inv_mass_b;

    trace!(
        "Contact impulse: normal={:?} vn={:.4} e={:.2} j={:.4}",
        normal,
        velocity_along_normal,
        e,
        j
    );

    // Friction against the post-impulse sliding velocity
    let relative_velocity = b.velocity - a.velocity;
    let tangent_velocity = relative_velocity - normal * relative_velocity.dot(normal);
    if tangent_velocity.magnitude_squared() < TANGENT_EPSILON * TANGENT_EPSILON {
        return;
    }
    let tangent = tangent_velocity.normalize();
    let mu = a.material.combined_friction(&b.material);
    // Capped at the impulse that stops sliding, so friction never reverses it
    let jt = (-relative_velocity.dot(tangent) / inv_mass_sum).clamp(-mu * j, mu * j);
    let friction_impulse = tangent * jt;
    a.velocity -= friction_impulse * inv_mass_a;
    b.velocity += friction_impulse * inv_mass_b;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Material;
    use approx::assert_relative_eq;
    const EPSILON: f64 = 1e-9;

    fn frictionless(elasticity: f64) -> Material {
        Material::new(elasticity, 0.0)
    }

    #[test]
    fn test_static_absorbs_no_correction() {
        let mut ball = RigidBody::dynamic().with_mass(2.0).with_velocity(Vec2::new(0.0, 5.0));
        let mut floor = RigidBody::fixed();
        // Ball above the floor (y grows down), pushed up out of it
        let resolution = resolve(&mut ball, &mut floor, Vec2::new(0.0, -0.25)).unwrap();

        assert_eq!(resolution.correction_b, Vec2::ZERO);
        assert_relative_eq!(resolution.correction_a.y, -0.25, epsilon = EPSILON);
        assert_eq!(floor.velocity, Vec2::ZERO);
        assert!(ball.velocity.y.abs() < EPSILON);
    }

    #[test]
    fn test_equal_masses_split_correction() {
        let mut a = RigidBody::dynamic().with_mass(1.0);
        let mut b = RigidBody::dynamic().with_mass(1.0);
        let resolution = resolve(&mut a, &mut b, Vec2::new(-0.5, 0.0)).unwrap();
        assert_relative_eq!(resolution.correction_a.x, -0.25, epsilon = EPSILON);
        assert_relative_eq!(resolution.correction_b.x, 0.25, epsilon = EPSILON);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let mut light = RigidBody::dynamic().with_mass(1.0);
        let mut heavy = RigidBody::dynamic().with_mass(3.0);
        let resolution = resolve(&mut light, &mut heavy, Vec2::new(1.0, 0.0)).unwrap();
        assert_relative_eq!(resolution.correction_a.x, 0.75, epsilon = EPSILON);
        assert_relative_eq!(resolution.correction_b.x, -0.25, epsilon = EPSILON);
    }

    #[test]
    fn test_both_immovable_is_skipped() {
        let mut wall = RigidBody::fixed();
        let mut platform = RigidBody::kinematic().with_velocity(Vec2::new(1.0, 0.0));
        assert!(resolve(&mut platform, &mut wall, Vec2::new(-0.1, 0.0)).is_none());
        assert_eq!(platform.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_perfectly_elastic_bounce_reverses_normal_speed() {
        let mut ball = RigidBody::dynamic().with_material(frictionless(1.0)).with_velocity(Vec2::new(0.0, 5.0));
        let mut floor = RigidBody::fixed().with_material(frictionless(1.0));
        resolve(&mut ball, &mut floor, Vec2::new(0.0, -0.1));
        assert_relative_eq!(ball.velocity.y, -5.0, epsilon = EPSILON);
        assert_eq!(ball.velocity.x, 0.0);
    }

    #[test]
    fn test_restitution_takes_the_higher_elasticity() {
        let mut ball = RigidBody::dynamic().with_material(frictionless(0.5)).with_velocity(Vec2::new(0.0, 4.0));
        let mut floor = RigidBody::fixed().with_material(frictionless(0.0));
        resolve(&mut ball, &mut floor, Vec2::new(0.0, -0.1));
        assert_relative_eq!(ball.velocity.y, -2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_separating_bodies_get_no_impulse() {
        let mut ball = RigidBody::dynamic().with_velocity(Vec2::new(0.0, -3.0));
        let mut floor = RigidBody::fixed();
        let resolution = resolve(&mut ball, &mut floor, Vec2::new(0.0, -0.1)).unwrap();
        assert_eq!(ball.velocity, Vec2::new(0.0, -3.0));
        assert_relative_eq!(resolution.correction_a.y, -0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_friction_is_capped_by_normal_impulse() {
        // j = 1 * 2 = 2, mu = 0.25 -> friction impulse at most 0.5
        let mut ball = RigidBody::dynamic()
            .with_material(Material::new(0.0, 0.25))
            .with_velocity(Vec2::new(3.0, 2.0));
        let mut floor = RigidBody::fixed().with_material(Material::new(0.0, 0.25));
        resolve(&mut ball, &mut floor, Vec2::new(0.0, -0.1));
        assert_relative_eq!(ball.velocity.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(ball.velocity.x, 2.5, epsilon = EPSILON);
    }

    #[test]
    fn test_friction_never_reverses_sliding() {
        let mut ball = RigidBody::dynamic()
            .with_material(Material::new(0.0, 10.0))
            .with_velocity(Vec2::new(0.5, 4.0));
        let mut floor = RigidBody::fixed().with_material(Material::new(0.0, 10.0));
        resolve(&mut ball, &mut floor, Vec2::new(0.0, -0.1));
        assert_relative_eq!(ball.velocity.x, 0.0, epsilon = EPSILON);
    }
}
