pub mod collider;
pub mod rigid_body;

pub use collider::{Collider, ColliderId, Density};
pub use rigid_body::{BodyType, RigidBody};
