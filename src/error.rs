use thiserror::Error;

use crate::objects::collider::ColliderId;
use crate::world::EntityId;

/// Errors returned by world operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("Unknown entity {0:?}")]
    UnknownEntity(EntityId),

    #[error("Unknown collider {0:?}")]
    UnknownCollider(ColliderId),

    #[error("Entity {0:?} already has a rigid body")]
    BodyAlreadyPresent(EntityId),

    #[error("Entity {0:?} has no rigid body")]
    NoRigidBody(EntityId),

    #[error("Physics layer {0} out of range")]
    InvalidLayer(u8),

    /// A solid collider with no rigid body on its entity or any ancestor.
    /// The collider exists but takes no part in physics.
    #[error("Solid collider {collider:?} on entity {entity:?} has no rigid body owner")]
    NoRigidBodyOwner { collider: ColliderId, entity: EntityId },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
