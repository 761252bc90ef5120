pub mod aabb;
pub mod detection;
pub mod events;
pub mod filter;
pub mod layers;
pub mod manifold;
pub mod raycast;
pub mod registry;
pub mod resolution;

// Re-export key types
pub use crate::objects::collider::ColliderId;
pub use aabb::AABB;
pub use detection::detect;
pub use events::{
    CollisionData, CollisionEvent, CollisionEventKind, CollisionEventTracker, CollisionListener, PairKey,
};
pub use filter::CollisionFilter;
pub use layers::{LayerMatrix, PhysicsLayer};
pub use manifold::{Contact, RaycastHit};
pub use raycast::SweepHit;
pub use registry::ColliderRegistry;
pub use resolution::Resolution;
