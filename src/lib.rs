//! 2D rigid-body physics and collision core: circle and axis-aligned
//! rectangle colliders, impulse response, triggers, swept detection for fast
//! bodies and enter/stay/exit collision events.

pub mod collision;
pub mod common;
pub mod config;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{
    CollisionData, CollisionEvent, CollisionEventKind, CollisionFilter, CollisionListener, LayerMatrix, PairKey,
    PhysicsLayer, RaycastHit,
};
pub use common::Material;
pub use config::{ConfigError, PhysicsConfig};
pub use error::{PhysicsError, PhysicsResult};
pub use math::{Transform, Vec2};
pub use objects::{BodyType, Collider, ColliderId, Density, RigidBody};
pub use shapes::{Circle, Rectangle, Shape};
pub use world::{EntityId, FixedTimestep, FrameSteps, PhysicsWorld, Scene};
