pub mod physics_world;
pub mod scene;
pub mod timestep;

pub use physics_world::PhysicsWorld;
pub use scene::{Entity, EntityId, Scene};
pub use timestep::{FixedTimestep, FrameSteps};
