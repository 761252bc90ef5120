pub mod integrator;

pub use integrator::{apply_friction, integrate};
