//! Surface properties used by collision response.

use serde::{Deserialize, Serialize};

/// Physical surface of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Coefficient of restitution. 0 = no bounce, 1 = perfectly elastic.
    pub elasticity: f64,
    /// Coulomb friction coefficient applied along the contact tangent.
    pub friction: f64,
}

impl Material {
    /// Creates a new material. Elasticity is clamped to [0, 1], friction to [0, inf).
    pub fn new(elasticity: f64, friction: f64) -> Self {
        Material {
            elasticity: elasticity.clamp(0.0, 1.0),
            friction: friction.max(0.0),
        }
    }

    /// Restitution of a contact between two materials: the bouncier one wins.
    pub fn combined_elasticity(&self, other: &Material) -> f64 {
        self.elasticity.max(other.elasticity)
    }

    /// Friction coefficient of a contact: the average of both surfaces.
    pub fn combined_friction(&self, other: &Material) -> f64 {
        (self.friction + other.friction) * 0.5
    }
}

impl Default for Material {
    /// No bounce, moderate friction.
    fn default() -> Self {
        Material {
            elasticity: 0.0,
            friction: 0.3,
        }
    }
}
