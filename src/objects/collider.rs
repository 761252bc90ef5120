use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, Key};

use crate::math::transform::Transform;
use crate::shapes::Shape;
use crate::world::EntityId;

new_key_type! {
    /// Generational handle to a collider stored in the physics world.
    pub struct ColliderId;
}

/// Material density class of a collider. Mass contribution is
/// `weight() * area`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Density {
    Gas,
    Light,
    #[default]
    Normal,
    Heavy,
    Solid,
}

impl Density {
    pub fn weight(self) -> f64 {
        match self {
            Density::Gas => 0.1,
            Density::Light => 0.5,
            Density::Normal => 1.0,
            Density::Heavy => 2.0,
            Density::Solid => 5.0,
        }
    }
}

/// A shape attached to an entity. The shape is stored relative to the entity
/// and re-derived into world space for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub is_trigger: bool,
    pub density: Density,
    pub(crate) entity: EntityId,
    pub(crate) owner: Option<EntityId>,
}

impl Collider {
    /// A solid collider. Solid colliders need a rigid body on their entity or
    /// on an ancestor to take part in physics.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            is_trigger: false,
            density: Density::default(),
            entity: EntityId::null(),
            owner: None,
        }
    }

    /// A trigger collider: reports overlaps, never pushes anything.
    pub fn trigger(shape: impl Into<Shape>) -> Self {
        Self { is_trigger: true, ..Self::new(shape) }
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    /// Entity the collider is attached to.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Entity that owns the collider for physics purposes: the nearest rigid
    /// body up the parent chain, or the trigger's own entity. `None` while the
    /// collider is unregistered.
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn is_solid(&self) -> bool {
        !self.is_trigger
    }

    /// World-space shape under the attached entity's absolute transform.
    pub fn world_shape(&self, transform: &Transform) -> Shape {
        self.shape.derived(transform)
    }

    /// Mass this collider adds to its owner under `transform`.
    pub fn mass(&self, transform: &Transform) -> f64 {
        self.density.weight() * self.world_shape(transform).area()
    }
}
