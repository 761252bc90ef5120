use serde::{Deserialize, Serialize};

use crate::common::Material;
use crate::math::vec2::Vec2;

/// How a body moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves.
    Static,
    /// Moves by its own velocity only; ignores gravity and collision response.
    Kinematic,
    /// Fully simulated.
    #[default]
    Dynamic,
}

/// Motion state of an entity. Position lives on the entity transform; the
/// body carries velocity, mass and surface properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    body_type: BodyType,
    pub velocity: Vec2,
    /// Per-axis multiplier on world gravity.
    pub gravity_scale: Vec2,
    pub material: Material,
    /// Fraction of speed lost per second in free flight, in [0, 1].
    pub air_friction: f64,
    /// Sweep the body's trajectory when it moves farther than its smallest
    /// collider dimension in one step.
    pub continuous_collisions: bool,

    mass: f64,
    auto_mass: bool,
    pub(crate) last_position: Vec2,
}

impl RigidBody {
    /// Creates a body whose mass is derived from its colliders.
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            velocity: Vec2::ZERO,
            gravity_scale: Vec2::ONE,
            material: Material::default(),
            air_friction: 0.0,
            continuous_collisions: false,
            mass: 1.0,
            auto_mass: true,
            last_position: Vec2::ZERO,
        }
    }

    pub fn dynamic() -> Self {
        Self::new(BodyType::Dynamic)
    }

    pub fn kinematic() -> Self {
        Self::new(BodyType::Kinematic)
    }

    pub fn fixed() -> Self {
        Self::new(BodyType::Static)
    }

    /// Fixes the mass instead of deriving it from colliders.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: Vec2) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_air_friction(mut self, air_friction: f64) -> Self {
        self.air_friction = air_friction.clamp(0.0, 1.0);
        self
    }

    pub fn with_continuous_collisions(mut self, enabled: bool) -> Self {
        self.continuous_collisions = enabled;
        self
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Changes the motion kind. Colliders must be re-filed by the world.
    pub(crate) fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// Dynamic or kinematic.
    pub fn is_movable(&self) -> bool {
        self.body_type != BodyType::Static
    }

    /// Overrides the mass and disables auto-mass.
    /// Panics if `mass` is not a positive finite number.
    pub fn set_mass(&mut self, mass: f64) {
        assert!(mass.is_finite() && mass > 0.0, "Body mass must be positive and finite, got {mass}");
        self.mass = mass;
        self.auto_mass = false;
    }

    pub fn uses_auto_mass(&self) -> bool {
        self.auto_mass
    }

    /// Turns auto-mass back on. Takes effect on the next mass recomputation.
    pub fn enable_auto_mass(&mut self) {
        self.auto_mass = true;
    }

    /// Stores a mass derived from colliders. Ignored when the mass was set
    /// explicitly; a body without solid colliders falls back to unit mass.
    pub(crate) fn set_derived_mass(&mut self, derived: f64) {
        if !self.auto_mass {
            return;
        }
        self.mass = if derived > 0.0 && derived.is_finite() { derived } else { 1.0 };
    }

    /// Infinite for static and kinematic bodies.
    pub fn mass(&self) -> f64 {
        if self.is_dynamic() {
            self.mass
        } else {
            f64::INFINITY
        }
    }

    /// Zero for static and kinematic bodies.
    pub fn inv_mass(&self) -> f64 {
        if self.is_dynamic() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// World position at the start of the last integration step.
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// Adds `impulse * inv_mass` to the velocity. No effect on static or
    /// kinematic bodies.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.is_dynamic() {
            self.velocity += impulse * self.inv_mass();
        }
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::dynamic()
    }
}
