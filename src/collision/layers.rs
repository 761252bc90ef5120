use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Collision layer carried by every entity. Up to [`PhysicsLayer::COUNT`] layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PhysicsLayer(u8);

impl PhysicsLayer {
    pub const COUNT: usize = 32;
    pub const DEFAULT: PhysicsLayer = PhysicsLayer(0);

    /// Panics if `index` is not below [`PhysicsLayer::COUNT`].
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < Self::COUNT, "Physics layer out of range");
        PhysicsLayer(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    fn bit(self) -> u32 {
        1 << self.0
    }

    fn row(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for PhysicsLayer {
    type Error = PhysicsError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if (index as usize) < Self::COUNT {
            Ok(PhysicsLayer(index))
        } else {
            Err(PhysicsError::InvalidLayer(index))
        }
    }
}

impl From<PhysicsLayer> for u8 {
    fn from(layer: PhysicsLayer) -> Self {
        layer.0
    }
}

/// Symmetric layer-pair matrix gating whether detection runs for a pair.
/// Every pair collides unless disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMatrix {
    rows: [u32; PhysicsLayer::COUNT],
}

impl LayerMatrix {
    pub fn new() -> Self {
        Self { rows: [u32::MAX; PhysicsLayer::COUNT] }
    }

    pub fn collides(&self, a: PhysicsLayer, b: PhysicsLayer) -> bool {
        self.rows[a.row()] & b.bit() != 0
    }

    pub fn enable_pair(&mut self, a: PhysicsLayer, b: PhysicsLayer) {
        self.rows[a.row()] |= b.bit();
        self.rows[b.row()] |= a.bit();
    }

    pub fn disable_pair(&mut self, a: PhysicsLayer, b: PhysicsLayer) {
        self.rows[a.row()] &= !b.bit();
        self.rows[b.row()] &= !a.bit();
    }

    /// Lets `layer` collide with every layer, itself included.
    pub fn enable_all(&mut self, layer: PhysicsLayer) {
        self.rows[layer.row()] = u32::MAX;
        for row in self.rows.iter_mut() {
            *row |= layer.bit();
        }
    }

    /// Stops `layer` colliding with anything, itself included.
    pub fn disable_all(&mut self, layer: PhysicsLayer) {
        self.rows[layer.row()] = 0;
        for row in self.rows.iter_mut() {
            *row &= !layer.bit();
        }
    }
}

impl Default for LayerMatrix {
    fn default() -> Self {
        Self::new()
    }
}
