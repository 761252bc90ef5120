use std::collections::HashSet;

use crate::world::EntityId;

/// Owner ids to exclude from a raycast or collider cast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionFilter {
    excluded: HashSet<EntityId>,
}

impl CollisionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter ignoring a single owner, typically the caster itself.
    pub fn excluding(owner: EntityId) -> Self {
        let mut filter = Self::new();
        filter.exclude(owner);
        filter
    }

    pub fn exclude(&mut self, owner: EntityId) -> &mut Self {
        self.excluded.insert(owner);
        self
    }

    pub fn is_excluded(&self, owner: EntityId) -> bool {
        self.excluded.contains(&owner)
    }
}

impl FromIterator<EntityId> for CollisionFilter {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self { excluded: iter.into_iter().collect() }
    }
}
