//! Entity table: hierarchy, transforms and enable state.

use slotmap::{new_key_type, SlotMap};

use crate::collision::PhysicsLayer;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;
use crate::objects::collider::ColliderId;
use crate::objects::rigid_body::RigidBody;

new_key_type! {
    /// Generational handle to an entity in a [`Scene`].
    pub struct EntityId;
}

#[derive(Debug, Clone)]
pub struct Entity {
    /// Transform relative to the parent.
    pub transform: Transform,
    pub enabled: bool,
    pub layer: PhysicsLayer,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    pub(crate) body: Option<RigidBody>,
    pub(crate) colliders: Vec<ColliderId>,
}

impl Entity {
    fn new(transform: Transform, parent: Option<EntityId>) -> Self {
        Self {
            transform,
            enabled: true,
            layer: PhysicsLayer::DEFAULT,
            parent,
            children: Vec::new(),
            body: None,
            colliders: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn body(&self) -> Option<&RigidBody> {
        self.body.as_ref()
    }

    /// Colliders attached to this entity.
    pub fn colliders(&self) -> &[ColliderId] {
        &self.colliders
    }
}

#[derive(Debug, Default, Clone)]
pub struct Scene {
    entities: SlotMap<EntityId, Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root entity.
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        self.entities.insert(Entity::new(transform, None))
    }

    /// Adds an entity under `parent`; `transform` is relative to the parent.
    pub fn spawn_child(&mut self, parent: EntityId, transform: Transform) -> PhysicsResult<EntityId> {
        if !self.entities.contains_key(parent) {
            return Err(PhysicsError::UnknownEntity(parent));
        }
        let id = self.entities.insert(Entity::new(transform, Some(parent)));
        self.entities[parent].children.push(id);
        Ok(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Mutable access to two distinct entities at once.
    pub(crate) fn get_pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<[&mut Entity; 2]> {
        self.entities.get_disjoint_mut([a, b])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    /// Absolute transform, composed through every ancestor.
    pub fn world_transform(&self, id: EntityId) -> Option<Transform> {
        let entity = self.entities.get(id)?;
        match entity.parent {
            Some(parent) => Some(self.world_transform(parent)?.compose(entity.transform)),
            None => Some(entity.transform),
        }
    }

    pub fn world_position(&self, id: EntityId) -> Option<Vec2> {
        self.world_transform(id).map(|t| t.position)
    }

    /// Whether the entity and all of its ancestors are enabled.
    pub fn is_active(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(entity_id) = current {
            match self.entities.get(entity_id) {
                Some(entity) if entity.enabled => current = entity.parent,
                _ => return false,
            }
        }
        true
    }

    /// Nearest entity carrying a rigid body, starting at `id` itself and
    /// walking up the parent chain.
    pub fn find_body_owner(&self, id: EntityId) -> Option<EntityId> {
        let mut current = Some(id);
        while let Some(entity_id) = current {
            let entity = self.entities.get(entity_id)?;
            if entity.body.is_some() {
                return Some(entity_id);
            }
            current = entity.parent;
        }
        None
    }

    /// Moves an entity by a world-space displacement. Does nothing under a
    /// parent whose scale collapses an axis.
    pub fn translate_world(&mut self, id: EntityId, displacement: Vec2) {
        if displacement == Vec2::ZERO {
            return;
        }
        let local = match self.entities.get(id).and_then(|e| e.parent) {
            Some(parent) => match self.world_transform(parent).and_then(|t| t.inverse_vector(displacement)) {
                Some(local) => local,
                None => return,
            },
            None => displacement,
        };
        if let Some(entity) = self.entities.get_mut(id) {
            entity.transform.position += local;
        }
    }

    /// Places an entity at a world-space position.
    pub fn set_world_position(&mut self, id: EntityId, position: Vec2) {
        if let Some(current) = self.world_position(id) {
            self.translate_world(id, position - current);
        }
    }

    /// `id` followed by all of its descendants, parents before children.
    pub fn subtree(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entity) = self.entities.get(current) {
                out.push(current);
                stack.extend(entity.children.iter().rev().copied());
            }
        }
        out
    }

    /// Removes a single entity, detaching it from its parent. Children are
    /// left orphaned; callers remove whole subtrees.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        if let Some(parent) = entity.parent.and_then(|p| self.entities.get_mut(p)) {
            parent.children.retain(|&child| child != id);
        }
        Some(entity)
    }
}
