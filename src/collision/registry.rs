//! Per-owner index of registered colliders, split by body motion kind.

use std::collections::BTreeMap;

use log::debug;

use crate::objects::rigid_body::BodyType;
use crate::world::EntityId;

use super::ColliderId;

type Bucket = BTreeMap<EntityId, Vec<ColliderId>>;

/// Registered colliders grouped by owner. Holds handles only; liveness is
/// checked against the collider arena on access.
#[derive(Debug, Default, Clone)]
pub struct ColliderRegistry {
    static_owners: Bucket,
    kinematic_owners: Bucket,
    dynamic_owners: Bucket,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, body_type: BodyType) -> &Bucket {
        match body_type {
            BodyType::Static => &self.static_owners,
            BodyType::Kinematic => &self.kinematic_owners,
            BodyType::Dynamic => &self.dynamic_owners,
        }
    }

    fn bucket_mut(&mut self, body_type: BodyType) -> &mut Bucket {
        match body_type {
            BodyType::Static => &mut self.static_owners,
            BodyType::Kinematic => &mut self.kinematic_owners,
            BodyType::Dynamic => &mut self.dynamic_owners,
        }
    }

    fn buckets(&self) -> [(BodyType, &Bucket); 3] {
        [
            (BodyType::Static, &self.static_owners),
            (BodyType::Kinematic, &self.kinematic_owners),
            (BodyType::Dynamic, &self.dynamic_owners),
        ]
    }

    /// Files `collider` under `owner` in the bucket for `body_type`. If the
    /// owner is filed under another kind, its colliders move along.
    pub fn register(&mut self, owner: EntityId, body_type: BodyType, collider: ColliderId) {
        let mut moved = Vec::new();
        for kind in [BodyType::Static, BodyType::Kinematic, BodyType::Dynamic] {
            if kind != body_type {
                if let Some(list) = self.bucket_mut(kind).remove(&owner) {
                    moved.extend(list);
                }
            }
        }

        let list = self.bucket_mut(body_type).entry(owner).or_default();
        for id in moved.into_iter().chain(std::iter::once(collider)) {
            if !list.contains(&id) {
                list.push(id);
            }
        }
        debug!("Registered collider {:?} under {:?} owner {:?}", collider, body_type, owner);
    }

    /// Removes every collider of `owner` and returns them.
    pub fn unregister(&mut self, owner: EntityId) -> Vec<ColliderId> {
        let mut removed = Vec::new();
        for kind in [BodyType::Static, BodyType::Kinematic, BodyType::Dynamic] {
            if let Some(list) = self.bucket_mut(kind).remove(&owner) {
                removed.extend(list);
            }
        }
        if !removed.is_empty() {
            debug!("Unregistered {} collider(s) of owner {:?}", removed.len(), owner);
        }
        removed
    }

    /// Removes a single collider. Drops the owner entry once it is empty.
    pub fn unregister_collider(&mut self, owner: EntityId, collider: ColliderId) -> bool {
        let Some(kind) = self.body_type_of(owner) else {
            return false;
        };
        let bucket = self.bucket_mut(kind);
        let Some(list) = bucket.get_mut(&owner) else {
            return false;
        };
        let before = list.len();
        list.retain(|&id| id != collider);
        let removed = list.len() != before;
        if list.is_empty() {
            bucket.remove(&owner);
        }
        removed
    }

    /// Drops expired handles of `owner` and returns the live ones.
    pub fn validate_colliders(&mut self, owner: EntityId, is_alive: impl Fn(ColliderId) -> bool) -> Vec<ColliderId> {
        let Some(kind) = self.body_type_of(owner) else {
            return Vec::new();
        };
        let bucket = self.bucket_mut(kind);
        let Some(list) = bucket.get_mut(&owner) else {
            return Vec::new();
        };
        list.retain(|&id| is_alive(id));
        let live = list.clone();
        if live.is_empty() {
            bucket.remove(&owner);
        }
        live
    }

    /// Prunes expired handles of every owner.
    pub fn validate_all(&mut self, is_alive: impl Fn(ColliderId) -> bool) {
        for owner in self.owners().collect::<Vec<_>>() {
            self.validate_colliders(owner, &is_alive);
        }
    }

    /// Bucket the owner is filed under.
    pub fn body_type_of(&self, owner: EntityId) -> Option<BodyType> {
        self.buckets()
            .into_iter()
            .find(|(_, bucket)| bucket.contains_key(&owner))
            .map(|(kind, _)| kind)
    }

    /// Registered colliders of `owner`, unvalidated.
    pub fn colliders_of(&self, owner: EntityId) -> &[ColliderId] {
        self.buckets()
            .into_iter()
            .find_map(|(_, bucket)| bucket.get(&owner))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_registered(&self, owner: EntityId, collider: ColliderId) -> bool {
        self.colliders_of(owner).contains(&collider)
    }

    /// Owners in one bucket, in key order.
    pub fn owners_of_kind(&self, body_type: BodyType) -> impl Iterator<Item = EntityId> + '_ {
        self.bucket(body_type).keys().copied()
    }

    /// Kinematic then dynamic owners.
    pub fn movable_owners(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.kinematic_owners.keys().chain(self.dynamic_owners.keys()).copied()
    }

    /// Every owner: static, kinematic, then dynamic.
    pub fn owners(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.static_owners
            .keys()
            .chain(self.kinematic_owners.keys())
            .chain(self.dynamic_owners.keys())
            .copied()
    }

    /// Every registered `(owner, collider)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, ColliderId)> + '_ {
        self.static_owners
            .iter()
            .chain(self.kinematic_owners.iter())
            .chain(self.dynamic_owners.iter())
            .flat_map(|(&owner, list)| list.iter().map(move |&id| (owner, id)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.static_owners.is_empty() && self.kinematic_owners.is_empty() && self.dynamic_owners.is_empty()
    }
}
