use std::collections::HashMap;

use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::collision::events::{dispatch, CollisionData, CollisionEvent, CollisionEventKind};
use crate::collision::raycast::{ray_shape, sweep_shape};
use crate::collision::{
    detection, resolution, ColliderId, ColliderRegistry, CollisionEventTracker, CollisionFilter,
    CollisionListener, Contact, LayerMatrix, PairKey, PhysicsLayer, RaycastHit,
};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::integration::integrator;
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;
use crate::objects::collider::Collider;
use crate::objects::rigid_body::{BodyType, RigidBody};
use crate::shapes::Shape;

use super::scene::{EntityId, Scene};
use super::timestep::{FixedTimestep, FrameSteps};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactKind {
    Collision,
    Trigger,
}

impl ContactKind {
    /// Enter and stay event kinds.
    fn event_kinds(self) -> (CollisionEventKind, CollisionEventKind) {
        match self {
            ContactKind::Collision => (CollisionEventKind::CollisionEnter, CollisionEventKind::Collision),
            ContactKind::Trigger => (CollisionEventKind::TriggerEnter, CollisionEventKind::Trigger),
        }
    }
}

/// A world-space shape being swept by a cast.
struct Caster {
    collider: ColliderId,
    shape: Shape,
    /// Restricts targets through the layer matrix when set.
    layer: Option<PhysicsLayer>,
}

/// Owns the scene, colliders and contact bookkeeping, and runs the physics step.
pub struct PhysicsWorld {
    scene: Scene,
    colliders: SlotMap<ColliderId, Collider>,
    registry: ColliderRegistry,
    tracker: CollisionEventTracker,
    layers: LayerMatrix,
    listeners: HashMap<EntityId, Box<dyn CollisionListener>>,
    events: Vec<CollisionEvent>,
    pub gravity: Vec2,
    /// Multiplier on every step's delta time.
    pub time_scale: f64,
}

impl PhysicsWorld {
    /// Creates an empty world with default settings.
    pub fn new() -> Self {
        Self::with_config(&PhysicsConfig::default())
    }

    pub fn with_config(config: &PhysicsConfig) -> Self {
        let mut layers = LayerMatrix::new();
        for &(a, b) in &config.disabled_layer_pairs {
            layers.disable_pair(a, b);
        }
        Self {
            scene: Scene::new(),
            colliders: SlotMap::with_key(),
            registry: ColliderRegistry::new(),
            tracker: CollisionEventTracker::new(),
            layers,
            listeners: HashMap::new(),
            events: Vec::new(),
            gravity: config.gravity,
            time_scale: config.time_scale,
        }
    }

    // --- Scene ---

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct access to transforms and hierarchy. Bodies and colliders are
    /// managed through the world.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        self.scene.spawn(transform)
    }

    pub fn spawn_child(&mut self, parent: EntityId, transform: Transform) -> PhysicsResult<EntityId> {
        self.scene.spawn_child(parent, transform)
    }

    pub fn set_enabled(&mut self, entity: EntityId, enabled: bool) -> PhysicsResult<()> {
        self.scene.get_mut(entity).ok_or(PhysicsError::UnknownEntity(entity))?.enabled = enabled;
        Ok(())
    }

    pub fn set_layer(&mut self, entity: EntityId, layer: PhysicsLayer) -> PhysicsResult<()> {
        self.scene.get_mut(entity).ok_or(PhysicsError::UnknownEntity(entity))?.layer = layer;
        Ok(())
    }

    pub fn layers(&self) -> &LayerMatrix {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerMatrix {
        &mut self.layers
    }

    /// Destroys an entity and its descendants. Every contact involving their
    /// colliders is exited first, and those exits are dispatched immediately.
    pub fn destroy_entity(&mut self, entity: EntityId) -> PhysicsResult<()> {
        if !self.scene.contains(entity) {
            return Err(PhysicsError::UnknownEntity(entity));
        }
        let subtree = self.scene.subtree(entity);

        let mut affected_owners = Vec::new();
        for &member in &subtree {
            let attached = self.scene.get(member).map(|e| e.colliders.clone()).unwrap_or_default();
            for id in attached {
                if let Some(owner) = self.remove_collider(id) {
                    affected_owners.push(owner);
                }
            }
        }

        for &member in &subtree {
            self.registry.unregister(member);
            self.listeners.remove(&member);
        }
        for &member in subtree.iter().rev() {
            self.scene.remove(member);
        }
        for owner in affected_owners {
            if self.scene.contains(owner) {
                self.refresh_mass(owner);
            }
        }
        debug!("Destroyed {} entities under {:?}", subtree.len(), entity);
        Ok(())
    }

    // --- Bodies ---

    /// Adds a rigid body to `entity`. Colliders in its subtree whose nearest
    /// body is now this one are re-registered under it.
    pub fn add_rigidbody(&mut self, entity: EntityId, body: RigidBody) -> PhysicsResult<()> {
        let slot = self.scene.get_mut(entity).ok_or(PhysicsError::UnknownEntity(entity))?;
        if slot.body.is_some() {
            return Err(PhysicsError::BodyAlreadyPresent(entity));
        }
        let body_type = body.body_type();
        slot.body = Some(body);
        // Own triggers were filed as static
        self.refile(entity, body_type);

        for member in self.scene.subtree(entity) {
            if self.scene.find_body_owner(member) != Some(entity) {
                continue;
            }
            let attached = self.scene.get(member).map(|e| e.colliders.clone()).unwrap_or_default();
            for id in attached {
                if self.colliders.get(id).is_some_and(|c| c.owner != Some(entity)) {
                    self.register_collider(id)?;
                }
            }
        }
        self.refresh_mass(entity);
        Ok(())
    }

    /// Removes the body of `entity`. Its contacts are exited, then its
    /// colliders fall back to the next body up the parent chain, or become inert.
    pub fn remove_rigidbody(&mut self, entity: EntityId) -> PhysicsResult<RigidBody> {
        let slot = self.scene.get_mut(entity).ok_or(PhysicsError::UnknownEntity(entity))?;
        let body = slot.body.take().ok_or(PhysicsError::NoRigidBody(entity))?;

        let removed = self.registry.unregister(entity);
        self.exit_contacts(&removed);
        for id in removed {
            if let Some(collider) = self.colliders.get_mut(id) {
                collider.owner = None;
                // Ownerless solid colliders are reported by register_collider
                let _ = self.register_collider(id);
            }
        }
        Ok(body)
    }

    pub fn body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.scene.get(entity)?.body.as_ref()
    }

    pub fn body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        self.scene.get_mut(entity)?.body.as_mut()
    }

    /// Changes the motion kind of a body and re-files its colliders.
    pub fn set_body_type(&mut self, entity: EntityId, body_type: BodyType) -> PhysicsResult<()> {
        let body = self
            .scene
            .get_mut(entity)
            .ok_or(PhysicsError::UnknownEntity(entity))?
            .body
            .as_mut()
            .ok_or(PhysicsError::NoRigidBody(entity))?;
        body.set_body_type(body_type);
        self.refile(entity, body_type);
        Ok(())
    }

    fn refile(&mut self, owner: EntityId, body_type: BodyType) {
        for id in self.registry.unregister(owner) {
            if self.colliders.contains_key(id) {
                self.registry.register(owner, body_type, id);
            }
        }
    }

    /// Re-derives the mass of a body from its solid colliders (when auto-mass
    /// is on) and returns the resulting mass.
    pub fn recompute_mass(&mut self, entity: EntityId) -> PhysicsResult<f64> {
        if self.body(entity).is_none() {
            return Err(if self.scene.contains(entity) {
                PhysicsError::NoRigidBody(entity)
            } else {
                PhysicsError::UnknownEntity(entity)
            });
        }
        self.refresh_mass(entity);
        Ok(self.body(entity).map_or(f64::INFINITY, RigidBody::mass))
    }

    fn refresh_mass(&mut self, owner: EntityId) {
        if !self.body(owner).is_some_and(RigidBody::uses_auto_mass) {
            return;
        }
        let total: f64 = self
            .registry
            .colliders_of(owner)
            .iter()
            .filter_map(|&id| {
                let collider = self.colliders.get(id).filter(|c| c.is_solid())?;
                let transform = self.scene.world_transform(collider.entity)?;
                Some(collider.mass(&transform))
            })
            .sum();
        if let Some(body) = self.body_mut(owner) {
            body.set_derived_mass(total);
        }
    }

    /// Smallest dimension among the world-space colliders owned by `owner`.
    pub fn body_min_dimension(&self, owner: EntityId) -> Option<f64> {
        self.registry
            .colliders_of(owner)
            .iter()
            .filter_map(|&id| self.world_shape(id))
            .map(|shape| shape.min_dimension())
            .reduce(f64::min)
    }

    // --- Colliders ---

    /// Attaches a collider to `entity` and registers it.
    ///
    /// A solid collider with no rigid body on the entity or its ancestors is
    /// still attached but stays inert; the error carries its id.
    pub fn attach_collider(&mut self, entity: EntityId, mut collider: Collider) -> PhysicsResult<ColliderId> {
        if !self.scene.contains(entity) {
            return Err(PhysicsError::UnknownEntity(entity));
        }
        collider.entity = entity;
        collider.owner = None;
        let id = self.colliders.insert(collider);
        if let Some(slot) = self.scene.get_mut(entity) {
            slot.colliders.push(id);
        }
        self.register_collider(id)?;
        Ok(id)
    }

    /// Resolves the owner of a collider and files it in the registry.
    /// Returns the owner.
    pub fn register_collider(&mut self, id: ColliderId) -> PhysicsResult<EntityId> {
        let collider = self.colliders.get(id).ok_or(PhysicsError::UnknownCollider(id))?;
        let (entity, is_trigger, previous) = (collider.entity, collider.is_trigger, collider.owner);

        let owner = match self.scene.find_body_owner(entity) {
            Some(owner) => owner,
            None if is_trigger => entity,
            None => {
                warn!(
                    "Solid collider {:?} on entity {:?} has no rigid body owner; it will not take part in physics",
                    id, entity
                );
                if let Some(previous) = previous {
                    self.exit_contacts(&[id]);
                    self.registry.unregister_collider(previous, id);
                }
                self.colliders[id].owner = None;
                return Err(PhysicsError::NoRigidBodyOwner { collider: id, entity });
            }
        };

        if let Some(previous) = previous.filter(|&p| p != owner) {
            self.exit_contacts(&[id]);
            self.registry.unregister_collider(previous, id);
            self.refresh_mass(previous);
        }
        let body_type = self.body(owner).map_or(BodyType::Static, RigidBody::body_type);
        self.colliders[id].owner = Some(owner);
        self.registry.register(owner, body_type, id);
        self.refresh_mass(owner);
        Ok(owner)
    }

    /// Removes every collider of `owner` from the registry and exits their
    /// contacts. The colliders stay attached but inert until registered again.
    pub fn unregister_colliders(&mut self, owner: EntityId) -> Vec<ColliderId> {
        let removed = self.registry.unregister(owner);
        self.exit_contacts(&removed);
        for &id in &removed {
            if let Some(collider) = self.colliders.get_mut(id) {
                collider.owner = None;
            }
        }
        self.refresh_mass(owner);
        removed
    }

    /// Detaches and destroys a collider, exiting its contacts first.
    pub fn destroy_collider(&mut self, id: ColliderId) -> PhysicsResult<()> {
        let entity = self.colliders.get(id).ok_or(PhysicsError::UnknownCollider(id))?.entity;
        let owner = self.remove_collider(id);
        if let Some(slot) = self.scene.get_mut(entity) {
            slot.colliders.retain(|&c| c != id);
        }
        if let Some(owner) = owner {
            self.refresh_mass(owner);
        }
        Ok(())
    }

    /// Flushes contacts, unregisters and drops a collider. Returns its owner.
    fn remove_collider(&mut self, id: ColliderId) -> Option<EntityId> {
        self.exit_contacts(&[id]);
        let owner = self.colliders.get(id)?.owner;
        if let Some(owner) = owner {
            self.registry.unregister_collider(owner, id);
        }
        self.colliders.remove(id);
        owner
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    pub fn registry(&self) -> &ColliderRegistry {
        &self.registry
    }

    /// World-space shape of a collider.
    pub fn world_shape(&self, id: ColliderId) -> Option<Shape> {
        let collider = self.colliders.get(id)?;
        let transform = self.scene.world_transform(collider.entity)?;
        Some(collider.world_shape(&transform))
    }

    fn owner_of(&self, id: ColliderId) -> Option<EntityId> {
        self.colliders.get(id)?.owner
    }

    fn is_collider_active(&self, id: ColliderId) -> bool {
        self.colliders.get(id).is_some_and(|c| self.scene.is_active(c.entity))
    }

    fn layer_of(&self, id: ColliderId) -> Option<PhysicsLayer> {
        let collider = self.colliders.get(id)?;
        Some(self.scene.get(collider.entity)?.layer)
    }

    // --- Events ---

    pub fn set_listener(&mut self, entity: EntityId, listener: Box<dyn CollisionListener>) {
        self.listeners.insert(entity, listener);
    }

    pub fn remove_listener(&mut self, entity: EntityId) -> Option<Box<dyn CollisionListener>> {
        self.listeners.remove(&entity)
    }

    /// Events emitted by the last step, followed by any exits from
    /// destruction or ownership changes since then.
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Whether `entity` owns a collider touching `collider` this frame.
    pub fn is_colliding_with(&self, entity: EntityId, collider: ColliderId) -> bool {
        self.registry.colliders_of(entity).iter().any(|&own| {
            let key = PairKey::new(own, collider);
            self.tracker.collisions.in_this_frame(&key) || self.tracker.triggers.in_this_frame(&key)
        })
    }

    /// Whether `entity` owned a collider touching `collider` the frame before.
    pub fn was_colliding_with(&self, entity: EntityId, collider: ColliderId) -> bool {
        self.registry.colliders_of(entity).iter().any(|&own| {
            let key = PairKey::new(own, collider);
            self.tracker.collisions.in_last_frame(&key) || self.tracker.triggers.in_last_frame(&key)
        })
    }

    /// Whether the solid pair was already handled this frame.
    pub fn collision_dealt_with(&self, key: PairKey) -> bool {
        self.tracker.collisions.in_this_frame(&key)
    }

    /// Whether the trigger pair was already registered this frame.
    pub fn trigger_dealt_with(&self, key: PairKey) -> bool {
        self.tracker.triggers.in_this_frame(&key)
    }

    fn push_pair_events(&mut self, kind: CollisionEventKind, data: CollisionData) {
        for seen in [data, data.reversed()] {
            if let Some(entity) = self.owner_of(seen.source) {
                self.events.push(CollisionEvent { kind, entity, data: seen });
            }
        }
    }

    /// Registers a contact for this frame and queues its events. Returns
    /// `true` if the pair just entered.
    fn record_pair(&mut self, kind: ContactKind, data: CollisionData) -> bool {
        let register = match kind {
            ContactKind::Collision => &mut self.tracker.collisions,
            ContactKind::Trigger => &mut self.tracker.triggers,
        };
        let entered = register.register(data);
        let (enter, stay) = kind.event_kinds();
        if entered {
            self.push_pair_events(enter, data);
        }
        self.push_pair_events(stay, data);
        entered
    }

    /// Exits the live contacts of `ids` while their owners are still
    /// recorded, and dispatches the exits.
    fn exit_contacts(&mut self, ids: &[ColliderId]) {
        let start = self.events.len();
        for &id in ids {
            let (collision_exits, trigger_exits) = self.tracker.flush_collider(id);
            for data in collision_exits {
                self.push_pair_events(CollisionEventKind::CollisionExit, data);
            }
            for data in trigger_exits {
                self.push_pair_events(CollisionEventKind::TriggerExit, data);
            }
        }
        self.dispatch_from(start);
    }

    fn dispatch_from(&mut self, start: usize) {
        for event in &self.events[start..] {
            if let Some(listener) = self.listeners.get_mut(&event.entity) {
                dispatch(listener.as_mut(), event);
            }
        }
    }

    // --- Simulation ---

    /// Runs the physics steps due for `elapsed` seconds of wall-clock time.
    pub fn advance(&mut self, timestep: &mut FixedTimestep, elapsed: f64) -> FrameSteps {
        let steps = timestep.advance(elapsed);
        for _ in 0..steps.physics_steps {
            self.step(timestep.physics_dt());
        }
        steps
    }

    /// Advances the simulation by one fixed step.
    ///
    /// Every body integrates before detection; every pair is detected before
    /// any is resolved.
    pub fn step(&mut self, dt: f64) {
        let dt = dt * self.time_scale;
        self.events.clear();
        self.tracker.begin_frame();
        let colliders = &self.colliders;
        self.registry.validate_all(|id| colliders.contains_key(id));

        self.integrate_bodies(dt);
        let pairs = self.broad_phase();
        let contacts = self.narrow_phase(&pairs);
        self.resolve_contacts(&contacts);
        self.continuous_detection();
        self.finish_frame();
    }

    fn integrate_bodies(&mut self, dt: f64) {
        let bodies: Vec<EntityId> = self
            .scene
            .iter()
            .filter(|(_, entity)| entity.body.is_some())
            .map(|(id, _)| id)
            .collect();

        for id in bodies {
            if !self.scene.is_active(id) {
                continue;
            }
            let Some(position) = self.scene.world_position(id) else {
                continue;
            };
            let gravity = self.gravity;
            let Some(body) = self.body_mut(id) else {
                continue;
            };
            let displacement = integrator::integrate(body, position, gravity, dt);
            self.scene.translate_world(id, displacement);
        }
    }

    /// Candidate pairs: colliders of every movable owner against those of
    /// every other owner, skipping inactive colliders and disabled layer pairs.
    fn broad_phase(&self) -> Vec<(ColliderId, ColliderId)> {
        let mut pairs = Vec::new();
        for owner_a in self.registry.movable_owners() {
            for owner_b in self.registry.owners() {
                if owner_a == owner_b {
                    continue;
                }
                // Movable pairs are visited from both sides; keep one
                let b_movable = self.registry.body_type_of(owner_b).is_some_and(|kind| kind != BodyType::Static);
                if b_movable && owner_b < owner_a {
                    continue;
                }
                for &a in self.registry.colliders_of(owner_a) {
                    for &b in self.registry.colliders_of(owner_b) {
                        if self.pair_allowed(a, b) {
                            pairs.push((a, b));
                        }
                    }
                }
            }
        }
        pairs
    }

    fn pair_allowed(&self, a: ColliderId, b: ColliderId) -> bool {
        if !self.is_collider_active(a) || !self.is_collider_active(b) {
            return false;
        }
        match (self.layer_of(a), self.layer_of(b)) {
            (Some(layer_a), Some(layer_b)) => self.layers.collides(layer_a, layer_b),
            _ => false,
        }
    }

    fn narrow_phase(&self, pairs: &[(ColliderId, ColliderId)]) -> Vec<Contact> {
        pairs
            .iter()
            .filter_map(|&(a, b)| {
                let shape_a = self.world_shape(a)?;
                let shape_b = self.world_shape(b)?;
                let is_trigger = self.colliders[a].is_trigger || self.colliders[b].is_trigger;
                detection::detect(a, &shape_a, b, &shape_b, is_trigger)
            })
            .collect()
    }

    fn resolve_contacts(&mut self, contacts: &[Contact]) {
        let mut solid = 0;
        for contact in contacts {
            let data = CollisionData::new(contact.collider_a, contact.collider_b);
            if contact.is_trigger {
                self.record_pair(ContactKind::Trigger, data);
                continue;
            }

            let (Some(owner_a), Some(owner_b)) = (self.owner_of(contact.collider_a), self.owner_of(contact.collider_b))
            else {
                continue;
            };
            let outcome = match self.scene.get_pair_mut(owner_a, owner_b) {
                Some([entity_a, entity_b]) => match (entity_a.body.as_mut(), entity_b.body.as_mut()) {
                    (Some(body_a), Some(body_b)) => resolution::resolve(body_a, body_b, contact.mtv),
                    _ => None,
                },
                None => None,
            };
            if let Some(outcome) = outcome {
                self.scene.translate_world(owner_a, outcome.correction_a);
                self.scene.translate_world(owner_b, outcome.correction_b);
            }
            trace!(
                "Resolved {:?} vs {:?}: depth={:.4}",
                contact.collider_a,
                contact.collider_b,
                contact.depth()
            );
            self.record_pair(ContactKind::Collision, data);
            solid += 1;
        }
        if !contacts.is_empty() {
            debug!("Step contacts: {} solid, {} trigger", solid, contacts.len() - solid);
        }
    }

    /// Sweeps flagged bodies that moved farther than their smallest collider
    /// this step, and reports the first obstacle the discrete test skipped.
    /// Dynamic bodies are stopped at the touching position.
    fn continuous_detection(&mut self) {
        let owners: Vec<EntityId> = self.registry.movable_owners().collect();
        for owner in owners {
            if !self.scene.is_active(owner) {
                continue;
            }
            let Some(body) = self.body(owner) else {
                continue;
            };
            if !body.continuous_collisions {
                continue;
            }
            let is_dynamic = body.is_dynamic();
            let last = body.last_position();
            let Some(current) = self.scene.world_position(owner) else {
                continue;
            };
            let Some(min_dimension) = self.body_min_dimension(owner) else {
                continue;
            };
            let moved = current - last;
            if moved.magnitude_squared() <= min_dimension * min_dimension {
                continue;
            }

            let distance = moved.magnitude();
            let direction = moved / distance;
            let casters: Vec<Caster> = self
                .registry
                .colliders_of(owner)
                .iter()
                .filter(|&&id| self.colliders.get(id).is_some_and(Collider::is_solid) && self.is_collider_active(id))
                .filter_map(|&id| {
                    let mut shape = self.world_shape(id)?;
                    shape.displace(last - current);
                    Some(Caster { collider: id, shape, layer: self.layer_of(id) })
                })
                .collect();

            let filter = CollisionFilter::excluding(owner);
            let Some(hit) = self.cast_shapes(&casters, direction, distance, &filter, true) else {
                continue;
            };
            let Some(cast_collider) = hit.cast_collider else {
                continue;
            };
            if self.tracker.collisions.in_this_frame(&PairKey::new(cast_collider, hit.collider)) {
                continue;
            }

            // Kinematic bodies only report the hit
            if is_dynamic {
                self.scene.set_world_position(owner, last + direction * hit.distance);
                if let Some(other) = self.owner_of(hit.collider) {
                    if let Some([entity_a, entity_b]) = self.scene.get_pair_mut(owner, other) {
                        if let (Some(body_a), Some(body_b)) = (entity_a.body.as_mut(), entity_b.body.as_mut()) {
                            resolution::apply_contact_impulse(body_a, body_b, -hit.normal);
                        }
                    }
                }
            }
            debug!(
                "Continuous hit: {:?} stopped at {:.4} of {:.4} against {:?}",
                owner, hit.distance, distance, hit.collider
            );
            self.record_pair(ContactKind::Collision, CollisionData::new(cast_collider, hit.collider));
        }
    }

    fn finish_frame(&mut self) {
        let colliders = &self.colliders;
        let (collision_exits, trigger_exits) = self.tracker.end_frame(|id| colliders.contains_key(id));
        if !collision_exits.is_empty() || !trigger_exits.is_empty() {
            debug!("Step exits: {} collision, {} trigger", collision_exits.len(), trigger_exits.len());
        }
        for data in collision_exits {
            self.push_pair_events(CollisionEventKind::CollisionExit, data);
        }
        for data in trigger_exits {
            self.push_pair_events(CollisionEventKind::TriggerExit, data);
        }
        self.dispatch_from(0);
    }

    // --- Queries ---

    /// Casts a ray from `origin` at `angle` (radians) and returns the nearest
    /// solid collider within `max_distance` whose owner is not filtered out.
    /// A ray starting inside a collider hits it at distance `0`.
    pub fn raycast(&self, origin: Vec2, angle: f64, max_distance: f64, filter: &CollisionFilter) -> Option<RaycastHit> {
        let direction = Vec2::from_angle(angle);
        let mut best: Option<RaycastHit> = None;
        for (owner, id) in self.registry.iter() {
            if filter.is_excluded(owner) || !self.is_query_target(id) {
                continue;
            }
            let Some(shape) = self.world_shape(id) else {
                continue;
            };
            let Some((distance, normal)) = ray_shape(origin, direction, &shape) else {
                continue;
            };
            if distance <= max_distance && best.map_or(true, |b| distance < b.distance) {
                best = Some(RaycastHit {
                    point: origin + direction * distance,
                    normal,
                    distance,
                    collider: id,
                    cast_collider: None,
                });
            }
        }
        best
    }

    /// Sweeps the world-space shapes of `colliders` from `origin` at `angle`.
    /// Each shape keeps its offset from its owner, so `origin` stands in for
    /// the owner position. `scale` uniformly scales the set about `origin`.
    pub fn collider_cast(
        &self,
        colliders: &[ColliderId],
        origin: Vec2,
        angle: f64,
        max_distance: f64,
        filter: &CollisionFilter,
        scale: f64,
    ) -> Option<RaycastHit> {
        let casters: Vec<Caster> = colliders
            .iter()
            .filter_map(|&id| {
                let collider = self.colliders.get(id)?;
                let anchor = self.scene.world_position(collider.owner.unwrap_or(collider.entity))?;
                let mut shape = self.world_shape(id)?;
                shape.displace(origin - anchor);
                if scale != 1.0 {
                    shape.displace(-origin);
                    shape.scale(Vec2::new(scale, scale));
                    shape.displace(origin);
                }
                Some(Caster { collider: id, shape, layer: None })
            })
            .collect();
        self.cast_shapes(&casters, Vec2::from_angle(angle), max_distance, filter, false)
    }

    fn is_query_target(&self, id: ColliderId) -> bool {
        self.colliders.get(id).is_some_and(Collider::is_solid) && self.is_collider_active(id)
    }

    fn cast_shapes(
        &self,
        casters: &[Caster],
        direction: Vec2,
        max_distance: f64,
        filter: &CollisionFilter,
        skip_initial_overlap: bool,
    ) -> Option<RaycastHit> {
        let mut best: Option<RaycastHit> = None;
        for (owner, id) in self.registry.iter() {
            if filter.is_excluded(owner) || !self.is_query_target(id) {
                continue;
            }
            if casters.iter().any(|caster| caster.collider == id) {
                continue;
            }
            let Some(target) = self.world_shape(id) else {
                continue;
            };
            let target_layer = self.layer_of(id);

            for caster in casters {
                if let (Some(layer), Some(target_layer)) = (caster.layer, target_layer) {
                    if !self.layers.collides(layer, target_layer) {
                        continue;
                    }
                }
                let Some(hit) = sweep_shape(&caster.shape, direction, &target) else {
                    continue;
                };
                if hit.distance > max_distance || (skip_initial_overlap && hit.distance <= 0.0) {
                    continue;
                }
                if best.map_or(true, |b| hit.distance < b.distance) {
                    best = Some(RaycastHit {
                        point: hit.point,
                        normal: hit.normal,
                        distance: hit.distance,
                        collider: id,
                        cast_collider: Some(caster.collider),
                    });
                }
            }
        }
        best
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
