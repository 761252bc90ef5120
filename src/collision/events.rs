//! Enter/stay/exit bookkeeping for collision and trigger pairs.
//!
//! Each register keeps two generations of pairs. A pair registered this frame
//! that was absent from both generations is an *enter*; a pair present last
//! frame but not this one is an *exit*.

use std::collections::BTreeMap;

use crate::world::EntityId;

use super::ColliderId;

/// Order-independent key of a collider pair: `(a, b)` and `(b, a)` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(ColliderId, ColliderId);

impl PairKey {
    pub fn new(a: ColliderId, b: ColliderId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// Two colliders in contact, seen from `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionData {
    pub source: ColliderId,
    pub other: ColliderId,
}

impl CollisionData {
    pub fn new(source: ColliderId, other: ColliderId) -> Self {
        Self { source, other }
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(self.source, self.other)
    }

    /// The same contact seen from the other collider.
    pub fn reversed(&self) -> Self {
        Self { source: self.other, other: self.source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    Collision,
    CollisionEnter,
    CollisionExit,
    Trigger,
    TriggerEnter,
    TriggerExit,
}

/// A notification for one entity. `data.source` is the entity's own collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub entity: EntityId,
    pub data: CollisionData,
}

/// Per-entity callbacks. Every method defaults to doing nothing.
pub trait CollisionListener {
    fn on_collision(&mut self, _data: &CollisionData) {}
    fn on_collision_enter(&mut self, _data: &CollisionData) {}
    fn on_collision_exit(&mut self, _data: &CollisionData) {}
    fn on_trigger(&mut self, _data: &CollisionData) {}
    fn on_trigger_enter(&mut self, _data: &CollisionData) {}
    fn on_trigger_exit(&mut self, _data: &CollisionData) {}
}

/// Routes an event to the matching listener callback.
pub fn dispatch(listener: &mut dyn CollisionListener, event: &CollisionEvent) {
    let data = &event.data;
    match event.kind {
        CollisionEventKind::Collision => listener.on_collision(data),
        CollisionEventKind::CollisionEnter => listener.on_collision_enter(data),
        CollisionEventKind::CollisionExit => listener.on_collision_exit(data),
        CollisionEventKind::Trigger => listener.on_trigger(data),
        CollisionEventKind::TriggerEnter => listener.on_trigger_enter(data),
        CollisionEventKind::TriggerExit => listener.on_trigger_exit(data),
    }
}

/// Two generations of pairs for one kind of contact.
#[derive(Debug, Default, Clone)]
pub struct FrameRegister {
    this_frame: BTreeMap<PairKey, CollisionData>,
    last_frame: BTreeMap<PairKey, CollisionData>,
}

impl FrameRegister {
    /// Moves this frame's pairs into the previous generation.
    pub fn begin_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.this_frame);
    }

    /// Records a pair for this frame. Returns `true` on enter.
    pub fn register(&mut self, data: CollisionData) -> bool {
        let key = data.key();
        let entered = !self.this_frame.contains_key(&key) && !self.last_frame.contains_key(&key);
        self.this_frame.insert(key, data);
        entered
    }

    pub fn in_this_frame(&self, key: &PairKey) -> bool {
        self.this_frame.contains_key(key)
    }

    pub fn in_last_frame(&self, key: &PairKey) -> bool {
        self.last_frame.contains_key(key)
    }

    /// Pairs present last frame but not this one, with both colliders still
    /// alive. Pairs with an expired collider are dropped silently.
    pub fn exits(&self, is_alive: impl Fn(ColliderId) -> bool) -> Vec<CollisionData> {
        self.last_frame
            .iter()
            .filter(|(key, _)| !self.this_frame.contains_key(key))
            .filter(|(_, data)| is_alive(data.source) && is_alive(data.other))
            .map(|(_, data)| *data)
            .collect()
    }

    /// Removes every pair naming `id` from both generations. Returns the
    /// pairs still in contact this frame; pairs only in the last frame have
    /// already exited.
    pub fn flush_collider(&mut self, id: ColliderId) -> Vec<CollisionData> {
        self.last_frame.retain(|key, _| !key.contains(id));
        let keys: Vec<PairKey> = self.this_frame.keys().filter(|key| key.contains(id)).copied().collect();
        keys.into_iter()
            .filter_map(|key| self.this_frame.remove(&key))
            .map(|data| if data.source == id { data } else { data.reversed() })
            .collect()
    }

    pub fn this_frame(&self) -> impl Iterator<Item = &CollisionData> {
        self.this_frame.values()
    }

    pub fn last_frame(&self) -> impl Iterator<Item = &CollisionData> {
        self.last_frame.values()
    }

    pub fn clear(&mut self) {
        self.this_frame.clear();
        self.last_frame.clear();
    }
}

/// Collision and trigger registers.
#[derive(Debug, Default, Clone)]
pub struct CollisionEventTracker {
    pub collisions: FrameRegister,
    pub triggers: FrameRegister,
}

impl CollisionEventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.collisions.begin_frame();
        self.triggers.begin_frame();
    }

    /// Exits of both registers: `(collision_exits, trigger_exits)`.
    pub fn end_frame(&self, is_alive: impl Fn(ColliderId) -> bool) -> (Vec<CollisionData>, Vec<CollisionData>) {
        (self.collisions.exits(&is_alive), self.triggers.exits(&is_alive))
    }

    /// Forgets every pair naming `id` and returns the ones still in contact
    /// as `(collision_exits, trigger_exits)`, each seen from `id`.
    pub fn flush_collider(&mut self, id: ColliderId) -> (Vec<CollisionData>, Vec<CollisionData>) {
        (self.collisions.flush_collider(id), self.triggers.flush_collider(id))
    }
}
