//! Entity store
//!
//! A flat list of movable shapes ("circles"). Iteration order is spawn order,
//! which keeps the simulation deterministic for a given seed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Viewport;

/// Opaque entity handle, unique within a live store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Symbolic colour class shared by rendering and game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorTag {
    White,
    Red,
    #[default]
    Indigo,
    Amber,
    Teal,
    Slate,
    Clear,
}

/// Flux polarity, the player's current "charge"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    White,
    Red,
}

impl Polarity {
    pub fn flipped(self) -> Self {
        match self {
            Polarity::White => Polarity::Red,
            Polarity::Red => Polarity::White,
        }
    }

    /// Name shown on the HUD
    pub fn label(&self) -> &'static str {
        match self {
            Polarity::White => "white",
            Polarity::Red => "red",
        }
    }

    /// True if an entity with this colour carries this polarity
    pub fn matches(self, color: ColorTag) -> bool {
        ColorTag::from(self) == color
    }
}

impl From<Polarity> for ColorTag {
    fn from(p: Polarity) -> Self {
        match p {
            Polarity::White => ColorTag::White,
            Polarity::Red => ColorTag::Red,
        }
    }
}

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Standard,
    Player,
    Enemy,
    Obstacle,
    Gate,
    Particle,
    Phantom,
    Echo,
    TargetRing,
    BreathingRing,
    ChoiceLeft,
    ChoiceRight,
}

/// Gate walls are this tall; their `size` is the wall width
pub const GATE_HEIGHT: f32 = 20.0;

/// A single game object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Centre position (pixels)
    pub pos: Vec2,
    /// Pixels per physics tick
    pub vel: Vec2,
    /// Diameter (wall width for gates)
    pub size: f32,
    pub color: ColorTag,
    pub is_target: bool,
    pub kind: EntityKind,
    /// Session clock at spawn (ms)
    pub spawn_time_ms: f64,
    /// Orbit angle (radians) for orbiting obstacles
    #[serde(default)]
    pub angle: Option<f32>,
    /// Orbit radius for orbiting obstacles
    #[serde(default)]
    pub orbit_distance: Option<f32>,
    pub opacity: f32,
    /// Age-decay multiplier applied to `size` for hit tests (1 = full size)
    pub scale: f32,
    /// Gather: particle has been caught and is heading home
    #[serde(default)]
    pub captured: bool,
    /// Gate overlap state from the previous tick (for once-per-overlap penalties)
    #[serde(skip)]
    pub overlapping: bool,
    /// Deletion signal; purged at the end of the tick
    #[serde(skip)]
    pub removed: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2, size: f32, spawn_time_ms: f64) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size,
            color: ColorTag::default(),
            is_target: false,
            kind,
            spawn_time_ms,
            angle: None,
            orbit_distance: None,
            opacity: 1.0,
            scale: 1.0,
            captured: false,
            overlapping: false,
            removed: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_color(mut self, color: ColorTag) -> Self {
        self.color = color;
        self
    }

    pub fn with_target(mut self, is_target: bool) -> Self {
        self.is_target = is_target;
        self
    }

    /// Diameter used for hit tests after age decay
    #[inline]
    pub fn effective_size(&self) -> f32 {
        self.size * self.scale
    }

    /// Age in milliseconds at session time `now_ms`
    #[inline]
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.spawn_time_ms).max(0.0)
    }

    /// True if `point` lies inside the (decayed) circle
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.effective_size() / 2.0
    }

    /// Mark for removal at the end of the tick
    pub fn remove(&mut self) {
        self.removed = true;
    }

    /// Generic integration step
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Shrink and fade with wall-clock age; returns true once fully vanished
    pub fn decay(&mut self, now_ms: f64, lifetime_ms: f64) -> bool {
        let t = (self.age_ms(now_ms) / lifetime_ms.max(1.0)).clamp(0.0, 1.0) as f32;
        let remaining = 1.0 - t;
        // Never grow back, even if the lifetime was extended by a rule shift
        self.scale = self.scale.min(remaining);
        self.opacity = self.opacity.min(remaining);
        self.scale <= 0.0
    }
}

/// Flat collection of live entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        // Default-constructed stores start at 0; skip it so ids stay non-zero
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Append if below `max`; silently drops the entity otherwise
    pub fn spawn(&mut self, entity: Entity, max: usize) -> bool {
        if self.entities.len() >= max {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Append a whole batch only if all of it fits under `max`
    pub fn spawn_batch(&mut self, batch: Vec<Entity>, max: usize) -> usize {
        if batch.is_empty() || self.entities.len() + batch.len() > max {
            return 0;
        }
        let n = batch.len();
        self.entities.extend(batch);
        n
    }

    /// Insert without admission control (session-owned fixtures like the player)
    pub fn insert(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Generic integration: `pos += vel` for every live entity.
    /// Games whose entities steer or home call [`Entity::integrate`] per entity instead.
    pub fn step_all(&mut self) {
        for e in self.entities.iter_mut().filter(|e| !e.removed) {
            e.integrate();
        }
    }

    /// Drop entities flagged for removal or outside the viewport plus `margin`
    pub fn purge_out_of_bounds(&mut self, viewport: &Viewport, margin: f32) {
        self.entities
            .retain(|e| !e.removed && viewport.contains_with_margin(e.pos, margin));
    }

    /// Remove an entity; `None` if it is already gone
    pub fn remove_by_id(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Flag an entity for removal at the next purge
    pub fn mark_removed(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.removed = true;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dot(store: &mut EntityStore, x: f32, y: f32) -> Entity {
        let id = store.next_id();
        Entity::new(id, EntityKind::Standard, Vec2::new(x, y), 20.0, 0.0)
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut store = EntityStore::new();
        for _ in 0..5 {
            let e = dot(&mut store, 10.0, 10.0);
            store.spawn(e, 3);
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_spawn_batch_is_all_or_nothing() {
        let mut store = EntityStore::new();
        let a = dot(&mut store, 0.0, 0.0);
        store.spawn(a, 3);
        let pair = vec![dot(&mut store, 1.0, 1.0), dot(&mut store, 2.0, 2.0)];
        assert_eq!(store.spawn_batch(pair, 3), 2);
        let pair = vec![dot(&mut store, 1.0, 1.0), dot(&mut store, 2.0, 2.0)];
        assert_eq!(store.spawn_batch(pair, 3), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = EntityStore::default();
        let a = store.next_id();
        let b = store.next_id();
        assert_ne!(a, b);
        assert_ne!(a, EntityId(0));
    }

    #[test]
    fn test_purge_removes_far_and_flagged() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut store = EntityStore::new();
        let inside = dot(&mut store, 400.0, 300.0);
        let edge = dot(&mut store, -150.0, 300.0);
        let far = dot(&mut store, 1100.0, 300.0);
        let mut flagged = dot(&mut store, 10.0, 10.0);
        flagged.remove();
        for e in [inside, edge, far, flagged] {
            store.insert(e);
        }

        store.purge_out_of_bounds(&viewport, 200.0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut store = EntityStore::new();
        let e = dot(&mut store, 0.0, 0.0);
        let id = e.id;
        store.insert(e);
        assert!(store.remove_by_id(id).is_some());
        assert!(store.remove_by_id(id).is_none());
        assert!(!store.mark_removed(id));
    }

    #[test]
    fn test_step_all_integrates() {
        let mut store = EntityStore::new();
        let e = dot(&mut store, 5.0, 5.0).with_velocity(Vec2::new(1.0, -2.0));
        store.insert(e);
        store.step_all();
        store.step_all();
        let e = store.iter().next().unwrap();
        assert_eq!(e.pos, Vec2::new(7.0, 1.0));
    }

    #[test]
    fn test_step_all_skips_removed() {
        let mut store = EntityStore::new();
        let e = dot(&mut store, 5.0, 5.0).with_velocity(Vec2::new(1.0, 0.0));
        let id = e.id;
        store.insert(e);
        assert!(store.mark_removed(id));
        store.step_all();
        assert_eq!(store.get(id).unwrap().pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_decay_is_monotonic_and_vanishes() {
        let mut e = Entity::new(EntityId(1), EntityKind::Standard, Vec2::ZERO, 40.0, 1000.0);
        assert!(!e.decay(2000.0, 4000.0));
        assert!((e.scale - 0.75).abs() < 1e-6);
        // A longer lifetime later must not regrow the entity
        assert!(!e.decay(2000.0, 8000.0));
        assert!((e.scale - 0.75).abs() < 1e-6);
        assert!(e.decay(5000.0, 4000.0));
        assert_eq!(e.effective_size(), 0.0);
    }

    #[test]
    fn test_polarity_matching() {
        assert!(Polarity::White.matches(ColorTag::White));
        assert!(!Polarity::White.matches(ColorTag::Red));
        assert_eq!(Polarity::Red.flipped(), Polarity::White);
    }

    proptest! {
        #[test]
        fn prop_purge_is_idempotent(points in prop::collection::vec((-600.0f32..1600.0, -600.0f32..1400.0), 0..40)) {
            let viewport = Viewport::new(1000.0, 800.0);
            let mut store = EntityStore::new();
            for (x, y) in points {
                let e = dot(&mut store, x, y);
                store.insert(e);
            }
            store.purge_out_of_bounds(&viewport, 200.0);
            let once: Vec<EntityId> = store.iter().map(|e| e.id).collect();
            store.purge_out_of_bounds(&viewport, 200.0);
            let twice: Vec<EntityId> = store.iter().map(|e| e.id).collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_spawn_never_exceeds_cap(max in 0usize..20, firings in 0usize..60) {
            let mut store = EntityStore::new();
            for _ in 0..firings {
                let e = dot(&mut store, 0.0, 0.0);
                store.spawn(e, max);
                prop_assert!(store.len() <= max);
            }
        }
    }
}
