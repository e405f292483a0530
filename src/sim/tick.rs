//! Fixed timestep physics tick and player input
//!
//! One physics tick runs the active strategy's motion/collision/scoring pass
//! and then purges removed and far off-screen entities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::pick;
use super::entity::{EntityId, EntityStore};
use super::games::{GameStrategy, TickContext};
use crate::consts::PURGE_MARGIN;

/// Player input (deterministic; delivered between ticks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer moved to (x, y) in viewport pixels
    PointerMove { x: f32, y: f32 },
    /// Press started (breath: inhale)
    PointerDown,
    /// Press released
    PointerUp,
    /// Click already resolved to an entity by the host, or on empty space
    Click(Option<EntityId>),
    /// Click at a point; resolved against the store's topmost entity
    Tap { x: f32, y: f32 },
}

impl InputEvent {
    /// Resolve a tap into a click on whatever lies under it
    pub fn resolve(self, store: &EntityStore) -> InputEvent {
        match self {
            InputEvent::Tap { x, y } => {
                InputEvent::Click(pick(store.as_slice().iter(), Vec2::new(x, y)).map(|e| e.id))
            }
            other => other,
        }
    }
}

/// Advance the game by one fixed timestep
pub fn physics_tick(strategy: &dyn GameStrategy, store: &mut EntityStore, ctx: &mut TickContext) {
    strategy.advance(store, ctx);
    store.purge_out_of_bounds(&ctx.viewport, PURGE_MARGIN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityKind};
    use crate::sim::games::testing::Harness;
    use crate::sim::games::{Avoid, GameType};

    #[test]
    fn test_tap_resolves_topmost_entity() {
        let mut store = EntityStore::new();
        let a = store.next_id();
        let b = store.next_id();
        store.insert(Entity::new(a, EntityKind::Standard, Vec2::new(100.0, 100.0), 60.0, 0.0));
        store.insert(Entity::new(b, EntityKind::Standard, Vec2::new(110.0, 100.0), 60.0, 0.0));

        let tap = InputEvent::Tap { x: 105.0, y: 100.0 };
        assert_eq!(tap.resolve(&store), InputEvent::Click(Some(b)));
        let empty = InputEvent::Tap { x: 500.0, y: 500.0 };
        assert_eq!(empty.resolve(&store), InputEvent::Click(None));
        assert_eq!(InputEvent::PointerDown.resolve(&store), InputEvent::PointerDown);
    }

    #[test]
    fn test_physics_tick_purges_far_entities() {
        let mut h = Harness::new(GameType::Avoid);
        let id = h.store.next_id();
        h.store
            .insert(Entity::new(id, EntityKind::Standard, Vec2::new(-500.0, 0.0), 10.0, 0.0));
        h.with_ctx(|store, ctx| physics_tick(&Avoid, store, ctx));
        assert!(h.store.is_empty());
    }
}
