//! Phase: a ring pulses around a fixed target ring. Click when the two line up.

use super::{ClickOutcome, GameStrategy, GameType, TickContext};
use crate::sim::entity::{ColorTag, Entity, EntityId, EntityKind, EntityStore};
use crate::sim::events::{GameEvent, SpecialAction};
use crate::sim::rules::Variation;

/// Diameter of the fixed target ring
pub const TARGET_RING_SIZE: f32 = 200.0;
/// Largest diameter error that still counts as in sync
pub const SYNC_TOLERANCE: f32 = 40.0;
pub const SYNC_REWARD: f64 = 25.0;
pub const SYNC_PENALTY: f64 = 10.0;

pub struct Phase;

/// Breathing ring diameter at wall-clock time `t` (seconds)
pub fn ring_size(t: f64, variation: Variation) -> f32 {
    let t = match variation {
        Variation::Slowwave => t * 0.5,
        _ => t,
    };
    let mut radius = 100.0 + 50.0 * (3.0 * t).sin() + 5.0 * (7.0 * t).sin();
    if variation == Variation::Stutter {
        radius += 15.0 * (13.0 * t).sin();
    }
    (radius * 2.0) as f32
}

impl GameStrategy for Phase {
    fn game(&self) -> GameType {
        GameType::Phase
    }

    fn setup(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let center = ctx.viewport.center();
        let size = ring_size(ctx.now_ms / 1000.0, ctx.variation());

        let target = Entity::new(store.next_id(), EntityKind::TargetRing, center, TARGET_RING_SIZE, ctx.now_ms)
            .with_color(ColorTag::Clear);
        let ring = Entity::new(store.next_id(), EntityKind::BreathingRing, center, size, ctx.now_ms)
            .with_target(true);
        store.insert(target);
        store.insert(ring);
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        if store.count_kind(EntityKind::BreathingRing) == 0 {
            store.clear();
            self.setup(store, ctx);
        }

        let center = ctx.viewport.center();
        let size = ring_size(ctx.now_ms / 1000.0, ctx.variation());
        for e in store.iter_mut() {
            // Rings follow the viewport centre on resize
            e.pos = center;
            if e.kind == EntityKind::BreathingRing {
                e.size = size;
            }
        }
    }

    fn on_click(
        &self,
        _target: Option<EntityId>,
        store: &mut EntityStore,
        ctx: &mut TickContext,
    ) -> ClickOutcome {
        let size = store
            .iter()
            .find(|e| e.kind == EntityKind::BreathingRing)
            .map_or(0.0, |e| e.size);

        if (size - TARGET_RING_SIZE).abs() < SYNC_TOLERANCE {
            ctx.state.reward(SYNC_REWARD);
            ctx.state.set_message("SYNC PERFECT");
            ctx.emit(GameEvent::SpecialAction(SpecialAction::PhaseSync));
            ClickOutcome::Hit
        } else {
            ctx.miss(SYNC_PENALTY, "SYNC ERROR");
            ClickOutcome::Miss
        }
    }
}
