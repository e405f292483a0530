//! Gather: particles leak out of the core on a random walk. Click them before
//! they escape the containment field to send them home.

use glam::Vec2;
use rand::Rng;

use super::{ClickOutcome, GameStrategy, GameType, TickContext};
use crate::sim::collision::{escaped, within_radius};
use crate::sim::entity::{ColorTag, Entity, EntityId, EntityKind, EntityStore};
use crate::sim::events::{GameEvent, SpecialAction};
use crate::sim::rules::Variation;
use crate::{heading, polar_to_cartesian};

/// Containment radius is the inscribed radius plus this slack
pub const CONTAINMENT_SLACK: f32 = 50.0;
pub const LEAK_PENALTY: f64 = 5.0;
pub const CATCH_REWARD: f64 = 5.0;
/// Per-axis velocity jitter amplitude per tick
const JITTER: f32 = 0.1;
const RETURN_SPEED: f32 = 3.0;
/// Caught particles vanish once this close to the core
const CORE_RADIUS: f32 = 15.0;

pub struct Gather;

fn jitter_scale(variation: Variation) -> f32 {
    match variation {
        Variation::Turbulence => 3.0,
        Variation::Stillness => 0.3,
        _ => 1.0,
    }
}

impl GameStrategy for Gather {
    fn game(&self) -> GameType {
        GameType::Gather
    }

    fn spawn(&self, store: &mut EntityStore, ctx: &mut TickContext) -> Vec<Entity> {
        let angle = ctx.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = ctx.rng.random_range(1.0..3.0);
        let size = ctx.rng.random_range(15.0..35.0);
        vec![
            Entity::new(store.next_id(), EntityKind::Particle, ctx.viewport.center(), size, ctx.now_ms)
                .with_velocity(polar_to_cartesian(speed, angle))
                .with_color(ColorTag::Teal)
                .with_target(true),
        ]
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let center = ctx.viewport.center();
        let containment = ctx.viewport.inner_radius() + CONTAINMENT_SLACK;
        let amplitude = JITTER * jitter_scale(ctx.variation());

        for e in store.iter_mut() {
            if e.removed {
                continue;
            }
            if e.kind != EntityKind::Particle {
                e.integrate();
                continue;
            }

            if e.captured {
                e.integrate();
                if within_radius(e.pos, center, CORE_RADIUS) {
                    e.remove();
                }
                continue;
            }

            // Bounded random walk
            let kick = Vec2::new(
                ctx.rng.random::<f32>() - 0.5,
                ctx.rng.random::<f32>() - 0.5,
            );
            e.vel += kick * amplitude;

            let next = e.pos + e.vel;
            if escaped(next, center, containment) {
                ctx.miss(LEAK_PENALTY, "ENTROPY LEAK");
                e.remove();
                continue;
            }
            e.pos = next;
        }
    }

    fn on_click(
        &self,
        target: Option<EntityId>,
        store: &mut EntityStore,
        ctx: &mut TickContext,
    ) -> ClickOutcome {
        let center = ctx.viewport.center();
        let Some(particle) = target
            .and_then(|id| store.get_mut(id))
            .filter(|e| e.kind == EntityKind::Particle && !e.captured && !e.removed)
        else {
            return ClickOutcome::Ignored;
        };

        particle.vel = heading(particle.pos, center) * RETURN_SPEED;
        particle.color = ColorTag::Indigo;
        particle.captured = true;

        ctx.state.reward(CATCH_REWARD);
        ctx.state.set_message("CONTAINED");
        ctx.emit(GameEvent::SpecialAction(SpecialAction::GatherCatch));
        ClickOutcome::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::games::testing::Harness;

    fn drifter(h: &mut Harness, offset: Vec2, vel: Vec2) -> EntityId {
        let id = h.store.next_id();
        let pos = h.viewport.center() + offset;
        h.store.insert(
            Entity::new(id, EntityKind::Particle, pos, 20.0, 0.0)
                .with_velocity(vel)
                .with_target(true),
        );
        id
    }

    #[test]
    fn test_escape_is_penalised_once() {
        let mut h = Harness::new(GameType::Gather);
        h.state.score = 20.0;
        // Containment is 350 for an 800x600 view
        let id = drifter(&mut h, Vec2::new(0.0, 343.0), Vec2::new(0.0, 5.0));
        h.tick(&Gather);
        h.tick(&Gather);
        assert_eq!(h.count(&GameEvent::Miss), 1);
        assert_eq!(h.state.score, 15.0);
        assert_eq!(h.state.message, "ENTROPY LEAK");
        assert!(h.store.get(id).is_none());
    }

    #[test]
    fn test_random_walk_perturbs_velocity() {
        let mut h = Harness::new(GameType::Gather);
        let id = drifter(&mut h, Vec2::ZERO, Vec2::new(1.0, 0.0));
        h.tick(&Gather);
        let e = h.store.get(id).unwrap();
        let dv = e.vel - Vec2::new(1.0, 0.0);
        assert!(dv.x.abs() <= JITTER / 2.0 && dv.y.abs() <= JITTER / 2.0);
    }

    #[test]
    fn test_click_catches_and_returns_home() {
        let mut h = Harness::new(GameType::Gather);
        let id = drifter(&mut h, Vec2::new(120.0, 0.0), Vec2::new(2.0, 0.0));

        let outcome = h.with_ctx(|store, ctx| Gather.on_click(Some(id), store, ctx));
        assert_eq!(outcome, ClickOutcome::Hit);
        assert_eq!(h.state.score, CATCH_REWARD);
        let e = h.store.get(id).unwrap();
        assert!(e.captured);
        assert!(e.vel.x < 0.0);

        // A second click on the same particle does nothing
        let again = h.with_ctx(|store, ctx| Gather.on_click(Some(id), store, ctx));
        assert_eq!(again, ClickOutcome::Ignored);

        for _ in 0..60 {
            h.tick(&Gather);
        }
        assert!(h.store.get(id).is_none());
        assert_eq!(h.count(&GameEvent::Miss), 0);
    }

    #[test]
    fn test_click_on_missing_particle_ignored() {
        let mut h = Harness::new(GameType::Gather);
        let outcome = h.with_ctx(|store, ctx| Gather.on_click(Some(EntityId(99)), store, ctx));
        assert_eq!(outcome, ClickOutcome::Ignored);
        let outcome = h.with_ctx(|store, ctx| Gather.on_click(None, store, ctx));
        assert_eq!(outcome, ClickOutcome::Ignored);
    }

    #[test]
    fn test_spawn_within_bounds() {
        let mut h = Harness::new(GameType::Gather);
        for _ in 0..20 {
            let batch = h.with_ctx(|store, ctx| Gather.spawn(store, ctx));
            let e = &batch[0];
            assert!((15.0..35.0).contains(&e.size));
            let speed = e.vel.length();
            assert!((1.0 - 1e-4..3.0 + 1e-4).contains(&speed));
        }
    }
}
