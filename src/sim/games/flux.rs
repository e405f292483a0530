//! Flux: charged particles fall into the core; absorb only those matching the
//! current polarity. Clicking flips polarity.

use rand::Rng;

use super::{ClickOutcome, GameStrategy, GameType, TickContext};
use crate::sim::entity::{ColorTag, Entity, EntityId, EntityKind, EntityStore};
use crate::sim::events::{GameEvent, SpecialAction};
use crate::sim::rules::Variation;
use crate::{heading, polar_to_cartesian};

pub const CAPTURE_RADIUS: f32 = 40.0;
pub const ABSORB_REWARD: f64 = 10.0;
pub const MISMATCH_PENALTY: f64 = 10.0;
/// Homing speed = BASE + PULL / (distance + SOFTENING): closer means faster
const BASE_SPEED: f32 = 2.0;
const PULL: f32 = 200.0;
const SOFTENING: f32 = 10.0;
const PARTICLE_SIZE: f32 = 25.0;

pub struct Flux;

/// Speed toward the core at `distance`
pub fn homing_speed(distance: f32, variation: Variation) -> f32 {
    let speed = BASE_SPEED + PULL / (distance + SOFTENING);
    match variation {
        Variation::Surge => speed * 1.5,
        Variation::Doldrums => speed * 0.6,
        _ => speed,
    }
}

impl GameStrategy for Flux {
    fn game(&self) -> GameType {
        GameType::Flux
    }

    fn spawn(&self, store: &mut EntityStore, ctx: &mut TickContext) -> Vec<Entity> {
        let angle = ctx.rng.random_range(0.0..std::f32::consts::TAU);
        let pos = ctx.viewport.center() + polar_to_cartesian(ctx.viewport.outer_spawn_radius(), angle);
        let color = if ctx.rng.random_bool(0.5) {
            ColorTag::Red
        } else {
            ColorTag::White
        };
        vec![Entity::new(store.next_id(), EntityKind::Particle, pos, PARTICLE_SIZE, ctx.now_ms).with_color(color)]
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let center = ctx.viewport.center();
        let variation = ctx.variation();

        for e in store.iter_mut() {
            if e.removed {
                continue;
            }
            if e.kind != EntityKind::Particle {
                e.integrate();
                continue;
            }

            let distance = e.pos.distance(center);
            if distance < CAPTURE_RADIUS {
                let matched = ctx.state.polarity.matches(e.color) != ctx.state.logic_inverted;
                if matched {
                    ctx.hit(ABSORB_REWARD, "ABSORBED");
                } else {
                    ctx.miss(MISMATCH_PENALTY, "POLARITY MISMATCH");
                }
                e.remove();
                continue;
            }

            let dir = heading(e.pos, center);
            e.pos += e.vel + dir * homing_speed(distance, variation);
        }
    }

    fn on_click(
        &self,
        _target: Option<EntityId>,
        _store: &mut EntityStore,
        ctx: &mut TickContext,
    ) -> ClickOutcome {
        ctx.state.polarity = ctx.state.polarity.flipped();
        ctx.emit(GameEvent::SpecialAction(SpecialAction::FluxFlip));
        ClickOutcome::Action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Polarity;
    use crate::sim::games::testing::Harness;
    use glam::Vec2;

    fn particle(h: &mut Harness, distance: f32, color: ColorTag) -> EntityId {
        let id = h.store.next_id();
        let pos = h.viewport.center() + Vec2::new(distance, 0.0);
        h.store
            .insert(Entity::new(id, EntityKind::Particle, pos, PARTICLE_SIZE, 0.0).with_color(color));
        id
    }

    #[test]
    fn test_matching_particle_absorbed_once() {
        let mut h = Harness::new(GameType::Flux);
        let id = particle(&mut h, 500.0, ColorTag::White);

        for _ in 0..400 {
            h.tick(&Flux);
        }
        assert_eq!(h.count(&GameEvent::Hit), 1);
        assert_eq!(h.count(&GameEvent::Miss), 0);
        assert!(h.store.get(id).is_none());
        assert_eq!(h.state.score, ABSORB_REWARD);
        assert_eq!(h.state.message, "ABSORBED");
    }

    #[test]
    fn test_mismatch_penalised_and_removed() {
        let mut h = Harness::new(GameType::Flux);
        h.state.score = 4.0;
        let id = particle(&mut h, 30.0, ColorTag::Red);
        h.tick(&Flux);
        assert_eq!(h.count(&GameEvent::Miss), 1);
        assert_eq!(h.state.score, 0.0);
        assert!(h.store.get(id).is_none());
    }

    #[test]
    fn test_inverted_logic_flips_match() {
        let mut h = Harness::new(GameType::Flux);
        h.state.logic_inverted = true;
        particle(&mut h, 10.0, ColorTag::Red);
        h.tick(&Flux);
        assert_eq!(h.count(&GameEvent::Hit), 1);
    }

    #[test]
    fn test_click_flips_polarity() {
        let mut h = Harness::new(GameType::Flux);
        assert_eq!(h.state.polarity, Polarity::White);
        h.with_ctx(|store, ctx| Flux.on_click(None, store, ctx));
        assert_eq!(h.state.polarity, Polarity::Red);
        assert_eq!(h.state.polarity.label(), "red");
    }

    #[test]
    fn test_closer_is_faster() {
        assert!(homing_speed(50.0, Variation::Default) > homing_speed(400.0, Variation::Default));
        assert!(homing_speed(100.0, Variation::Surge) > homing_speed(100.0, Variation::Doldrums));
    }

    #[test]
    fn test_spawns_outside_view() {
        let mut h = Harness::new(GameType::Flux);
        let batch = h.with_ctx(|store, ctx| Flux.spawn(store, ctx));
        let d = batch[0].pos.distance(h.viewport.center());
        assert!((d - h.viewport.outer_spawn_radius()).abs() < 1e-2);
        assert!(matches!(batch[0].color, ColorTag::Red | ColorTag::White));
    }
}
