//! Avoid: a swarm hunts the player's marker, which trails the pointer.
//! Survival accrues score; contact costs it.

use glam::Vec2;
use rand::Rng;

use super::{GameStrategy, GameType, TickContext};
use crate::sim::collision::within_radius;
use crate::sim::entity::{ColorTag, Entity, EntityKind, EntityStore};
use crate::sim::rules::Variation;
use crate::{heading, polar_to_cartesian};

/// Fraction of the remaining distance to the pointer covered per tick
pub const FOLLOW_FACTOR: f32 = 0.2;
pub const CONTACT_RADIUS: f32 = 40.0;
pub const CONTACT_PENALTY: f64 = 2.0;
/// Accrued per enemy per tick while not in contact
pub const SURVIVAL_REWARD: f64 = 0.05;
/// Pursuit speed as a multiple of the rule set's minimum speed
const PURSUIT_FACTOR: f32 = 1.5;
const ENEMY_SIZE: f32 = 15.0;

pub struct Avoid;

impl GameStrategy for Avoid {
    fn game(&self) -> GameType {
        GameType::Avoid
    }

    fn spawn(&self, store: &mut EntityStore, ctx: &mut TickContext) -> Vec<Entity> {
        let angle = ctx.rng.random_range(0.0..std::f32::consts::TAU);
        let pos = ctx.viewport.center() + polar_to_cartesian(ctx.viewport.outer_spawn_radius(), angle);
        vec![Entity::new(store.next_id(), EntityKind::Enemy, pos, ENEMY_SIZE, ctx.now_ms).with_color(ColorTag::Red)]
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let state = &mut *ctx.state;
        state.avoid_pos += (state.pointer - state.avoid_pos) * FOLLOW_FACTOR;
        let target = state.avoid_pos;

        let (speed_mult, jitter) = match ctx.rules.variation {
            Variation::Frenzy => (1.5, 1.0),
            Variation::Scatter => (1.0, 2.0),
            _ => (1.0, 1.0),
        };
        let speed = ctx.rules.min_speed * PURSUIT_FACTOR * speed_mult;

        for e in store.iter_mut() {
            if e.removed {
                continue;
            }
            if e.kind != EntityKind::Enemy {
                e.integrate();
                continue;
            }

            let wobble = Vec2::new(
                ctx.rng.random::<f32>() - 0.5,
                ctx.rng.random::<f32>() - 0.5,
            ) * jitter;
            e.vel = heading(e.pos, target) * speed + wobble;

            if within_radius(e.pos, target, CONTACT_RADIUS) {
                ctx.miss(CONTACT_PENALTY, "CRITICAL DAMAGE");
            } else {
                ctx.state.reward(SURVIVAL_REWARD);
            }
            e.integrate();
        }
    }
}
