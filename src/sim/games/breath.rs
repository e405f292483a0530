//! Breath: hold to inflate, release to deflate, and squeeze the player through
//! the gaps of falling wall pairs.

use glam::Vec2;
use rand::Rng;

use super::{GatePenalty, GameStrategy, GameType, TickContext};
use crate::consts::{BREATH_MAX_SIZE, BREATH_MIN_SIZE};
use crate::sim::collision::Aabb;
use crate::sim::entity::{ColorTag, Entity, EntityKind, EntityStore};
use crate::sim::rules::Variation;

/// Size change per tick while holding / released
pub const INHALE_RATE: f32 = 5.0;
pub const EXHALE_RATE: f32 = 3.0;
/// Wall fall speed (pixels per tick)
pub const GATE_SPEED: f32 = 3.0;
/// Walls enter just above the viewport
const GATE_START_Y: f32 = -50.0;
pub const COLLISION_PENALTY: f64 = 1.0;

pub struct Breath;

/// Grow while held, shrink otherwise, within the size limits
pub fn breathe(size: f32, holding: bool) -> f32 {
    if holding {
        (size + INHALE_RATE).min(BREATH_MAX_SIZE)
    } else {
        (size - EXHALE_RATE).max(BREATH_MIN_SIZE)
    }
}

impl GameStrategy for Breath {
    fn game(&self) -> GameType {
        GameType::Breath
    }

    fn spawn(&self, store: &mut EntityStore, ctx: &mut TickContext) -> Vec<Entity> {
        let width = ctx.viewport.width;
        let (gap_min, gap_max, speed): (f32, f32, f32) = match ctx.variation() {
            Variation::Narrow => (60.0, 120.0, GATE_SPEED),
            Variation::Rush => (100.0, 200.0, GATE_SPEED * 1.5),
            _ => (100.0, 200.0, GATE_SPEED),
        };
        let gap = ctx.rng.random_range(gap_min..gap_max).min(width);
        let gap_x = ctx.rng.random_range(0.0..=(width - gap).max(0.0));
        let right_x = gap_x + gap;

        let mut walls = Vec::with_capacity(2);
        for (left, right) in [(0.0, gap_x), (right_x, width)] {
            let wall_width = right - left;
            if wall_width < 1.0 {
                continue;
            }
            let center = Vec2::new(left + wall_width / 2.0, GATE_START_Y);
            walls.push(
                Entity::new(store.next_id(), EntityKind::Gate, center, wall_width, ctx.now_ms)
                    .with_velocity(Vec2::new(0.0, speed))
                    .with_color(ColorTag::Slate),
            );
        }
        walls
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        ctx.state.breath_size = breathe(ctx.state.breath_size, ctx.state.holding);
        let player = Aabb::square(ctx.viewport.center(), ctx.state.breath_size);

        for e in store.iter_mut() {
            if e.removed {
                continue;
            }
            if e.kind == EntityKind::Gate {
                let overlapping = player.overlaps(&Aabb::gate(e));
                let penalise = match ctx.gate_penalty {
                    GatePenalty::EveryTick => overlapping,
                    GatePenalty::OncePerOverlap => overlapping && !e.overlapping,
                };
                if penalise {
                    ctx.miss(COLLISION_PENALTY, "COLLISION");
                }
                e.overlapping = overlapping;
            }
            e.integrate();
        }
    }
}
