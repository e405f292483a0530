//! Shift: the classic target-click game. Circles drift in from the edges and
//! fade with age; click the ones in the target colour. Rule shifts rotate the
//! target colour and may invert what counts as correct.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{ClickOutcome, GameStrategy, GameType, TickContext};
use crate::heading;
use crate::sim::entity::{ColorTag, Entity, EntityId, EntityKind, EntityStore};
use crate::sim::events::GameEvent;
use crate::sim::rules::{RuleSet, Variation};
use crate::sim::state::SessionState;

pub const HIT_REWARD: f64 = 10.0;
pub const WRONG_TARGET_PENALTY: f64 = 5.0;
/// Full shrink/fade time (ms of wall clock)
pub const LIFETIME_MS: f64 = 4000.0;
const FADE_LIFETIME_MS: f64 = 2500.0;
/// Colours circles are drawn from; the target is always one of them
pub const PALETTE: [ColorTag; 3] = [ColorTag::Indigo, ColorTag::Amber, ColorTag::Teal];

pub struct Shift;

fn lifetime(variation: Variation) -> f64 {
    match variation {
        Variation::Fade => FADE_LIFETIME_MS,
        _ => LIFETIME_MS,
    }
}

/// Next colour in the palette after `color`
pub fn rotate_color(color: ColorTag) -> ColorTag {
    let idx = PALETTE.iter().position(|c| *c == color).unwrap_or(0);
    PALETTE[(idx + 1) % PALETTE.len()]
}

impl GameStrategy for Shift {
    fn game(&self) -> GameType {
        GameType::Shift
    }

    fn spawn(&self, store: &mut EntityStore, ctx: &mut TickContext) -> Vec<Entity> {
        let (w, h) = (ctx.viewport.width, ctx.viewport.height);
        let rules = ctx.rules;
        let size = ctx.rng.random_range(rules.min_size..=rules.max_size);
        let speed = ctx.rng.random_range(rules.min_speed..=rules.max_speed);

        // Enter from a random edge, aimed at a point in the middle half
        let pos = match ctx.rng.random_range(0..4) {
            0 => Vec2::new(ctx.rng.random_range(0.0..=w), 0.0),
            1 => Vec2::new(w, ctx.rng.random_range(0.0..=h)),
            2 => Vec2::new(ctx.rng.random_range(0.0..=w), h),
            _ => Vec2::new(0.0, ctx.rng.random_range(0.0..=h)),
        };
        let aim = Vec2::new(
            ctx.rng.random_range(w * 0.25..=w * 0.75),
            ctx.rng.random_range(h * 0.25..=h * 0.75),
        );

        let target_odds = if rules.variation == Variation::Swap { 0.25 } else { 0.5 };
        let color = if ctx.rng.random_bool(target_odds) {
            rules.target_color
        } else {
            let decoys: Vec<ColorTag> = PALETTE
                .into_iter()
                .filter(|c| *c != rules.target_color)
                .collect();
            decoys[ctx.rng.random_range(0..decoys.len())]
        };

        vec![
            Entity::new(store.next_id(), EntityKind::Standard, pos, size, ctx.now_ms)
                .with_velocity(heading(pos, aim) * speed)
                .with_color(color)
                .with_target(color == rules.target_color),
        ]
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let life = lifetime(ctx.variation());
        let target_color = ctx.rules.target_color;

        store.step_all();
        for e in store.iter_mut() {
            if e.removed {
                continue;
            }
            // Retag after a colour rotation
            e.is_target = e.color == target_color;
            if e.decay(ctx.now_ms, life) {
                e.remove();
            }
        }
    }

    fn on_click(
        &self,
        target: Option<EntityId>,
        store: &mut EntityStore,
        ctx: &mut TickContext,
    ) -> ClickOutcome {
        let Some((id, is_target)) = target
            .and_then(|id| store.get(id))
            .filter(|e| e.kind == EntityKind::Standard && !e.removed)
            .map(|e| (e.id, e.is_target))
        else {
            // Stale or empty clicks are judged but cost nothing
            ctx.state.set_message("MISS");
            ctx.emit(GameEvent::Miss);
            return ClickOutcome::Miss;
        };

        let correct = is_target != ctx.state.logic_inverted;
        store.mark_removed(id);

        if correct {
            ctx.hit(HIT_REWARD, "TARGET ACQUIRED");
            ClickOutcome::Hit
        } else {
            ctx.miss(WRONG_TARGET_PENALTY, "WRONG TARGET");
            ClickOutcome::Miss
        }
    }

    fn after_shift(&self, rules: &mut RuleSet, state: &mut SessionState, _rng: &mut Pcg32) {
        state.logic_inverted = rules.variation == Variation::Mirror;
        rules.target_color = rotate_color(rules.target_color);
    }
}
