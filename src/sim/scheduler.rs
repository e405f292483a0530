//! Rule-shift scheduler
//!
//! Runs on every clock tick. On each interval boundary it picks a new
//! variation for the game, nudges the numeric rules and lets the strategy
//! apply any semantic change. Silent shifts leave the HUD message alone.

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::events::GameEvent;
use super::games::{GameStrategy, ShiftMode};
use super::rules::{RuleSet, Variation};
use super::state::SessionState;

/// Silent shifts scale speeds by one of these
const SILENT_SPEED_FACTORS: [f32; 2] = [1.2, 0.8];
/// Silent min-size jitter (px)
const SILENT_SIZE_STEP: f32 = 5.0;
/// Silent spawn-interval jitter (ms)
const SILENT_INTERVAL_STEP: f64 = 200.0;
/// Overt shifts scale interval and max speed by one of these
const OVERT_FACTORS: [f64; 2] = [0.8, 1.2];

#[derive(Debug, Clone, Copy)]
pub struct RuleShiftScheduler {
    pub interval_secs: u32,
    pub mode: ShiftMode,
}

impl RuleShiftScheduler {
    pub fn new(interval_secs: u32, mode: ShiftMode) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            mode,
        }
    }

    /// True if `elapsed` is a boundary that has not fired yet
    pub fn is_due(&self, state: &SessionState) -> bool {
        let elapsed = state.elapsed_seconds;
        elapsed > 0 && elapsed % self.interval_secs == 0 && elapsed != state.last_shift_boundary
    }

    /// Evaluate after the clock tick; returns true if a shift was applied
    pub fn on_clock_tick(
        &self,
        strategy: &dyn GameStrategy,
        rules: &mut RuleSet,
        state: &mut SessionState,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.is_due(state) {
            return false;
        }
        state.last_shift_boundary = state.elapsed_seconds;
        state.rule_shifts_applied += 1;

        let variation = strategy
            .game()
            .variations()
            .choose(rng)
            .copied()
            .unwrap_or(Variation::Default);
        let silent = self.mode == ShiftMode::Silent;

        rules.mutate(|r| {
            r.variation = variation;
            if silent {
                let factor = SILENT_SPEED_FACTORS[rng.random_range(0..SILENT_SPEED_FACTORS.len())];
                r.min_speed *= factor;
                r.max_speed *= factor;
                r.min_size += rng.random_range(-SILENT_SIZE_STEP..=SILENT_SIZE_STEP);
                r.spawn_interval_ms += rng.random_range(-SILENT_INTERVAL_STEP..=SILENT_INTERVAL_STEP);
            } else {
                r.spawn_interval_ms *= OVERT_FACTORS[rng.random_range(0..OVERT_FACTORS.len())];
                r.max_speed *= OVERT_FACTORS[rng.random_range(0..OVERT_FACTORS.len())] as f32;
            }
        });
        strategy.after_shift(rules, state, rng);

        if !silent {
            state.set_message("RULES SHIFTED");
        }
        events.push(GameEvent::RuleShift { silent });

        log::debug!(
            "Rule shift #{} at {}s: {} (interval {:.0}ms, speed {:.2}..{:.2})",
            state.rule_shifts_applied,
            state.elapsed_seconds,
            variation.as_str(),
            rules.spawn_interval_ms,
            rules.min_speed,
            rules.max_speed
        );
        true
    }
}
