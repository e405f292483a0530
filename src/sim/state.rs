//! Session state and scoring
//!
//! Everything the HUD shows and the summary reports lives here. Mutated only by
//! the game strategies, input handling and the rule-shift scheduler.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Polarity;
use super::games::GameType;
use crate::Viewport;
use crate::consts::*;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Menu / no game selected
    #[default]
    Idle,
    /// Timers armed, simulation advancing
    Running,
    /// Time ran out or the player ended the run
    Ended,
}

/// Complete per-session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub game: Option<GameType>,
    /// Never negative
    pub score: f64,
    pub hit_count: u32,
    pub total_clicks: u32,
    /// Recomputed on judged clicks only; 100 before any click
    pub accuracy_percent: f64,
    /// Mean gap between clicks (ms), `None` with fewer than two clicks
    pub average_click_ms: Option<f64>,
    pub elapsed_seconds: u32,
    pub rule_shifts_applied: u32,
    /// Last elapsed-second boundary that triggered a rule shift
    pub last_shift_boundary: u32,
    pub message: String,
    /// Inverts hit/miss semantics for games that judge targets
    pub logic_inverted: bool,

    // === Orbit ===
    pub orbit_angle: f32,
    /// Requested lane: 0 = inner, 1 = outer
    pub orbit_lane: f32,
    /// Smoothed lane value chasing `orbit_lane`
    pub orbit_radius: f32,

    // === Flux ===
    pub polarity: Polarity,

    // === Breath ===
    pub breath_size: f32,
    pub holding: bool,

    // === Avoid ===
    pub avoid_pos: Vec2,

    /// Last known pointer position
    pub pointer: Vec2,

    /// Session clock (ms) of every click, for click-speed stats
    #[serde(skip)]
    click_times: Vec<f64>,
}

impl SessionState {
    /// Idle defaults for a viewport
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            phase: SessionPhase::Idle,
            game: None,
            score: 0.0,
            hit_count: 0,
            total_clicks: 0,
            accuracy_percent: 100.0,
            average_click_ms: None,
            elapsed_seconds: 0,
            rule_shifts_applied: 0,
            last_shift_boundary: 0,
            message: "SYSTEM READY".to_string(),
            logic_inverted: false,
            orbit_angle: 0.0,
            orbit_lane: 0.0,
            orbit_radius: 0.0,
            polarity: Polarity::White,
            breath_size: BREATH_START_SIZE,
            holding: false,
            avoid_pos: viewport.center(),
            pointer: viewport.center(),
            click_times: Vec::new(),
        }
    }

    /// Fresh running state for `game`
    pub fn running(game: GameType, viewport: &Viewport) -> Self {
        Self {
            phase: SessionPhase::Running,
            game: Some(game),
            message: "SYNC ESTABLISHED".to_string(),
            ..Self::new(viewport)
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Add to the score (unbounded)
    pub fn reward(&mut self, amount: f64) {
        self.score += amount.max(0.0);
    }

    /// Subtract from the score, clamped at zero
    pub fn penalize(&mut self, amount: f64) {
        self.score = (self.score - amount.max(0.0)).max(0.0);
    }

    pub fn set_message(&mut self, message: &str) {
        if self.message != message {
            self.message = message.to_string();
        }
    }

    /// Count a judged click and refresh accuracy
    pub fn record_judgement(&mut self, hit: bool) {
        self.total_clicks += 1;
        if hit {
            self.hit_count += 1;
        }
        self.accuracy_percent = accuracy(self.hit_count, self.total_clicks);
    }

    /// Record a click timestamp and refresh the average click gap
    pub fn record_click_time(&mut self, now_ms: f64) {
        self.click_times.push(now_ms);
        self.average_click_ms = average_gap(&self.click_times);
    }
}

/// Hit ratio as a percentage; 100 when nothing has been clicked
pub fn accuracy(hits: u32, clicks: u32) -> f64 {
    if clicks == 0 {
        return 100.0;
    }
    (hits.min(clicks) as f64 / clicks as f64) * 100.0
}

/// Mean delta between consecutive timestamps, `None` below two samples
pub fn average_gap(times: &[f64]) -> Option<f64> {
    if times.len() < 2 {
        return None;
    }
    let total: f64 = times.windows(2).map(|w| w[1] - w[0]).sum();
    Some(total / (times.len() - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accuracy_without_clicks_is_full() {
        assert_eq!(accuracy(0, 0), 100.0);
    }

    #[test]
    fn test_accuracy_sequence() {
        let mut state = SessionState::new(&Viewport::default());
        state.record_judgement(false);
        assert_eq!(state.accuracy_percent, 0.0);
        state.record_judgement(true);
        assert_eq!(state.accuracy_percent, 50.0);
        assert_eq!(state.total_clicks, 2);
        assert_eq!(state.hit_count, 1);
    }

    #[test]
    fn test_average_gap() {
        assert_eq!(average_gap(&[]), None);
        assert_eq!(average_gap(&[100.0]), None);
        assert_eq!(average_gap(&[100.0, 300.0, 400.0]), Some(150.0));
    }

    #[test]
    fn test_penalty_clamps_at_zero() {
        let mut state = SessionState::new(&Viewport::default());
        state.reward(3.0);
        state.penalize(10.0);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_running_defaults() {
        let viewport = Viewport::new(800.0, 600.0);
        let state = SessionState::running(GameType::Orbit, &viewport);
        assert!(state.is_running());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.avoid_pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.message, "SYNC ESTABLISHED");
    }

    proptest! {
        #[test]
        fn prop_score_never_negative(deltas in prop::collection::vec(-50.0f64..50.0, 0..200)) {
            let mut state = SessionState::new(&Viewport::default());
            for d in deltas {
                if d >= 0.0 { state.reward(d) } else { state.penalize(-d) }
                prop_assert!(state.score >= 0.0);
            }
        }

        #[test]
        fn prop_accuracy_in_range(outcomes in prop::collection::vec(any::<bool>(), 0..100)) {
            let mut state = SessionState::new(&Viewport::default());
            prop_assert_eq!(state.accuracy_percent, 100.0);
            for hit in outcomes {
                state.record_judgement(hit);
                prop_assert!(state.accuracy_percent.is_finite());
                prop_assert!((0.0..=100.0).contains(&state.accuracy_percent));
            }
        }
    }
}
