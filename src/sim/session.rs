//! Session lifecycle
//!
//! A [`Session`] owns everything one play-through needs: the entity store, the
//! rule set, the scoring state, the seeded RNG and the three interval timers.
//! The host pumps it with frame deltas via [`Session::advance`] and feeds
//! player input through [`Session::handle_input`]; it reads back a
//! [`Snapshot`] for rendering and drains [`GameEvent`]s for audio and the
//! end-of-session insight.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{TimerKind, Timers};
use super::entity::{Entity, EntityStore};
use super::events::GameEvent;
use super::games::{ClickOutcome, GatePenalty, GameStrategy, GameType, TickContext};
use super::rules::{RuleSet, Variation};
use super::scheduler::RuleShiftScheduler;
use super::spawner::Spawner;
use super::state::{SessionPhase, SessionState};
use super::tick::{InputEvent, physics_tick};
use crate::Viewport;
use crate::consts::*;
use crate::insight::SessionSummary;

/// Host-supplied engine settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub viewport: Viewport,
    /// Seed for the session RNG (kept across sessions of one host)
    pub seed: u64,
    pub gate_penalty: GatePenalty,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            seed: 12345,
            gate_penalty: GatePenalty::default(),
        }
    }
}

/// Owned render view of the session
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub game: Option<GameType>,
    pub entities: Vec<Entity>,
    pub state: SessionState,
    pub variation: Variation,
    pub remaining_seconds: u32,
    pub viewport: Viewport,
}

pub struct Session {
    config: SessionConfig,
    store: EntityStore,
    rules: RuleSet,
    state: SessionState,
    rng: Pcg32,
    timers: Timers,
    strategy: Option<Box<dyn GameStrategy>>,
    scheduler: Option<RuleShiftScheduler>,
    /// Session wall clock (ms since construction)
    now_ms: f64,
    events: Vec<GameEvent>,
}

/// Bundle the per-callback view of the session
fn context<'a>(
    state: &'a mut SessionState,
    rules: &'a RuleSet,
    rng: &'a mut Pcg32,
    events: &'a mut Vec<GameEvent>,
    config: &SessionConfig,
    now_ms: f64,
) -> TickContext<'a> {
    TickContext {
        state,
        rules,
        rng,
        viewport: config.viewport,
        now_ms,
        gate_penalty: config.gate_penalty,
        events,
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: EntityStore::new(),
            rules: RuleSet::default(),
            state: SessionState::new(&config.viewport),
            rng: Pcg32::seed_from_u64(config.seed),
            timers: Timers::default(),
            strategy: None,
            scheduler: None,
            now_ms: 0.0,
            events: Vec::new(),
            config,
        }
    }

    /// Start (or restart) a session of `game`
    pub fn start(&mut self, game: GameType) {
        self.timers.cancel_all();

        self.store.clear();
        self.rules = RuleSet::baseline(game);
        self.state = SessionState::running(game, &self.config.viewport);
        self.scheduler = Some(RuleShiftScheduler::new(game.shift_interval_secs(), game.shift_mode()));

        let strategy = game.strategy();
        let mut ctx = context(
            &mut self.state,
            &self.rules,
            &mut self.rng,
            &mut self.events,
            &self.config,
            self.now_ms,
        );
        strategy.setup(&mut self.store, &mut ctx);
        self.strategy = Some(strategy);

        self.timers.arm_all(
            self.now_ms,
            CLOCK_TICK_MS,
            PHYSICS_TICK_MS,
            Spawner::interval_ms(&self.rules),
        );
        self.events.push(GameEvent::SessionStarted { game });

        log::info!(
            "Session started: {} ({}s, shifts every {}s)",
            game.as_str(),
            game.duration_secs(),
            game.shift_interval_secs()
        );
    }

    /// Advance the session clock by `dt_ms`, firing due timers in order
    pub fn advance(&mut self, dt_ms: f64) {
        let until = self.now_ms + dt_ms.clamp(0.0, MAX_FRAME_MS);

        while let Some((kind, due)) = self.timers.next_due(until) {
            self.now_ms = due;
            match kind {
                TimerKind::Clock => {
                    self.timers.clock.fire(CLOCK_TICK_MS);
                    self.clock_tick();
                }
                TimerKind::Physics => {
                    self.timers.physics.fire(PHYSICS_TICK_MS);
                    self.physics_tick();
                }
                TimerKind::Spawn => {
                    self.spawn_tick();
                    self.timers.spawn.fire(Spawner::interval_ms(&self.rules));
                }
            }
        }

        self.now_ms = until;
    }

    fn clock_tick(&mut self) {
        let Some(game) = self.strategy.as_deref().map(|s| s.game()) else {
            return;
        };
        self.state.elapsed_seconds += 1;
        if self.state.elapsed_seconds >= game.duration_secs() {
            self.end();
            return;
        }

        let (Some(strategy), Some(scheduler)) = (self.strategy.as_deref(), self.scheduler) else {
            return;
        };
        scheduler.on_clock_tick(
            strategy,
            &mut self.rules,
            &mut self.state,
            &mut self.rng,
            &mut self.events,
        );
    }

    fn physics_tick(&mut self) {
        let Some(strategy) = self.strategy.as_deref() else {
            return;
        };
        let mut ctx = context(
            &mut self.state,
            &self.rules,
            &mut self.rng,
            &mut self.events,
            &self.config,
            self.now_ms,
        );
        physics_tick(strategy, &mut self.store, &mut ctx);
    }

    fn spawn_tick(&mut self) {
        let Some(strategy) = self.strategy.as_deref() else {
            return;
        };
        let mut ctx = context(
            &mut self.state,
            &self.rules,
            &mut self.rng,
            &mut self.events,
            &self.config,
            self.now_ms,
        );
        Spawner.fire(strategy, &mut self.store, &mut ctx);
    }

    /// Apply player input; ignored unless running
    pub fn handle_input(&mut self, input: InputEvent) {
        if !self.state.is_running() {
            return;
        }
        let Some(strategy) = self.strategy.as_deref() else {
            return;
        };

        match input.resolve(&self.store) {
            InputEvent::PointerMove { x, y } => self.state.pointer = Vec2::new(x, y),
            InputEvent::PointerDown => self.state.holding = true,
            InputEvent::PointerUp => self.state.holding = false,
            InputEvent::Click(target) => {
                self.state.record_click_time(self.now_ms);
                let mut ctx = context(
                    &mut self.state,
                    &self.rules,
                    &mut self.rng,
                    &mut self.events,
                    &self.config,
                    self.now_ms,
                );
                match strategy.on_click(target, &mut self.store, &mut ctx) {
                    ClickOutcome::Hit => self.state.record_judgement(true),
                    ClickOutcome::Miss => self.state.record_judgement(false),
                    ClickOutcome::Action | ClickOutcome::Ignored => {}
                }
            }
            InputEvent::Tap { .. } => {}
        }
    }

    /// End the running session; `None` if nothing was running
    pub fn end(&mut self) -> Option<SessionSummary> {
        if !self.state.is_running() {
            return None;
        }
        self.timers.cancel_all();
        self.store.clear();
        self.state.phase = SessionPhase::Ended;
        self.state.holding = false;

        let summary = self.summary()?;
        self.events.push(GameEvent::SessionEnded(summary.clone()));

        log::info!(
            "Session ended: {} score={:.0} accuracy={:.1}% shifts={}",
            summary.game.as_str(),
            summary.score,
            summary.accuracy,
            summary.rule_shifts_applied
        );
        Some(summary)
    }

    /// Abandon any session and reset to the menu
    pub fn return_to_menu(&mut self) {
        self.timers.cancel_all();
        self.store.clear();
        self.rules = RuleSet::default();
        self.state = SessionState::new(&self.config.viewport);
        self.strategy = None;
        self.scheduler = None;
        log::info!("Returned to menu");
    }

    /// Summary of the current (or last) session's stats
    pub fn summary(&self) -> Option<SessionSummary> {
        let game = self.state.game?;
        Some(SessionSummary {
            game,
            score: self.state.score,
            accuracy: self.state.accuracy_percent,
            average_click_ms: self.state.average_click_ms,
            rule_shifts_applied: self.state.rule_shifts_applied,
            hit_count: self.state.hit_count,
            total_clicks: self.state.total_clicks,
            elapsed_seconds: self.state.elapsed_seconds,
            passed_threshold: self.state.accuracy_percent >= self.rules.hit_accuracy_threshold,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        let remaining_seconds = self
            .state
            .game
            .map_or(0, |g| g.duration_secs().saturating_sub(self.state.elapsed_seconds));
        Snapshot {
            phase: self.state.phase,
            game: self.state.game,
            entities: self.store.iter().filter(|e| !e.removed).cloned().collect(),
            state: self.state.clone(),
            variation: self.rules.variation,
            remaining_seconds,
            viewport: self.config.viewport,
        }
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resize the play area; takes effect on the next tick
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = Viewport::new(viewport.width, viewport.height);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// True if any timer is armed
    pub fn timers_active(&self) -> bool {
        self.timers.any_active()
    }
}
