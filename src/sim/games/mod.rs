//! Game strategies
//!
//! Each mini-game is a self-contained [`GameStrategy`] chosen once when the
//! session starts. Strategies never touch timers or the session lifecycle;
//! they move entities, judge collisions and clicks, and report through the
//! [`TickContext`].

mod avoid;
mod breath;
mod flux;
mod gather;
mod orbit;
mod phase;
mod shift;

pub use avoid::Avoid;
pub use breath::Breath;
pub use flux::Flux;
pub use gather::Gather;
pub use orbit::Orbit;
pub use phase::{Phase, TARGET_RING_SIZE};
pub use shift::Shift;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityStore};
use super::events::GameEvent;
use super::rules::{RuleSet, Variation};
use super::state::SessionState;
use crate::Viewport;
use crate::consts::*;

/// Selectable games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    Orbit,
    Flux,
    Gather,
    Avoid,
    Breath,
    Phase,
    /// Legacy target-click game with silent rule inversions
    Shift,
}

/// Whether a rule shift announces itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftMode {
    /// Status message + audible cue
    Overt,
    /// No message, only a subtle cue
    Silent,
}

/// How gate overlaps are penalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GatePenalty {
    /// Penalty on every tick the player overlaps a wall
    #[default]
    EveryTick,
    /// Penalty once when an overlap begins
    OncePerOverlap,
}

impl GameType {
    pub const ALL: [GameType; 7] = [
        GameType::Orbit,
        GameType::Flux,
        GameType::Gather,
        GameType::Avoid,
        GameType::Breath,
        GameType::Phase,
        GameType::Shift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Orbit => "orbit",
            GameType::Flux => "flux",
            GameType::Gather => "gather",
            GameType::Avoid => "avoid",
            GameType::Breath => "breath",
            GameType::Phase => "phase",
            GameType::Shift => "shift",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        GameType::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim().to_lowercase())
    }

    /// Session length in seconds
    pub fn duration_secs(&self) -> u32 {
        match self {
            GameType::Shift => LEGACY_SESSION_SECONDS,
            _ => DEFAULT_SESSION_SECONDS,
        }
    }

    /// Seconds between rule shifts
    pub fn shift_interval_secs(&self) -> u32 {
        match self.shift_mode() {
            ShiftMode::Overt => OVERT_SHIFT_INTERVAL,
            ShiftMode::Silent => SILENT_SHIFT_INTERVAL,
        }
    }

    pub fn shift_mode(&self) -> ShiftMode {
        match self {
            GameType::Shift => ShiftMode::Overt,
            _ => ShiftMode::Silent,
        }
    }

    /// Variations a rule shift may pick for this game (disjoint across games)
    pub fn variations(&self) -> &'static [Variation] {
        match self {
            GameType::Orbit => &[Variation::CounterSpin, Variation::Overdrive],
            GameType::Flux => &[Variation::Surge, Variation::Doldrums],
            GameType::Gather => &[Variation::Turbulence, Variation::Stillness],
            GameType::Avoid => &[Variation::Frenzy, Variation::Scatter],
            GameType::Breath => &[Variation::Rush, Variation::Narrow],
            GameType::Phase => &[Variation::Stutter, Variation::Slowwave],
            GameType::Shift => &[Variation::Mirror, Variation::Fade, Variation::Swap],
        }
    }

    /// The strategy implementing this game
    pub fn strategy(&self) -> Box<dyn GameStrategy> {
        match self {
            GameType::Orbit => Box::new(Orbit),
            GameType::Flux => Box::new(Flux),
            GameType::Gather => Box::new(Gather),
            GameType::Avoid => Box::new(Avoid),
            GameType::Breath => Box::new(Breath),
            GameType::Phase => Box::new(Phase),
            GameType::Shift => Box::new(Shift),
        }
    }
}

/// Result of a click as judged by the active game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Correct action; counts toward accuracy
    Hit,
    /// Wrong action; counts toward accuracy
    Miss,
    /// Game-specific action that is not judged (lane switch, polarity flip)
    Action,
    /// Clicks mean nothing in this game
    Ignored,
}

/// Everything a strategy may read or write during one callback
pub struct TickContext<'a> {
    pub state: &'a mut SessionState,
    pub rules: &'a RuleSet,
    pub rng: &'a mut Pcg32,
    pub viewport: Viewport,
    /// Session wall clock (ms); drives age decay and oscillations
    pub now_ms: f64,
    pub gate_penalty: GatePenalty,
    pub events: &'a mut Vec<GameEvent>,
}

impl TickContext<'_> {
    /// Reward + message + `Hit` event
    pub fn hit(&mut self, reward: f64, message: &str) {
        self.state.reward(reward);
        self.state.set_message(message);
        self.events.push(GameEvent::Hit);
    }

    /// Clamped penalty + message + `Miss` event
    pub fn miss(&mut self, penalty: f64, message: &str) {
        self.state.penalize(penalty);
        self.state.set_message(message);
        self.events.push(GameEvent::Miss);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn variation(&self) -> Variation {
        self.rules.variation
    }
}

/// Per-game tick contract
pub trait GameStrategy {
    fn game(&self) -> GameType;

    /// Session-owned fixtures placed at start (player avatar, rings)
    fn setup(&self, _store: &mut EntityStore, _ctx: &mut TickContext) {}

    /// Entities to add on a spawn firing; admitted all-or-nothing by the spawner
    fn spawn(&self, _store: &mut EntityStore, _ctx: &mut TickContext) -> Vec<Entity> {
        Vec::new()
    }

    /// Advance one physics tick: motion, collisions, scoring
    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext);

    /// Judge a click on `target` (or on empty space)
    fn on_click(
        &self,
        _target: Option<EntityId>,
        _store: &mut EntityStore,
        _ctx: &mut TickContext,
    ) -> ClickOutcome {
        ClickOutcome::Ignored
    }

    /// Game-specific semantic changes applied after a rule shift
    fn after_shift(&self, _rules: &mut RuleSet, _state: &mut SessionState, _rng: &mut Pcg32) {}
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for strategy tests

    use rand::SeedableRng;

    use super::*;

    pub struct Harness {
        pub store: EntityStore,
        pub state: SessionState,
        pub rules: RuleSet,
        pub rng: Pcg32,
        pub viewport: Viewport,
        pub now_ms: f64,
        pub gate_penalty: GatePenalty,
        pub events: Vec<GameEvent>,
    }

    impl Harness {
        pub fn new(game: GameType) -> Self {
            let viewport = Viewport::new(800.0, 600.0);
            Self {
                store: EntityStore::new(),
                state: SessionState::running(game, &viewport),
                rules: RuleSet::baseline(game),
                rng: Pcg32::seed_from_u64(7),
                viewport,
                now_ms: 0.0,
                gate_penalty: GatePenalty::default(),
                events: Vec::new(),
            }
        }

        pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut EntityStore, &mut TickContext) -> R) -> R {
            let mut ctx = TickContext {
                state: &mut self.state,
                rules: &self.rules,
                rng: &mut self.rng,
                viewport: self.viewport,
                now_ms: self.now_ms,
                gate_penalty: self.gate_penalty,
                events: &mut self.events,
            };
            f(&mut self.store, &mut ctx)
        }

        pub fn tick(&mut self, strategy: &dyn GameStrategy) {
            self.with_ctx(|store, ctx| strategy.advance(store, ctx));
            self.store
                .purge_out_of_bounds(&self.viewport, PURGE_MARGIN);
            self.now_ms += PHYSICS_TICK_MS;
        }

        pub fn count(&self, event: &GameEvent) -> usize {
            self.events.iter().filter(|e| *e == event).count()
        }
    }

    #[test]
    fn test_variation_sets_are_disjoint() {
        for (i, a) in GameType::ALL.iter().enumerate() {
            for b in GameType::ALL.iter().skip(i + 1) {
                for v in a.variations() {
                    assert!(!b.variations().contains(v), "{:?} shared by {:?}/{:?}", v, a, b);
                }
            }
        }
    }

    #[test]
    fn test_game_type_round_trips_names() {
        for game in GameType::ALL {
            assert_eq!(GameType::from_str(game.as_str()), Some(game));
            assert_eq!(game.strategy().game(), game);
        }
        assert_eq!(GameType::from_str(" Orbit "), Some(GameType::Orbit));
        assert_eq!(GameType::from_str("delay"), None);
    }
}
