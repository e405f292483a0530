//! Rule set: per-game difficulty and behaviour configuration
//!
//! Read by the spawner and every game strategy; mutated only on session reset
//! and by the rule-shift scheduler.

use serde::{Deserialize, Serialize};

use super::entity::ColorTag;
use super::games::GameType;
use crate::consts::*;

/// Named behavioural modifier layered on a game by rule shifts.
///
/// Every game owns a disjoint subset (see [`GameType::variations`]);
/// `Default` is the baseline before the first shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Variation {
    #[default]
    Default,
    // orbit
    CounterSpin,
    Overdrive,
    // flux
    Surge,
    Doldrums,
    // gather
    Turbulence,
    Stillness,
    // avoid
    Frenzy,
    Scatter,
    // breath
    Rush,
    Narrow,
    // phase
    Stutter,
    Slowwave,
    // shift
    Mirror,
    Fade,
    Swap,
}

impl Variation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variation::Default => "default",
            Variation::CounterSpin => "counter-spin",
            Variation::Overdrive => "overdrive",
            Variation::Surge => "surge",
            Variation::Doldrums => "doldrums",
            Variation::Turbulence => "turbulence",
            Variation::Stillness => "stillness",
            Variation::Frenzy => "frenzy",
            Variation::Scatter => "scatter",
            Variation::Rush => "rush",
            Variation::Narrow => "narrow",
            Variation::Stutter => "stutter",
            Variation::Slowwave => "slowwave",
            Variation::Mirror => "mirror",
            Variation::Fade => "fade",
            Variation::Swap => "swap",
        }
    }
}

/// Mutable difficulty/behaviour configuration for the active game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Colour counted as "the target" by games that use one
    pub target_color: ColorTag,
    pub min_size: f32,
    pub max_size: f32,
    /// Pixels per tick
    pub min_speed: f32,
    pub max_speed: f32,
    pub spawn_interval_ms: f64,
    pub max_entities: usize,
    /// Accuracy (%) a session must reach to count as passed
    pub hit_accuracy_threshold: f64,
    pub variation: Variation,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            target_color: ColorTag::Indigo,
            min_size: 30.0,
            max_size: 70.0,
            min_speed: 1.0,
            max_speed: 3.0,
            spawn_interval_ms: 1200.0,
            max_entities: 8,
            hit_accuracy_threshold: 85.0,
            variation: Variation::Default,
        }
    }
}

impl RuleSet {
    /// Starting rules for a game
    pub fn baseline(game: GameType) -> Self {
        let base = Self::default();
        match game {
            // Target ring + breathing ring only
            GameType::Phase => Self {
                max_entities: 2,
                ..base
            },
            // Walls arrive in pairs
            GameType::Breath => Self {
                max_entities: 10,
                ..base
            },
            GameType::Shift => Self {
                spawn_interval_ms: 900.0,
                ..base
            },
            _ => base,
        }
    }

    /// Apply `transform`, then restore the bounds invariants
    pub fn mutate<F: FnOnce(&mut RuleSet)>(&mut self, transform: F) {
        transform(self);
        self.clamp_invariants();
    }

    /// Enforce floors/ceilings and `min ≤ max` on size and speed
    pub fn clamp_invariants(&mut self) {
        self.spawn_interval_ms = self.spawn_interval_ms.max(SPAWN_INTERVAL_FLOOR_MS);
        self.max_speed = self.max_speed.clamp(MIN_SPEED_FLOOR, MAX_SPEED_CEILING);
        self.min_speed = self.min_speed.max(MIN_SPEED_FLOOR).min(self.max_speed);
        self.min_size = self.min_size.max(MIN_SIZE_FLOOR);
        if self.max_size < self.min_size {
            self.max_size = self.min_size;
        }
    }

    /// True if every invariant holds
    pub fn is_valid(&self) -> bool {
        self.min_size <= self.max_size
            && self.min_speed <= self.max_speed
            && self.spawn_interval_ms >= SPAWN_INTERVAL_FLOOR_MS
    }
}
