//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timers advanced only by host-supplied frame deltas
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Viewport injected, no rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod events;
pub mod games;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use entity::{ColorTag, Entity, EntityId, EntityKind, EntityStore, Polarity};
pub use events::{AudioCue, GameEvent, SpecialAction};
pub use games::{ClickOutcome, GatePenalty, GameStrategy, GameType, ShiftMode};
pub use rules::{RuleSet, Variation};
pub use session::{Session, SessionConfig, Snapshot};
pub use state::{SessionPhase, SessionState};
pub use tick::InputEvent;
