//! Semantic events emitted by the simulation
//!
//! The host drains these after each frame and routes them to audio, UI and
//! the insight request. The core never performs I/O itself.

use serde::{Deserialize, Serialize};

use super::games::GameType;
use crate::insight::SessionSummary;

/// Special, game-specific player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAction {
    /// Orbit: satellite switched lanes
    OrbitSwitch,
    /// Flux: polarity flipped
    FluxFlip,
    /// Gather: particle caught
    GatherCatch,
    /// Phase: click landed inside the sync window
    PhaseSync,
}

impl SpecialAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialAction::OrbitSwitch => "orbit_switch",
            SpecialAction::FluxFlip => "flux_flip",
            SpecialAction::GatherCatch => "gather_catch",
            SpecialAction::PhaseSync => "phase_sync",
        }
    }
}

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { game: GameType },
    /// Player did the right thing (reward applied)
    Hit,
    /// Player did the wrong thing or got hit (penalty applied)
    Miss,
    RuleShift { silent: bool },
    SpecialAction(SpecialAction),
    /// Session is over; the summary is ready for the insight provider
    SessionEnded(SessionSummary),
}

/// Sound cue names understood by the audio sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Start,
    TargetHit,
    TargetMiss,
    /// Overt rule shift
    RuleShift,
    /// Barely perceptible cue for silent rule shifts
    RuleShiftSubtle,
    OrbitSwitch,
    FluxFlip,
    GatherCatch,
    PhaseSync,
    GameOver,
}

impl GameEvent {
    /// The cue the audio sink should play for this event
    pub fn audio_cue(&self) -> AudioCue {
        match self {
            GameEvent::SessionStarted { .. } => AudioCue::Start,
            GameEvent::Hit => AudioCue::TargetHit,
            GameEvent::Miss => AudioCue::TargetMiss,
            GameEvent::RuleShift { silent: true } => AudioCue::RuleShiftSubtle,
            GameEvent::RuleShift { silent: false } => AudioCue::RuleShift,
            GameEvent::SpecialAction(action) => match action {
                SpecialAction::OrbitSwitch => AudioCue::OrbitSwitch,
                SpecialAction::FluxFlip => AudioCue::FluxFlip,
                SpecialAction::GatherCatch => AudioCue::GatherCatch,
                SpecialAction::PhaseSync => AudioCue::PhaseSync,
            },
            GameEvent::SessionEnded(_) => AudioCue::GameOver,
        }
    }
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Start => "start",
            AudioCue::TargetHit => "target_hit",
            AudioCue::TargetMiss => "target_miss",
            AudioCue::RuleShift => "rule_shift",
            AudioCue::RuleShiftSubtle => "rule_shift_subtle",
            AudioCue::OrbitSwitch => "orbit_switch",
            AudioCue::FluxFlip => "flux_flip",
            AudioCue::GatherCatch => "gather_catch",
            AudioCue::PhaseSync => "phase_sync",
            AudioCue::GameOver => "game_over",
        }
    }
}
