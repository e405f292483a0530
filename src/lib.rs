//! Neurocasual - short reaction/attention mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, game strategies, rule shifts, session)
//! - `config`: Key/value feature flags supplied by the host
//! - `insight`: Post-session reflection requests with local fallback
//! - `platform`: Browser bindings (wasm32 only)

pub mod config;
pub mod insight;
pub mod platform;
pub mod sim;

pub use config::AppConfig;
pub use insight::{InsightError, InsightProvider, SessionSummary};
pub use sim::{GameEvent, GameType, InputEvent, Session, SessionConfig, Snapshot};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Physics/logic tick period (~60 Hz)
    pub const PHYSICS_TICK_MS: f64 = 16.0;
    /// Session clock period
    pub const CLOCK_TICK_MS: f64 = 1000.0;
    /// Largest frame delta accepted by `Session::advance` (prevents spiral of death)
    pub const MAX_FRAME_MS: f64 = 1000.0;

    /// Entities further than this outside the viewport are purged
    pub const PURGE_MARGIN: f32 = 200.0;

    /// Rule set floors and ceilings enforced on every mutation
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 400.0;
    pub const MIN_SPEED_FLOOR: f32 = 0.5;
    pub const MAX_SPEED_CEILING: f32 = 6.0;
    pub const MIN_SIZE_FLOOR: f32 = 10.0;

    /// Session lengths (seconds)
    pub const DEFAULT_SESSION_SECONDS: u32 = 90;
    pub const LEGACY_SESSION_SECONDS: u32 = 60;

    /// Rule shift cadence (seconds)
    pub const SILENT_SHIFT_INTERVAL: u32 = 15;
    pub const OVERT_SHIFT_INTERVAL: u32 = 12;

    /// Player defaults
    pub const BREATH_START_SIZE: f32 = 60.0;
    pub const BREATH_MIN_SIZE: f32 = 40.0;
    pub const BREATH_MAX_SIZE: f32 = 250.0;
}

/// Visible play area in pixels, injected into every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    /// Negative or non-finite dimensions collapse to zero
    pub fn new(width: f32, height: f32) -> Self {
        let extent = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: extent(width),
            height: extent(height),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of a circle that just clears the viewport from its centre
    #[inline]
    pub fn outer_spawn_radius(&self) -> f32 {
        self.width.max(self.height) / 2.0 + 50.0
    }

    /// Radius of the largest circle inscribed in the viewport
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// True if `pos` lies within the viewport grown by `margin` on every side
    #[inline]
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing from `from` toward `to` (via atan2, zero-safe)
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    Vec2::new(angle.cos(), angle.sin())
}
