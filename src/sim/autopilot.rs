//! Idle/demo mode: a simple scripted player
//!
//! Reads the session each frame and produces the input a reasonable player
//! would give. Used by the headless native runner and the web attract screen.

use glam::Vec2;

use super::entity::{Entity, EntityKind};
use super::games::{GameType, TARGET_RING_SIZE};
use super::session::Session;
use super::tick::InputEvent;
use crate::wrap_angle;

/// Minimum frames between two clicks
const CLICK_COOLDOWN: u64 = 12;
/// Angular look-ahead for orbit debris (radians)
const ORBIT_LOOKAHEAD: f32 = 0.6;
/// Flux flips when a mismatched particle gets this close
const FLUX_GUARD_RADIUS: f32 = 140.0;
/// Breath exhales while a wall is within this many pixels above the player
const BREATH_WARNING: f32 = 220.0;
/// Phase clicks when the ring is this close to the target size
const PHASE_WINDOW: f32 = 20.0;
/// Avoid keeps its marker this far ahead of the nearest enemy
const AVOID_STEP: f32 = 80.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    frame: u64,
    last_click: Option<u64>,
}

fn nearest<'a>(entities: impl Iterator<Item = &'a Entity>, point: Vec2) -> Option<&'a Entity> {
    entities.min_by(|a, b| {
        a.pos
            .distance_squared(point)
            .partial_cmp(&b.pos.distance_squared(point))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn can_click(&self) -> bool {
        self.last_click
            .is_none_or(|last| self.frame - last >= CLICK_COOLDOWN)
    }

    fn click(&mut self, input: InputEvent, out: &mut Vec<InputEvent>) {
        if self.can_click() {
            self.last_click = Some(self.frame);
            out.push(input);
        }
    }

    /// Inputs for this frame
    pub fn inputs(&mut self, session: &Session) -> Vec<InputEvent> {
        self.frame += 1;
        let mut out = Vec::new();
        let state = session.state();
        let Some(game) = state.game.filter(|_| session.is_running()) else {
            return out;
        };
        let viewport = session.config().viewport;
        let center = viewport.center();
        let store = session.store();
        let live = move || store.iter().filter(|e| !e.removed);

        match game {
            GameType::Orbit => {
                let Some(player) = live().find(|e| e.kind == EntityKind::Player) else {
                    return out;
                };
                let lane_dist = player.pos.distance(center);
                let threat = live().filter(|e| e.kind == EntityKind::Obstacle).any(|e| {
                    let same_lane = e.orbit_distance.is_some_and(|d| (d - lane_dist).abs() < 30.0);
                    let gap = wrap_angle(e.angle.unwrap_or(0.0) - state.orbit_angle);
                    same_lane && (gap < ORBIT_LOOKAHEAD || gap > std::f32::consts::TAU - 0.2)
                });
                // Only switch once the previous switch has settled
                if threat && (state.orbit_radius - state.orbit_lane).abs() < 0.05 {
                    self.click(InputEvent::Click(None), &mut out);
                }
            }
            GameType::Flux => {
                let danger = nearest(live().filter(|e| e.kind == EntityKind::Particle), center)
                    .filter(|e| e.pos.distance(center) < FLUX_GUARD_RADIUS)
                    .is_some_and(|e| state.polarity.matches(e.color) == state.logic_inverted);
                if danger {
                    self.click(InputEvent::Click(None), &mut out);
                }
            }
            GameType::Gather => {
                let stray = live()
                    .filter(|e| e.kind == EntityKind::Particle && !e.captured)
                    .max_by(|a, b| {
                        a.pos
                            .distance_squared(center)
                            .partial_cmp(&b.pos.distance_squared(center))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                if let Some(p) = stray.filter(|p| p.pos.distance(center) > viewport.inner_radius() * 0.5) {
                    self.click(InputEvent::Click(Some(p.id)), &mut out);
                }
            }
            GameType::Avoid => {
                if let Some(enemy) = nearest(live().filter(|e| e.kind == EntityKind::Enemy), state.avoid_pos) {
                    let away = (state.avoid_pos - enemy.pos).normalize_or_zero();
                    let target = (state.avoid_pos + away * AVOID_STEP)
                        .clamp(Vec2::splat(40.0), Vec2::new(viewport.width - 40.0, viewport.height - 40.0));
                    out.push(InputEvent::PointerMove { x: target.x, y: target.y });
                }
            }
            GameType::Breath => {
                let incoming = live()
                    .filter(|e| e.kind == EntityKind::Gate)
                    .any(|e| e.pos.y < center.y + 20.0 && center.y - e.pos.y < BREATH_WARNING);
                match (incoming, state.holding) {
                    (true, true) => out.push(InputEvent::PointerUp),
                    (false, false) => out.push(InputEvent::PointerDown),
                    _ => {}
                }
            }
            GameType::Phase => {
                let synced = live()
                    .find(|e| e.kind == EntityKind::BreathingRing)
                    .is_some_and(|ring| (ring.size - TARGET_RING_SIZE).abs() < PHASE_WINDOW);
                if synced {
                    self.click(InputEvent::Click(None), &mut out);
                }
            }
            GameType::Shift => {
                let wanted = live()
                    .filter(|e| e.kind == EntityKind::Standard && e.is_target != state.logic_inverted)
                    .min_by(|a, b| a.scale.partial_cmp(&b.scale).unwrap_or(std::cmp::Ordering::Equal));
                if let Some(e) = wanted {
                    self.click(InputEvent::Click(Some(e.id)), &mut out);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::session::SessionConfig;

    fn play(game: GameType, seconds: u32) -> Session {
        let mut session = Session::new(SessionConfig {
            viewport: Viewport::new(800.0, 600.0),
            seed: 99,
            ..Default::default()
        });
        let mut pilot = Autopilot::new();
        session.start(game);
        for _ in 0..(seconds * 60) {
            for input in pilot.inputs(&session) {
                session.handle_input(input);
            }
            session.advance(1000.0 / 60.0);
        }
        session
    }

    #[test]
    fn test_idle_session_gives_no_input() {
        let session = Session::new(SessionConfig::default());
        assert!(Autopilot::new().inputs(&session).is_empty());
    }

    #[test]
    fn test_shift_autopilot_lands_hits() {
        let session = play(GameType::Shift, 10);
        assert!(session.state().hit_count > 0);
        assert!(session.state().score > 0.0);
    }

    #[test]
    fn test_phase_autopilot_syncs() {
        let session = play(GameType::Phase, 10);
        assert!(session.state().hit_count > 0);
    }

    #[test]
    fn test_clicks_are_rate_limited() {
        let session = play(GameType::Phase, 2);
        assert!(session.state().total_clicks as u64 <= 2 * 60 / CLICK_COOLDOWN + 1);
    }
}
