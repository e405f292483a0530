//! Orbit: steer a satellite between two lanes around a core while debris
//! circles the other way.

use glam::Vec2;
use rand::Rng;

use super::{ClickOutcome, GameStrategy, GameType, TickContext};
use crate::sim::collision::within_radius;
use crate::sim::entity::{ColorTag, Entity, EntityId, EntityKind, EntityStore};
use crate::sim::events::{GameEvent, SpecialAction};
use crate::sim::rules::Variation;
use crate::{polar_to_cartesian, wrap_angle};

/// Inner lane radius; the outer lane sits one spacing further out
pub const INNER_LANE: f32 = 80.0;
pub const LANE_SPACING: f32 = 80.0;
/// Radians per tick at t = 0
pub const BASE_ANGULAR_SPEED: f32 = 0.04;
/// Angular speed grows by this fraction per elapsed second
pub const ANGULAR_ACCEL: f32 = 0.01;
/// First-order smoothing of lane changes
pub const RADIUS_SMOOTHING: f32 = 0.1;
/// Debris angular speed (radians per tick, opposite to the player)
pub const DEBRIS_SPIN: f32 = -0.025;
pub const HIT_RADIUS: f32 = 35.0;
pub const COLLISION_PENALTY: f64 = 5.0;

const PLAYER_SIZE: f32 = 30.0;
const DEBRIS_SIZE: f32 = 20.0;

pub struct Orbit;

impl Orbit {
    /// Player position for the current angle and smoothed lane
    pub fn player_pos(center: Vec2, angle: f32, lane: f32) -> Vec2 {
        center + polar_to_cartesian(INNER_LANE + lane * LANE_SPACING, angle)
    }
}

impl GameStrategy for Orbit {
    fn game(&self) -> GameType {
        GameType::Orbit
    }

    fn setup(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let pos = Self::player_pos(
            ctx.viewport.center(),
            ctx.state.orbit_angle,
            ctx.state.orbit_radius,
        );
        let id = store.next_id();
        store.insert(
            Entity::new(id, EntityKind::Player, pos, PLAYER_SIZE, ctx.now_ms)
                .with_color(ColorTag::Indigo)
                .with_target(true),
        );
    }

    fn spawn(&self, store: &mut EntityStore, ctx: &mut TickContext) -> Vec<Entity> {
        let angle = ctx.rng.random_range(0.0..std::f32::consts::TAU);
        let distance = if ctx.rng.random_bool(0.5) {
            INNER_LANE
        } else {
            INNER_LANE + LANE_SPACING
        };
        let pos = ctx.viewport.center() + polar_to_cartesian(distance, angle);

        let mut debris = Entity::new(store.next_id(), EntityKind::Obstacle, pos, DEBRIS_SIZE, ctx.now_ms)
            .with_color(ColorTag::Red);
        debris.angle = Some(angle);
        debris.orbit_distance = Some(distance);
        vec![debris]
    }

    fn advance(&self, store: &mut EntityStore, ctx: &mut TickContext) {
        let center = ctx.viewport.center();
        let state = &mut *ctx.state;

        // Angle accelerates with session time
        let mut speed = BASE_ANGULAR_SPEED * (1.0 + state.elapsed_seconds as f32 * ANGULAR_ACCEL);
        if ctx.rules.variation == Variation::Overdrive {
            speed *= 1.5;
        }
        state.orbit_angle = wrap_angle(state.orbit_angle + speed);
        state.orbit_radius += (state.orbit_lane - state.orbit_radius) * RADIUS_SMOOTHING;

        let player = Self::player_pos(center, state.orbit_angle, state.orbit_radius);

        // Judge against debris where it was drawn last frame
        let collided = store
            .iter()
            .any(|e| e.kind == EntityKind::Obstacle && within_radius(e.pos, player, HIT_RADIUS));
        if collided {
            ctx.miss(COLLISION_PENALTY, "HULL BREACH");
        }

        let spin = match ctx.variation() {
            Variation::CounterSpin => -DEBRIS_SPIN,
            _ => DEBRIS_SPIN,
        };
        let mut has_player = false;
        for e in store.iter_mut() {
            match e.kind {
                EntityKind::Obstacle => {
                    let angle = e.angle.unwrap_or(0.0) + spin;
                    let distance = e.orbit_distance.unwrap_or(INNER_LANE + LANE_SPACING / 2.0);
                    e.angle = Some(angle);
                    e.pos = center + polar_to_cartesian(distance, angle);
                }
                EntityKind::Player => {
                    e.pos = player;
                    has_player = true;
                }
                _ => e.integrate(),
            }
        }
        if !has_player {
            self.setup(store, ctx);
        }
    }

    fn on_click(
        &self,
        _target: Option<EntityId>,
        _store: &mut EntityStore,
        ctx: &mut TickContext,
    ) -> ClickOutcome {
        ctx.state.orbit_lane = if ctx.state.orbit_lane == 0.0 { 1.0 } else { 0.0 };
        ctx.emit(GameEvent::SpecialAction(SpecialAction::OrbitSwitch));
        ClickOutcome::Action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::games::testing::Harness;

    #[test]
    fn test_angular_speed_grows_with_time() {
        let mut h = Harness::new(GameType::Orbit);
        h.tick(&Orbit);
        let early = h.state.orbit_angle;

        let mut h = Harness::new(GameType::Orbit);
        h.state.elapsed_seconds = 50;
        h.tick(&Orbit);
        assert!(h.state.orbit_angle > early);
        assert!((h.state.orbit_angle - BASE_ANGULAR_SPEED * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_lane_switch_is_smoothed() {
        let mut h = Harness::new(GameType::Orbit);
        let outcome = h.with_ctx(|store, ctx| Orbit.on_click(None, store, ctx));
        assert_eq!(outcome, ClickOutcome::Action);
        assert_eq!(h.state.orbit_lane, 1.0);

        h.tick(&Orbit);
        assert!((h.state.orbit_radius - 0.1).abs() < 1e-6);
        for _ in 0..100 {
            h.tick(&Orbit);
        }
        assert!((h.state.orbit_radius - 1.0).abs() < 1e-3);
        assert_eq!(h.count(&GameEvent::SpecialAction(SpecialAction::OrbitSwitch)), 1);
    }

    #[test]
    fn test_player_is_tracked_as_entity() {
        let mut h = Harness::new(GameType::Orbit);
        h.with_ctx(|store, ctx| Orbit.setup(store, ctx));
        h.tick(&Orbit);
        assert_eq!(h.store.count_kind(EntityKind::Player), 1);
        let player = h.store.iter().find(|e| e.kind == EntityKind::Player).unwrap();
        let expected = Orbit::player_pos(h.viewport.center(), h.state.orbit_angle, h.state.orbit_radius);
        assert!(player.pos.distance(expected) < 1e-3);
    }

    #[test]
    fn test_collision_penalises_without_ending() {
        let mut h = Harness::new(GameType::Orbit);
        h.state.score = 12.0;
        // Debris sitting exactly where the player will be after one tick
        let angle = BASE_ANGULAR_SPEED;
        let id = h.store.next_id();
        let mut debris = Entity::new(
            id,
            EntityKind::Obstacle,
            Orbit::player_pos(h.viewport.center(), angle, 0.0),
            DEBRIS_SIZE,
            0.0,
        );
        debris.angle = Some(angle);
        debris.orbit_distance = Some(INNER_LANE);
        h.store.insert(debris);

        h.tick(&Orbit);
        assert_eq!(h.state.score, 7.0);
        assert_eq!(h.state.message, "HULL BREACH");
        assert_eq!(h.count(&GameEvent::Miss), 1);
        assert!(h.state.is_running());
    }

    #[test]
    fn test_penalty_floor() {
        let mut h = Harness::new(GameType::Orbit);
        let id = h.store.next_id();
        let mut debris = Entity::new(id, EntityKind::Obstacle, Vec2::ZERO, DEBRIS_SIZE, 0.0);
        debris.angle = Some(BASE_ANGULAR_SPEED - DEBRIS_SPIN);
        debris.orbit_distance = Some(INNER_LANE);
        // Place it on the player's next position
        debris.pos = Orbit::player_pos(h.viewport.center(), BASE_ANGULAR_SPEED, 0.0);
        h.store.insert(debris);
        h.tick(&Orbit);
        assert_eq!(h.state.score, 0.0);
    }

    #[test]
    fn test_spawned_debris_sits_on_a_lane() {
        let mut h = Harness::new(GameType::Orbit);
        for _ in 0..10 {
            let batch = h.with_ctx(|store, ctx| Orbit.spawn(store, ctx));
            assert_eq!(batch.len(), 1);
            let d = batch[0].pos.distance(h.viewport.center());
            assert!((d - INNER_LANE).abs() < 1e-3 || (d - INNER_LANE - LANE_SPACING).abs() < 1e-3);
        }
    }
}
