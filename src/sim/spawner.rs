//! Spawn timer callback
//!
//! Asks the active strategy for a batch and admits it against the rule set's
//! entity cap. Batches are all-or-nothing so wall pairs never split.

use super::entity::EntityStore;
use super::games::{GameStrategy, TickContext};
use super::rules::RuleSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct Spawner;

impl Spawner {
    /// One spawn firing; returns the number of entities admitted
    pub fn fire(&self, strategy: &dyn GameStrategy, store: &mut EntityStore, ctx: &mut TickContext) -> usize {
        let max = ctx.rules.max_entities;
        if store.len() >= max {
            return 0;
        }
        let batch = strategy.spawn(store, ctx);
        store.spawn_batch(batch, max)
    }

    /// Period until the next firing, re-read after every firing
    #[inline]
    pub fn interval_ms(rules: &RuleSet) -> f64 {
        rules.spawn_interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::games::testing::Harness;
    use crate::sim::games::{Breath, Flux, GameType, Phase};
    use proptest::prelude::*;

    #[test]
    fn test_five_firings_capped_at_three() {
        let mut h = Harness::new(GameType::Flux);
        h.rules.max_entities = 3;
        let mut admitted = 0;
        for _ in 0..5 {
            admitted += h.with_ctx(|store, ctx| Spawner.fire(&Flux, store, ctx));
        }
        assert_eq!(admitted, 3);
        assert_eq!(h.store.len(), 3);
    }

    #[test]
    fn test_wall_pairs_never_split() {
        let mut h = Harness::new(GameType::Breath);
        h.rules.max_entities = 3;
        for _ in 0..4 {
            h.with_ctx(|store, ctx| Spawner.fire(&Breath, store, ctx));
        }
        assert!(h.store.len() <= 3);
        assert!(h.store.len() >= 1);
    }

    #[test]
    fn test_games_without_spawns_add_nothing() {
        let mut h = Harness::new(GameType::Phase);
        let n = h.with_ctx(|store, ctx| Spawner.fire(&Phase, store, ctx));
        assert_eq!(n, 0);
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_interval_tracks_rules() {
        let mut h = Harness::new(GameType::Flux);
        h.rules.mutate(|r| r.spawn_interval_ms = 700.0);
        assert_eq!(Spawner::interval_ms(&h.rules), 700.0);
    }

    proptest! {
        #[test]
        fn prop_admission_never_exceeds_cap(max in 1usize..12, firings in 0usize..40) {
            let mut h = Harness::new(GameType::Breath);
            h.rules.max_entities = max;
            for _ in 0..firings {
                h.with_ctx(|store, ctx| Spawner.fire(&Breath, store, ctx));
                prop_assert!(h.store.len() <= max);
            }
        }
    }
}
