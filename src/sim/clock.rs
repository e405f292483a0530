//! Interval timers pumped by the host's frame clock
//!
//! A timer is armed with a period and fires every time the session clock
//! crosses its next due time. Cancelling is immediate: a cancelled timer never
//! reports as due again until re-armed.

/// The three periodic callbacks of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// 1 s session clock (elapsed time, rule shifts, timeout)
    Clock,
    /// Fixed-rate physics/logic tick
    Physics,
    /// Rule-set-driven spawn timer
    Spawn,
}

/// A repeating timer
#[derive(Debug, Clone, Default)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_ms: f64,
    active: bool,
}

impl IntervalTimer {
    /// Arm so the first firing is one period after `now_ms`
    pub fn arm(&mut self, now_ms: f64, period_ms: f64) {
        self.period_ms = period_ms.max(1.0);
        self.next_due_ms = now_ms + self.period_ms;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Due time if armed and due at or before `until_ms`
    pub fn due_before(&self, until_ms: f64) -> Option<f64> {
        (self.active && self.next_due_ms <= until_ms).then_some(self.next_due_ms)
    }

    /// Consume one firing and schedule the next with `period_ms`
    pub fn fire(&mut self, period_ms: f64) {
        self.period_ms = period_ms.max(1.0);
        self.next_due_ms += self.period_ms;
    }
}

/// The session's timer set
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pub clock: IntervalTimer,
    pub physics: IntervalTimer,
    pub spawn: IntervalTimer,
}

impl Timers {
    pub fn arm_all(&mut self, now_ms: f64, clock_ms: f64, physics_ms: f64, spawn_ms: f64) {
        self.clock.arm(now_ms, clock_ms);
        self.physics.arm(now_ms, physics_ms);
        self.spawn.arm(now_ms, spawn_ms);
    }

    pub fn cancel_all(&mut self) {
        self.clock.cancel();
        self.physics.cancel();
        self.spawn.cancel();
    }

    pub fn any_active(&self) -> bool {
        self.clock.is_active() || self.physics.is_active() || self.spawn.is_active()
    }

    /// Earliest timer due at or before `until_ms` (ties: clock, physics, spawn)
    pub fn next_due(&self, until_ms: f64) -> Option<(TimerKind, f64)> {
        [
            (TimerKind::Clock, &self.clock),
            (TimerKind::Physics, &self.physics),
            (TimerKind::Spawn, &self.spawn),
        ]
        .into_iter()
        .filter_map(|(kind, t)| t.due_before(until_ms).map(|due| (kind, due)))
        .fold(None, |best: Option<(TimerKind, f64)>, (kind, due)| match best {
            Some((_, best_due)) if best_due <= due => best,
            _ => Some((kind, due)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_on_period() {
        let mut t = IntervalTimer::default();
        t.arm(0.0, 100.0);
        assert_eq!(t.due_before(99.0), None);
        assert_eq!(t.due_before(100.0), Some(100.0));
        t.fire(100.0);
        assert_eq!(t.due_before(150.0), None);
        assert_eq!(t.due_before(200.0), Some(200.0));
    }

    #[test]
    fn test_cancelled_timer_never_due() {
        let mut t = IntervalTimer::default();
        t.arm(0.0, 10.0);
        t.cancel();
        assert_eq!(t.due_before(1_000_000.0), None);
    }

    #[test]
    fn test_next_due_orders_by_time_then_kind() {
        let mut timers = Timers::default();
        timers.arm_all(0.0, 1000.0, 16.0, 16.0);
        assert_eq!(timers.next_due(20.0), Some((TimerKind::Physics, 16.0)));
        timers.physics.fire(16.0);
        assert_eq!(timers.next_due(20.0), Some((TimerKind::Spawn, 16.0)));
        timers.cancel_all();
        assert!(!timers.any_active());
        assert_eq!(timers.next_due(5000.0), None);
    }
}
