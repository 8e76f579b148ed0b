//! One-way enable switch with optional tick delay.

use swarm_defence_core::Tick;

/// Keeps spawning frozen until the host enables it.
///
/// The gate moves from disabled, optionally through a pending state, to
/// enabled, and never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnableGate {
    enabled: bool,
    enable_after: Option<Tick>,
}

impl EnableGate {
    /// Creates a gate that is either already open or waiting for [`EnableGate::enable`].
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            enable_after: None,
        }
    }

    /// Schedules the gate to open `delay` ticks after `current_tick`.
    ///
    /// A zero delay opens the gate immediately. Returns whether the gate is open.
    pub fn enable(&mut self, current_tick: Tick, delay: u64) -> bool {
        self.enable_after = Some(current_tick.saturating_add(delay));
        self.check(current_tick)
    }

    /// Opens the gate once the scheduled tick has been reached.
    pub fn check(&mut self, current_tick: Tick) -> bool {
        if self.enabled {
            return true;
        }
        if let Some(threshold) = self.enable_after {
            if current_tick >= threshold {
                self.enabled = true;
                tracing::info!(tick = current_tick.get(), "enemy spawning enabled");
            }
        }
        self.enabled
    }

    /// Reports whether the gate is open.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Tick the gate is scheduled to open at, if any.
    #[must_use]
    pub const fn enable_after(&self) -> Option<Tick> {
        self.enable_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_opens_immediately() {
        let mut gate = EnableGate::new(false);
        assert!(gate.enable(Tick::new(12), 0));
        assert!(gate.is_enabled());
    }

    #[test]
    fn delay_holds_gate_until_threshold() {
        let mut gate = EnableGate::new(false);
        assert!(!gate.enable(Tick::new(100), 40));

        for tick in 100..140 {
            assert!(!gate.check(Tick::new(tick)), "opened early at {tick}");
        }
        assert!(gate.check(Tick::new(140)));
    }

    #[test]
    fn gate_never_closes_again() {
        let mut gate = EnableGate::new(true);
        assert!(gate.enable(Tick::new(5), 1_000));
        assert!(gate.check(Tick::new(0)));
        assert!(gate.is_enabled());
    }

    #[test]
    fn unscheduled_gate_stays_closed() {
        let mut gate = EnableGate::new(false);
        assert!(!gate.check(Tick::new(u64::MAX)));
        assert_eq!(gate.enable_after(), None);
    }
}
