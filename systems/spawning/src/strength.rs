//! Difficulty scalar fed by elapsed time and player kills.

use crate::tuning::StrengthTuning;

/// Current game difficulty, doubling as the points-per-tick budget rate.
///
/// Strength only ever grows: every enabled tick adds a small constant drift
/// and every enemy the player destroys adds a bump proportional to the
/// enemy's maximum health.
#[derive(Clone, Debug, PartialEq)]
pub struct Strength {
    value: f64,
    tuning: StrengthTuning,
}

impl Strength {
    /// Creates the model starting at `initial`.
    #[must_use]
    pub fn new(initial: f64, tuning: StrengthTuning) -> Self {
        Self {
            value: initial,
            tuning,
        }
    }

    /// Current strength.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Applies the autonomous per-tick ramp.
    pub fn on_tick_drift(&mut self) {
        self.value += self.tuning.drift_per_tick;
    }

    /// Applies the feedback for an enemy killed by the player.
    ///
    /// Negative health is treated as zero so strength never decreases.
    pub fn on_kill(&mut self, enemy_max_health: f64) {
        let health = enemy_max_health.max(0.0);
        self.value += self.tuning.kill_base + health * self.tuning.kill_per_health;
    }
}
