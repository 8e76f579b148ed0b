#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dynamic difficulty and enemy spawning system.
//!
//! The [`SpawnManager`] owns a points budget that grows every enabled tick by
//! the current [`Strength`]. It always holds one pending [`SpawnStrategy`] and
//! buys it from the budget whenever it becomes affordable, deciding a fresh
//! encounter right after each purchase. Player kills reported back through
//! [`SpawnManager::handle_events`] raise strength, which in turn speeds up the
//! budget and toughens future encounters.

mod gate;
mod strategy;
mod strength;
mod tuning;

use rand::Rng;
use swarm_defence_core::{Event, SpawnContext, Tick};

pub use gate::EnableGate;
pub use strategy::{ClusterEnemySpawn, SingleEnemySpawn, SpawnStrategy};
pub use strength::Strength;
pub use tuning::{
    ClusterTuning, EncounterTuning, Interval, PlacementTuning, SpawnTuning, StrengthTuning,
    TuningError,
};

/// Orchestrates strength, budget, gate and the pending encounter.
#[derive(Clone, Debug)]
pub struct SpawnManager {
    tuning: SpawnTuning,
    points: f64,
    strength: Strength,
    gate: EnableGate,
    next_encounter: SpawnStrategy,
}

impl SpawnManager {
    /// Creates a manager and decides its first encounter.
    pub fn new<R: Rng + ?Sized>(tuning: SpawnTuning, rng: &mut R) -> Result<Self, TuningError> {
        tuning.validate()?;
        let strength = Strength::new(tuning.initial_strength, tuning.strength);
        let next_encounter = SpawnStrategy::make_random(strength.value(), &tuning, rng);
        Ok(Self {
            points: tuning.start_points,
            gate: EnableGate::new(tuning.start_enabled),
            strength,
            next_encounter,
            tuning,
        })
    }

    /// Schedules spawning to start `delay` ticks after `current_tick`.
    ///
    /// Returns whether spawning is already enabled, which is the case for a
    /// zero delay or a gate that opened earlier.
    pub fn enable(&mut self, current_tick: Tick, delay: u64) -> bool {
        self.gate.enable(current_tick, delay)
    }

    /// Opens the gate if its scheduled tick has been reached.
    pub fn check_gate(&mut self, current_tick: Tick) -> bool {
        self.gate.check(current_tick)
    }

    /// Advances the spawner by one frame, returning how many encounters were realized.
    ///
    /// Nothing changes while the gate is closed: no points accrue and strength
    /// does not drift.
    pub fn on_tick<C: SpawnContext + ?Sized>(&mut self, context: &mut C) -> usize {
        if !self.check_gate(context.current_tick()) {
            return 0;
        }

        self.points += self.strength.value();
        self.strength.on_tick_drift();
        self.drain_budget(context)
    }

    /// Reports an enemy destroyed by the player.
    ///
    /// Kills reported while spawning is disabled are ignored.
    pub fn on_kill_enemy(&mut self, enemy_max_health: f64) {
        if !self.gate.is_enabled() {
            return;
        }
        self.strength.on_kill(enemy_max_health);
    }

    /// Feeds player-attributed kills from a world event batch into strength.
    pub fn handle_events(&mut self, events: &[Event]) {
        for event in events {
            if let Event::EnemyKilled {
                max_health, source, ..
            } = event
            {
                if source.is_player() {
                    self.on_kill_enemy(*max_health);
                }
            }
        }
    }

    /// Current strength, suitable for HUD display.
    #[must_use]
    pub fn strength(&self) -> f64 {
        self.strength.value()
    }

    /// Unspent spawn budget.
    #[must_use]
    pub fn points(&self) -> f64 {
        self.points
    }

    /// Reports whether spawning is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Tick spawning is scheduled to start at, if [`SpawnManager::enable`] was called.
    #[must_use]
    pub fn enable_after(&self) -> Option<Tick> {
        self.gate.enable_after()
    }

    /// Encounter that will be realized once the budget can afford it.
    #[must_use]
    pub fn next_encounter(&self) -> &SpawnStrategy {
        &self.next_encounter
    }

    /// Tuning the manager was created with.
    #[must_use]
    pub fn tuning(&self) -> &SpawnTuning {
        &self.tuning
    }

    fn drain_budget<C: SpawnContext + ?Sized>(&mut self, context: &mut C) -> usize {
        let mut realized = 0;
        while self.points >= self.next_encounter.cost() {
            self.realize_next_encounter(context);
            realized += 1;
        }
        realized
    }

    fn realize_next_encounter<C: SpawnContext + ?Sized>(&mut self, context: &mut C) {
        let cost = self.next_encounter.cost();
        debug_assert!(
            self.points >= cost,
            "realizing encounter costing {cost} with only {} points",
            self.points
        );

        let player_position = context.player_position();
        let enemies = self
            .next_encounter
            .spawn(player_position, &self.tuning, context.rng());
        for enemy in enemies {
            context.create_enemy(enemy);
        }
        tracing::debug!(
            encounter = %self.next_encounter,
            cost,
            points = self.points,
            "spawned encounter"
        );

        self.points -= cost;
        self.next_encounter =
            SpawnStrategy::make_random(self.strength.value(), &self.tuning, context.rng());
    }
}
