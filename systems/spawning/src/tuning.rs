//! Designer-facing tuning surface for the spawning system.

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

/// Aggregated tuning knobs controlling every adjustable aspect of the spawner.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnTuning {
    /// Strength the spawner starts with; also the initial points-per-tick rate.
    pub initial_strength: f64,
    /// Points available before the first enabled tick.
    pub start_points: f64,
    /// Skips the enable gate entirely when set.
    pub start_enabled: bool,
    /// Controls how strength evolves over time and with kills.
    pub strength: StrengthTuning,
    /// Controls how the next encounter is chosen and how tough single enemies are.
    pub encounter: EncounterTuning,
    /// Ring around the player that enemies appear in.
    pub placement: PlacementTuning,
    /// Controls the size, health split and spread of clustered encounters.
    pub cluster: ClusterTuning,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            initial_strength: 0.005,
            start_points: 0.0,
            start_enabled: false,
            strength: StrengthTuning::default(),
            encounter: EncounterTuning::default(),
            placement: PlacementTuning::default(),
            cluster: ClusterTuning::default(),
        }
    }
}

impl SpawnTuning {
    /// Parses a tuning surface from TOML, filling omitted knobs with defaults.
    pub fn from_toml(contents: &str) -> Result<Self, TuningError> {
        let tuning: Self = toml::from_str(contents)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Checks that every knob lies within the domain the spawner relies on.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.initial_strength > 0.0 && self.initial_strength.is_finite()) {
            return Err(TuningError::NonPositiveStrength(self.initial_strength));
        }
        non_negative("start_points", self.start_points)?;
        non_negative("strength.drift_per_tick", self.strength.drift_per_tick)?;
        non_negative("strength.kill_base", self.strength.kill_base)?;
        non_negative("strength.kill_per_health", self.strength.kill_per_health)?;
        non_negative("encounter.base_health_factor", self.encounter.base_health_factor)?;
        non_negative("encounter.single_health_spread", self.encounter.single_health_spread)?;
        non_negative("encounter.cluster_chance_factor", self.encounter.cluster_chance_factor)?;
        non_negative("encounter.cluster_threshold", self.encounter.cluster_threshold)?;
        non_negative("encounter.cluster_chance_cap", self.encounter.cluster_chance_cap)?;
        non_negative("cluster.health_multiplier", self.cluster.health_multiplier)?;
        non_negative("cluster.amount_per_strength", self.cluster.amount_per_strength)?;
        non_negative("cluster.amount_deviation", self.cluster.amount_deviation)?;

        if !(self.placement.ring.low > 0.0) {
            return Err(TuningError::NonPositiveRing(self.placement.ring.low));
        }
        self.placement.ring.check("placement.ring")?;
        self.cluster.distance_variation.check("cluster.distance_variation")?;
        self.cluster.lateral_spread.check("cluster.lateral_spread")?;
        non_negative("cluster.distance_variation", self.cluster.distance_variation.low)?;
        non_negative("cluster.lateral_spread", self.cluster.lateral_spread.low)?;

        if self.cluster.minimum_amount < 2 {
            return Err(TuningError::ClusterFloorTooSmall(self.cluster.minimum_amount));
        }
        if !(self.cluster.minimum_enemy_health >= 1.0) {
            return Err(TuningError::EnemyHealthFloor(self.cluster.minimum_enemy_health));
        }
        Ok(())
    }
}

/// Growth parameters of the strength scalar.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrengthTuning {
    /// Strength added on every enabled tick regardless of player performance.
    pub drift_per_tick: f64,
    /// Flat strength added for every enemy the player kills.
    pub kill_base: f64,
    /// Strength added per point of the killed enemy's maximum health.
    pub kill_per_health: f64,
}

impl Default for StrengthTuning {
    fn default() -> Self {
        Self {
            drift_per_tick: 0.0001 / 60.0,
            kill_base: 0.0006,
            kill_per_health: 0.0004,
        }
    }
}

/// Parameters governing which encounter comes next.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncounterTuning {
    /// Strength that must be exceeded before clusters are considered at all.
    pub cluster_threshold: f64,
    /// Cluster probability per unit of strength.
    pub cluster_chance_factor: f64,
    /// Upper bound on the cluster probability.
    pub cluster_chance_cap: f64,
    /// Base enemy health is `sqrt(strength * base_health_factor)`.
    pub base_health_factor: f64,
    /// Single enemies draw health up to `base health * single_health_spread`.
    pub single_health_spread: f64,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            cluster_threshold: 0.2,
            cluster_chance_factor: 0.5,
            cluster_chance_cap: 0.35,
            base_health_factor: 40.0,
            single_health_spread: 2.0,
        }
    }
}

impl EncounterTuning {
    /// Health of an average enemy at the provided strength.
    #[must_use]
    pub fn base_enemy_health(&self, strength: f64) -> f64 {
        (strength * self.base_health_factor).max(0.0).sqrt()
    }

    /// Probability that the next encounter is a cluster, ignoring the threshold.
    #[must_use]
    pub fn cluster_chance(&self, strength: f64) -> f64 {
        (strength * self.cluster_chance_factor).min(self.cluster_chance_cap)
    }
}

/// Distances from the player that spawns are placed at.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementTuning {
    /// Closest and furthest spawn distance in map units.
    pub ring: Interval,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            ring: Interval::new(250.0, 500.0),
        }
    }
}

/// Parameters of clustered encounters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterTuning {
    /// Total cluster health as a multiple of the base enemy health.
    pub health_multiplier: f64,
    /// Expected cluster size per unit of strength.
    pub amount_per_strength: f64,
    /// Relative deviation of the sampled cluster size around its mean.
    pub amount_deviation: f64,
    /// Smallest cluster ever produced.
    pub minimum_amount: u32,
    /// Lowest health a single cluster member may be sampled with.
    pub minimum_enemy_health: f64,
    /// Radial spread of members around the cluster's mean distance.
    pub distance_variation: Interval,
    /// Lateral spread of members along the spawn ring, in map units.
    pub lateral_spread: Interval,
}

impl Default for ClusterTuning {
    fn default() -> Self {
        Self {
            health_multiplier: 2.5,
            amount_per_strength: 3.0,
            amount_deviation: 0.3,
            minimum_amount: 2,
            minimum_enemy_health: 1.0,
            distance_variation: Interval::new(70.0, 170.0),
            lateral_spread: Interval::new(150.0, 250.0),
        }
    }
}

/// Closed range of floating point values.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interval {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Interval {
    /// Creates an interval from its bounds.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Draws a value uniformly from the interval.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.low..=self.high)
    }

    fn check(&self, name: &'static str) -> Result<(), TuningError> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            return Err(TuningError::InvertedInterval {
                name,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Errors reported when a tuning surface is unusable.
#[derive(Debug, Error)]
pub enum TuningError {
    /// Strength must stay positive and finite so the budget keeps growing without overflowing.
    #[error("initial strength must be a positive finite number, got {0}")]
    NonPositiveStrength(f64),
    /// A knob that only makes sense as a non-negative quantity was negative.
    #[error("`{name}` must be a non-negative number, got {value}")]
    Negative {
        /// Knob that failed validation.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// An interval had its bounds swapped or was not finite.
    #[error("`{name}` interval is invalid: low {low} exceeds high {high} or is not finite")]
    InvertedInterval {
        /// Knob that failed validation.
        name: &'static str,
        /// Configured lower bound.
        low: f64,
        /// Configured upper bound.
        high: f64,
    },
    /// Spawns must never be placed on top of the player.
    #[error("spawn ring must start at a positive distance, got {0}")]
    NonPositiveRing(f64),
    /// Clusters always contain at least two members.
    #[error("cluster size floor must be at least 2, got {0}")]
    ClusterFloorTooSmall(u32),
    /// Cluster members must be killable but never free.
    #[error("cluster member health floor must be at least 1, got {0}")]
    EnemyHealthFloor(f64),
    /// The TOML document could not be parsed.
    #[error("failed to parse spawn tuning")]
    Parse(#[from] toml::de::Error),
}

fn non_negative(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Negative { name, value })
    }
}
