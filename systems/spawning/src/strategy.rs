//! Randomized encounter generators bought against the points budget.

use std::{f64::consts::PI, fmt};

use rand::Rng;
use swarm_defence_core::{polar_offset, EnemyDescriptor, Vec2};

use crate::tuning::SpawnTuning;

const FULL_TURN_DEGREES: f64 = 360.0;
const SINGLE_MIN_HEALTH: f64 = 1.0;

/// Planned unit of enemy creation, randomized once when it is decided.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnStrategy {
    /// A lone enemy.
    Single(SingleEnemySpawn),
    /// A swarm of enemies sharing a spawn origin.
    Cluster(ClusterEnemySpawn),
}

impl SpawnStrategy {
    /// Decides the next encounter for the provided strength.
    ///
    /// Clusters are only considered once strength exceeds the configured
    /// threshold; below it no random draw is spent on the decision.
    pub fn make_random<R: Rng + ?Sized>(strength: f64, tuning: &SpawnTuning, rng: &mut R) -> Self {
        let encounter = &tuning.encounter;
        if strength > encounter.cluster_threshold
            && rng.gen::<f64>() < encounter.cluster_chance(strength)
        {
            Self::Cluster(ClusterEnemySpawn::randomize(strength, tuning, rng))
        } else {
            Self::Single(SingleEnemySpawn::randomize(strength, tuning, rng))
        }
    }

    /// Points consumed when the encounter is realized.
    #[must_use]
    pub fn cost(&self) -> f64 {
        match self {
            Self::Single(single) => single.cost(),
            Self::Cluster(cluster) => cluster.cost(),
        }
    }

    /// Number of enemies the encounter creates.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Cluster(cluster) => cluster.enemy_health_list().len(),
        }
    }

    /// Places the encounter's enemies around the player.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        player_position: Vec2,
        tuning: &SpawnTuning,
        rng: &mut R,
    ) -> Vec<EnemyDescriptor> {
        match self {
            Self::Single(single) => vec![single.spawn(player_position, tuning, rng)],
            Self::Cluster(cluster) => cluster.spawn(player_position, tuning, rng),
        }
    }
}

impl fmt::Display for SpawnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(single) => write!(f, "single enemy with health {}", single.health()),
            Self::Cluster(cluster) => write!(
                f,
                "cluster of {} enemies with total health {:.2}",
                cluster.enemy_health_list().len(),
                cluster.total_health()
            ),
        }
    }
}

/// Encounter consisting of one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SingleEnemySpawn {
    health: u32,
}

impl SingleEnemySpawn {
    /// Creates a single spawn with fixed health, raised to at least one.
    #[must_use]
    pub fn new(health: u32) -> Self {
        Self {
            health: health.max(1),
        }
    }

    /// Draws health uniformly from `[1, 2 * base health]`.
    ///
    /// At low strength the upper bound falls below one; the range then
    /// collapses to exactly one instead of inverting.
    pub fn randomize<R: Rng + ?Sized>(strength: f64, tuning: &SpawnTuning, rng: &mut R) -> Self {
        let mean_health = tuning.encounter.base_enemy_health(strength);
        let high = (mean_health * tuning.encounter.single_health_spread).max(SINGLE_MIN_HEALTH);
        let sampled = rng.gen_range(SINGLE_MIN_HEALTH..=high);
        tracing::debug!(
            health = sampled,
            high,
            "next single spawn health drawn from [1, high]"
        );
        Self::new(sampled.round() as u32)
    }

    /// Health of the enemy.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Points consumed when realized, equal to the enemy's health.
    #[must_use]
    pub fn cost(&self) -> f64 {
        f64::from(self.health)
    }

    /// Places the enemy on the spawn ring at a uniformly random angle.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        player_position: Vec2,
        tuning: &SpawnTuning,
        rng: &mut R,
    ) -> EnemyDescriptor {
        let angle = rng.gen_range(0.0..FULL_TURN_DEGREES);
        let distance = tuning.placement.ring.sample(rng);
        let position = player_position + polar_offset(distance, angle);
        EnemyDescriptor::new(position, self.cost())
    }
}

/// Encounter consisting of a localized swarm.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterEnemySpawn {
    enemy_health_list: Vec<f64>,
    total_health: f64,
}

impl ClusterEnemySpawn {
    /// Creates a cluster from explicit member healths.
    #[must_use]
    pub fn from_health_list(enemy_health_list: Vec<f64>) -> Self {
        let total_health = enemy_health_list.iter().sum();
        Self {
            enemy_health_list,
            total_health,
        }
    }

    /// Draws the cluster size and splits its health budget between members.
    pub fn randomize<R: Rng + ?Sized>(strength: f64, tuning: &SpawnTuning, rng: &mut R) -> Self {
        let cluster = &tuning.cluster;
        let total_health =
            tuning.encounter.base_enemy_health(strength) * cluster.health_multiplier;
        let mean_amount = strength * cluster.amount_per_strength;
        let sampled_amount = rng
            .gen_range(
                mean_amount * (1.0 - cluster.amount_deviation)
                    ..=mean_amount * (1.0 + cluster.amount_deviation),
            )
            .round();
        let amount = (sampled_amount as u32).max(cluster.minimum_amount);

        let mean_health = total_health / f64::from(amount);
        let health_min = (mean_health.floor() - 1.0).max(cluster.minimum_enemy_health);
        let health_max = (mean_health.ceil() + 1.0).max(health_min);
        let enemy_health_list = (0..amount)
            .map(|_| rng.gen_range(health_min..=health_max))
            .collect();

        let spawn = Self::from_health_list(enemy_health_list);
        tracing::debug!(
            amount,
            total_health = spawn.total_health,
            health_min,
            health_max,
            "next cluster spawn"
        );
        spawn
    }

    /// Health of every member, in spawn order.
    #[must_use]
    pub fn enemy_health_list(&self) -> &[f64] {
        &self.enemy_health_list
    }

    /// Sum of all member healths.
    #[must_use]
    pub const fn total_health(&self) -> f64 {
        self.total_health
    }

    /// Points consumed when realized, equal to the total health.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.total_health
    }

    /// Fans the members out around a shared origin on the spawn ring.
    ///
    /// The lateral spread is turned into an angular spread with the arc
    /// length formula `angle = 180 * length / (pi * radius)`. Members drawn
    /// inside the ring are redrawn from `[ring.low, mean + variation]`.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        player_position: Vec2,
        tuning: &SpawnTuning,
        rng: &mut R,
    ) -> Vec<EnemyDescriptor> {
        let ring = tuning.placement.ring;
        let mean_distance = ring.sample(rng);
        let distance_variation = tuning.cluster.distance_variation.sample(rng);
        let mean_angle = rng.gen_range(0.0..FULL_TURN_DEGREES);
        let lateral_spread = tuning.cluster.lateral_spread.sample(rng);
        let angle_variation = 180.0 * lateral_spread / (PI * mean_distance);

        self.enemy_health_list
            .iter()
            .map(|&health| {
                let angle = rng.gen_range(
                    mean_angle - angle_variation..=mean_angle + angle_variation,
                );
                let mut distance = rng.gen_range(
                    mean_distance - distance_variation..=mean_distance + distance_variation,
                );
                if distance < ring.low {
                    distance = rng.gen_range(ring.low..=mean_distance + distance_variation);
                }
                EnemyDescriptor::new(player_position + polar_offset(distance, angle), health)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn low_strength_single_always_has_unit_health() {
        let tuning = SpawnTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..1_000 {
            let single = SingleEnemySpawn::randomize(0.005, &tuning, &mut rng);
            assert_eq!(single.health(), 1);
            assert_eq!(single.cost(), 1.0);
        }
    }

    #[test]
    fn single_health_stays_within_sampling_range() {
        let tuning = SpawnTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let strength = 2.5;
        let high = (tuning.encounter.base_enemy_health(strength) * 2.0).round() as u32;
        for _ in 0..1_000 {
            let health = SingleEnemySpawn::randomize(strength, &tuning, &mut rng).health();
            assert!((1..=high).contains(&health), "health {health} out of range");
        }
    }

    #[test]
    fn below_threshold_never_clusters_nor_draws_decision() {
        let tuning = SpawnTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut mirror = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let strategy = SpawnStrategy::make_random(0.2, &tuning, &mut rng);
            let expected = SingleEnemySpawn::randomize(0.2, &tuning, &mut mirror);
            assert_eq!(strategy, SpawnStrategy::Single(expected));
        }
    }

    #[test]
    fn high_strength_produces_both_variants() {
        let tuning = SpawnTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut clusters = 0;
        let trials = 2_000;
        for _ in 0..trials {
            if let SpawnStrategy::Cluster(_) = SpawnStrategy::make_random(4.0, &tuning, &mut rng) {
                clusters += 1;
            }
        }
        let ratio = f64::from(clusters) / f64::from(trials);
        assert!((0.28..0.42).contains(&ratio), "cluster ratio {ratio}");
    }

    #[test]
    fn cluster_cost_is_sum_of_member_health() {
        let cluster = ClusterEnemySpawn::from_health_list(vec![1.5, 2.25, 3.0]);
        let strategy = SpawnStrategy::Cluster(cluster);
        assert_eq!(strategy.cost(), 6.75);
        assert_eq!(strategy.enemy_count(), 3);
    }

    #[test]
    fn cluster_members_respect_health_floor() {
        let tuning = SpawnTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cluster = ClusterEnemySpawn::randomize(60.0, &tuning, &mut rng);
        assert!(cluster.enemy_health_list().len() > 100);
        assert!(cluster
            .enemy_health_list()
            .iter()
            .all(|health| *health >= 1.0));
    }

    #[test]
    fn display_names_the_encounter() {
        assert_eq!(
            SpawnStrategy::Single(SingleEnemySpawn::new(4)).to_string(),
            "single enemy with health 4"
        );
        assert_eq!(
            SpawnStrategy::Cluster(ClusterEnemySpawn::from_health_list(vec![1.0, 2.0]))
                .to_string(),
            "cluster of 2 enemies with total health 3.00"
        );
    }
}
