#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Swarm Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the spawning system. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. The spawner never owns the world: it reaches the host exclusively
//! through the narrow [`SpawnContext`] capability.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Two dimensional vector expressed in map units.
pub use glam::DVec2 as Vec2;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Swarm Defence.";

/// Discrete simulation step, one per rendered frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tick(u64);

impl Tick {
    /// Creates a tick from its raw frame index.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the raw frame index.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the tick that lies `delay` frames after this one.
    #[must_use]
    pub const fn saturating_add(self, delay: u64) -> Self {
        Self(self.0.saturating_add(delay))
    }

    /// Returns the tick immediately following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        self.saturating_add(1)
    }
}

/// Unique identifier assigned to an enemy by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Request to create a single enemy, computed by the spawner and realized by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyDescriptor {
    /// Location the enemy appears at.
    pub position: Vec2,
    /// Starting (and maximum) health of the enemy.
    pub health: f64,
}

impl EnemyDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub const fn new(position: Vec2, health: f64) -> Self {
        Self { position, health }
    }
}

/// Attribution of damage dealt to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Damage caused by the player, including the player's turrets and bullets.
    Player,
    /// Damage caused by anything else, such as hazards or scripted removal.
    Environment,
}

impl DamageSource {
    /// Reports whether kills from this source feed the difficulty model.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single frame.
    Tick,
    /// Teleports the player to the provided location.
    MovePlayer {
        /// New player location.
        position: Vec2,
    },
    /// Creates an enemy according to the supplied descriptor.
    SpawnEnemy {
        /// Position and health of the enemy to create.
        descriptor: EnemyDescriptor,
        /// Keeps the enemy in place instead of chasing the player.
        immobile: bool,
    },
    /// Deals damage to an existing enemy.
    DamageEnemy {
        /// Identifier of the enemy being hit.
        enemy: EnemyId,
        /// Amount of health removed by the hit.
        amount: f64,
        /// Party responsible for the damage.
        source: DamageSource,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick that became current.
        tick: Tick,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Location the enemy appeared at.
        position: Vec2,
        /// Starting health of the enemy.
        health: f64,
    },
    /// Reports that an enemy ran out of health and was removed.
    EnemyKilled {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Health the enemy was created with.
        max_health: f64,
        /// Party that dealt the final blow.
        source: DamageSource,
    },
    /// Reports that an enemy reached the player.
    PlayerCaught {
        /// Identifier of the enemy touching the player.
        enemy: EnemyId,
    },
}

/// Capabilities the spawner requires from its host.
///
/// Hosts hand the spawner exactly this surface instead of a reference to the
/// whole game, which keeps the spawner testable with a scripted context.
pub trait SpawnContext {
    /// Frame currently being simulated.
    fn current_tick(&self) -> Tick;

    /// Location spawns are placed around.
    fn player_position(&self) -> Vec2;

    /// Random source used for every spawn decision.
    ///
    /// Draws happen in a fixed order within a tick, so a seeded source
    /// reproduces the exact spawn sequence.
    fn rng(&mut self) -> &mut dyn RngCore;

    /// Creates a live enemy in the host world.
    fn create_enemy(&mut self, descriptor: EnemyDescriptor);
}

/// Converts polar coordinates into a cartesian offset.
///
/// Angles are measured in degrees, with zero pointing along the positive x axis.
#[must_use]
pub fn polar_offset(distance: f64, angle_degrees: f64) -> Vec2 {
    Vec2::from_angle(angle_degrees.to_radians()) * distance
}
