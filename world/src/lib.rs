#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Swarm Defence.

use swarm_defence_core::{Command, EnemyId, Event, Tick, Vec2, WELCOME_BANNER};

/// Distance an enemy closes toward the player every tick.
pub const ENEMY_SPEED: f64 = 2.3;
/// Side length of an enemy's square hitbox.
pub const ENEMY_SIZE: f64 = 30.0;
/// Side length of the player's square hitbox.
pub const PLAYER_SIZE: f64 = 40.0;

const HEALTH_EPSILON_DIGITS: i32 = 9;

/// Live enemy chasing the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    position: Vec2,
    health: f64,
    max_health: f64,
    immobile: bool,
}

impl Enemy {
    fn new(id: EnemyId, position: Vec2, health: f64, immobile: bool) -> Self {
        Self {
            id,
            position,
            health,
            max_health: health,
            immobile,
        }
    }

    /// Identifier assigned when the enemy was created.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Center of the enemy in map units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> f64 {
        self.health
    }

    /// Health the enemy was created with.
    #[must_use]
    pub const fn max_health(&self) -> f64 {
        self.max_health
    }

    /// Whether the enemy holds its position instead of chasing the player.
    #[must_use]
    pub const fn is_immobile(&self) -> bool {
        self.immobile
    }

    fn step_towards(&mut self, target: Vec2) {
        let delta = target - self.position;
        let distance = delta.length();
        if distance <= ENEMY_SPEED {
            self.position = target;
        } else {
            self.position += delta / distance * ENEMY_SPEED;
        }
    }

    fn touches(&self, player: Vec2) -> bool {
        let reach = (ENEMY_SIZE + PLAYER_SIZE) / 2.0;
        let offset = (self.position - player).abs();
        offset.x < reach && offset.y < reach
    }

    fn is_dead(&self) -> bool {
        round_to(self.health, HEALTH_EPSILON_DIGITS) <= 0.0
    }
}

/// Represents the authoritative Swarm Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tick: Tick,
    player: Vec2,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
}

impl World {
    /// Creates a new world with the player at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tick: Tick::default(),
            player: Vec2::ZERO,
            enemies: Vec::new(),
            next_enemy_id: 0,
        }
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick = world.tick.next();
            out_events.push(Event::TimeAdvanced { tick: world.tick });

            let player = world.player;
            for enemy in &mut world.enemies {
                if !enemy.immobile {
                    enemy.step_towards(player);
                }
                if enemy.touches(player) {
                    out_events.push(Event::PlayerCaught { enemy: enemy.id });
                }
            }
        }
        Command::MovePlayer { position } => {
            world.player = position;
        }
        Command::SpawnEnemy {
            descriptor,
            immobile,
        } => {
            let id = world.allocate_enemy_id();
            world.enemies.push(Enemy::new(
                id,
                descriptor.position,
                descriptor.health,
                immobile,
            ));
            out_events.push(Event::EnemySpawned {
                enemy: id,
                position: descriptor.position,
                health: descriptor.health,
            });
        }
        Command::DamageEnemy {
            enemy,
            amount,
            source,
        } => {
            let Some(index) = world.enemy_index(enemy) else {
                return;
            };
            world.enemies[index].health -= amount;
            if world.enemies[index].is_dead() {
                let removed = world.enemies.remove(index);
                out_events.push(Event::EnemyKilled {
                    enemy: removed.id,
                    max_health: removed.max_health,
                    source,
                });
            }
        }
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Enemy, World};
    use swarm_defence_core::{Tick, Vec2};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Frame the world has advanced to.
    #[must_use]
    pub fn tick(world: &World) -> Tick {
        world.tick
    }

    /// Current location of the player.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player
    }

    /// Live enemies in creation order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Enemy closest to `position`, preferring the oldest on ties.
    #[must_use]
    pub fn nearest_enemy(world: &World, position: Vec2) -> Option<&Enemy> {
        let mut best: Option<(&Enemy, f64)> = None;
        for enemy in &world.enemies {
            let distance = enemy.position.distance_squared(position);
            let replace = match best {
                None => true,
                Some((_, best_distance)) => distance < best_distance,
            };
            if replace {
                best = Some((enemy, distance));
            }
        }
        best.map(|(enemy, _)| enemy)
    }
}
