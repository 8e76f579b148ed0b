use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use swarm_defence_core::{Command, DamageSource, EnemyDescriptor, Event, SpawnContext, Tick, Vec2};
use swarm_defence_system_spawning::{SpawnManager, SpawnTuning};
use swarm_defence_world::{self as world, query, World};

const KILL_INTERVAL: u64 = 15;
const TUTORIAL_TICKS: u64 = 30;
const ENABLE_DELAY: u64 = 20;

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(0x4d59_5df4_d0f3_3173, 900);
    let second = replay(0x4d59_5df4_d0f3_3173, 900);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(!first.spawns.is_empty(), "replay never spawned");
    assert!(first.player_kills > 0, "replay never killed");
    assert!(
        first
            .spawns
            .iter()
            .all(|spawn| spawn.tick >= TUTORIAL_TICKS + ENABLE_DELAY),
        "spawned before the gate opened"
    );
}

#[test]
fn different_seeds_diverge() {
    let first = replay(1, 600);
    let second = replay(2, 600);
    assert_ne!(first.spawns, second.spawns);
}

struct Session {
    world: World,
    rng: ChaCha8Rng,
    events: Vec<Event>,
}

impl SpawnContext for Session {
    fn current_tick(&self) -> Tick {
        query::tick(&self.world)
    }

    fn player_position(&self) -> Vec2 {
        query::player_position(&self.world)
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn create_enemy(&mut self, descriptor: EnemyDescriptor) {
        world::apply(
            &mut self.world,
            Command::SpawnEnemy {
                descriptor,
                immobile: false,
            },
            &mut self.events,
        );
    }
}

fn replay(seed: u64, ticks: u64) -> ReplayOutcome {
    let mut session = Session {
        world: World::new(),
        rng: ChaCha8Rng::seed_from_u64(seed),
        events: Vec::new(),
    };
    let tuning = SpawnTuning {
        initial_strength: 0.05,
        ..SpawnTuning::default()
    };
    let mut spawner = SpawnManager::new(tuning, &mut session.rng).expect("valid tuning");
    let mut spawns = Vec::new();
    let mut player_kills = 0;

    for _ in 0..ticks {
        world::apply(&mut session.world, Command::Tick, &mut session.events);
        let tick = query::tick(&session.world);

        if tick.get() == TUTORIAL_TICKS {
            let _ = spawner.enable(tick, ENABLE_DELAY);
        }

        if tick.get() % KILL_INTERVAL == 0 {
            let target = query::nearest_enemy(&session.world, query::player_position(&session.world))
                .map(|enemy| (enemy.id(), enemy.health()));
            if let Some((enemy, health)) = target {
                world::apply(
                    &mut session.world,
                    Command::DamageEnemy {
                        enemy,
                        amount: health,
                        source: DamageSource::Player,
                    },
                    &mut session.events,
                );
            }
        }

        let events = std::mem::take(&mut session.events);
        spawner.handle_events(&events);
        player_kills += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count();

        let _ = spawner.on_tick(&mut session);
        for event in session.events.drain(..) {
            if let Event::EnemySpawned {
                position, health, ..
            } = event
            {
                spawns.push(SpawnRecord {
                    tick: tick.get(),
                    x: position.x.to_bits(),
                    y: position.y.to_bits(),
                    health: health.to_bits(),
                });
            }
        }
    }

    ReplayOutcome {
        spawns,
        player_kills,
        strength: spawner.strength().to_bits(),
        points: spawner.points().to_bits(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    spawns: Vec<SpawnRecord>,
    player_kills: usize,
    strength: u64,
    points: u64,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SpawnRecord {
    tick: u64,
    x: u64,
    y: u64,
    health: u64,
}
