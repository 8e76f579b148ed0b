//! Frame loop wiring the world, a scripted player and the spawner together.

use std::fmt;

use anyhow::Result;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swarm_defence_core::{Command, DamageSource, EnemyDescriptor, Event, SpawnContext, Tick, Vec2};
use swarm_defence_system_spawning::{SpawnManager, SpawnTuning};
use swarm_defence_world::{self as world, query, World};

/// Seed used when none is supplied.
pub(crate) const DEFAULT_SEED: u64 = 0x5eed;
/// Frames simulated when no length is supplied.
pub(crate) const DEFAULT_TICKS: u64 = 3_600;
/// Frames between scripted player kills when no interval is supplied.
pub(crate) const DEFAULT_KILL_INTERVAL: u64 = 20;

/// Parameters of a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SimulationConfig {
    /// Seed for the shared random source.
    pub(crate) seed: u64,
    /// First frame at which spawning is requested.
    pub(crate) enable_at: Tick,
    /// Frames between the request and the first spawn-capable tick.
    pub(crate) enable_delay: u64,
    /// Frames between scripted player kills; zero disables them.
    pub(crate) kill_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            enable_at: Tick::default(),
            enable_delay: 0,
            kill_interval: DEFAULT_KILL_INTERVAL,
        }
    }
}

/// Host state handed to the spawner each frame.
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

/// Headless game driven one frame at a time.
pub(crate) struct Simulation {
    config: SimulationConfig,
    session: Session,
    spawner: SpawnManager,
    enable_requested: bool,
    spawned: usize,
    player_kills: usize,
    caught_at: Option<Tick>,
}

impl Simulation {
    /// Creates a simulation whose spawner uses the provided tuning.
    pub(crate) fn new(config: SimulationConfig, tuning: SpawnTuning) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let spawner = SpawnManager::new(tuning, &mut rng)?;
        Ok(Self {
            config,
            session: Session {
                world: World::new(),
                rng,
                events: Vec::new(),
            },
            spawner,
            enable_requested: false,
            spawned: 0,
            player_kills: 0,
            caught_at: None,
        })
    }

    /// Banner greeting the player.
    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.session.world)
    }

    /// Runs until `ticks` frames elapsed or an enemy reaches the player.
    pub(crate) fn run(&mut self, ticks: u64) -> Summary {
        for _ in 0..ticks {
            if !self.step() {
                break;
            }
        }
        self.summary()
    }

    /// Simulates one frame, returning whether the player is still alive.
    fn step(&mut self) -> bool {
        let now = query::tick(&self.session.world);
        if !self.enable_requested && now >= self.config.enable_at {
            self.enable_requested = true;
            if !self.spawner.enable(now, self.config.enable_delay) {
                tracing::info!(
                    tick = now.get(),
                    delay = self.config.enable_delay,
                    "enemy spawning scheduled"
                );
            }
        }

        world::apply(
            &mut self.session.world,
            Command::Tick,
            &mut self.session.events,
        );
        let tick = query::tick(&self.session.world);

        if self.config.kill_interval > 0 && tick.get() % self.config.kill_interval == 0 {
            self.kill_nearest_enemy();
        }

        let events = std::mem::take(&mut self.session.events);
        for event in &events {
            match event {
                Event::EnemyKilled { source, .. } if source.is_player() => {
                    self.player_kills += 1;
                }
                Event::PlayerCaught { enemy } if self.caught_at.is_none() => {
                    tracing::info!(tick = tick.get(), enemy = enemy.get(), "player caught");
                    self.caught_at = Some(tick);
                }
                _ => {}
            }
        }
        self.spawner.handle_events(&events);
        if self.caught_at.is_some() {
            return false;
        }

        let encounters = self.spawner.on_tick(&mut self.session);
        let spawned = self
            .session
            .events
            .drain(..)
            .filter(|event| matches!(event, Event::EnemySpawned { .. }))
            .count();
        self.spawned += spawned;
        if encounters > 0 {
            tracing::debug!(
                tick = tick.get(),
                encounters,
                spawned,
                strength = self.spawner.strength(),
                "spawner realized encounters"
            );
        }
        true
    }

    fn kill_nearest_enemy(&mut self) {
        let state = &self.session.world;
        let Some((enemy, health)) = query::nearest_enemy(state, query::player_position(state))
            .map(|enemy| (enemy.id(), enemy.health()))
        else {
            return;
        };
        world::apply(
            &mut self.session.world,
            Command::DamageEnemy {
                enemy,
                amount: health,
                source: DamageSource::Player,
            },
            &mut self.session.events,
        );
    }

    fn summary(&self) -> Summary {
        Summary {
            ticks: query::tick(&self.session.world),
            strength: self.spawner.strength(),
            points: self.spawner.points(),
            enabled: self.spawner.is_enabled(),
            spawned: self.spawned,
            player_kills: self.player_kills,
            alive: query::enemy_count(&self.session.world),
            caught_at: self.caught_at,
        }
    }
}

/// Telemetry reported at the end of a run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    ticks: Tick,
    strength: f64,
    points: f64,
    enabled: bool,
    spawned: usize,
    player_kills: usize,
    alive: usize,
    caught_at: Option<Tick>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks simulated: {}", self.ticks.get())?;
        writeln!(f, "spawning enabled: {}", self.enabled)?;
        writeln!(f, "strength: {:.5}", self.strength)?;
        writeln!(f, "unspent points: {:.3}", self.points)?;
        writeln!(f, "enemies spawned: {}", self.spawned)?;
        writeln!(f, "enemies killed: {}", self.player_kills)?;
        write!(f, "enemies alive: {}", self.alive)?;
        if let Some(tick) = self.caught_at {
            write!(f, "\nGame over at tick {}", tick.get())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enable_at: u64) -> SimulationConfig {
        SimulationConfig {
            seed: 0x1234_5678,
            enable_at: Tick::new(enable_at),
            enable_delay: 10,
            kill_interval: 12,
        }
    }

    #[test]
    fn runs_are_reproducible_for_a_seed() {
        let first = Simulation::new(config(5), SpawnTuning::default())
            .expect("valid")
            .run(2_000);
        let second = Simulation::new(config(5), SpawnTuning::default())
            .expect("valid")
            .run(2_000);
        assert_eq!(first, second);
        assert!(first.spawned > 0);
    }

    #[test]
    fn nothing_spawns_before_enable_request() {
        let mut simulation =
            Simulation::new(config(500), SpawnTuning::default()).expect("valid tuning");
        let summary = simulation.run(400);
        assert!(!summary.enabled);
        assert_eq!(summary.spawned, 0);
        assert_eq!(summary.strength, 0.005);
    }

    #[test]
    fn default_run_enables_spawning_from_the_first_frame() {
        let mut simulation = Simulation::new(SimulationConfig::default(), SpawnTuning::default())
            .expect("default tuning is valid");
        let summary = simulation.run(DEFAULT_TICKS);
        assert!(summary.enabled, "spawning never enabled");
        assert!(summary.spawned > 0, "nothing spawned in a default run");
    }

    #[test]
    fn enable_request_fires_once_at_the_configured_frame() {
        let mut simulation =
            Simulation::new(config(30), SpawnTuning::default()).expect("valid tuning");
        let _ = simulation.run(30);
        assert_eq!(simulation.spawner.enable_after(), None);

        let _ = simulation.run(1);
        assert_eq!(simulation.spawner.enable_after(), Some(Tick::new(40)));

        let _ = simulation.run(50);
        assert!(simulation.spawner.is_enabled());
        assert_eq!(simulation.spawner.enable_after(), Some(Tick::new(40)));
    }

    #[test]
    fn invalid_tuning_fails_to_start() {
        let tuning = SpawnTuning {
            initial_strength: 0.0,
            ..SpawnTuning::default()
        };
        assert!(Simulation::new(config(0), tuning).is_err());
    }

    #[test]
    fn summary_reports_game_over() {
        let summary = Summary {
            ticks: Tick::new(90),
            strength: 0.01,
            points: 0.5,
            enabled: true,
            spawned: 3,
            player_kills: 1,
            alive: 2,
            caught_at: Some(Tick::new(90)),
        };
        assert!(summary.to_string().ends_with("Game over at tick 90"));
    }
}
