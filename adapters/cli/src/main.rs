#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Swarm Defence simulation.

mod simulation;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use swarm_defence_core::Tick;
use swarm_defence_system_spawning::SpawnTuning;

use crate::simulation::{
    Simulation, SimulationConfig, DEFAULT_KILL_INTERVAL, DEFAULT_SEED, DEFAULT_TICKS,
};

/// Headless driver for the Swarm Defence spawner.
#[derive(Debug, Parser)]
#[command(name = "swarm-defence", version, about)]
struct Args {
    /// Seed for every random spawn decision.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    /// TOML file overriding spawner tuning knobs.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Frame at which the player finishes the tutorial and spawning is requested; zero requests it immediately.
    #[arg(long, default_value_t = 0)]
    enable_at: u64,
    /// Frames to wait after the request before enemies start spawning.
    #[arg(long, default_value_t = 0)]
    enable_delay: u64,
    /// The player destroys the nearest enemy every this many frames; zero disables it.
    #[arg(long, default_value_t = DEFAULT_KILL_INTERVAL)]
    kill_interval: u64,
    /// Most verbose log level that is printed.
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

/// Entry point for the Swarm Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .init();

    let tuning = match args.tuning.as_deref() {
        Some(path) => load_tuning(path)?,
        None => SpawnTuning::default(),
    };

    let config = SimulationConfig {
        seed: args.seed,
        enable_at: Tick::new(args.enable_at),
        enable_delay: args.enable_delay,
        kill_interval: args.kill_interval,
    };
    let mut simulation =
        Simulation::new(config, tuning).context("failed to initialise simulation")?;

    println!("{}", simulation.banner());
    let summary = simulation.run(args.ticks);
    println!("{summary}");
    Ok(())
}

fn load_tuning(path: &Path) -> Result<SpawnTuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read spawn tuning at {}", path.display()))?;
    SpawnTuning::from_toml(&contents)
        .with_context(|| format!("invalid spawn tuning in {}", path.display()))
}
