// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rangefinder CLI entrypoint.
//!
//! Developer-facing commands for the rangefinder sensor:
//! - `simulate` replays a vertical descent over the demo body and prints one
//!   reading per tick.
//! - `init-config` writes the default sensor config.
//! - `show-config` prints the effective config as JSON.
//!
//! # Usage
//! ```text
//! rangefinder <command> [options]
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).
// The CLI is expected to print to stdout.
#![allow(clippy::print_stdout)]

mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rangefinder_config_fs::FsConfigStore;
use rangefinder_core::{ConfigService, SensorConfig, SENSOR_CONFIG_KEY};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::simulate::{render, Scenario};

#[derive(Parser, Debug)]
#[command(name = "rangefinder", author, version, about = "Rangefinder sensor developer tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a descent over the demo body, one table row per tick.
    Simulate(SimulateArgs),
    /// Write the default sensor config.
    InitConfig(DirArgs),
    /// Print the effective sensor config as JSON.
    ShowConfig(DirArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of host ticks to replay.
    #[arg(long, default_value_t = 20)]
    ticks: u32,
    /// Starting altitude above the demo body's reference radius (metres).
    #[arg(long, default_value_t = 30_000.0)]
    altitude: f64,
    /// Metres descended per tick.
    #[arg(long, default_value_t = 1_500.0)]
    descent_rate: f64,
    /// Override the stored time budget fraction (0–1).
    #[arg(long)]
    budget_fraction: Option<f64>,
    /// Config directory (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DirArgs {
    /// Config directory (defaults to the platform config dir).
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => run_simulate(args),
        Commands::InitConfig(args) => run_init_config(args.dir.as_deref()),
        Commands::ShowConfig(args) => run_show_config(args.dir.as_deref()),
    }
}

fn open_store(dir: Option<&Path>) -> Result<FsConfigStore> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    store.context("failed to open config directory")
}

fn load_config(dir: Option<&Path>) -> Result<SensorConfig> {
    ConfigService::new(open_store(dir)?)
        .sensor_config()
        .context("failed to load sensor config")
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let scenario = Scenario {
        ticks: args.ticks,
        altitude: args.altitude,
        descent_rate: args.descent_rate,
        budget_fraction: args.budget_fraction,
    };
    let rows = scenario.run(config)?;
    println!("{}", render(&rows));
    Ok(())
}

fn run_init_config(dir: Option<&Path>) -> Result<()> {
    let store = open_store(dir)?;
    let path = store.path_for(SENSOR_CONFIG_KEY);
    ConfigService::new(store)
        .save(SENSOR_CONFIG_KEY, &SensorConfig::default())
        .context("failed to write sensor config")?;
    info!(path = %path.display(), "wrote default sensor config");
    println!("{}", path.display());
    Ok(())
}

fn run_show_config(dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
