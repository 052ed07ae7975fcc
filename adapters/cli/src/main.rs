#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the dungeon simulation headless.

mod ascii;
mod files;
mod script;

use std::{fs, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_crawler_assets::{catalog, AssetCache};
use dungeon_crawler_simulation::{run, FixedClock, Simulation, SimulationConfig};
use dungeon_crawler_world::{query, REFERENCE_LEVEL};
use log::{info, warn};

use crate::{ascii::AsciiRenderer, files::DirectoryProvider, script::ScriptedInput};

#[derive(Debug, Parser)]
#[command(name = "dungeon-crawler")]
#[command(about = "Runs the dungeon simulation with scripted input and a text renderer")]
struct Cli {
    /// TOML file with simulation settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level file; the bundled level is used when absent.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,

    /// Input script such as `right:30,down+attack:10,escape:1`.
    #[arg(long, default_value = "")]
    script: String,

    /// Directory the texture paths are resolved against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Print every n-th frame; 0 prints only the summary.
    #[arg(long, default_value_t = 0)]
    print_every: u64,
}

/// Entry point for the dungeon crawler command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SimulationConfig::from_toml_str(&contents)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let level = match &cli.level {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?,
        None => REFERENCE_LEVEL.to_owned(),
    };

    let mut input = ScriptedInput::parse(&cli.script).context("invalid input script")?;
    let mut assets = AssetCache::new(DirectoryProvider::new(&cli.assets));
    let missing = assets.preload(catalog());
    if missing > 0 {
        warn!(
            "{missing} assets missing under {}; they will not be drawn",
            cli.assets.display()
        );
    }
    info!(
        "loaded {} assets ({} bytes)",
        assets.len(),
        assets.provider().bytes_loaded()
    );

    let mut simulation = Simulation::new(config);
    simulation
        .load_level(&level)
        .context("failed to load level")?;

    let mut renderer = AsciiRenderer::new(io::stdout().lock(), cli.print_every);
    let ticks = run(
        &mut simulation,
        &mut input,
        &mut FixedClock::new(Duration::from_millis(cli.step_ms)),
        &mut renderer,
        &assets,
        Some(cli.ticks),
    )?;

    let world = simulation.world();
    let progress = query::progress(world);
    let health = query::player(world).map_or(0, |player| player.stats.health);
    println!(
        "ticks {ticks} | frames {} | health {health} | gold {} | score {} | key {} | slain {}",
        renderer.frames(),
        progress.gold,
        progress.score,
        progress.key_collected,
        progress.enemies_slain,
    );
    Ok(())
}
