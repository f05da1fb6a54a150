#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays scripted Resort Tycoon sessions headlessly.

mod report;
mod scenario;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{info, LevelFilter};
use resort_tycoon_core::{Catalog, CatalogItem, SimulationConfig};
use resort_tycoon_session::Session;
use resort_tycoon_world::{query, World};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use report::RunReport;
use scenario::{Scenario, STARTER};

/// Headless Resort Tycoon simulation.
#[derive(Debug, Parser)]
#[command(name = "resort-tycoon", version, about)]
struct Cli {
    /// Raises log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Plays a scenario and prints a summary of the resort.
    Run(RunArgs),
    /// Lists every buildable item.
    Catalog(CatalogArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Simulation configuration in TOML.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Catalog in TOML, as a list of `[[items]]` tables.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Scenario in TOML. Defaults to the bundled starter resort.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,
    /// Seed as a number or any phrase, which is hashed.
    #[arg(long)]
    seed: Option<String>,
    /// Prints the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Catalog in TOML, as a list of `[[items]]` tables.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    items: Vec<CatalogItem>,
}

/// Entry point for the Resort Tycoon command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        CliCommand::Run(args) => run(&args),
        CliCommand::Catalog(args) => list_catalog(&args),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: &RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(phrase) = &args.seed {
        config.rng_seed = seed_from_phrase(phrase);
    }
    let seed = config.rng_seed;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let scenario = match &args.scenario {
        Some(path) => {
            let source = read(path)?;
            Scenario::from_toml(&source)
                .with_context(|| format!("parsing scenario {}", path.display()))?
        }
        None => Scenario::from_toml(STARTER).context("parsing the bundled scenario")?,
    };

    let mut session = Session::new(config, catalog);
    info!("{}", session.welcome_banner());
    let rejected = scenario.play(&mut session);
    let events = session.take_events();
    let report = RunReport::collect(&session, seed, &events, rejected);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialising the run report")?
        );
    } else {
        println!("{}", session.welcome_banner());
        println!("{report}");
    }
    Ok(())
}

fn list_catalog(args: &CatalogArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let world = World::with_config(SimulationConfig::default(), catalog);
    println!(
        "{:<18} {:<18} {:>6} {:>5} {:>7} {:>7} {:>7} {:>6}",
        "id", "name", "cost", "level", "income", "upkeep", "happy", "guests"
    );
    for item in query::catalog(&world).iter() {
        let Some(stats) = query::item_stats(&world, item.kind) else {
            continue;
        };
        println!(
            "{:<18} {:<18} {:>6} {:>5} {:>7.2} {:>7.2} {:>+7.1} {:>6}",
            item.kind.id(),
            item.name,
            item.cost,
            item.unlock_level,
            stats.income_per_sec,
            stats.upkeep_per_sec,
            stats.happiness_impact,
            stats.guests
        );
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let source = read(path)?;
    toml::from_str(&source).with_context(|| format!("parsing config {}", path.display()))
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::standard());
    };
    let source = read(path)?;
    let document: CatalogDocument =
        toml::from_str(&source).with_context(|| format!("parsing catalog {}", path.display()))?;
    Catalog::new(document.items).with_context(|| format!("validating catalog {}", path.display()))
}

/// Numeric seeds are used as-is; anything else is hashed.
fn seed_from_phrase(phrase: &str) -> u64 {
    if let Ok(seed) = phrase.trim().parse::<u64>() {
        return seed;
    }
    let digest = Sha256::digest(phrase.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
