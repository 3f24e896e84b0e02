mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use countryguessr_core::{Catalog, RoundController, RoundEvent, RoundOptions};
use tracing::trace;
use tracing_subscriber::EnvFilter;

/// Guess the country behind the flag.
#[derive(Debug, Parser)]
#[command(name = "countryguessr", version)]
struct Args {
    /// Country data file; defaults to config/countrydata.json, then the bundled copy.
    #[arg(long, env = "COUNTRYGUESSR_CATALOG")]
    catalog: Option<PathBuf>,

    /// Seed for target selection, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Only report the distance for wrong guesses.
    #[arg(long)]
    no_bearing: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let catalog = Arc::new(load_catalog(args.catalog)?);
    let options = RoundOptions {
        report_bearing: !args.no_bearing,
    };
    let mut round = match args.seed {
        Some(seed) => RoundController::with_seed(catalog, seed),
        None => RoundController::new(catalog),
    }
    .with_options(options);
    round.subscribe(|event: &RoundEvent| trace!(?event, "round event"));

    cli::run(&mut round)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(explicit: Option<PathBuf>) -> Result<Catalog> {
    let path = match explicit {
        Some(path) => Some(path),
        None => resolve_default_path()?,
    };

    match path {
        Some(path) => Catalog::load_from_path(&path).with_context(|| {
            format!("failed to load country data file: {}", path.display())
        }),
        None => Catalog::bundled().context("bundled country data is invalid"),
    }
}

fn resolve_default_path() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    let candidate = cwd.join("config").join("countrydata.json");
    Ok(candidate.exists().then_some(candidate))
}
