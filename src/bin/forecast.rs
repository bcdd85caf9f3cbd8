use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use puckcast::data::{self, TeamRegistry};
use puckcast::forecast::{self, Config};
use puckcast::model::DEFAULT_DECAY;
use puckcast::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the league snapshot from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// season whose banked points seed the projection
    #[clap(long)]
    season: u16,

    /// as-of date stamped on the output tables; defaults to today
    #[clap(long)]
    as_of: Option<NaiveDate>,

    /// decay constant applied to game recency
    #[clap(long, default_value_t = DEFAULT_DECAY)]
    decay: f64,

    /// posterior draws to retain
    #[clap(long, default_value_t = 2_000)]
    draws: usize,

    /// warmup iterations before draws are retained
    #[clap(long, default_value_t = 1_000)]
    warmup: usize,

    /// seed shared by the sampler and the simulators
    #[clap(long, default_value_t = 0)]
    seed: u64,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if !self.file.is_file() {
            bail!("snapshot file {} does not exist", self.file.display());
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let snapshot = data::read_from_file(&args.file)?;
    info!(
        "loaded {} teams, {} completed games, {} remaining fixtures",
        snapshot.teams.len(),
        snapshot.games.len(),
        snapshot.fixtures.len()
    );
    let registry = TeamRegistry::from(snapshot.teams);
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let config = Config {
        decay: args.decay,
        warmup: args.warmup,
        draws: args.draws,
        seed: args.seed,
        ..Config::new(args.season)
    };
    let outcome = forecast::run(&snapshot.games, &snapshot.fixtures, &registry, as_of, &config)?;

    info!(
        "Ratings:\n{}",
        Console::default().render(&print::tabulate_ratings(&outcome.ratings))
    );
    info!(
        "Projected points:\n{}",
        Console::default().render(&print::tabulate_projections(&outcome.projections))
    );
    Ok(())
}
