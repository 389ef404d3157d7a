//! Arena match driver.
//!
//! Each positional argument is a bot command, run through `sh -c`; the n-th
//! command plays as player n. Every `--spawn-every` turns a wave of
//! `--spawn-batch` robots per player enters the arena, and the match ends
//! after `--turns` turns.
//!
//! ```bash
//! cargo run -p arena-client -- "python3 bots/chaser.py" "./target/release/rustbot"
//! ```
//!
//! Arena rules (map size, damage, reply timeout, starting hp, seed) come from
//! `ARENA_*` environment variables, optionally loaded from a `.env` file.
mod driver;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use arena_runtime::{ActorCommand, Arena, ArenaConfig, LogTracer, MapTracer};
use clap::{Parser, ValueEnum};

use driver::Schedule;

/// Run a match between bot programs
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(about = "Run a turn-based robot arena between bot programs")]
struct Args {
    /// Bot commands, one per player, each run through `sh -c`
    #[arg(required = true)]
    bots: Vec<String>,

    /// Number of turns to play
    #[arg(long, default_value_t = 100)]
    turns: u64,

    /// Turns between spawn waves (0: spawn only before the first turn)
    #[arg(long, default_value_t = 10)]
    spawn_every: u64,

    /// Robots launched per player in each wave
    #[arg(long, default_value_t = 5)]
    spawn_batch: usize,

    /// Pause after every turn, in milliseconds
    #[arg(long, default_value_t = 0)]
    turn_delay_ms: u64,

    /// How to show the match as it runs
    #[arg(long, value_enum, default_value_t = Tracer::Map)]
    tracer: Tracer,

    /// Directory for the log file (default: platform cache directory)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Random seed for deterministic runs (overrides ARENA_SEED)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Tracer {
    /// Draw the board on stdout after every turn
    Map,
    /// Log every event
    Log,
    /// No match output
    None,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _log_guard = logging::setup_logging(args.log_dir.as_deref())?;

    let mut config = ArenaConfig::from_env();
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    tracing::info!(?config, players = args.bots.len(), "Starting arena");

    let builder = Arena::builder().config(config);
    let builder = match args.tracer {
        Tracer::Map => builder.observer(MapTracer::new(std::io::stdout())),
        Tracer::Log => builder.observer(LogTracer),
        Tracer::None => builder,
    };
    let mut arena = builder.build()?;

    let players: Vec<ActorCommand> = args.bots.iter().map(ActorCommand::shell).collect();
    let schedule = Schedule {
        turns: args.turns,
        spawn_every: args.spawn_every,
        spawn_batch: args.spawn_batch,
        turn_delay: Duration::from_millis(args.turn_delay_ms),
    };

    let survivors = driver::run(&mut arena, &players, &schedule).await;

    for (player, count) in &survivors {
        println!("{player}: {count} robot(s) standing");
    }
    tracing::info!("Match finished after {} turns", arena.turn());
    Ok(())
}
