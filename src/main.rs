//! Command-line front door for the CPU opponent
//!
//! Builds a position from a FEN and/or a list of UCI moves, asks the worker
//! for the CPU's reply and prints the move report as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chess_engine::{is_terminal, replay_uci, Position, SearchRequest};
use clap::Parser;
use cpu_opponent::telemetry::init_tracing;
use cpu_opponent::{CpuWorker, OpponentConfig};

#[derive(Parser, Debug)]
#[command(name = "cpu_opponent")]
#[command(about = "Pick the CPU opponent's move for a chess position", long_about = None)]
struct Args {
    /// Starting position (defaults to the standard start position)
    #[arg(long)]
    fen: Option<String>,

    /// Moves played from the starting position, in UCI notation
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,

    /// CPU level, 1-10
    #[arg(short, long, default_value_t = 5)]
    level: i32,

    /// Full move number used for the opening book (defaults to the position's)
    #[arg(long)]
    move_number: Option<u32>,

    /// Per-request budget override in milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Config file (defaults to the user's config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => OpponentConfig::load_from(path)?,
        None => OpponentConfig::load_or_default()?,
    };

    let start = match &args.fen {
        Some(fen) => Position::from_fen(fen).context("invalid --fen")?,
        None => Position::startpos(),
    };
    let (position, history) =
        replay_uci(&start, args.moves.as_slice()).context("invalid --moves")?;

    let state = is_terminal(&position, &history);
    if state.is_over() {
        bail!("game is already over ({state:?}) at {}", position.to_fen());
    }

    let move_number = args
        .move_number
        .unwrap_or_else(|| position.fullmove_number());
    let mut request = SearchRequest::new(position, args.level, move_number).with_history(history);
    if let Some(budget_ms) = args.budget_ms {
        request = request.with_budget_override(budget_ms);
    }

    let worker = CpuWorker::spawn(config.selector())?;
    let result = worker
        .submit(request)?
        .wait()
        .context("CPU move request failed")?;

    println!("{}", serde_json::to_string_pretty(&result.report())?);
    Ok(())
}
