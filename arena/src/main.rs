//! Match runner for hex-grid jump checkers.
//!
//! Seats humans, greedy bots, and the search AI at one table and plays a
//! match to its outcome. Settings come from an optional TOML file,
//! `HALMA_*` environment variables, and CLI flags, in rising priority.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

mod config;
mod display;
mod game;
mod oracle;
mod player;

use crate::config::{load_config, ArenaConfig};
use crate::game::{Match, Outcome};
use crate::oracle::HeuristicOracle;
use crate::player::{AiPlayer, GreedyPlayer, HumanPlayer, PlayerKind, Strategy};

#[derive(Parser, Debug)]
#[command(name = "arena", about = "Hex-grid jump checkers between humans, greedy bots, and the search AI")]
struct Args {
    /// Path to a config file (skips the default search path)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board variant: "two" or "six"
    #[arg(long)]
    variant: Option<String>,

    /// Comma-separated player kinds per seat, e.g. "ai,greedy"
    #[arg(long)]
    players: Option<String>,

    /// Simulations per AI decision
    #[arg(long)]
    simulations: Option<u32>,

    /// Base RNG seed for a reproducible match
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the match after this many total moves (0 = no limit)
    #[arg(long)]
    move_limit: Option<u32>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Print boards and candidate moves during play
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn apply_cli_overrides(config: &mut ArenaConfig, args: &Args) {
    if let Some(variant) = &args.variant {
        config.variant = variant.clone();
    }
    if let Some(players) = &args.players {
        config.players = players.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(simulations) = args.simulations {
        config.mcts.num_simulations = simulations;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(limit) = args.move_limit {
        config.move_limit = limit;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
}

fn seat_rng(seed: Option<u64>, seat: u8) -> ChaCha20Rng {
    match seed {
        Some(base) => ChaCha20Rng::seed_from_u64(base.wrapping_add(seat as u64)),
        None => ChaCha20Rng::from_entropy(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref());
    apply_cli_overrides(&mut config, &args);
    let (variant, kinds) = config.validate()?;

    init_tracing(&config.log_level);
    info!(
        variant = %config.variant,
        players = ?config.players,
        simulations = config.mcts.num_simulations,
        "starting match"
    );

    let topo = variant.topology();
    let oracle: Arc<dyn mcts::Evaluator> = Arc::new(HeuristicOracle::new());

    let players: Vec<Box<dyn Strategy>> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let seat = i as u8 + 1;
            let boxed: Box<dyn Strategy> = match kind {
                PlayerKind::Human => Box::new(HumanPlayer::new(seat)),
                PlayerKind::Greedy => {
                    Box::new(GreedyPlayer::new(seat, false, seat_rng(config.seed, seat)))
                }
                PlayerKind::GreedyStochastic => {
                    Box::new(GreedyPlayer::new(seat, true, seat_rng(config.seed, seat)))
                }
                PlayerKind::Ai => Box::new(AiPlayer::new(
                    seat,
                    Arc::clone(&oracle),
                    config.mcts.to_config(),
                    seat_rng(config.seed, seat),
                )),
            };
            boxed
        })
        .collect();

    let mut game = Match::new(topo, players, config.move_limit, args.verbose);
    let outcome = game.run()?;

    if args.verbose {
        println!("{}", display::render(game.board()));
    }

    match outcome {
        Outcome::Winner(seat) => info!(seat, "seat {seat} wins"),
        Outcome::Repetition => info!("match drawn by repetition"),
        Outcome::MoveLimit => info!("match stopped at the move limit"),
    }

    Ok(())
}
