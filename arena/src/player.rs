//! Player strategies: human, greedy heuristic, and the search AI.
//!
//! Every seat is driven through the same [`Strategy`] contract: given
//! the board and the turn context, produce one legal move. The match
//! loop trusts the returned move; an illegal one trips the board's
//! assertions, which is the intended failure mode for a buggy strategy.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use halma::{Board, Move, Player};
use mcts::{run_mcts, Evaluator, MctsConfig};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::display::render;

/// Per-turn information handed to strategies.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext {
    /// Moves played in the match so far.
    pub total_moves: u32,
    /// Whether strategies should narrate their choice.
    pub verbose: bool,
}

/// A seat's move-selection strategy.
pub trait Strategy {
    fn seat(&self) -> Player;

    /// Pick one legal move for this seat on the given board.
    fn decide_move(&mut self, board: &Board, ctx: &TurnContext) -> Result<Move>;
}

/// The kinds of players a seat can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Greedy,
    GreedyStochastic,
    Ai,
}

impl FromStr for PlayerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "h" => Ok(PlayerKind::Human),
            "greedy" | "g" => Ok(PlayerKind::Greedy),
            "greedy-stochastic" | "gs" => Ok(PlayerKind::GreedyStochastic),
            "ai" | "a" => Ok(PlayerKind::Ai),
            other => bail!("unknown player kind {other:?} (expected human, greedy, greedy-stochastic, or ai)"),
        }
    }
}

/// Interactive player reading moves from stdin in human coordinates.
pub struct HumanPlayer {
    seat: Player,
}

impl HumanPlayer {
    pub fn new(seat: Player) -> Self {
        Self { seat }
    }
}

/// Parse "from_row from_col to_row to_col" into two human coordinates.
pub fn parse_human_move(line: &str) -> Option<((u16, u16), (u16, u16))> {
    let mut nums = line.split_whitespace().map(|tok| tok.parse::<u16>());
    let mut next = || nums.next()?.ok();
    let parsed = ((next()?, next()?), (next()?, next()?));
    nums.next().is_none().then_some(parsed)
}

impl Strategy for HumanPlayer {
    fn seat(&self) -> Player {
        self.seat
    }

    fn decide_move(&mut self, board: &Board, ctx: &TurnContext) -> Result<Move> {
        let topo = board.topology();
        println!("{}", render(board));
        println!("Seat {} to move.", self.seat);

        let legal = board.legal_moves(self.seat);
        if ctx.verbose {
            for (from, dests) in &legal {
                if dests.is_empty() {
                    continue;
                }
                let mut human: Vec<(u16, u16)> = dests.iter().map(|&d| topo.to_human(d)).collect();
                human.sort_unstable();
                println!("Checker {:?} can move to: {:?}", topo.to_human(*from), human);
            }
        }

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            println!("Enter your move as: from_row from_col to_row to_col");
            print!("> ");
            io::stdout().flush().context("flushing prompt")?;

            let line = lines
                .next()
                .ok_or_else(|| anyhow!("input closed before a move was entered"))?
                .context("reading move")?;

            let Some((from_h, to_h)) = parse_human_move(&line) else {
                println!("Invalid move format, try again.");
                continue;
            };
            let (Some(from), Some(to)) = (topo.from_human(from_h), topo.from_human(to_h)) else {
                println!("Those coordinates are off the board, try again.");
                continue;
            };

            let allowed = legal
                .iter()
                .any(|(origin, dests)| *origin == from && dests.contains(&to));
            if allowed {
                return Ok(Move::new(from, to));
            }
            println!("Invalid move, try again.");
        }
    }
}

/// Heuristic player chasing the largest forward-progress move.
pub struct GreedyPlayer {
    seat: Player,
    /// Sample forward moves by their gain instead of taking the best.
    stochastic: bool,
    rng: ChaCha20Rng,
}

impl GreedyPlayer {
    pub fn new(seat: Player, stochastic: bool, rng: ChaCha20Rng) -> Self {
        Self { seat, stochastic, rng }
    }
}

impl Strategy for GreedyPlayer {
    fn seat(&self) -> Player {
        self.seat
    }

    fn decide_move(&mut self, board: &Board, ctx: &TurnContext) -> Result<Move> {
        let topo = board.topology();
        let moves = board.legal_move_list(self.seat);
        if moves.is_empty() {
            bail!("seat {} has no legal moves", self.seat);
        }

        let gains: Vec<f64> = moves
            .iter()
            .map(|mv| topo.progress_gain(mv.from, mv.to, self.seat))
            .collect();

        let pick = if self.stochastic {
            let forward: Vec<(usize, f64)> = gains
                .iter()
                .enumerate()
                .filter(|(_, g)| **g > 0.0)
                .map(|(i, g)| (i, *g))
                .collect();
            if forward.is_empty() {
                moves[self.rng.gen_range(0..moves.len())]
            } else {
                let total: f64 = forward.iter().map(|(_, g)| g).sum();
                let mut r = self.rng.gen::<f64>() * total;
                let mut choice = forward[forward.len() - 1].0;
                for (i, g) in forward {
                    if r < g {
                        choice = i;
                        break;
                    }
                    r -= g;
                }
                moves[choice]
            }
        } else {
            let best = gains.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let ties: Vec<usize> = gains
                .iter()
                .enumerate()
                .filter(|(_, g)| **g == best)
                .map(|(i, _)| i)
                .collect();
            moves[ties[self.rng.gen_range(0..ties.len())]]
        };

        if ctx.verbose {
            debug!(seat = self.seat, mv = %pick, "greedy move");
        }
        Ok(pick)
    }
}

/// Search-backed player.
///
/// Holds the oracle, the search configuration, and a seeded RNG for move
/// sampling. Once the match passes the configured ply threshold, the
/// temperature drops to zero and play becomes deterministic.
pub struct AiPlayer {
    seat: Player,
    evaluator: Arc<dyn Evaluator>,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl AiPlayer {
    pub fn new(seat: Player, evaluator: Arc<dyn Evaluator>, config: MctsConfig, rng: ChaCha20Rng) -> Self {
        Self {
            seat,
            evaluator,
            config,
            rng,
        }
    }
}

impl Strategy for AiPlayer {
    fn seat(&self) -> Player {
        self.seat
    }

    fn decide_move(&mut self, board: &Board, ctx: &TurnContext) -> Result<Move> {
        let mut config = self.config.clone();
        if ctx.total_moves >= config.temp_threshold && config.temperature > 0.0 {
            debug!(seat = self.seat, total_moves = ctx.total_moves, "temperature dropped to 0");
            config.temperature = 0.0;
        }

        let result = run_mcts(board, self.seat, self.evaluator.as_ref(), config, &mut self.rng)
            .with_context(|| format!("search failed for seat {}", self.seat))?;

        debug!(
            seat = self.seat,
            mv = %result.mv,
            value = result.value,
            simulations = result.simulations,
            "search selected move"
        );
        Ok(result.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::HeuristicOracle;
    use halma::Topology;
    use rand::SeedableRng;

    #[test]
    fn test_parse_human_move() {
        assert_eq!(parse_human_move("1 2 3 4"), Some(((1, 2), (3, 4))));
        assert_eq!(parse_human_move("  10 1   9 2 "), Some(((10, 1), (9, 2))));
        assert_eq!(parse_human_move("1 2 3"), None);
        assert_eq!(parse_human_move("1 2 3 4 5"), None);
        assert_eq!(parse_human_move("a b c d"), None);
        assert_eq!(parse_human_move(""), None);
    }

    #[test]
    fn test_player_kind_parsing() {
        assert_eq!("human".parse::<PlayerKind>().unwrap(), PlayerKind::Human);
        assert_eq!("G".parse::<PlayerKind>().unwrap(), PlayerKind::Greedy);
        assert_eq!("gs".parse::<PlayerKind>().unwrap(), PlayerKind::GreedyStochastic);
        assert_eq!("ai".parse::<PlayerKind>().unwrap(), PlayerKind::Ai);
        assert!("robot".parse::<PlayerKind>().is_err());
    }

    #[test]
    fn test_greedy_moves_forward_from_the_start() {
        let board = Board::new(Topology::two_seat());
        let mut player = GreedyPlayer::new(1, false, ChaCha20Rng::seed_from_u64(42));
        let ctx = TurnContext {
            total_moves: 0,
            verbose: false,
        };

        let mv = player.decide_move(&board, &ctx).unwrap();
        let topo = board.topology();
        assert!(topo.progress_gain(mv.from, mv.to, 1) > 0.0);
        assert!(board.legal_move_list(1).contains(&mv));
    }

    #[test]
    fn test_stochastic_greedy_only_plays_forward_when_possible() {
        let board = Board::new(Topology::two_seat());
        let topo = board.topology();
        let ctx = TurnContext {
            total_moves: 0,
            verbose: false,
        };

        for seed in 0..20 {
            let mut player = GreedyPlayer::new(1, true, ChaCha20Rng::seed_from_u64(seed));
            let mv = player.decide_move(&board, &ctx).unwrap();
            assert!(topo.progress_gain(mv.from, mv.to, 1) > 0.0);
        }
    }

    #[test]
    fn test_ai_player_returns_legal_move() {
        let board = Board::new(Topology::two_seat());
        let config = MctsConfig::for_testing();
        let mut player = AiPlayer::new(
            1,
            Arc::new(HeuristicOracle::new()),
            config,
            ChaCha20Rng::seed_from_u64(42),
        );
        let ctx = TurnContext {
            total_moves: 0,
            verbose: false,
        };

        let mv = player.decide_move(&board, &ctx).unwrap();
        assert!(board.legal_move_list(1).contains(&mv));
    }

    #[test]
    fn test_ai_switches_to_deterministic_past_threshold() {
        let board = Board::new(Topology::two_seat());
        let config = MctsConfig::for_testing()
            .with_simulations(60)
            .with_temperature(1.0)
            .with_temp_threshold(10);
        let ctx = TurnContext {
            total_moves: 50,
            verbose: false,
        };

        // Past the threshold every run must agree regardless of the
        // sampling RNG.
        let mut picks = std::collections::HashSet::new();
        for seed in 0..5 {
            let mut player = AiPlayer::new(
                1,
                Arc::new(HeuristicOracle::new()),
                config.clone(),
                ChaCha20Rng::seed_from_u64(seed),
            );
            picks.insert(player.decide_move(&board, &ctx).unwrap());
        }
        assert_eq!(picks.len(), 1);
    }
}
