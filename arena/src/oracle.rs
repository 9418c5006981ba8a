//! A model-free oracle built from the board's progress heuristic.
//!
//! Lets the search AI play out of the box: priors are proportional to
//! each move's forward progress, and the value estimate is the progress
//! differential between the seat to move and its best-placed opponent.
//! A learned evaluator plugs into the same trait and replaces this one
//! wholesale.

use std::collections::HashMap;

use halma::{Board, Player};
use mcts::{Evaluation, Evaluator, EvaluatorError};

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicOracle;

impl HeuristicOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for HeuristicOracle {
    fn evaluate(&self, board: &Board, player: Player) -> Result<Evaluation, EvaluatorError> {
        let topo = board.topology();
        let legal = board.legal_move_list(player);

        let gains: Vec<f64> = legal
            .iter()
            .map(|mv| topo.progress_gain(mv.from, mv.to, player))
            .collect();
        let forward_total: f64 = gains.iter().filter(|g| **g > 0.0).sum();

        let mut priors = HashMap::with_capacity(legal.len());
        if forward_total > 0.0 {
            for (mv, gain) in legal.iter().zip(&gains) {
                priors.insert(*mv, (gain.max(0.0) / forward_total) as f32);
            }
        } else if !legal.is_empty() {
            // Nothing makes progress; fall back to a flat prior.
            let p = 1.0 / legal.len() as f32;
            for mv in &legal {
                priors.insert(*mv, p);
            }
        }

        // Progress differential against the strongest opponent, already
        // bounded to [-1, 1].
        let per_seat = topo.checkers_per_player() as f32;
        let own = board.progress(player) as f32 / per_seat;
        let best_opponent = (1..=topo.seats())
            .filter(|&seat| seat != player)
            .map(|seat| board.progress(seat) as f32 / per_seat)
            .fold(0.0, f32::max);

        Ok(Evaluation {
            priors,
            value: own - best_opponent,
        })
    }
}
