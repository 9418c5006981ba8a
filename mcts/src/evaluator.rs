//! The policy/value oracle consulted at tree leaves.
//!
//! The search asks the oracle for move priors and a scalar outcome
//! estimate for the player to move; in full-strength play this is a
//! neural network reading the board's history planes. The engine only
//! depends on the trait: it keeps whatever prior mass falls on legal
//! moves and renormalizes, and it treats a malformed answer as a fatal
//! error of the decision rather than substituting its own priors.

use std::collections::HashMap;

use halma::{Board, Move, Player};
use thiserror::Error;

/// Errors an oracle may report.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("invalid board state: {0}")]
    InvalidState(String),
}

/// One oracle answer: move priors and a value estimate.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Prior probability per move. Mass on moves that are not legal for
    /// the player is discarded by the engine; legal moves missing from
    /// the map count as zero.
    pub priors: HashMap<Move, f32>,

    /// Expected outcome for the player to move, in [-1, 1].
    pub value: f32,
}

/// A position evaluator.
///
/// Implementations range from a learned model reading
/// [`Board::encode_planes`] output to the uniform stub below.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, player: Player) -> Result<Evaluation, EvaluatorError>;
}

/// Uniform priors over legal moves and a neutral value. Lets the search
/// run without a model; used throughout the tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, board: &Board, player: Player) -> Result<Evaluation, EvaluatorError> {
        let legal = board.legal_move_list(player);
        let mut priors = HashMap::with_capacity(legal.len());
        if !legal.is_empty() {
            let p = 1.0 / legal.len() as f32;
            for mv in legal {
                priors.insert(mv, p);
            }
        }
        Ok(Evaluation { priors, value: 0.0 })
    }
}
