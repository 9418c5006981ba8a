//! Search implementation.
//!
//! One decision builds one tree. Each simulation runs the usual four
//! phases:
//! 1. Selection: descend from the root by the PUCT score to a leaf
//! 2. Expansion: create one child per legal move, with oracle priors
//! 3. Evaluation: take the oracle's value estimate for the leaf
//! 4. Backpropagation: push the value back to the root, negating per ply
//!
//! The returned [`SearchResult`] carries both the sampled move and the
//! full visit-count distribution, which doubles as a training target.

use halma::{Board, Move, Player};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Value of a decided position from the perspective of the side to move
/// there: the previous move ended the game, so that side has lost.
const LOSS_VALUE: f32 = -1.0;

/// Errors that can abort a decision.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("no legal moves at the search root")]
    NoLegalMoves,

    #[error("oracle returned unusable priors: {0}")]
    InvalidPriors(String),

    #[error("oracle returned unusable value: {0}")]
    InvalidValue(f32),
}

/// Result of one decision.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The move sampled from `pi`.
    pub mv: Move,

    /// Visit-count distribution over the root's legal moves. Sums to 1;
    /// moves not listed are illegal and carry zero mass.
    pub pi: Vec<(Move, f32)>,

    /// Mean value at the root after the search.
    pub value: f32,

    /// Number of simulations performed.
    pub simulations: u32,
}

/// Search state for one decision.
pub struct MctsSearch<'a, E: Evaluator + ?Sized> {
    tree: MctsTree,
    evaluator: &'a E,
    config: MctsConfig,
}

impl<'a, E: Evaluator + ?Sized> MctsSearch<'a, E> {
    /// Create a search rooted at the given position.
    pub fn new(board: &Board, to_move: Player, evaluator: &'a E, config: MctsConfig) -> Self {
        Self {
            tree: MctsTree::new(board.clone(), to_move),
            evaluator,
            config,
        }
    }

    /// Run the configured number of simulations and pick a move.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let root = self.tree.root();
        if !self.tree.get(root).is_expanded() {
            self.expand_node(root)?;
        }
        if self.tree.get(root).children.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        if self.config.dirichlet_alpha > 0.0 {
            self.add_dirichlet_noise(rng);
        }

        for _ in 0..self.config.num_simulations {
            self.simulate()?;
        }

        let pi = self.tree.root_policy(self.config.temperature);
        let mv = if self.config.temperature < 1e-6 {
            self.tree.best_move().ok_or(SearchError::NoLegalMoves)?
        } else {
            sample_move(&pi, rng)?
        };

        let root = self.tree.get(self.tree.root());
        let stats = self.tree.stats();
        debug!(
            nodes = stats.total_nodes,
            depth = stats.max_depth,
            value = root.mean_value(),
            %mv,
            "search complete"
        );

        Ok(SearchResult {
            mv,
            pi,
            value: root.mean_value(),
            simulations: root.visit_count,
        })
    }

    /// One simulation: select, expand/evaluate, backpropagate.
    fn simulate(&mut self) -> Result<(), SearchError> {
        let leaf_id = self.select();
        let leaf = self.tree.get(leaf_id);

        let value = if leaf.is_terminal {
            leaf.terminal_value
        } else {
            self.expand_node(leaf_id)?
        };

        self.tree.backpropagate(leaf_id, value);

        trace!(leaf = leaf_id.0, value, "simulation complete");
        Ok(())
    }

    /// Descend from the root to a terminal or unexpanded node.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.is_expanded() {
                return current;
            }
            match self.tree.select_child(current, self.config.c_puct) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Expand a node and return the value to backpropagate for it.
    ///
    /// The oracle is consulted once; its prior mass on legal moves is
    /// renormalized and one child is created per legal move. A node with
    /// no legal moves is an immediate loss for the side to move. A
    /// malformed oracle answer aborts the decision.
    fn expand_node(&mut self, node_id: NodeId) -> Result<f32, SearchError> {
        let node = self.tree.get(node_id);
        if node.is_terminal {
            return Ok(node.terminal_value);
        }

        let board = node.board.clone();
        let player = node.to_move;

        let legal = board.legal_move_list(player);
        if legal.is_empty() {
            let node = self.tree.get_mut(node_id);
            node.is_terminal = true;
            node.terminal_value = LOSS_VALUE;
            return Ok(LOSS_VALUE);
        }

        let eval = self.evaluator.evaluate(&board, player)?;
        if !eval.value.is_finite() || !(-1.0..=1.0).contains(&eval.value) {
            return Err(SearchError::InvalidValue(eval.value));
        }

        // Keep only the mass on legal moves and renormalize.
        let mut priors: Vec<f32> = legal
            .iter()
            .map(|mv| eval.priors.get(mv).copied().unwrap_or(0.0))
            .collect();
        if priors.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(SearchError::InvalidPriors(
                "negative or non-finite prior".to_string(),
            ));
        }
        let total: f32 = priors.iter().sum();
        if total <= 0.0 {
            return Err(SearchError::InvalidPriors(
                "no prior mass on any legal move".to_string(),
            ));
        }
        for p in &mut priors {
            *p /= total;
        }

        for (mv, prior) in legal.into_iter().zip(priors) {
            let mut child_board = board.clone();
            let winner = child_board.place(player, mv);
            let to_move = child_board.topology().next_seat(player);
            // A winning move decides the game for the mover; the child
            // stores the loss from its own to-move perspective and the
            // oracle is never consulted there.
            let is_terminal = winner.is_some();
            self.tree.add_child(
                node_id,
                mv,
                prior,
                child_board,
                to_move,
                is_terminal,
                if is_terminal { LOSS_VALUE } else { 0.0 },
            );
        }

        Ok(eval.value)
    }

    /// Mix Dirichlet noise into the root priors for exploration.
    fn add_dirichlet_noise(&mut self, rng: &mut ChaCha20Rng) {
        let root_id = self.tree.root();
        let children: Vec<NodeId> = self
            .tree
            .get(root_id)
            .children
            .iter()
            .map(|&(_, id)| id)
            .collect();
        if children.is_empty() {
            return;
        }

        let noise = dirichlet_noise(children.len(), self.config.dirichlet_alpha, rng);
        let eps = self.config.dirichlet_epsilon;
        for (child_id, n) in children.into_iter().zip(noise) {
            let child = self.tree.get_mut(child_id);
            child.prior = (1.0 - eps) * child.prior + eps * n;
        }
    }

    /// The search tree (for inspection and tests).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Sample a move from a probability distribution.
fn sample_move(pi: &[(Move, f32)], rng: &mut ChaCha20Rng) -> Result<Move, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for &(mv, p) in pi {
        cumsum += p;
        if r < cumsum {
            return Ok(mv);
        }
    }

    // Floating point underrun; take the last move with any mass.
    for &(mv, p) in pi.iter().rev() {
        if p > 0.0 {
            return Ok(mv);
        }
    }

    Err(SearchError::NoLegalMoves)
}

/// Dirichlet-distributed noise from Gamma variates.
fn dirichlet_noise(n: usize, alpha: f32, rng: &mut ChaCha20Rng) -> Vec<f32> {
    use rand_distr::{Distribution, Gamma};

    let gamma = Gamma::new(alpha as f64, 1.0).unwrap();
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    }

    samples
}

/// Convenience function to run a single decision.
pub fn run_mcts<E: Evaluator + ?Sized>(
    board: &Board,
    to_move: Player,
    evaluator: &E,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(board, to_move, evaluator, config);
    search.run(rng)
}
