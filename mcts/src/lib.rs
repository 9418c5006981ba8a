//! Monte Carlo Tree Search over hex-grid jump checkers.
//!
//! The engine drives a per-decision search tree guided by a policy/value
//! oracle. Each simulation runs four phases:
//!
//! 1. **Selection**: descend from the root by the PUCT score, balancing
//!    the mean value of an edge against its prior-weighted visit bonus
//! 2. **Expansion**: create one child per legal move at the reached
//!    leaf, with priors renormalized from the oracle's answer
//! 3. **Evaluation**: take the oracle's scalar value for the leaf, or
//!    the fixed win/loss value when the leaf is already decided
//! 4. **Backpropagation**: push the value back along the path, negating
//!    at every ply as the seat to move rotates
//!
//! After the simulation budget is spent, visit counts at the root are
//! converted into a move distribution `pi` under a caller-supplied
//! temperature, and one move is sampled from it.
//!
//! # Usage
//!
//! ```rust
//! use halma::{Board, Topology};
//! use mcts::{run_mcts, MctsConfig, UniformEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let board = Board::new(Topology::two_seat());
//! let evaluator = UniformEvaluator::new();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = run_mcts(&board, 1, &evaluator, MctsConfig::for_testing(), &mut rng).unwrap();
//! assert!(board.legal_move_list(1).contains(&result.mv));
//! ```
//!
//! One decision owns one tree; nothing is shared between decisions, and
//! a search always runs its full simulation budget.

pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use evaluator::{Evaluation, Evaluator, EvaluatorError, UniformEvaluator};
pub use node::{MctsNode, NodeId};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
