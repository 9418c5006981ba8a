//! Search tree node representation.
//!
//! Each node holds the board reached by the move on its incoming edge,
//! the seat to move there, and the edge statistics used for selection:
//! visit count N, accumulated value W (so Q = W/N), and the prior P the
//! oracle assigned to the incoming move.

use halma::{Board, Move, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for the root).
    pub parent: NodeId,

    /// Move that led here from the parent (None for the root).
    pub mv: Option<Move>,

    /// Board state at this node.
    pub board: Board,

    /// Seat to move at this node.
    pub to_move: Player,

    /// Number of times this node has been visited.
    pub visit_count: u32,

    /// Sum of values backpropagated through this node, from this node's
    /// own to-move perspective. Q = value_sum / visit_count.
    pub value_sum: f32,

    /// Prior probability of the incoming move.
    pub prior: f32,

    /// Whether the incoming move ended the game.
    pub is_terminal: bool,

    /// Value of a terminal node from its to-move perspective (the side
    /// to move here has already lost).
    pub terminal_value: f32,

    /// Children, one per legal move, created at expansion.
    pub children: Vec<(Move, NodeId)>,

    /// Virtual loss for parallel search (penalizes in-flight paths).
    pub virtual_loss: f32,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(board: Board, to_move: Player) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            board,
            to_move,
            visit_count: 0,
            value_sum: 0.0,
            prior: 1.0,
            is_terminal: false,
            terminal_value: 0.0,
            children: Vec::new(),
            virtual_loss: 0.0,
        }
    }

    /// Create a new child node.
    #[allow(clippy::too_many_arguments)]
    pub fn new_child(
        parent: NodeId,
        mv: Move,
        prior: f32,
        board: Board,
        to_move: Player,
        is_terminal: bool,
        terminal_value: f32,
    ) -> Self {
        Self {
            parent,
            mv: Some(mv),
            board,
            to_move,
            visit_count: 0,
            value_sum: 0.0,
            prior,
            is_terminal,
            terminal_value,
            children: Vec::new(),
            virtual_loss: 0.0,
        }
    }

    /// Mean value Q = value_sum / visit_count, 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    /// Selection score for choosing among siblings:
    /// `Q + c_puct * P * sqrt(N_parent) / (1 + N)`.
    ///
    /// The stored value is from this node's to-move perspective; the
    /// parent picking among children negates it, since a position that is
    /// bad for the side to move there is good for the side that moved in.
    ///
    /// Takes a pre-computed sqrt(parent_visits) to avoid recomputing it
    /// per sibling.
    #[inline]
    pub fn puct_score(&self, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
        let q = -self.mean_value() - self.virtual_loss;
        let u = c_puct * self.prior * parent_visits_sqrt / (1.0 + self.visit_count as f32);
        q + u
    }

    /// Whether this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the search stops descending at this node.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal || !self.is_expanded()
    }
}
