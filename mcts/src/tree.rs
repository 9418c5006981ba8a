//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and reference each other by NodeId
//! indices, so one decision's whole tree is dropped in a single
//! deallocation when the search finishes.

use halma::{Board, Move, Player};

use crate::node::{MctsNode, NodeId};

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes.
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization).
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at the given position.
    pub fn new(board: Board, to_move: Player) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(board, to_move)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the most promising child of a node.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits_sqrt = (node.visit_count as f32).sqrt();

        node.children
            .iter()
            .max_by(|(_, id_a), (_, id_b)| {
                let score_a = self.get(*id_a).puct_score(parent_visits_sqrt, c_puct);
                let score_b = self.get(*id_b).puct_score(parent_visits_sqrt, c_puct);
                score_a
                    .partial_cmp(&score_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(_, id)| *id)
    }

    /// Add a child to a parent node and return its ID.
    #[allow(clippy::too_many_arguments)]
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        mv: Move,
        prior: f32,
        board: Board,
        to_move: Player,
        is_terminal: bool,
        terminal_value: f32,
    ) -> NodeId {
        let child = MctsNode::new_child(parent_id, mv, prior, board, to_move, is_terminal, terminal_value);
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent_id).children.push((mv, child_id));
        child_id
    }

    /// Backpropagate a value from a leaf to the root, negating at every
    /// ply since the side to move rotates between plies.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += current_value;

            if node.virtual_loss > 0.0 {
                node.virtual_loss = 0.0;
            }

            current_value = -current_value;
            current_id = node.parent;
        }
    }

    /// The root move with the highest visit count. Ties go to the move
    /// created first, i.e. the lowest move in `(from, to)` order, which
    /// keeps deterministic play reproducible.
    pub fn best_move(&self) -> Option<Move> {
        let root = self.get(self.root);
        let mut best: Option<(Move, u32)> = None;
        for &(mv, id) in &root.children {
            let visits = self.get(id).visit_count;
            match best {
                Some((_, top)) if visits <= top => {}
                _ => best = Some((mv, visits)),
            }
        }
        best.map(|(mv, _)| mv)
    }

    /// The visit-count distribution over root moves at the given
    /// temperature: `pi(m)` proportional to `N(m)^(1/t)`. At temperature
    /// 0 the distribution collapses to a one-hot on [`best_move`].
    ///
    /// [`best_move`]: MctsTree::best_move
    pub fn root_policy(&self, temperature: f32) -> Vec<(Move, f32)> {
        let root = self.get(self.root);
        if root.children.is_empty() {
            return Vec::new();
        }

        if temperature < 1e-6 {
            let best = self.best_move();
            return root
                .children
                .iter()
                .map(|&(mv, _)| (mv, if Some(mv) == best { 1.0 } else { 0.0 }))
                .collect();
        }

        let weights: Vec<f32> = root
            .children
            .iter()
            .map(|&(_, id)| {
                let v = self.get(id).visit_count as f32;
                if temperature == 1.0 {
                    v
                } else {
                    v.powf(1.0 / temperature)
                }
            })
            .collect();

        let total: f32 = weights.iter().sum();
        if total > 0.0 {
            root.children
                .iter()
                .zip(weights)
                .map(|(&(mv, _), w)| (mv, w / total))
                .collect()
        } else {
            // No simulations ran; fall back to a uniform distribution.
            let p = 1.0 / root.children.len() as f32;
            root.children.iter().map(|&(mv, _)| (mv, p)).collect()
        }
    }

    /// Tree shape statistics for logging and debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        node.children
            .iter()
            .map(|&(_, id)| self.compute_max_depth(id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use halma::{Pos, Topology};

    fn mv(a: (u8, u8), b: (u8, u8)) -> Move {
        Move::new(Pos::new(a.0, a.1), Pos::new(b.0, b.1))
    }

    fn tree() -> MctsTree {
        MctsTree::new(Board::new(Topology::two_seat()), 1)
    }

    fn add_stub_child(tree: &mut MctsTree, parent: NodeId, m: Move, prior: f32) -> NodeId {
        let board = tree.get(parent).board.clone();
        tree.add_child(parent, m, prior, board, 2, false, 0.0)
    }

    #[test]
    fn test_new_tree() {
        let tree = tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
    }

    #[test]
    fn test_add_child() {
        let mut tree = tree();
        let m = mv((4, 0), (3, 0));
        let root_id = tree.root();
        let child_id = add_stub_child(&mut tree, root_id, m, 0.5);

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(m, NodeId(1))]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.mv, Some(m));
        assert!((child.prior - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_backpropagate_negates_per_ply() {
        let mut tree = tree();
        let root_id = tree.root();
        let child = add_stub_child(&mut tree, root_id, mv((4, 0), (3, 0)), 0.5);
        let grandchild = add_stub_child(&mut tree, child, mv((2, 6), (3, 6)), 0.5);

        tree.backpropagate(grandchild, 1.0);

        assert_eq!(tree.get(grandchild).visit_count, 1);
        assert_eq!(tree.get(child).visit_count, 1);
        assert_eq!(tree.get(tree.root()).visit_count, 1);

        assert!((tree.get(grandchild).value_sum - 1.0).abs() < 1e-6);
        assert!((tree.get(child).value_sum - (-1.0)).abs() < 1e-6);
        assert!((tree.get(tree.root()).value_sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_select_child_prefers_prior_when_unvisited() {
        let mut tree = tree();
        let root_id = tree.root();
        add_stub_child(&mut tree, root_id, mv((4, 0), (3, 0)), 0.3);
        let strong = add_stub_child(&mut tree, root_id, mv((5, 0), (4, 1)), 0.7);

        assert_eq!(tree.select_child(tree.root(), 1.0), Some(strong));
    }

    #[test]
    fn test_root_policy_proportional_and_greedy() {
        let mut tree = tree();
        let a = mv((4, 0), (3, 0));
        let b = mv((5, 0), (4, 1));
        let root_id = tree.root();
        let c1 = add_stub_child(&mut tree, root_id, a, 0.5);
        let c2 = add_stub_child(&mut tree, root_id, b, 0.5);

        tree.get_mut(c1).visit_count = 30;
        tree.get_mut(c2).visit_count = 70;

        let pi = tree.root_policy(1.0);
        assert_eq!(pi.len(), 2);
        assert!((pi[0].1 - 0.3).abs() < 1e-6);
        assert!((pi[1].1 - 0.7).abs() < 1e-6);

        let greedy = tree.root_policy(0.0);
        assert!((greedy[0].1).abs() < 1e-6);
        assert!((greedy[1].1 - 1.0).abs() < 1e-6);
        assert_eq!(tree.best_move(), Some(b));
    }

    #[test]
    fn test_best_move_tie_breaks_to_first_child() {
        let mut tree = tree();
        let a = mv((4, 0), (3, 0));
        let b = mv((5, 0), (4, 1));
        let root_id = tree.root();
        let c1 = add_stub_child(&mut tree, root_id, a, 0.5);
        let c2 = add_stub_child(&mut tree, root_id, b, 0.5);

        tree.get_mut(c1).visit_count = 40;
        tree.get_mut(c2).visit_count = 40;

        assert_eq!(tree.best_move(), Some(a));
    }

    #[test]
    fn test_sharper_temperature_concentrates_mass() {
        let mut tree = tree();
        let root_id = tree.root();
        let c1 = add_stub_child(&mut tree, root_id, mv((4, 0), (3, 0)), 0.5);
        let c2 = add_stub_child(&mut tree, root_id, mv((5, 0), (4, 1)), 0.5);
        tree.get_mut(c1).visit_count = 25;
        tree.get_mut(c2).visit_count = 75;

        let even = tree.root_policy(1.0);
        let sharp = tree.root_policy(0.5);
        assert!(sharp[1].1 > even[1].1);
        let sum: f32 = sharp.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = tree();
        let root_id = tree.root();
        add_stub_child(&mut tree, root_id, mv((4, 0), (3, 0)), 0.5);
        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.max_depth, 1);
    }
}
