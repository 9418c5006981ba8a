//! Move generation: direct steps and mirror-jump chains.
//!
//! A checker may step into any empty neighboring cell, or jump: when the
//! cells next to it along one direction form a contiguous occupied run of
//! length `k`, and the `k` cells beyond the run are all playable and
//! empty, the checker lands on the last of them. Landings can chain, so a
//! single turn may carry a checker across the board. The chain search is
//! an iterative depth-first traversal with an explicit visited grid; the
//! moving checker is lifted off the board first, so a chain may cross the
//! vacated origin cell.

use crate::board::{Board, Move};
use crate::topology::{Player, Pos, Topology, DIRECTIONS, EMPTY};

/// Landing cell of a mirror jump from `from` along `dir`, if the jump is
/// legal on the given occupancy plane.
fn mirror_landing(topo: &Topology, plane: &[u8], from: Pos, dir: (i8, i8)) -> Option<Pos> {
    // Contiguous occupied run starting at the immediate neighbor.
    let mut run = 0usize;
    let mut cur = from;
    loop {
        match topo.step(cur, dir) {
            Some(next) if plane[topo.index(next)] != EMPTY => {
                run += 1;
                cur = next;
            }
            // First cell past the run; the walk above stopped because it
            // is empty.
            Some(next) if run > 0 => {
                cur = next;
                break;
            }
            // Empty immediate neighbor (a direct step, not a jump) or the
            // run butts against the board edge.
            _ => return None,
        }
    }

    // The landing mirrors the run: `run` cells past it, all empty.
    for _ in 1..run {
        cur = topo.step(cur, dir)?;
        if plane[topo.index(cur)] != EMPTY {
            return None;
        }
    }
    Some(cur)
}

impl Board {
    /// All destinations reachable by the `player` checker at `from`,
    /// sorted by position. The origin is never included, nor is any
    /// occupied cell.
    pub fn checker_moves(&self, player: Player, from: Pos) -> Vec<Pos> {
        let topo = self.topology();
        assert_eq!(self.cell(from), player, "no checker of seat {player} at {from}");

        let mut visited = vec![false; topo.side() * topo.side()];
        visited[topo.index(from)] = true;

        // Lift the moving checker so chains may cross its origin cell.
        let mut plane = self.planes()[0].to_vec();
        plane[topo.index(from)] = EMPTY;

        let mut result = Vec::new();
        for dir in DIRECTIONS {
            if let Some(next) = topo.step(from, dir) {
                if plane[topo.index(next)] == EMPTY {
                    visited[topo.index(next)] = true;
                    result.push(next);
                }
            }
        }

        // Depth-first over jump landings. The visited grid caps the
        // frontier at one entry per cell; blowing past that bound means
        // the bookkeeping is broken, not that the position is large.
        let cell_cap = topo.side() * topo.side();
        let mut expanded = 0usize;
        let mut stack = vec![from];
        while let Some(pos) = stack.pop() {
            expanded += 1;
            assert!(expanded <= cell_cap, "jump search revisited a cell");
            for dir in DIRECTIONS {
                if let Some(landing) = mirror_landing(topo, &plane, pos, dir) {
                    if !visited[topo.index(landing)] {
                        visited[topo.index(landing)] = true;
                        result.push(landing);
                        stack.push(landing);
                    }
                }
            }
        }

        result.sort();
        result
    }

    /// Destinations for every checker of `player`, in checker-id order.
    /// Checkers are independent: there are no forced jumps and no shared
    /// per-turn state.
    pub fn legal_moves(&self, player: Player) -> Vec<(Pos, Vec<Pos>)> {
        self.checker_positions(player)
            .iter()
            .map(|&from| (from, self.checker_moves(player, from)))
            .collect()
    }

    /// Every legal move of `player` as a flat list, sorted by
    /// `(from, to)`.
    pub fn legal_move_list(&self, player: Player) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .legal_moves(player)
            .into_iter()
            .flat_map(|(from, dests)| dests.into_iter().map(move |to| Move::new(from, to)))
            .collect();
        moves.sort();
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    fn board_2p(cells: &[(Pos, Player)]) -> Board {
        Board::from_cells(Topology::two_seat(), cells)
    }

    #[test]
    fn test_lone_checker_steps_in_all_directions() {
        let board = board_2p(&[(Pos::new(3, 3), 1)]);
        let moves = board.checker_moves(1, Pos::new(3, 3));
        let expected = vec![
            Pos::new(2, 2),
            Pos::new(2, 3),
            Pos::new(3, 2),
            Pos::new(3, 4),
            Pos::new(4, 3),
            Pos::new(4, 4),
        ];
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_adjacent_hop_over_single_checker() {
        // Pivot right next to the mover; landing one past it.
        let board = board_2p(&[(Pos::new(3, 3), 1), (Pos::new(3, 4), 2)]);
        let moves = board.checker_moves(1, Pos::new(3, 3));
        assert!(moves.contains(&Pos::new(3, 5)));
        // The pivot cell itself is never a destination.
        assert!(!moves.contains(&Pos::new(3, 4)));
    }

    #[test]
    fn test_run_of_two_lands_two_past_the_run() {
        // Run of 2 east of the mover, then two open cells.
        let board = board_2p(&[
            (Pos::new(3, 1), 1),
            (Pos::new(3, 2), 2),
            (Pos::new(3, 3), 2),
        ]);
        let moves = board.checker_moves(1, Pos::new(3, 1));
        assert!(moves.contains(&Pos::new(3, 5)));
        // The cell the run stops at is reachable only by a jump landing,
        // not as a shorter hop.
        assert!(!moves.contains(&Pos::new(3, 4)));
    }

    #[test]
    fn test_run_of_two_blocked_by_occupied_landing_path() {
        // Same run, but the far landing cell is occupied.
        let board = board_2p(&[
            (Pos::new(3, 1), 1),
            (Pos::new(3, 2), 2),
            (Pos::new(3, 3), 2),
            (Pos::new(3, 5), 2),
        ]);
        let moves = board.checker_moves(1, Pos::new(3, 1));
        assert!(!moves.iter().any(|p| p.row == 3 && p.col >= 4));
    }

    #[test]
    fn test_run_ending_at_board_edge_yields_no_jump() {
        // Run of 2 that stops against the east edge.
        let board = board_2p(&[
            (Pos::new(3, 4), 1),
            (Pos::new(3, 5), 2),
            (Pos::new(3, 6), 2),
        ]);
        let moves = board.checker_moves(1, Pos::new(3, 4));
        assert!(!moves.iter().any(|p| p.row == 3 && p.col > 4));
    }

    #[test]
    fn test_run_of_three_needs_three_clear_cells() {
        let board = board_2p(&[
            (Pos::new(1, 0), 1),
            (Pos::new(1, 1), 2),
            (Pos::new(1, 2), 2),
            (Pos::new(1, 3), 2),
        ]);
        let moves = board.checker_moves(1, Pos::new(1, 0));
        // The run of 3 lands three cells past it, at col 6; the cells it
        // sails over are not destinations.
        assert!(moves.contains(&Pos::new(1, 6)));
        assert!(!moves.contains(&Pos::new(1, 4)));
        assert!(!moves.contains(&Pos::new(1, 5)));
    }

    #[test]
    fn test_chain_of_jumps() {
        // Hop east over (3,1), land (3,2); from there hop east over
        // (3,3), land (3,4).
        let board = board_2p(&[
            (Pos::new(3, 0), 1),
            (Pos::new(3, 1), 2),
            (Pos::new(3, 3), 2),
        ]);
        let moves = board.checker_moves(1, Pos::new(3, 0));
        assert!(moves.contains(&Pos::new(3, 2)));
        assert!(moves.contains(&Pos::new(3, 4)));
    }

    #[test]
    fn test_chain_crosses_vacated_origin() {
        // A four-hop chain circles the mover around to (3,6); the final
        // westward jump runs over (3,5)..(3,3) and its landing path
        // passes through the vacated origin (3,2) before settling on
        // (3,0).
        let board = board_2p(&[
            (Pos::new(3, 2), 1),
            (Pos::new(2, 2), 2),
            (Pos::new(1, 3), 2),
            (Pos::new(1, 5), 2),
            (Pos::new(2, 6), 2),
            (Pos::new(3, 3), 2),
            (Pos::new(3, 4), 2),
            (Pos::new(3, 5), 2),
        ]);
        let moves = board.checker_moves(1, Pos::new(3, 2));
        for landing in [
            Pos::new(1, 2),
            Pos::new(1, 4),
            Pos::new(1, 6),
            Pos::new(3, 6),
            Pos::new(3, 0),
        ] {
            assert!(moves.contains(&landing), "missing landing {landing}");
        }
        // A hop back from (1,2) would land exactly on the origin, which
        // stays excluded even though the cell is vacant during the search.
        assert!(!moves.contains(&Pos::new(3, 2)));
    }

    #[test]
    fn test_no_destination_is_occupied_or_origin() {
        for topo in [Topology::two_seat(), Topology::six_seat()] {
            let board = Board::new(topo);
            for seat in 1..=topo.seats() {
                for (from, dests) in board.legal_moves(seat) {
                    for to in dests {
                        assert_ne!(to, from);
                        assert!(board.is_open(to), "{to} occupied but listed from {from}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_legal_move_list_is_sorted_and_unique() {
        let board = Board::new(Topology::six_seat());
        for seat in 1..=6 {
            let moves = board.legal_move_list(seat);
            let mut sorted = moves.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(moves, sorted);
            assert!(!moves.is_empty());
        }
    }

    #[test]
    fn test_fully_blocked_checker_has_no_moves() {
        // Corner checker with every direction either off the board or
        // leading onto a run that ends at the edge.
        let mut cells = vec![(Pos::new(0, 0), 1)];
        for col in 1..7 {
            cells.push((Pos::new(0, col), 2)); // east run to the edge
        }
        for row in 1..7 {
            cells.push((Pos::new(row, 0), 2)); // south run to the edge
            cells.push((Pos::new(row, row), 2)); // southeast run to the edge
        }
        let board = board_2p(&cells);
        assert!(board.checker_moves(1, Pos::new(0, 0)).is_empty());
    }

    #[test]
    fn test_tip_checker_vaults_its_own_corner() {
        // On the opening six-seat board the tip checker of seat 1 has no
        // open neighbor; its only move runs over the three teammates
        // below it and lands three cells past them.
        let board = Board::new(Topology::six_seat());
        let moves = board.checker_moves(1, Pos::new(0, 12));
        assert_eq!(moves, vec![Pos::new(6, 12)]);
    }
}
