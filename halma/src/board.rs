//! Mutable game state: occupancy planes, checker indices, move history.
//!
//! The board keeps a short stack of occupancy planes (the current plane
//! plus the two preceding ones) so that an external evaluator can be fed
//! a fixed-depth history of the position. Checkers are tracked through a
//! pair of indices per seat, id -> position and position -> id, updated
//! atomically by [`Board::place`].

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::topology::{Player, Pos, Topology, EMPTY, OFF_BOARD};

/// Depth of the occupancy-plane history stack, current plane included.
pub const HISTORY_PLANES: usize = 3;

/// A move: one checker relocating from `from` to `to`.
///
/// Ordering is lexicographic by `(from, to)`, the canonical deterministic
/// tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
}

impl Move {
    pub const fn new(from: Pos, to: Pos) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Game state for one match.
#[derive(Debug, Clone)]
pub struct Board {
    topo: &'static Topology,
    /// Occupancy planes, `planes[0]` current, older planes behind it.
    planes: Vec<Vec<u8>>,
    /// id -> position, one table per seat.
    checkers_pos: Vec<Vec<Pos>>,
    /// position -> id, one table per seat.
    checkers_id: Vec<HashMap<Pos, usize>>,
    /// Bounded window of recent moves, oldest first.
    hist_moves: VecDeque<Move>,
}

impl Board {
    /// A board in the variant's initial layout.
    pub fn new(topo: &'static Topology) -> Self {
        let cells: Vec<(Pos, Player)> = (1..=topo.seats())
            .flat_map(|seat| topo.start_region(seat).iter().map(move |&pos| (pos, seat)))
            .collect();
        Self::from_cells(topo, &cells)
    }

    /// A board with checkers at arbitrary cells.
    ///
    /// Checker ids are assigned per seat in slice order. Panics on
    /// off-board cells, duplicate cells, or unknown seats: synthetic
    /// positions are constructed by code, and bad ones are caller bugs.
    pub fn from_cells(topo: &'static Topology, cells: &[(Pos, Player)]) -> Self {
        let side = topo.side();
        let mut empty_plane = vec![OFF_BOARD; side * side];
        for row in 0..side as u8 {
            for col in 0..side as u8 {
                let pos = Pos::new(row, col);
                if topo.is_valid(pos) {
                    empty_plane[topo.index(pos)] = EMPTY;
                }
            }
        }

        let mut board = Self {
            topo,
            planes: vec![empty_plane; HISTORY_PLANES],
            checkers_pos: vec![Vec::new(); topo.seats() as usize],
            checkers_id: vec![HashMap::new(); topo.seats() as usize],
            hist_moves: VecDeque::new(),
        };

        for &(pos, seat) in cells {
            assert!(topo.is_valid(pos), "cell {pos} is off the board");
            assert!(seat >= 1 && seat <= topo.seats(), "unknown seat {seat}");
            let idx = topo.index(pos);
            assert_eq!(board.planes[0][idx], EMPTY, "cell {pos} placed twice");
            board.planes[0][idx] = seat;
            let table = &mut board.checkers_pos[seat as usize - 1];
            board.checkers_id[seat as usize - 1].insert(pos, table.len());
            table.push(pos);
        }

        board
    }

    /// The variant tables this board was built from.
    pub fn topology(&self) -> &'static Topology {
        self.topo
    }

    /// Current contents of a cell.
    #[inline]
    pub fn cell(&self, pos: Pos) -> u8 {
        self.planes[0][self.topo.index(pos)]
    }

    /// Whether the cell is playable and currently empty.
    #[inline]
    pub fn is_open(&self, pos: Pos) -> bool {
        self.topo.is_valid(pos) && self.cell(pos) == EMPTY
    }

    /// Positions of a seat's checkers, indexed by checker id.
    pub fn checker_positions(&self, player: Player) -> &[Pos] {
        &self.checkers_pos[player as usize - 1]
    }

    /// Checker id of the seat's checker at `pos`, if any.
    pub fn checker_id(&self, player: Player, pos: Pos) -> Option<usize> {
        self.checkers_id[player as usize - 1].get(&pos).copied()
    }

    /// The occupancy-plane history stack, current plane first.
    pub fn planes(&self) -> &[Vec<u8>] {
        &self.planes
    }

    /// Append the plane stack to `out`, one byte per cell, current plane
    /// first. This is the position encoding handed to external
    /// evaluators.
    pub fn encode_planes(&self, out: &mut Vec<u8>) {
        for plane in &self.planes {
            out.extend_from_slice(plane);
        }
    }

    /// The bounded window of recent moves, oldest first.
    pub fn move_history(&self) -> &VecDeque<Move> {
        &self.hist_moves
    }

    /// Apply a move for `player` and report the winner, if any.
    ///
    /// The move must come from [`legal_moves`](Board::legal_moves);
    /// requesting anything else is a caller bug and panics. The current
    /// plane is copied and pushed onto the history stack, the oldest
    /// plane is dropped, both checker indices are updated, and the move
    /// is appended to the bounded history window.
    pub fn place(&mut self, player: Player, mv: Move) -> Option<Player> {
        assert_eq!(self.cell(mv.from), player, "no checker of seat {player} at {}", mv.from);
        assert!(self.is_open(mv.to), "destination {} is not open", mv.to);

        let mut plane = self.planes[0].clone();
        plane.swap(self.topo.index(mv.from), self.topo.index(mv.to));
        self.planes.insert(0, plane);
        self.planes.truncate(HISTORY_PLANES);

        let table = &mut self.checkers_id[player as usize - 1];
        let id = match table.remove(&mv.from) {
            Some(id) => id,
            None => panic!("checker index out of sync at {}", mv.from),
        };
        table.insert(mv.to, id);
        self.checkers_pos[player as usize - 1][id] = mv.to;

        if self.hist_moves.len() == self.topo.history_window() {
            self.hist_moves.pop_front();
        }
        self.hist_moves.push_back(mv);

        self.check_win()
    }

    /// The seat whose target region is fully occupied by its own
    /// checkers, if any. Scans short-circuit on the first mismatch; at
    /// most one seat can win off a single move.
    pub fn check_win(&self) -> Option<Player> {
        (1..=self.topo.seats()).find(|&seat| {
            self.topo
                .target_region(seat)
                .iter()
                .all(|&pos| self.cell(pos) == seat)
        })
    }

    /// Number of the seat's checkers already inside its target region.
    pub fn progress(&self, player: Player) -> usize {
        self.topo
            .target_region(player)
            .iter()
            .filter(|&&pos| self.cell(pos) == player)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_two_seat() {
        let board = Board::new(Topology::two_seat());
        assert_eq!(board.cell(Pos::new(6, 0)), 1);
        assert_eq!(board.cell(Pos::new(0, 6)), 2);
        assert_eq!(board.cell(Pos::new(3, 3)), EMPTY);
        assert_eq!(board.checker_positions(1).len(), 6);
        assert_eq!(board.checker_positions(2).len(), 6);
        assert!(board.check_win().is_none());
    }

    #[test]
    fn test_initial_board_six_seat() {
        let board = Board::new(Topology::six_seat());
        for seat in 1..=6 {
            assert_eq!(board.checker_positions(seat).len(), 10);
            for &pos in board.topology().start_region(seat) {
                assert_eq!(board.cell(pos), seat);
            }
            assert_eq!(board.progress(seat), 0);
        }
        assert!(board.check_win().is_none());
    }

    #[test]
    fn test_dual_indices_agree() {
        let board = Board::new(Topology::six_seat());
        for seat in 1..=6 {
            for (id, &pos) in board.checker_positions(seat).iter().enumerate() {
                assert_eq!(board.checker_id(seat, pos), Some(id));
            }
        }
    }

    #[test]
    fn test_place_updates_indices_and_planes() {
        let mut board = Board::new(Topology::two_seat());
        let before = board.planes()[0].clone();

        // Front checker of seat 1 one step east.
        let mv = Move::new(Pos::new(4, 0), Pos::new(4, 1));
        let winner = board.place(1, mv);
        assert!(winner.is_none());

        assert_eq!(board.cell(Pos::new(4, 0)), EMPTY);
        assert_eq!(board.cell(Pos::new(4, 1)), 1);

        let id = board.checker_id(1, Pos::new(4, 1)).expect("moved checker indexed");
        assert_eq!(board.checker_positions(1)[id], Pos::new(4, 1));
        assert_eq!(board.checker_id(1, Pos::new(4, 0)), None);

        // The pre-move plane slid one slot down the history stack.
        assert_eq!(board.planes()[1], before);
        assert_eq!(board.move_history().back(), Some(&mv));
        assert!(board.check_win().is_none());
    }

    #[test]
    fn test_checkers_are_conserved() {
        let mut board = Board::new(Topology::two_seat());
        board.place(1, Move::new(Pos::new(4, 0), Pos::new(3, 0)));
        board.place(2, Move::new(Pos::new(2, 6), Pos::new(3, 6)));

        for seat in [1, 2] {
            let on_plane = board.planes()[0].iter().filter(|&&c| c == seat).count();
            assert_eq!(on_plane, 6);
            assert_eq!(board.checker_positions(seat).len(), 6);
        }
    }

    #[test]
    fn test_history_window_evicts_oldest() {
        let mut board = Board::new(Topology::two_seat());
        let window = board.topology().history_window();
        assert_eq!(window, 8);

        // Shuttle two checkers back and forth to overfill the window.
        let p1 = [Move::new(Pos::new(4, 0), Pos::new(3, 0)), Move::new(Pos::new(3, 0), Pos::new(4, 0))];
        let p2 = [Move::new(Pos::new(2, 6), Pos::new(3, 6)), Move::new(Pos::new(3, 6), Pos::new(2, 6))];
        for i in 0..6 {
            board.place(1, p1[i % 2]);
            board.place(2, p2[i % 2]);
        }

        assert_eq!(board.move_history().len(), window);
        // The two oldest of the twelve moves fell out.
        assert_eq!(board.move_history().front(), Some(&p1[0]));
    }

    #[test]
    fn test_check_win_synthetic() {
        let topo = Topology::two_seat();
        let mut cells: Vec<(Pos, Player)> =
            topo.target_region(1).iter().map(|&pos| (pos, 1)).collect();
        cells.extend(topo.start_region(1).iter().map(|&pos| (pos, 2)));
        let board = Board::from_cells(topo, &cells);

        assert_eq!(board.check_win(), Some(1));
        assert_eq!(board.progress(1), 6);
    }

    #[test]
    fn test_check_win_rejects_partial_region() {
        let topo = Topology::two_seat();
        // Five of six target cells filled; the last holds an opponent.
        let mut cells: Vec<(Pos, Player)> = topo.target_region(1)[..5]
            .iter()
            .map(|&pos| (pos, 1))
            .collect();
        cells.push((topo.target_region(1)[5], 2));
        let board = Board::from_cells(topo, &cells);

        assert!(board.check_win().is_none());
        assert_eq!(board.progress(1), 5);
    }

    #[test]
    fn test_encode_planes_shape() {
        let board = Board::new(Topology::two_seat());
        let mut out = Vec::new();
        board.encode_planes(&mut out);
        assert_eq!(out.len(), HISTORY_PLANES * 49);
        // Older planes start empty.
        assert!(out[49..].iter().all(|&c| c == EMPTY));
    }

    #[test]
    #[should_panic(expected = "not open")]
    fn test_place_rejects_occupied_destination() {
        let mut board = Board::new(Topology::two_seat());
        board.place(1, Move::new(Pos::new(6, 0), Pos::new(5, 0)));
    }

    #[test]
    #[should_panic(expected = "no checker")]
    fn test_place_rejects_foreign_origin() {
        let mut board = Board::new(Topology::two_seat());
        board.place(1, Move::new(Pos::new(0, 6), Pos::new(1, 5)));
    }
}
