//! The match loop: rotation, win detection, and stop rules.
//!
//! The board itself only knows how to apply moves and detect wins; the
//! policies that end a match without a winner live here. A match stops
//! on a win, on a detected repetition cycle, or (optionally) on a total
//! move limit.

use anyhow::Result;
use halma::{Board, Player, Topology};
use tracing::{debug, info};

use crate::player::{Strategy, TurnContext};

/// How few distinct recent destinations a seat may cycle between before
/// the match is declared drawn.
const UNIQUE_DEST_LIMIT: usize = 2;

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Player),
    /// The full move-history window collapsed onto a couple of cells.
    Repetition,
    /// The configured move limit was reached first.
    MoveLimit,
}

/// One match between configured seats.
pub struct Match {
    board: Board,
    players: Vec<Box<dyn Strategy>>,
    /// Total moves before the match is cut off; 0 disables the limit.
    move_limit: u32,
    verbose: bool,
}

impl Match {
    pub fn new(
        topo: &'static Topology,
        players: Vec<Box<dyn Strategy>>,
        move_limit: u32,
        verbose: bool,
    ) -> Self {
        assert_eq!(
            players.len(),
            topo.seats() as usize,
            "one strategy per seat"
        );
        for (i, player) in players.iter().enumerate() {
            assert_eq!(player.seat(), i as Player + 1, "players out of seat order");
        }
        Self {
            board: Board::new(topo),
            players,
            move_limit,
            verbose,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play until the match ends.
    pub fn run(&mut self) -> Result<Outcome> {
        let seats = self.board.topology().seats() as usize;
        let mut idx = 0usize;
        let mut total_moves = 0u32;

        loop {
            let seat = (idx + 1) as Player;
            let ctx = TurnContext {
                total_moves,
                verbose: self.verbose,
            };

            let mv = self.players[idx].decide_move(&self.board, &ctx)?;
            let winner = self.board.place(seat, mv);
            total_moves += 1;
            debug!(seat, %mv, total_moves, "move played");

            if let Some(winner) = winner {
                info!(winner, total_moves, "match won");
                return Ok(Outcome::Winner(winner));
            }

            if repetition_detected(&self.board) {
                info!(total_moves, "repetition detected, stopping match");
                return Ok(Outcome::Repetition);
            }

            if self.move_limit > 0 && total_moves >= self.move_limit {
                info!(total_moves, "move limit reached, stopping match");
                return Ok(Outcome::MoveLimit);
            }

            idx = (idx + 1) % seats;
        }
    }
}

/// Whether the seat that just moved is cycling between a handful of
/// cells. Looks at its own destinations across the full history window,
/// one per table rotation; the check only fires once the window is full.
pub fn repetition_detected(board: &Board) -> bool {
    let topo = board.topology();
    let history = board.move_history();
    if history.len() < topo.history_window() {
        return false;
    }

    let stride = topo.seats() as usize;
    let mut dests: Vec<_> = history
        .iter()
        .rev()
        .step_by(stride)
        .map(|mv| mv.to)
        .collect();
    dests.sort_unstable();
    dests.dedup();
    dests.len() <= UNIQUE_DEST_LIMIT
}
