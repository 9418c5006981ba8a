//! Board engine for hex-grid jump checkers (Sternhalma).
//!
//! The game is played on a star-shaped region embedded in a square array.
//! Two variants are supported: a 2-seat game on a 7x7 grid with 6 checkers
//! per seat, and the classic 6-seat star on a 17x17 grid with 10 checkers
//! per seat. A checker moves either one step into an empty neighboring
//! cell, or by chains of mirror jumps over contiguous occupied runs.
//!
//! # Overview
//!
//! - [`Topology`] holds the immutable per-variant tables: the playable-cell
//!   mask, seat start lists, target regions, direction vectors, and the
//!   human/index coordinate conversion.
//! - [`Board`] holds the mutable game state: a short stack of occupancy
//!   history planes, the dual checker indices, and the bounded move
//!   history. [`Board::place`] applies a move and reports the winner.
//! - Move generation lives in the `movegen` module and is exposed as
//!   [`Board::checker_moves`], [`Board::legal_moves`], and
//!   [`Board::legal_move_list`].
//!
//! # Usage
//!
//! ```rust
//! use halma::{Board, Topology};
//!
//! let board = Board::new(Topology::two_seat());
//! let moves = board.legal_move_list(1);
//! assert!(!moves.is_empty());
//! assert!(board.check_win().is_none());
//! ```

pub mod board;
pub mod movegen;
pub mod topology;

pub use board::{Board, Move, HISTORY_PLANES};
pub use topology::{Player, Pos, Topology, Variant, VariantParseError, DIRECTIONS, EMPTY, OFF_BOARD};
