//! Per-variant board topology: playable cells, seats, coordinates.
//!
//! A board is a square array in which the playable region is star shaped;
//! cells outside the region carry the [`OFF_BOARD`] sentinel and never
//! participate in play. All tables here are immutable and shared: the two
//! supported variants are built once behind [`once_cell::sync::Lazy`] and
//! handed out as `&'static Topology`.
//!
//! # Coordinates
//!
//! Internal coordinates are `(row, col)` array indices. Human-facing
//! coordinates index the board by diagonal: the human row is the diagonal
//! number counted from the top of the rendered triangle, the human column
//! is the 1-based offset along that diagonal. The conversion is a
//! bijection over the playable cells.

use std::fmt;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Seat identifier, 1-based. 0 marks an empty cell inside the grid.
pub type Player = u8;

/// Cell value for an empty playable cell.
pub const EMPTY: u8 = 0;

/// Sentinel cell value outside the star-shaped playable region.
pub const OFF_BOARD: u8 = 9;

/// The six axial directions: N, E, SE, S, W, NW.
pub const DIRECTIONS: [(i8, i8); 6] = [(-1, 0), (0, 1), (1, 1), (1, 0), (0, -1), (-1, -1)];

/// An internal board coordinate.
///
/// Ordering is lexicographic by `(row, col)`; this is the canonical
/// deterministic order used wherever moves or cells have to be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Game variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// 7x7 grid, two opposing corner seats, 6 checkers each.
    TwoSeat,
    /// 17x17 star, six seats, 10 checkers each.
    SixSeat,
}

#[derive(Debug, Error)]
#[error("unknown variant {0:?}, expected \"two\" or \"six\"")]
pub struct VariantParseError(String);

impl std::str::FromStr for Variant {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two" | "2" | "two-seat" => Ok(Variant::TwoSeat),
            "six" | "6" | "six-seat" => Ok(Variant::SixSeat),
            other => Err(VariantParseError(other.to_string())),
        }
    }
}

impl Variant {
    /// The shared topology for this variant.
    pub fn topology(self) -> &'static Topology {
        match self {
            Variant::TwoSeat => Topology::two_seat(),
            Variant::SixSeat => Topology::six_seat(),
        }
    }
}

/// Immutable tables describing one board variant.
#[derive(Debug)]
pub struct Topology {
    side: usize,
    seats: u8,
    checkers_per_player: usize,
    /// Playable-cell mask, row-major.
    valid: Vec<bool>,
    /// Start cells per seat, in checker-id order.
    starts: Vec<Vec<Pos>>,
    /// Target region per seat: the start region of the opposite seat.
    targets: Vec<Vec<Pos>>,
}

impl Topology {
    /// The 2-seat variant: every cell of the 7x7 grid is playable.
    pub fn two_seat() -> &'static Topology {
        static TOPO: Lazy<Topology> =
            Lazy::new(|| Topology::from_tables(2, &TWO_SEAT_LAYOUT, &TWO_SEAT_STARTS));
        Lazy::force(&TOPO)
    }

    /// The 6-seat variant: the 121-cell star on a 17x17 grid.
    pub fn six_seat() -> &'static Topology {
        static TOPO: Lazy<Topology> =
            Lazy::new(|| Topology::from_tables(6, &SIX_SEAT_LAYOUT, &SIX_SEAT_STARTS));
        Lazy::force(&TOPO)
    }

    fn from_tables<const N: usize>(seats: u8, layout: &[[u8; N]; N], starts: &[&[Pos]]) -> Topology {
        let mut valid = vec![false; N * N];
        for (r, row) in layout.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                valid[r * N + c] = cell != OFF_BOARD;
            }
        }

        let starts: Vec<Vec<Pos>> = starts.iter().map(|s| s.to_vec()).collect();
        debug_assert!(starts.len() == seats as usize);
        debug_assert!(starts.iter().enumerate().all(|(i, cells)| cells
            .iter()
            .all(|p| layout[p.row as usize][p.col as usize] == i as u8 + 1)));

        // Each seat races toward the diametrically opposite seat's corner.
        let half = seats as usize / 2;
        let targets = (0..seats as usize)
            .map(|s| starts[(s + half) % seats as usize].clone())
            .collect();

        Topology {
            side: N,
            seats,
            checkers_per_player: starts[0].len(),
            valid,
            starts,
            targets,
        }
    }

    /// Grid side length.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of active seats.
    pub fn seats(&self) -> u8 {
        self.seats
    }

    /// Checkers per seat.
    pub fn checkers_per_player(&self) -> usize {
        self.checkers_per_player
    }

    /// Row-major index of a cell.
    #[inline]
    pub fn index(&self, pos: Pos) -> usize {
        pos.row as usize * self.side + pos.col as usize
    }

    /// Whether the cell is inside the grid and on the star.
    #[inline]
    pub fn is_valid(&self, pos: Pos) -> bool {
        (pos.row as usize) < self.side && (pos.col as usize) < self.side && self.valid[self.index(pos)]
    }

    /// Count of playable cells.
    pub fn cell_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// One step from `pos` along `dir`, if the destination is playable.
    #[inline]
    pub fn step(&self, pos: Pos, dir: (i8, i8)) -> Option<Pos> {
        let row = pos.row as i16 + dir.0 as i16;
        let col = pos.col as i16 + dir.1 as i16;
        if row < 0 || col < 0 || row >= self.side as i16 || col >= self.side as i16 {
            return None;
        }
        let next = Pos::new(row as u8, col as u8);
        self.valid[self.index(next)].then_some(next)
    }

    /// Start cells of a seat, in checker-id order.
    pub fn start_region(&self, player: Player) -> &[Pos] {
        &self.starts[player as usize - 1]
    }

    /// Cells a seat must fully occupy to win.
    pub fn target_region(&self, player: Player) -> &[Pos] {
        &self.targets[player as usize - 1]
    }

    /// The seat that moves after `player`.
    pub fn next_seat(&self, player: Player) -> Player {
        player % self.seats + 1
    }

    /// Bounded move-history window: four full rotations of the table.
    pub fn history_window(&self) -> usize {
        self.seats as usize * 4
    }

    /// Convert an internal index to diagonal-indexed human coordinates.
    pub fn to_human(&self, pos: Pos) -> (u16, u16) {
        let row = pos.row as i32 - pos.col as i32 + self.side as i32;
        let col = pos.row.min(pos.col) as i32 + 1;
        (row as u16, col as u16)
    }

    /// Convert human coordinates back to an internal index.
    ///
    /// Returns `None` when the coordinates fall outside the playable
    /// region; over playable cells this is the inverse of [`to_human`].
    ///
    /// [`to_human`]: Topology::to_human
    pub fn from_human(&self, coord: (u16, u16)) -> Option<Pos> {
        let (hrow, hcol) = (coord.0 as i32, coord.1 as i32);
        let excess = hrow - self.side as i32;
        let row = hcol - 1 + excess.max(0);
        let col = hcol - 1 - excess.min(0);
        if row < 0 || col < 0 || row >= self.side as i32 || col >= self.side as i32 {
            return None;
        }
        let pos = Pos::new(row as u8, col as u8);
        self.valid[self.index(pos)].then_some(pos)
    }

    /// Nearest Euclidean distance from `pos` to the seat's target region.
    fn target_distance(&self, pos: Pos, player: Player) -> f64 {
        self.target_region(player)
            .iter()
            .map(|t| {
                let dr = pos.row as f64 - t.row as f64;
                let dc = pos.col as f64 - t.col as f64;
                (dr * dr + dc * dc).sqrt()
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// How much closer to the target region a move from `from` to `to`
    /// brings the seat. Positive values are forward progress.
    pub fn progress_gain(&self, from: Pos, to: Pos, player: Player) -> f64 {
        self.target_distance(from, player) - self.target_distance(to, player)
    }
}

// Layout tables. 9 marks a cell outside the star; a non-zero digit marks
// the seat whose checkers start there; 0 is open ground.

#[rustfmt::skip]
const TWO_SEAT_LAYOUT: [[u8; 7]; 7] = [
    [0, 0, 0, 0, 2, 2, 2],
    [0, 0, 0, 0, 0, 2, 2],
    [0, 0, 0, 0, 0, 0, 2],
    [0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0],
    [1, 1, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 0, 0],
];

const TWO_SEAT_STARTS: [&[Pos]; 2] = [
    &[
        Pos::new(6, 0),
        Pos::new(5, 0),
        Pos::new(6, 1),
        Pos::new(4, 0),
        Pos::new(5, 1),
        Pos::new(6, 2),
    ],
    &[
        Pos::new(0, 6),
        Pos::new(1, 6),
        Pos::new(0, 5),
        Pos::new(2, 6),
        Pos::new(1, 5),
        Pos::new(0, 4),
    ],
];

#[rustfmt::skip]
const SIX_SEAT_LAYOUT: [[u8; 17]; 17] = [
    [9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 1, 9, 9, 9, 9],
    [9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 1, 1, 9, 9, 9, 9],
    [9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 1, 1, 1, 9, 9, 9, 9],
    [9, 9, 9, 9, 9, 9, 9, 9, 9, 1, 1, 1, 1, 9, 9, 9, 9],
    [9, 9, 9, 9, 2, 2, 2, 2, 0, 0, 0, 0, 0, 6, 6, 6, 6],
    [9, 9, 9, 9, 2, 2, 2, 0, 0, 0, 0, 0, 0, 6, 6, 6, 9],
    [9, 9, 9, 9, 2, 2, 0, 0, 0, 0, 0, 0, 0, 6, 6, 9, 9],
    [9, 9, 9, 9, 2, 0, 0, 0, 0, 0, 0, 0, 0, 6, 9, 9, 9],
    [9, 9, 9, 9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9, 9, 9, 9],
    [9, 9, 9, 3, 0, 0, 0, 0, 0, 0, 0, 0, 5, 9, 9, 9, 9],
    [9, 9, 3, 3, 0, 0, 0, 0, 0, 0, 0, 5, 5, 9, 9, 9, 9],
    [9, 3, 3, 3, 0, 0, 0, 0, 0, 0, 5, 5, 5, 9, 9, 9, 9],
    [3, 3, 3, 3, 0, 0, 0, 0, 0, 5, 5, 5, 5, 9, 9, 9, 9],
    [9, 9, 9, 9, 4, 4, 4, 4, 9, 9, 9, 9, 9, 9, 9, 9, 9],
    [9, 9, 9, 9, 4, 4, 4, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9],
    [9, 9, 9, 9, 4, 4, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9],
    [9, 9, 9, 9, 4, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9],
];

const SIX_SEAT_STARTS: [&[Pos]; 6] = [
    &[
        Pos::new(0, 12),
        Pos::new(1, 11),
        Pos::new(1, 12),
        Pos::new(2, 10),
        Pos::new(2, 11),
        Pos::new(2, 12),
        Pos::new(3, 9),
        Pos::new(3, 10),
        Pos::new(3, 11),
        Pos::new(3, 12),
    ],
    &[
        Pos::new(4, 4),
        Pos::new(5, 4),
        Pos::new(4, 5),
        Pos::new(6, 4),
        Pos::new(5, 5),
        Pos::new(4, 6),
        Pos::new(7, 4),
        Pos::new(6, 5),
        Pos::new(5, 6),
        Pos::new(4, 7),
    ],
    &[
        Pos::new(12, 0),
        Pos::new(12, 1),
        Pos::new(11, 1),
        Pos::new(12, 2),
        Pos::new(11, 2),
        Pos::new(10, 2),
        Pos::new(12, 3),
        Pos::new(11, 3),
        Pos::new(10, 3),
        Pos::new(9, 3),
    ],
    &[
        Pos::new(16, 4),
        Pos::new(15, 5),
        Pos::new(15, 4),
        Pos::new(14, 6),
        Pos::new(14, 5),
        Pos::new(14, 4),
        Pos::new(13, 7),
        Pos::new(13, 6),
        Pos::new(13, 5),
        Pos::new(13, 4),
    ],
    &[
        Pos::new(12, 12),
        Pos::new(11, 12),
        Pos::new(12, 11),
        Pos::new(10, 12),
        Pos::new(11, 11),
        Pos::new(12, 10),
        Pos::new(9, 12),
        Pos::new(10, 11),
        Pos::new(11, 10),
        Pos::new(12, 9),
    ],
    &[
        Pos::new(4, 16),
        Pos::new(4, 15),
        Pos::new(5, 15),
        Pos::new(4, 14),
        Pos::new(5, 14),
        Pos::new(6, 14),
        Pos::new(4, 13),
        Pos::new(5, 13),
        Pos::new(6, 13),
        Pos::new(7, 13),
    ],
];
