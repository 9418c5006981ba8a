//! Text rendering of the board for humans.
//!
//! The square array is printed as the triangle players actually see: one
//! line per diagonal, centered, with off-board cells blanked. The line
//! numbers match the human coordinates accepted by the input parser, so
//! a player can read a move straight off the rendering.

use halma::{Board, OFF_BOARD};

const GAP: usize = 3;

/// Render the current position as a multi-line string.
pub fn render(board: &Board) -> String {
    let side = board.topology().side();
    let visual_width = side * (GAP + 1) - GAP;
    let visual_height = 2 * side - 1;
    let leading = visual_width / 2;

    let mut out = String::new();
    for i in 1..=visual_height {
        let num_slots = if i <= side { i } else { visual_height - i + 1 };
        out.push_str(&format!("Row {i:2}    "));
        out.push_str(&" ".repeat(leading - (num_slots - 1) * ((GAP + 1) / 2)));

        let values: Vec<String> = diagonal_cells(board, side as i32 - i as i32)
            .map(|cell| {
                if cell == OFF_BOARD {
                    " ".to_string()
                } else {
                    cell.to_string()
                }
            })
            .collect();
        out.push_str(&values.join(&" ".repeat(GAP)));
        out.push('\n');
    }
    out
}

/// Cells along the diagonal with `col - row == offset`, top to bottom.
fn diagonal_cells(board: &Board, offset: i32) -> impl Iterator<Item = u8> + '_ {
    let side = board.topology().side() as i32;
    (0..side - offset.abs()).map(move |j| {
        let (row, col) = if offset >= 0 {
            (j, j + offset)
        } else {
            (j - offset, j)
        };
        board.planes()[0][(row * side + col) as usize]
    })
}
