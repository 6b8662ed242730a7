//! Galton board layout
//!
//! Rows alternate between "wide" and "narrow". Wide rows (even indices) hold
//! `ceil(rows/2) + 1` pegs, narrow rows one fewer and offset by half a peg
//! spacing. The board has one more bin than the widest row has pegs:
//!
//! - 3 rows: 3,2,3 pegs, 4 bins
//! - 4 rows: 3,2,3,2 pegs, 4 bins
//! - 6 rows: 4,3,4,3,4,3 pegs, 5 bins

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::levels::LevelConfig;

/// Board canvas size (viewBox units)
pub const BOARD_WIDTH: f64 = 400.0;
pub const BOARD_HEIGHT: f64 = 520.0;
pub const BOARD_PADDING_X: f64 = 40.0;
pub const BOARD_PADDING_TOP: f64 = 50.0;
pub const BOARD_PADDING_BOTTOM: f64 = 130.0;
pub const PEG_RADIUS: f64 = 8.0;

/// A single peg on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    /// Row index (0-based from top)
    pub row: usize,
    /// Column index within the row
    pub col: usize,
    /// Probability of deflecting left, in [0, 1]
    pub left_prob: f64,
    /// Locked pegs cannot be adjusted by the player
    pub locked: bool,
}

/// Jagged peg grid, indexed `[row][col]`
pub type PegGrid = Vec<Vec<Peg>>;

/// Number of pegs in a row
pub fn get_row_peg_count(row: usize, total_rows: usize) -> usize {
    let wide = total_rows.div_ceil(2) + 1;
    if row % 2 == 0 { wide } else { wide - 1 }
}

/// Number of bins under the board
pub fn get_bin_count(total_rows: usize) -> usize {
    get_row_peg_count(0, total_rows) + 1
}

/// Canvas position of a peg centre.
///
/// Narrow rows are centred against the widest row; spacing is uniform and
/// derived from the padded canvas.
pub fn peg_position(row: usize, col: usize, total_rows: usize) -> DVec2 {
    let pegs_in_row = get_row_peg_count(row, total_rows);
    let max_pegs = get_row_peg_count(0, total_rows);

    let usable_width = BOARD_WIDTH - BOARD_PADDING_X * 2.0;
    let usable_height = BOARD_HEIGHT - BOARD_PADDING_TOP - BOARD_PADDING_BOTTOM;

    let h_spacing = if max_pegs > 1 {
        usable_width / (max_pegs - 1) as f64
    } else {
        usable_width
    };
    let v_spacing = if total_rows > 1 {
        usable_height / (total_rows - 1) as f64
    } else {
        usable_height
    };

    let row_offset = (max_pegs - pegs_in_row) as f64 * h_spacing / 2.0;

    DVec2::new(
        BOARD_PADDING_X + row_offset + col as f64 * h_spacing,
        BOARD_PADDING_TOP + row as f64 * v_spacing,
    )
}

/// Peg under a tap, the closest one within `radius` of `point`
pub fn peg_at(point: DVec2, total_rows: usize, radius: f64) -> Option<(usize, usize)> {
    (0..total_rows)
        .flat_map(|row| (0..get_row_peg_count(row, total_rows)).map(move |col| (row, col)))
        .map(|(row, col)| ((row, col), peg_position(row, col, total_rows).distance(point)))
        .filter(|&(_, d)| d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(peg, _)| peg)
}

/// Horizontal centre of a bin and the y coordinate balls settle at
pub fn bin_center(bin_index: usize, total_rows: usize) -> DVec2 {
    let bin_count = get_bin_count(total_rows);
    let bin_width = (BOARD_WIDTH - BOARD_PADDING_X * 2.0) / bin_count as f64;
    DVec2::new(
        BOARD_PADDING_X + bin_index as f64 * bin_width + bin_width / 2.0,
        BOARD_HEIGHT - BOARD_PADDING_BOTTOM + 20.0,
    )
}

/// Build the initial peg grid for a level
pub fn create_pegs(level: &LevelConfig) -> PegGrid {
    let left_prob = level.initial_prob.clamp(0.0, 1.0);
    (0..level.rows)
        .map(|row| {
            (0..get_row_peg_count(row, level.rows))
                .map(|col| Peg {
                    row,
                    col,
                    left_prob,
                    locked: level.all_locked,
                })
                .collect()
        })
        .collect()
}

/// Snap a raw slider probability to the nearest 5%
pub fn snap_probability(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.5;
    }
    ((raw * 20.0).round() / 20.0).clamp(0.0, 1.0)
}
