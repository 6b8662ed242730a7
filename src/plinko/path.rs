//! Ball routing through the peg grid
//!
//! The ball's horizontal position is tracked in "wide-row units": pegs of a
//! wide row sit at 0, 1, 2, ... and pegs of a narrow row at 0.5, 1.5, ....
//! At each row the ball snaps to the nearest peg, then drifts half a unit left
//! or right. After the last row the position rounds to a bin.
//!
//! Routing is deterministic given the left/right decisions, so it is split
//! from the random draws: [`route_ball`] takes a decision closure and
//! [`compute_ball_path`] feeds it Bernoulli trials plus visual jitter.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{
    BOARD_PADDING_TOP, BOARD_WIDTH, PEG_RADIUS, Peg, bin_center, get_bin_count,
    get_row_peg_count, peg_position,
};

/// Precomputed path of one dropped ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallPath {
    /// Waypoints from the drop point to the bin
    pub points: Vec<DVec2>,
    /// Bin the ball lands in (0-based)
    pub bin_index: usize,
}

/// Deterministic outcome of routing a ball
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// `(row, col)` of the peg struck in each row
    pub pegs_hit: Vec<(usize, usize)>,
    /// Bin the ball lands in
    pub bin_index: usize,
}

/// JS-style rounding (halves toward +inf) so routing matches the board layout
#[inline]
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

fn clamp_index(value: i64, len: usize) -> usize {
    value.clamp(0, len.saturating_sub(1) as i64) as usize
}

/// Route a ball through the board.
///
/// `go_left` is called once per row with the struck peg and decides the
/// deflection. Missing pegs (a grid smaller than `total_rows` describes) act
/// as unlocked 50/50 pegs.
pub fn route_ball<F>(pegs: &[Vec<Peg>], total_rows: usize, mut go_left: F) -> Route
where
    F: FnMut(&Peg) -> bool,
{
    let wide_count = get_row_peg_count(0, total_rows);
    let mut ball_pos = (wide_count as f64 - 1.0) / 2.0;
    let mut pegs_hit = Vec::with_capacity(total_rows);

    for row in 0..total_rows {
        let is_wide = row % 2 == 0;
        let pegs_in_row = get_row_peg_count(row, total_rows);

        let nearest = if is_wide {
            round_half_up(ball_pos)
        } else {
            round_half_up(ball_pos - 0.5)
        };
        let col = clamp_index(nearest, pegs_in_row);

        let fallback = Peg {
            row,
            col,
            left_prob: 0.5,
            locked: false,
        };
        let peg = pegs.get(row).and_then(|r| r.get(col)).unwrap_or(&fallback);
        pegs_hit.push((row, col));

        let peg_pos_in_wide = if is_wide { col as f64 } else { col as f64 + 0.5 };
        ball_pos = if go_left(peg) {
            peg_pos_in_wide - 0.5
        } else {
            peg_pos_in_wide + 0.5
        };
    }

    let bin_index = clamp_index(round_half_up(ball_pos), get_bin_count(total_rows));
    Route {
        pegs_hit,
        bin_index,
    }
}

#[inline]
fn jitter<R: Rng>(rng: &mut R, amplitude: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * amplitude
}

/// Drop one ball: sample each peg's Bernoulli trial and build the waypoints
pub fn compute_ball_path<R: Rng>(
    pegs: &[Vec<Peg>],
    total_rows: usize,
    rng: &mut R,
) -> BallPath {
    let route = route_ball(pegs, total_rows, |peg| {
        rng.random::<f64>() < peg.left_prob.clamp(0.0, 1.0)
    });
    waypoints_for(&route, total_rows, rng)
}

/// Build display waypoints for a route (jitter is purely cosmetic)
pub fn waypoints_for<R: Rng>(route: &Route, total_rows: usize, rng: &mut R) -> BallPath {
    let mut points = Vec::with_capacity(route.pegs_hit.len() + 3);

    points.push(DVec2::new(
        BOARD_WIDTH / 2.0 + jitter(rng, 4.0),
        BOARD_PADDING_TOP - 25.0,
    ));

    for &(row, col) in &route.pegs_hit {
        let pos = peg_position(row, col, total_rows);
        points.push(DVec2::new(
            pos.x + jitter(rng, 4.0),
            pos.y + PEG_RADIUS + 2.0 + jitter(rng, 2.0),
        ));
    }

    let bin = bin_center(route.bin_index, total_rows);
    let last = points[points.len() - 1];
    points.push(DVec2::new(
        (last.x + bin.x) / 2.0 + jitter(rng, 6.0),
        (last.y + bin.y) / 2.0,
    ));
    points.push(bin);

    BallPath {
        points,
        bin_index: route.bin_index,
    }
}
