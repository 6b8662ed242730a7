//! Probability Plinko engine
//!
//! A Galton board whose pegs carry adjustable left/right probabilities. The
//! player shapes the histogram of landed balls to match a target
//! distribution.

pub mod board;
pub mod levels;
pub mod path;
pub mod scoring;
pub mod state;

pub use board::{Peg, PegGrid, create_pegs, get_bin_count, get_row_peg_count, peg_at, peg_position};
pub use levels::LevelConfig;
pub use path::{BallPath, Route, compute_ball_path, route_ball};
pub use scoring::{BinStats, PegColor, compute_match_percent, compute_stars, compute_stats, peg_color};
pub use state::{ActiveBall, PlinkoAction, PlinkoSession, PlinkoState, reduce};
