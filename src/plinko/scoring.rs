//! Histogram scoring, star ratings, bin statistics and peg colours

use serde::{Deserialize, Serialize};

use super::levels::LevelConfig;
use crate::round_to;

/// Balls the tutorial level needs before it awards full stars
pub const TUTORIAL_AUTO_WIN_BALLS: u32 = 20;

/// Match percentage (0-100, one decimal) between observed bin counts and a
/// target distribution.
///
/// Uses half the L1 distance between the normalised histogram and the
/// target, which is 0 for identical distributions and 1 for disjoint ones.
/// Bins beyond the end of `target` are compared against 0.
pub fn compute_match_percent(bins: &[u32], target: &[f64]) -> f64 {
    let total: u64 = bins.iter().map(|&b| b as u64).sum();
    if total == 0 {
        return 0.0;
    }

    let diff_sum: f64 = bins
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let actual = count as f64 / total as f64;
            (actual - target.get(i).copied().unwrap_or(0.0)).abs()
        })
        .sum();

    let matched = (100.0 * (1.0 - diff_sum / 2.0)).max(0.0);
    round_to(matched, 1)
}

/// Stars earned for a match percentage (highest threshold met)
pub fn compute_stars(match_percent: f64, level: &LevelConfig) -> u8 {
    if match_percent >= level.star3_threshold {
        3
    } else if match_percent >= level.star2_threshold {
        2
    } else if match_percent >= level.star1_threshold {
        1
    } else {
        0
    }
}

/// Stars including the tutorial override
pub fn level_stars(match_percent: f64, total_balls: u32, level: &LevelConfig) -> u8 {
    if level.is_tutorial && total_balls >= TUTORIAL_AUTO_WIN_BALLS {
        3
    } else {
        compute_stars(match_percent, level)
    }
}

/// Summary statistics over the bin histogram
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BinStats {
    /// Weighted mean bin index (two decimals)
    pub mean: f64,
    /// Population standard deviation of the bin index (two decimals)
    pub std_dev: f64,
    pub total: u64,
    /// Bin with the most balls (first one on ties)
    pub max_bin: usize,
    pub max_bin_count: u32,
}

pub fn compute_stats(bins: &[u32]) -> BinStats {
    let total: u64 = bins.iter().map(|&b| b as u64).sum();
    if total == 0 {
        return BinStats::default();
    }
    let n = total as f64;

    let mean = bins
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum::<f64>()
        / n;

    let variance = bins
        .iter()
        .enumerate()
        .map(|(i, &c)| c as f64 * (i as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    let mut max_bin = 0;
    let mut max_bin_count = 0;
    for (i, &count) in bins.iter().enumerate() {
        if count > max_bin_count {
            max_bin_count = count;
            max_bin = i;
        }
    }

    BinStats {
        mean: round_to(mean, 2),
        std_dev: round_to(variance.sqrt(), 2),
        total,
        max_bin,
        max_bin_count,
    }
}

/// Fill colour for a peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PegColor {
    /// Near 50/50
    Neutral,
    /// HSL colour; saturation and lightness in percent
    Hsl {
        hue: f64,
        saturation: f64,
        lightness: f64,
    },
}

impl PegColor {
    pub fn to_css(&self) -> String {
        match self {
            PegColor::Neutral => "#888".to_string(),
            PegColor::Hsl {
                hue,
                saturation,
                lightness,
            } => format!("hsl({}, {}%, {}%)", hue, saturation, lightness),
        }
    }
}

/// Colour for a peg's bias: blues (210-240) lean left, oranges (40-20) lean right
pub fn peg_color(left_prob: f64) -> PegColor {
    let p = left_prob.clamp(0.0, 1.0);
    if (p - 0.5).abs() < 0.02 {
        return PegColor::Neutral;
    }
    let intensity = (p - 0.5).abs() * 2.0;
    let hue = if p > 0.5 {
        210.0 + intensity * 30.0
    } else {
        40.0 - intensity * 20.0
    };
    PegColor::Hsl {
        hue,
        saturation: 50.0 + intensity * 40.0,
        lightness: 55.0 + intensity * 10.0,
    }
}
