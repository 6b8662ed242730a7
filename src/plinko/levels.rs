//! Plinko level definitions and target distributions

use serde::{Deserialize, Serialize};

use super::board::get_bin_count;

/// Static configuration of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub subtitle: String,
    /// Number of peg rows
    pub rows: usize,
    /// Normalised probability per bin
    pub target_distribution: Vec<f64>,
    /// Minimum match % for each star
    pub star1_threshold: f64,
    pub star2_threshold: f64,
    pub star3_threshold: f64,
    /// All pegs locked (tutorial)
    pub all_locked: bool,
    /// Initial left-probability for every peg
    pub initial_prob: f64,
    /// Tutorial levels award full stars after enough balls
    pub is_tutorial: bool,
    /// Hint shown at level start
    pub hint: String,
}

/// n choose k
pub fn comb(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

fn normalized(values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return values;
    }
    values.into_iter().map(|v| v / total).collect()
}

/// `C(n, k) * 0.5^n` with `n = bins - 1`
pub fn binomial_distribution(num_bins: usize) -> Vec<f64> {
    let n = num_bins.saturating_sub(1);
    normalized(
        (0..num_bins)
            .map(|k| comb(n, k) * 0.5f64.powi(n as i32))
            .collect(),
    )
}

/// Mass piled on the left bins
pub fn left_skewed_distribution(num_bins: usize) -> Vec<f64> {
    normalized(
        (0..num_bins)
            .map(|i| ((num_bins - i) as f64).powf(2.5))
            .collect(),
    )
}

pub fn uniform_distribution(num_bins: usize) -> Vec<f64> {
    vec![1.0 / num_bins.max(1) as f64; num_bins]
}

/// Two Gaussian humps either side of the centre
pub fn bimodal_distribution(num_bins: usize) -> Vec<f64> {
    let center = (num_bins as f64 - 1.0) / 2.0;
    let peak1 = (center * 0.3).floor();
    let peak2 = (center + center * 0.7).ceil();
    normalized(
        (0..num_bins)
            .map(|i| {
                let x = i as f64;
                (-(x - peak1).powi(2) / 1.5).exp() + (-(x - peak2).powi(2) / 1.5).exp()
            })
            .collect(),
    )
}

/// Mass piled on the right bins
pub fn right_heavy_distribution(num_bins: usize) -> Vec<f64> {
    normalized((0..num_bins).map(|i| ((i + 1) as f64).powi(3)).collect())
}

/// Narrow peak on the centre bin(s)
pub fn sharp_peak_distribution(num_bins: usize) -> Vec<f64> {
    let center = (num_bins as f64 - 1.0) / 2.0;
    normalized(
        (0..num_bins)
            .map(|i| (-(i as f64 - center).powi(2) / 0.8).exp())
            .collect(),
    )
}

#[allow(clippy::too_many_arguments)]
fn level(
    id: u32,
    name: &str,
    subtitle: &str,
    rows: usize,
    target: fn(usize) -> Vec<f64>,
    thresholds: (f64, f64, f64),
    tutorial: bool,
    hint: &str,
) -> LevelConfig {
    LevelConfig {
        id,
        name: name.to_string(),
        subtitle: subtitle.to_string(),
        rows,
        target_distribution: target(get_bin_count(rows)),
        star1_threshold: thresholds.0,
        star2_threshold: thresholds.1,
        star3_threshold: thresholds.2,
        all_locked: tutorial,
        initial_prob: 0.5,
        is_tutorial: tutorial,
        hint: hint.to_string(),
    }
}

/// Built-in level set
pub fn levels() -> Vec<LevelConfig> {
    vec![
        level(
            1,
            "Bell Curve Basics",
            "Watch the magic of 50/50 odds",
            3,
            binomial_distribution,
            (30.0, 50.0, 70.0),
            true,
            "Just drop balls and watch! All pegs are 50/50 and a bell curve appears naturally.",
        ),
        level(
            2,
            "Lean Left",
            "Skew the distribution leftward",
            4,
            left_skewed_distribution,
            (60.0, 75.0, 90.0),
            false,
            "Tap pegs to increase their left probability. Top pegs have the biggest effect!",
        ),
        level(
            3,
            "Uniform Distribution",
            "Make every bin equally likely",
            5,
            uniform_distribution,
            (60.0, 75.0, 88.0),
            false,
            "Equal bins are surprisingly hard! Try biasing edge pegs outward.",
        ),
        level(
            4,
            "Bimodal",
            "Create two peaks",
            5,
            bimodal_distribution,
            (55.0, 70.0, 85.0),
            false,
            "Split the stream! Middle pegs need extreme bias to create two humps.",
        ),
        level(
            5,
            "Right Pile",
            "Stack everything to the right",
            6,
            right_heavy_distribution,
            (60.0, 75.0, 90.0),
            false,
            "Bias pegs rightward, but how much? The top rows matter most.",
        ),
        level(
            6,
            "Sharp Peak",
            "Concentrate balls in the center",
            7,
            sharp_peak_distribution,
            (55.0, 70.0, 85.0),
            false,
            "A sharp peak needs strategic balancing. Not all 50/50 pegs are equal!",
        ),
    ]
}

/// Parse a level pack from JSON
pub fn load_levels_json(json: &str) -> Result<Vec<LevelConfig>, serde_json::Error> {
    let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
    for level in &levels {
        let bins = get_bin_count(level.rows);
        if level.target_distribution.len() != bins {
            log::warn!(
                "Plinko level {} has {} target bins, board has {}",
                level.id,
                level.target_distribution.len(),
                bins
            );
        }
    }
    Ok(levels)
}

/// Find a level by id, falling back to the first one
pub fn level_by_id(levels: &[LevelConfig], id: u32) -> Option<&LevelConfig> {
    levels.iter().find(|l| l.id == id).or_else(|| levels.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized(dist: &[f64]) {
        let sum: f64 = dist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
        assert!(dist.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_comb() {
        assert_eq!(comb(4, 2), 6.0);
        assert_eq!(comb(5, 0), 1.0);
        assert_eq!(comb(5, 5), 1.0);
        assert_eq!(comb(3, 4), 0.0);
    }

    #[test]
    fn test_binomial_matches_pascal_row() {
        let dist = binomial_distribution(4);
        let expected = [1.0, 3.0, 3.0, 1.0].map(|v| v / 8.0);
        for (a, b) in dist.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_generators_are_normalized() {
        for bins in [4, 5, 6] {
            assert_normalized(&binomial_distribution(bins));
            assert_normalized(&left_skewed_distribution(bins));
            assert_normalized(&uniform_distribution(bins));
            assert_normalized(&bimodal_distribution(bins));
            assert_normalized(&right_heavy_distribution(bins));
            assert_normalized(&sharp_peak_distribution(bins));
        }
    }

    #[test]
    fn test_skews_point_the_right_way() {
        let left = left_skewed_distribution(5);
        assert!(left[0] > left[4]);
        let right = right_heavy_distribution(5);
        assert!(right[4] > right[0]);
    }

    #[test]
    fn test_builtin_levels_fit_their_boards() {
        for level in levels() {
            assert_eq!(level.target_distribution.len(), get_bin_count(level.rows));
            assert!(level.star1_threshold <= level.star2_threshold);
            assert!(level.star2_threshold <= level.star3_threshold);
        }
    }

    #[test]
    fn test_level_pack_json() {
        let json = serde_json::to_string(&levels()).unwrap();
        let loaded = load_levels_json(&json).unwrap();
        assert_eq!(loaded.len(), 6);
        assert!(load_levels_json("[{\"id\": 1}]").is_err());
    }

    #[test]
    fn test_level_by_id_falls_back() {
        let all = levels();
        assert_eq!(level_by_id(&all, 4).map(|l| l.id), Some(4));
        assert_eq!(level_by_id(&all, 99).map(|l| l.id), Some(1));
        assert!(level_by_id(&[], 1).is_none());
    }
}
