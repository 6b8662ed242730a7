//! Fuel and par scoring

use glam::DVec2;

use super::vectors::{GameVector, magnitude};

/// Total length of the chain
pub fn total_fuel_used(vectors: &[GameVector]) -> f64 {
    vectors.iter().map(magnitude).sum()
}

/// A budget of 0 means unlimited fuel
pub fn is_over_budget(fuel_used: f64, fuel_budget: f64) -> bool {
    fuel_budget > 0.0 && fuel_used > fuel_budget
}

/// Only the final head counts; passing through the zone on the way does not
pub fn reaches_target(vectors: &[GameVector], target: DVec2, target_radius: f64) -> bool {
    vectors
        .last()
        .is_some_and(|v| v.end.distance(target) <= target_radius)
}

/// 3 stars for par and budget, 2 for one of them, 1 for just arriving
pub fn compute_stars(reached: bool, vector_count: usize, par: usize, fuel_used: f64, fuel_budget: f64) -> u8 {
    if !reached {
        return 0;
    }
    let under_par = vector_count <= par;
    let under_budget = !is_over_budget(fuel_used, fuel_budget);
    match (under_par, under_budget) {
        (true, true) => 3,
        (true, false) | (false, true) => 2,
        (false, false) => 1,
    }
}
