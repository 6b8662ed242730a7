//! Edu Arcade - engines behind a hub of educational math mini-games
//!
//! Core modules:
//! - `plinko`: Galton board layout, stochastic ball routing, histogram scoring
//! - `pinball`: Ray/reflection physics through a room of walls and reflectors
//! - `voyager`: Vector-chain flight, asteroid collision, fuel/par scoring
//! - `settings`: Data-driven tuning shared by the presentation layer
//! - `progress`: In-memory best-star bookkeeping
//!
//! Every engine function is pure: inputs are passed by value or reference and
//! never mutated, results are freshly derived. Rendering and frame scheduling
//! belong to the caller.

pub mod ids;
pub mod pinball;
pub mod plinko;
pub mod progress;
pub mod settings;
pub mod voyager;

pub use ids::IdAllocator;
pub use progress::Progress;
pub use settings::Settings;

use glam::DVec2;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Unit direction for an angle in degrees.
///
/// 0° points right and positive angles turn counter-clockwise as seen on a
/// y-down canvas, so the y component is negated.
#[inline]
pub fn direction_from_angle(angle_deg: f64) -> DVec2 {
    let rad = deg_to_rad(angle_deg);
    DVec2::new(rad.cos(), -rad.sin())
}

/// Angle of a canvas-space vector in degrees (inverse of [`direction_from_angle`])
#[inline]
pub fn angle_deg(v: DVec2) -> f64 {
    rad_to_deg((-v.y).atan2(v.x))
}

/// Distance from `p` to the closest point of segment `a`-`b`
pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 1e-20 {
        return p.distance(a);
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    p.distance(a + seg * t)
}

/// Quadratic ease-in-out over `t` in [0, 1]
#[inline]
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Round to a fixed number of decimals (display values)
#[inline]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
