//! Segment against circle collision along the flight chain

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vectors::{Asteroid, GameVector, direction};

/// Segments shorter than this cannot collide
const DEGENERATE_EPSILON: f64 = 1e-12;

/// First obstacle the flight runs into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub vector_idx: usize,
    pub asteroid_idx: usize,
    /// Parameter along the colliding vector, in [0, 1]
    pub t: f64,
    pub point: DVec2,
}

/// Parameter of the first point where segment `p1->p2` touches the circle.
///
/// Solves `|p1 + t(p2 - p1) - center|² = r²` and returns the smaller root
/// inside [0, 1], else the larger one, else `None`. A segment starting inside
/// the circle reports where it leaves.
pub fn segment_circle_intersection(p1: DVec2, p2: DVec2, center: DVec2, radius: f64) -> Option<f64> {
    let d = p2 - p1;
    let f = p1 - center;

    let a = d.dot(d);
    if a < DEGENERATE_EPSILON {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();

    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    [t1, t2].into_iter().find(|t| (0.0..=1.0).contains(t))
}

/// Walk the chain in flight order and report the first collision.
///
/// Vectors are checked in order, and for each vector the asteroids in level
/// order; the first pair that intersects wins even if another pair would be
/// closer in space.
pub fn check_collisions(vectors: &[GameVector], asteroids: &[Asteroid]) -> Option<Collision> {
    for (vector_idx, v) in vectors.iter().enumerate() {
        for (asteroid_idx, ast) in asteroids.iter().enumerate() {
            if let Some(t) = segment_circle_intersection(v.start, v.end, ast.center, ast.radius) {
                return Some(Collision {
                    vector_idx,
                    asteroid_idx,
                    t,
                    point: v.start + direction(v) * t,
                });
            }
        }
    }
    None
}
