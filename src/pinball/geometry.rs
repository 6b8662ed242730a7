//! Walls, reflectors and the segment math behind every bounce

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::deg_to_rad;

/// Parallel-line threshold for the intersection determinant
const PARALLEL_EPSILON: f64 = 1e-10;
/// Parameters this close to a segment end do not count as a crossing
const ENDPOINT_EPSILON: f64 = 1e-6;

/// An immovable wall segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub start: DVec2,
    pub end: DVec2,
}

impl Wall {
    pub fn new(id: impl Into<String>, start: DVec2, end: DVec2) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }
}

/// A player-rotatable mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflector {
    pub id: String,
    pub center: DVec2,
    /// Degrees, 0 = horizontal, measured in canvas space
    pub angle: f64,
    pub half_length: f64,
}

/// A circular goal the ball must pass through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub center: DVec2,
    pub radius: f64,
    #[serde(default)]
    pub hit: bool,
}

/// Crossing point of two segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: DVec2,
    /// Parameter along the first segment
    pub t: f64,
    /// Parameter along the second segment
    pub u: f64,
}

/// Intersection of `p1->p2` with `p3->p4`.
///
/// Returns `None` for parallel segments and for crossings at (or within
/// 1e-6 of) either segment's endpoints, so a ball sitting on the wall it just
/// left never re-detects it.
pub fn segment_intersection(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<Intersection> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    let denom = d1.perp_dot(d2);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let d3 = p3 - p1;
    let t = d3.perp_dot(d2) / denom;
    let u = d3.perp_dot(d1) / denom;

    let inside = |v: f64| v > ENDPOINT_EPSILON && v < 1.0 - ENDPOINT_EPSILON;
    if !inside(t) || !inside(u) {
        return None;
    }

    Some(Intersection {
        point: p1 + d1 * t,
        t,
        u,
    })
}

/// Unit normal of a wall, facing the incoming ray
pub fn get_wall_normal(wall: &Wall, incoming_dir: DVec2) -> DVec2 {
    let wall_dir = (wall.end - wall.start).normalize_or_zero();
    let normal = wall_dir.perp();
    if normal.dot(incoming_dir) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Mirror reflection: `d - 2(d·n)n`
#[inline]
pub fn reflect(direction: DVec2, normal: DVec2) -> DVec2 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// The wall segment a reflector currently occupies
pub fn reflector_to_wall(reflector: &Reflector) -> Wall {
    let rad = deg_to_rad(reflector.angle);
    let half = DVec2::new(rad.cos(), rad.sin()) * reflector.half_length;
    Wall {
        id: reflector.id.clone(),
        start: reflector.center - half,
        end: reflector.center + half,
    }
}
