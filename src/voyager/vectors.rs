//! Player vectors, obstacles and chain helpers

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::angle_deg;

pub const BOARD_WIDTH: f64 = 440.0;
pub const BOARD_HEIGHT: f64 = 440.0;
/// Spacing of the optional background grid
pub const GRID_STEP: f64 = 40.0;

/// Arrow colours, cycled by vector index
pub const VECTOR_COLORS: [&str; 8] = [
    "#4fc3f7", "#81c784", "#f48fb1", "#ffb74d", "#ce93d8", "#4dd0e1", "#fff176", "#a1887f",
];

/// One leg of the flight plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameVector {
    pub id: u32,
    /// Tail; always the previous vector's head (or the ship start)
    pub start: DVec2,
    /// Head, placed by the player
    pub end: DVec2,
}

/// Circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub center: DVec2,
    pub radius: f64,
}

impl Asteroid {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            radius,
        }
    }
}

/// Displacement of a vector
#[inline]
pub fn direction(v: &GameVector) -> DVec2 {
    v.end - v.start
}

/// Length of a vector (its fuel cost)
#[inline]
pub fn magnitude(v: &GameVector) -> f64 {
    v.start.distance(v.end)
}

/// Heading in degrees, 0 = right, counter-clockwise positive
pub fn heading_deg(v: &GameVector) -> f64 {
    angle_deg(direction(v))
}

/// Where the chain ends, if there is one
pub fn resultant_end(vectors: &[GameVector]) -> Option<DVec2> {
    vectors.last().map(|v| v.end)
}

pub fn vector_color(index: usize) -> &'static str {
    VECTOR_COLORS[index % VECTOR_COLORS.len()]
}

/// Keep a point `margin` inside the board
pub fn clamp_to_board(p: DVec2, margin: f64) -> DVec2 {
    DVec2::new(
        p.x.clamp(margin, BOARD_WIDTH - margin),
        p.y.clamp(margin, BOARD_HEIGHT - margin),
    )
}

/// Move the head of `vectors[idx]` and re-chain everything after it.
///
/// Later vectors keep their displacement; only their position shifts.
pub fn move_head(vectors: &mut [GameVector], idx: usize, head: DVec2) {
    let Some(v) = vectors.get_mut(idx) else {
        return;
    };
    v.end = head;

    let mut tail = head;
    for v in vectors.iter_mut().skip(idx + 1) {
        let delta = direction(v);
        v.start = tail;
        v.end = tail + delta;
        tail = v.end;
    }
}

/// True when every vector starts where the previous one ended
pub fn is_chained(vectors: &[GameVector], origin: DVec2) -> bool {
    let mut tail = origin;
    for v in vectors {
        if v.start != tail {
            return false;
        }
        tail = v.end;
    }
    true
}
