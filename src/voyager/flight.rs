//! Ship flight along the vector chain
//!
//! The ship flies each vector at constant speed with an ease-in-out inside
//! every leg. A collision found before launch cuts the flight short at the
//! impact point.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collision, check_collisions};
use super::scoring::reaches_target;
use super::vectors::{Asteroid, GameVector, heading_deg, magnitude};
use crate::ease_in_out_quad;

/// How a flight ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightOutcome {
    Collision(Collision),
    Success,
    Missed,
}

/// Ship position and nose direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipPose {
    pub position: DVec2,
    /// Degrees, 0 = right, counter-clockwise positive
    pub heading: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Leg {
    start: DVec2,
    /// Where the ship stops on this leg (the impact point on a fatal leg)
    stop: DVec2,
    heading: f64,
    duration: f64,
}

impl Leg {
    fn pose(&self, t: f64) -> ShipPose {
        ShipPose {
            position: self.start.lerp(self.stop, ease_in_out_quad(t)),
            heading: self.heading,
        }
    }
}

/// Precomputed timing of a launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPlan {
    origin: DVec2,
    legs: Vec<Leg>,
    duration: f64,
    outcome: FlightOutcome,
}

impl FlightPlan {
    pub fn new(
        origin: DVec2,
        vectors: &[GameVector],
        asteroids: &[Asteroid],
        target: DVec2,
        target_radius: f64,
        speed: f64,
        min_duration: f64,
    ) -> Self {
        let collision = check_collisions(vectors, asteroids);
        let flown = collision.map_or(vectors.len(), |c| c.vector_idx + 1);

        let legs: Vec<Leg> = vectors
            .iter()
            .take(flown)
            .enumerate()
            .map(|(i, v)| {
                let full = if speed > 0.0 { magnitude(v) / speed } else { 0.0 };
                let (stop, duration) = match collision {
                    Some(c) if c.vector_idx == i => (c.point, full * c.t),
                    _ => (v.end, full),
                };
                Leg {
                    start: v.start,
                    stop,
                    heading: heading_deg(v),
                    duration,
                }
            })
            .collect();

        let flight_time: f64 = legs.iter().map(|l| l.duration).sum();
        let outcome = match collision {
            Some(c) => FlightOutcome::Collision(c),
            None if reaches_target(vectors, target, target_radius) => FlightOutcome::Success,
            None => FlightOutcome::Missed,
        };

        Self {
            origin,
            legs,
            duration: flight_time.max(min_duration),
            outcome,
        }
    }

    /// Seconds from launch to landing
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn outcome(&self) -> FlightOutcome {
        self.outcome
    }

    pub fn is_finished(&self, elapsed: f64) -> bool {
        elapsed >= self.duration
    }

    /// Ship pose `elapsed` seconds after launch
    pub fn sample(&self, elapsed: f64) -> ShipPose {
        let mut remaining = elapsed.max(0.0);
        let last = self.legs.len().saturating_sub(1);
        for (i, leg) in self.legs.iter().enumerate() {
            if leg.duration > 0.0 && remaining <= leg.duration {
                return leg.pose(remaining / leg.duration);
            }
            if i == last {
                return leg.pose(1.0);
            }
            remaining -= leg.duration.max(0.0);
        }
        ShipPose {
            position: self.origin,
            heading: 0.0,
        }
    }

    /// Where the ship comes to rest
    pub fn final_position(&self) -> DVec2 {
        self.legs.last().map_or(self.origin, |l| l.stop)
    }
}
