//! Vector Voyager engine
//!
//! The player plots a course as a chain of vectors laid head to tail from
//! the ship. The flight fails at the first asteroid the chain crosses and
//! succeeds only if the last head lands in the target zone.

pub mod collision;
pub mod flight;
pub mod levels;
pub mod scoring;
pub mod state;
pub mod vectors;

pub use collision::{Collision, check_collisions, segment_circle_intersection};
pub use flight::{FlightOutcome, FlightPlan, ShipPose};
pub use levels::LevelConfig;
pub use scoring::{compute_stars, reaches_target, total_fuel_used};
pub use state::{VoyagerAction, VoyagerPhase, VoyagerSession, VoyagerState, reduce};
pub use vectors::{Asteroid, GameVector, magnitude, vector_color};
