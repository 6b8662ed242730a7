//! Proof Pinball engine
//!
//! A ball fired from a launch point bounces around a polygonal room (plus
//! player-rotatable reflectors) obeying angle-in = angle-out. The whole
//! trajectory is traced up front; animation just walks along it.

pub mod geometry;
pub mod levels;
pub mod shot;
pub mod state;
pub mod trace;

pub use geometry::{Reflector, Target, Wall, get_wall_normal, reflect, reflector_to_wall, segment_intersection};
pub use levels::LevelConfig;
pub use trace::{BallPath, BounceInfo, compute_ball_path, compute_prediction_path, interpolate_path, path_length};
pub use state::{GamePhase, PinballAction, PinballSession, PinballState, reduce};
