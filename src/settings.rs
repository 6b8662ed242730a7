//! Game tuning and interaction thresholds
//!
//! Loaded from JSON by the host page; any missing field keeps its default.

use serde::{Deserialize, Serialize};

/// Plinko animation speed selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DropSpeed {
    #[default]
    Normal,
    Fast,
    Turbo,
}

impl DropSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropSpeed::Normal => "1x",
            DropSpeed::Fast => "3x",
            DropSpeed::Turbo => "10x",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1x" | "normal" => Some(DropSpeed::Normal),
            "3" | "3x" | "fast" => Some(DropSpeed::Fast),
            "10" | "10x" | "turbo" => Some(DropSpeed::Turbo),
            _ => None,
        }
    }
}

/// How many balls a single drop releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DropCount {
    #[default]
    One,
    Ten,
    Fifty,
}

impl DropCount {
    pub fn count(&self) -> usize {
        match self {
            DropCount::One => 1,
            DropCount::Ten => 10,
            DropCount::Fifty => 50,
        }
    }
}

/// Tuning for all three engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Plinko ===
    /// Per-frame progress added to a falling ball at 1x
    pub plinko_progress_normal: f64,
    /// Per-frame progress at 3x
    pub plinko_progress_fast: f64,
    /// Per-frame progress at 10x
    pub plinko_progress_turbo: f64,

    // === Pinball ===
    /// Ball speed in board units per second
    pub pinball_ball_speed: f64,
    /// Rendered ball radius, used when announcing target hits
    pub pinball_ball_radius: f64,
    /// Pointer must start this close to the launch point to aim
    pub pinball_aim_grab_radius: f64,
    /// Extra slack around a reflector's half-length for selection
    pub pinball_reflector_grab_slack: f64,

    // === Vector Voyager ===
    /// Ship speed in board units per second
    pub voyager_ship_speed: f64,
    /// Shortest flight animation, in seconds
    pub voyager_min_flight_secs: f64,
    /// A new vector must start this close to the chain end
    pub voyager_grab_radius: f64,
    /// Hit radius of a vector's arrowhead handle
    pub voyager_handle_radius: f64,
    /// Vectors shorter than this are discarded on release
    pub voyager_min_vector_len: f64,
    /// Dragged endpoints stay this far inside the board
    pub voyager_board_margin: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plinko_progress_normal: 0.012,
            plinko_progress_fast: 0.035,
            plinko_progress_turbo: 0.08,

            pinball_ball_speed: 450.0,
            pinball_ball_radius: 7.0,
            pinball_aim_grab_radius: 120.0,
            pinball_reflector_grab_slack: 20.0,

            voyager_ship_speed: 180.0,
            voyager_min_flight_secs: 0.2,
            voyager_grab_radius: 60.0,
            voyager_handle_radius: 24.0,
            voyager_min_vector_len: 8.0,
            voyager_board_margin: 6.0,
        }
    }
}

impl Settings {
    /// Per-frame progress factor for a drop speed
    pub fn plinko_progress(&self, speed: DropSpeed) -> f64 {
        match speed {
            DropSpeed::Normal => self.plinko_progress_normal,
            DropSpeed::Fast => self.plinko_progress_fast,
            DropSpeed::Turbo => self.plinko_progress_turbo,
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn load(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
