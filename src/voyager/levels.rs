//! Vector Voyager missions

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vectors::{Asteroid, BOARD_HEIGHT, BOARD_WIDTH};

/// Static configuration of one mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub subtitle: String,
    pub ship_start: DVec2,
    /// Centre of the landing zone
    pub target: DVec2,
    pub target_radius: f64,
    #[serde(default)]
    pub asteroids: Vec<Asteroid>,
    /// Maximum total vector length, 0 = unlimited
    pub fuel_budget: f64,
    /// Vectors at or under this count toward three stars
    pub par: usize,
    pub show_grid: bool,
    /// Draw x/y components on the active vector
    pub show_components: bool,
    pub hint: String,
}

#[allow(clippy::too_many_arguments)]
fn level(
    id: u32,
    name: &str,
    subtitle: &str,
    ship_start: (f64, f64),
    target: (f64, f64, f64),
    asteroids: &[(f64, f64, f64)],
    fuel_budget: f64,
    par: usize,
    aids: (bool, bool),
    hint: &str,
) -> LevelConfig {
    LevelConfig {
        id,
        name: name.to_string(),
        subtitle: subtitle.to_string(),
        ship_start: DVec2::new(ship_start.0, ship_start.1),
        target: DVec2::new(target.0, target.1),
        target_radius: target.2,
        asteroids: asteroids
            .iter()
            .map(|&(x, y, r)| Asteroid::new(x, y, r))
            .collect(),
        fuel_budget,
        par,
        show_grid: aids.0,
        show_components: aids.1,
        hint: hint.to_string(),
    }
}

/// Built-in mission set
pub fn levels() -> Vec<LevelConfig> {
    vec![
        level(
            1,
            "First Flight",
            "One vector, one destination",
            (60.0, 380.0),
            (380.0, 380.0, 26.0),
            &[],
            0.0,
            1,
            (true, true),
            "Drag from the ship to draw a vector, then launch. Its length is the fuel it burns.",
        ),
        level(
            2,
            "Up and Over",
            "Direction matters",
            (60.0, 380.0),
            (380.0, 80.0, 24.0),
            &[],
            500.0,
            1,
            (true, true),
            "A single diagonal vector is shorter than going across and then up.",
        ),
        level(
            3,
            "Detour",
            "Add vectors head to tail",
            (60.0, 220.0),
            (380.0, 220.0, 24.0),
            &[(220.0, 220.0, 40.0)],
            420.0,
            2,
            (true, false),
            "Something is in the way. Chain two vectors around it; each starts where the last one ends.",
        ),
        level(
            4,
            "Asteroid Belt",
            "The long way round",
            (40.0, 400.0),
            (400.0, 40.0, 22.0),
            &[(150.0, 300.0, 30.0), (220.0, 220.0, 35.0), (300.0, 140.0, 30.0)],
            760.0,
            2,
            (false, false),
            "The straight line is blocked. The resultant is the same no matter which way you go around.",
        ),
        level(
            5,
            "Fuel Crisis",
            "Tight budget",
            (60.0, 60.0),
            (380.0, 380.0, 24.0),
            &[(220.0, 220.0, 50.0)],
            520.0,
            2,
            (false, false),
            "Hug the asteroid: the closer your path stays to the straight line, the less fuel you burn.",
        ),
        level(
            6,
            "Zigzag",
            "Thread the gap",
            (40.0, 220.0),
            (400.0, 220.0, 20.0),
            &[(220.0, 80.0, 50.0), (220.0, 200.0, 50.0), (220.0, 320.0, 40.0)],
            600.0,
            3,
            (false, false),
            "Find the gap near the bottom. Drag an arrowhead to adjust a vector; the rest of the chain follows.",
        ),
    ]
}

/// Parse a mission pack from JSON
pub fn load_levels_json(json: &str) -> Result<Vec<LevelConfig>, serde_json::Error> {
    let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
    for level in &levels {
        let on_board = |p: DVec2| (0.0..=BOARD_WIDTH).contains(&p.x) && (0.0..=BOARD_HEIGHT).contains(&p.y);
        if !on_board(level.ship_start) || !on_board(level.target) {
            log::warn!("Voyager level {} places the ship or target off the board", level.id);
        }
        if level
            .asteroids
            .iter()
            .any(|a| a.center.distance(level.ship_start) <= a.radius)
        {
            log::warn!("Voyager level {} starts the ship inside an asteroid", level.id);
        }
    }
    Ok(levels)
}

/// Find a level by id, falling back to the first one
pub fn level_by_id(levels: &[LevelConfig], id: u32) -> Option<&LevelConfig> {
    levels.iter().find(|l| l.id == id).or_else(|| levels.first())
}
