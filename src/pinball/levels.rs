//! Proof Pinball rooms
//!
//! Coordinates are in a 400x600 canvas, y pointing down.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Reflector, Target, Wall};

pub const VIEW_WIDTH: f64 = 400.0;
pub const VIEW_HEIGHT: f64 = 600.0;

/// Static configuration of one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub subtitle: String,
    pub walls: Vec<Wall>,
    pub targets: Vec<Target>,
    /// Starting placement of the movable reflectors
    #[serde(default)]
    pub reflectors: Vec<Reflector>,
    pub launch_point: DVec2,
    /// Shots allowed before the level restarts
    pub max_shots: u32,
    /// Shots at or under this earn three stars
    pub par_shots: u32,
    /// Bounces shown in the aiming preview (0 = no preview)
    pub prediction_bounces: u32,
    pub hint: Option<String>,
    pub max_bounces: u32,
}

/// Four walls running clockwise from the top-left corner
pub fn rect_room(x: f64, y: f64, w: f64, h: f64, prefix: &str) -> Vec<Wall> {
    let tl = DVec2::new(x, y);
    let tr = DVec2::new(x + w, y);
    let br = DVec2::new(x + w, y + h);
    let bl = DVec2::new(x, y + h);
    vec![
        Wall::new(format!("{prefix}-top"), tl, tr),
        Wall::new(format!("{prefix}-right"), tr, br),
        Wall::new(format!("{prefix}-bottom"), br, bl),
        Wall::new(format!("{prefix}-left"), bl, tl),
    ]
}

/// Closed polygon through `points`, one wall per edge
pub fn polygon_room(points: &[DVec2], prefix: &str) -> Vec<Wall> {
    let n = points.len();
    (0..n)
        .map(|i| Wall::new(format!("{prefix}-{i}"), points[i], points[(i + 1) % n]))
        .collect()
}

/// Vertices of a regular polygon; `offset` rotates the first vertex
pub fn regular_polygon(center: DVec2, radius: f64, sides: usize, offset: f64) -> Vec<DVec2> {
    (0..sides)
        .map(|i| {
            let a = TAU * i as f64 / sides as f64 + offset;
            center + DVec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

fn target(id: &str, x: f64, y: f64, radius: f64) -> Target {
    Target {
        id: id.to_string(),
        center: DVec2::new(x, y),
        radius,
        hit: false,
    }
}

fn standard_room() -> Vec<Wall> {
    rect_room(40.0, 80.0, 320.0, 440.0, "room")
}

/// Built-in level set
pub fn levels() -> Vec<LevelConfig> {
    let l_room = [
        ("w-top", (40.0, 80.0), (240.0, 80.0)),
        ("w-right-upper", (240.0, 80.0), (240.0, 280.0)),
        ("w-inner-h", (240.0, 280.0), (360.0, 280.0)),
        ("w-right-lower", (360.0, 280.0), (360.0, 520.0)),
        ("w-bottom", (360.0, 520.0), (40.0, 520.0)),
        ("w-left", (40.0, 520.0), (40.0, 80.0)),
    ]
    .into_iter()
    .map(|(id, (sx, sy), (ex, ey))| Wall::new(id, DVec2::new(sx, sy), DVec2::new(ex, ey)))
    .collect();

    let pentagon = regular_polygon(
        DVec2::new(200.0, 300.0),
        160.0,
        5,
        -std::f64::consts::FRAC_PI_2,
    );

    vec![
        LevelConfig {
            id: 1,
            name: "Straight Shot".into(),
            subtitle: "Learn to aim and fire".into(),
            walls: standard_room(),
            targets: vec![target("t1", 320.0, 300.0, 24.0)],
            reflectors: vec![],
            launch_point: DVec2::new(80.0, 300.0),
            max_shots: 5,
            par_shots: 1,
            prediction_bounces: 3,
            hint: Some("Drag around the ball to aim, then release to fire. Hit the gold target!".into()),
            max_bounces: 15,
        },
        LevelConfig {
            id: 2,
            name: "First Bounce".into(),
            subtitle: "Angle in = angle out".into(),
            walls: standard_room(),
            targets: vec![target("t1", 300.0, 140.0, 24.0)],
            reflectors: vec![],
            launch_point: DVec2::new(80.0, 460.0),
            max_shots: 5,
            par_shots: 1,
            prediction_bounces: 2,
            hint: Some(
                "The target is above you. Bounce off the right wall to reach it! Watch the angle display."
                    .into(),
            ),
            max_bounces: 15,
        },
        LevelConfig {
            id: 3,
            name: "Corner Pocket".into(),
            subtitle: "Bank shot to the corner".into(),
            walls: standard_room(),
            targets: vec![target("t1", 325.0, 115.0, 22.0)],
            reflectors: vec![],
            launch_point: DVec2::new(80.0, 480.0),
            max_shots: 4,
            par_shots: 1,
            prediction_bounces: 1,
            hint: Some(
                "Reach the far corner with a single bank shot. Multiple bounce paths work too!".into(),
            ),
            max_bounces: 15,
        },
        LevelConfig {
            id: 4,
            name: "Triangle Room".into(),
            subtitle: "60-degree angles everywhere".into(),
            walls: vec![
                Wall::new("tri-bottom", DVec2::new(60.0, 460.0), DVec2::new(340.0, 460.0)),
                Wall::new("tri-right", DVec2::new(340.0, 460.0), DVec2::new(200.0, 120.0)),
                Wall::new("tri-left", DVec2::new(200.0, 120.0), DVec2::new(60.0, 460.0)),
            ],
            targets: vec![target("t1", 310.0, 400.0, 20.0)],
            reflectors: vec![],
            launch_point: DVec2::new(100.0, 430.0),
            max_shots: 5,
            par_shots: 1,
            prediction_bounces: 1,
            hint: Some("Inside a triangle, 60-degree walls create interesting bounce patterns.".into()),
            max_bounces: 15,
        },
        LevelConfig {
            id: 5,
            name: "Two Targets".into(),
            subtitle: "Hit both in one shot".into(),
            walls: standard_room(),
            targets: vec![
                target("t1", 300.0, 200.0, 22.0),
                target("t2", 140.0, 140.0, 22.0),
            ],
            reflectors: vec![],
            launch_point: DVec2::new(80.0, 460.0),
            max_shots: 3,
            par_shots: 1,
            prediction_bounces: 1,
            hint: Some(
                "Plan your angle so the ball passes through both targets on a single multi-bounce path."
                    .into(),
            ),
            max_bounces: 20,
        },
        LevelConfig {
            id: 6,
            name: "Mirror Master".into(),
            subtitle: "Place and aim".into(),
            walls: l_room,
            targets: vec![target("t1", 310.0, 460.0, 22.0)],
            reflectors: vec![Reflector {
                id: "ref1".into(),
                center: DVec2::new(200.0, 340.0),
                angle: 45.0,
                half_length: 40.0,
            }],
            launch_point: DVec2::new(80.0, 160.0),
            max_shots: 4,
            par_shots: 1,
            prediction_bounces: 1,
            hint: Some(
                "Tap the blue reflector to select it, then drag to rotate. Aim the ball to bounce off it!"
                    .into(),
            ),
            max_bounces: 20,
        },
        LevelConfig {
            id: 7,
            name: "The Pentagon".into(),
            subtitle: "Three targets, five walls".into(),
            walls: polygon_room(&pentagon, "pent"),
            targets: vec![
                target("t1", 265.0, 190.0, 18.0),
                target("t2", 310.0, 380.0, 18.0),
                target("t3", 90.0, 380.0, 18.0),
            ],
            reflectors: vec![Reflector {
                id: "ref1".into(),
                center: DVec2::new(200.0, 300.0),
                angle: 0.0,
                half_length: 35.0,
            }],
            launch_point: DVec2::new(140.0, 190.0),
            max_shots: 3,
            par_shots: 2,
            prediction_bounces: 0,
            hint: Some(
                "No prediction line! Reason about angles to hit all three targets. Use the reflector wisely."
                    .into(),
            ),
            max_bounces: 20,
        },
    ]
}

/// Parse a level pack from JSON
pub fn load_levels_json(json: &str) -> Result<Vec<LevelConfig>, serde_json::Error> {
    let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
    for level in &levels {
        if level.walls.len() < 3 {
            log::warn!(
                "Pinball level {} has only {} walls; shots will escape",
                level.id,
                level.walls.len()
            );
        }
        if level.par_shots > level.max_shots {
            log::warn!(
                "Pinball level {} has par {} above max shots {}",
                level.id,
                level.par_shots,
                level.max_shots
            );
        }
    }
    Ok(levels)
}

/// Find a level by id, falling back to the first one
pub fn level_by_id(levels: &[LevelConfig], id: u32) -> Option<&LevelConfig> {
    levels.iter().find(|l| l.id == id).or_else(|| levels.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinball::trace::compute_ball_path;

    #[test]
    fn test_rect_room_is_closed() {
        let walls = rect_room(40.0, 80.0, 320.0, 440.0, "room");
        assert_eq!(walls.len(), 4);
        for (i, w) in walls.iter().enumerate() {
            assert_eq!(w.end, walls[(i + 1) % 4].start);
        }
        assert_eq!(walls[0].id, "room-top");
    }

    #[test]
    fn test_pentagon_vertices() {
        let verts = regular_polygon(DVec2::new(200.0, 300.0), 160.0, 5, -std::f64::consts::FRAC_PI_2);
        assert!((verts[0] - DVec2::new(200.0, 140.0)).length() < 1e-9);
        for v in &verts {
            assert!((v.distance(DVec2::new(200.0, 300.0)) - 160.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_builtin_levels_are_sane() {
        let all = levels();
        assert_eq!(all.len(), 7);
        for (i, level) in all.iter().enumerate() {
            assert_eq!(level.id as usize, i + 1);
            assert!(level.par_shots <= level.max_shots);
            assert!(!level.targets.is_empty());
        }
    }

    #[test]
    fn test_no_shot_escapes_builtin_rooms() {
        for level in levels() {
            for step in 0..72 {
                let angle = step as f64 * 5.0 + 0.37;
                let path = compute_ball_path(
                    level.launch_point,
                    angle,
                    &level.walls,
                    &level.reflectors,
                    &level.targets,
                    level.max_bounces,
                );
                assert!(!path.escaped, "level {} escaped at {}°", level.id, angle);
            }
        }
    }

    #[test]
    fn test_level_pack_json() {
        let json = serde_json::to_string(&levels()).unwrap();
        let loaded = load_levels_json(&json).unwrap();
        assert_eq!(loaded, levels());
        assert!(load_levels_json("{}").is_err());
    }

    #[test]
    fn test_level_by_id_falls_back() {
        let all = levels();
        assert_eq!(level_by_id(&all, 6).map(|l| l.id), Some(6));
        assert_eq!(level_by_id(&all, 42).map(|l| l.id), Some(1));
    }
}
