//! Multi-bounce ray tracing through a room
//!
//! The ball travels in straight lines. Each step casts a long ray from the
//! current position, takes the nearest wall crossing, reflects, and nudges
//! the position a hair along the new direction before casting again. Both
//! the fired shot and the aiming preview run the same [`trace_ray`] loop.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{
    Reflector, Target, Wall, get_wall_normal, reflect, reflector_to_wall, segment_intersection,
};
use crate::{direction_from_angle, point_segment_distance, rad_to_deg, round_to};

/// Length of each cast ray; longer than any room diagonal
pub const MAX_RAY_LENGTH: f64 = 5000.0;
/// Crossings closer than this to the ball are ignored, and the ball is
/// nudged this far off a wall after bouncing
pub const EPSILON: f64 = 0.01;
/// Tail drawn when a fired ball escapes the room
pub const ESCAPE_TAIL: f64 = 300.0;
/// Tail drawn when the preview escapes the room
pub const PREDICTION_ESCAPE_TAIL: f64 = 200.0;

/// Geometry of one wall collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceInfo {
    pub position: DVec2,
    /// Degrees from the normal, one decimal
    pub incidence_angle: f64,
    /// Degrees from the normal, one decimal
    pub reflection_angle: f64,
    /// Unit normal facing the incoming ball
    pub normal: DVec2,
    /// Unit incoming direction
    pub incoming: DVec2,
    /// Unit outgoing direction
    pub outgoing: DVec2,
}

/// Full trajectory of a fired shot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallPath {
    /// Launch point, each bounce point, and the final point
    pub points: Vec<DVec2>,
    pub bounces: Vec<BounceInfo>,
    /// Ids of targets swept by the path, in traversal order
    pub targets_hit: Vec<String>,
    /// The ball left the room through a gap (a level-design defect)
    pub escaped: bool,
}

/// One leg of a traced ray
#[derive(Debug, Clone, Copy)]
pub enum TraceStep<'a> {
    Bounce {
        from: DVec2,
        point: DVec2,
        wall: &'a Wall,
        incoming: DVec2,
        normal: DVec2,
        outgoing: DVec2,
    },
    Escape {
        from: DVec2,
        direction: DVec2,
    },
}

fn nearest_crossing<'a>(pos: DVec2, dir: DVec2, walls: &'a [Wall]) -> Option<(DVec2, &'a Wall)> {
    let ray_end = pos + dir * MAX_RAY_LENGTH;
    let mut nearest = None;
    let mut min_dist = f64::INFINITY;

    for wall in walls {
        if let Some(hit) = segment_intersection(pos, ray_end, wall.start, wall.end) {
            let dist = pos.distance(hit.point);
            if dist > EPSILON && dist < min_dist {
                min_dist = dist;
                nearest = Some((hit.point, wall));
            }
        }
    }
    nearest
}

/// Trace a ray for at most `max_bounces` reflections, reporting each leg.
///
/// Stops early (after reporting [`TraceStep::Escape`]) when no wall is hit.
pub fn trace_ray<'a, F>(start: DVec2, angle_deg: f64, walls: &'a [Wall], max_bounces: u32, mut on_step: F)
where
    F: FnMut(TraceStep<'a>),
{
    let mut pos = start;
    let mut dir = direction_from_angle(angle_deg);

    for _ in 0..max_bounces {
        let Some((point, wall)) = nearest_crossing(pos, dir, walls) else {
            on_step(TraceStep::Escape {
                from: pos,
                direction: dir,
            });
            return;
        };

        let normal = get_wall_normal(wall, dir);
        let outgoing = reflect(dir, normal).normalize_or_zero();
        on_step(TraceStep::Bounce {
            from: pos,
            point,
            wall,
            incoming: dir,
            normal,
            outgoing,
        });

        pos = point + outgoing * EPSILON;
        dir = outgoing;
    }
}

fn all_walls(walls: &[Wall], reflectors: &[Reflector]) -> Vec<Wall> {
    walls
        .iter()
        .cloned()
        .chain(reflectors.iter().map(reflector_to_wall))
        .collect()
}

/// Angle between a unit direction and the normal line, in degrees
fn angle_from_normal(dir: DVec2, normal: DVec2) -> f64 {
    rad_to_deg(dir.dot(normal).abs().clamp(0.0, 1.0).acos())
}

/// Trace a fired shot, recording bounce geometry and swept targets
pub fn compute_ball_path(
    start: DVec2,
    angle_deg: f64,
    walls: &[Wall],
    reflectors: &[Reflector],
    targets: &[Target],
    max_bounces: u32,
) -> BallPath {
    let walls = all_walls(walls, reflectors);
    let mut path = BallPath {
        points: vec![start],
        ..Default::default()
    };

    trace_ray(start, angle_deg, &walls, max_bounces, |step| match step {
        TraceStep::Bounce {
            from,
            point,
            incoming,
            normal,
            outgoing,
            ..
        } => {
            for target in targets {
                if path.targets_hit.contains(&target.id) {
                    continue;
                }
                if point_segment_distance(target.center, from, point) <= target.radius {
                    path.targets_hit.push(target.id.clone());
                }
            }

            path.points.push(point);
            path.bounces.push(BounceInfo {
                position: point,
                incidence_angle: round_to(angle_from_normal(-incoming, normal), 1),
                reflection_angle: round_to(angle_from_normal(outgoing, normal), 1),
                normal,
                incoming: incoming.normalize_or_zero(),
                outgoing,
            });
        }
        TraceStep::Escape { from, direction } => {
            log::warn!(
                "Ball escaped the room at ({:.1}, {:.1}); check the level's walls",
                from.x,
                from.y
            );
            path.points.push(from + direction * ESCAPE_TAIL);
            path.escaped = true;
        }
    });

    path
}

/// Aiming preview: same trace as a shot, without targets or angle bookkeeping
pub fn compute_prediction_path(
    start: DVec2,
    angle_deg: f64,
    walls: &[Wall],
    reflectors: &[Reflector],
    max_bounces: u32,
) -> Vec<DVec2> {
    let walls = all_walls(walls, reflectors);
    let mut points = vec![start];

    trace_ray(start, angle_deg, &walls, max_bounces, |step| match step {
        TraceStep::Bounce { point, .. } => points.push(point),
        TraceStep::Escape { from, direction } => {
            points.push(from + direction * PREDICTION_ESCAPE_TAIL)
        }
    });

    points
}

/// Total length of a polyline
pub fn path_length(points: &[DVec2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point at `fraction` of the polyline's arc length
pub fn interpolate_path(points: &[DVec2], fraction: f64) -> DVec2 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return DVec2::ZERO;
    };
    if points.len() == 1 || fraction <= 0.0 {
        return first;
    }
    if fraction >= 1.0 {
        return last;
    }

    let total = path_length(points);
    if total == 0.0 {
        return first;
    }

    let target_dist = fraction * total;
    let mut accumulated = 0.0;
    for w in points.windows(2) {
        let seg_len = w[0].distance(w[1]);
        if accumulated + seg_len >= target_dist {
            let seg_fraction = if seg_len > 0.0 {
                (target_dist - accumulated) / seg_len
            } else {
                0.0
            };
            return w[0].lerp(w[1], seg_fraction);
        }
        accumulated += seg_len;
    }

    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect_room(x: f64, y: f64, w: f64, h: f64) -> Vec<Wall> {
        vec![
            Wall::new("top", DVec2::new(x, y), DVec2::new(x + w, y)),
            Wall::new("right", DVec2::new(x + w, y), DVec2::new(x + w, y + h)),
            Wall::new("bottom", DVec2::new(x + w, y + h), DVec2::new(x, y + h)),
            Wall::new("left", DVec2::new(x, y + h), DVec2::new(x, y)),
        ]
    }

    fn target(id: &str, x: f64, y: f64, r: f64) -> Target {
        Target {
            id: id.into(),
            center: DVec2::new(x, y),
            radius: r,
            hit: false,
        }
    }

    #[test]
    fn test_straight_shot_hits_right_wall() {
        let walls = rect_room(0.0, 0.0, 100.0, 100.0);
        let path = compute_ball_path(DVec2::new(10.0, 50.0), 0.0, &walls, &[], &[], 1);
        assert_eq!(path.points.len(), 2);
        assert!((path.points[1] - DVec2::new(100.0, 50.0)).length() < 1e-9);
        assert_eq!(path.bounces.len(), 1);
        let bounce = path.bounces[0];
        assert_eq!(bounce.incidence_angle, 0.0);
        assert!((bounce.outgoing - DVec2::new(-1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_reflection_law_on_axis_aligned_wall() {
        let walls = rect_room(0.0, 0.0, 200.0, 200.0);
        for angle in [10.0, 30.0, 45.0, 60.0, 80.0] {
            let path = compute_ball_path(DVec2::new(20.0, 170.0), angle, &walls, &[], &[], 1);
            let b = path.bounces[0];
            assert!((b.incidence_angle - b.reflection_angle).abs() < 0.05);

            let perp_in = b.incoming.dot(b.normal);
            let perp_out = b.outgoing.dot(b.normal);
            assert!((perp_out + perp_in).abs() < 1e-9);
            let tangent = b.normal.perp();
            assert!((b.incoming.dot(tangent) - b.outgoing.dot(tangent)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_incidence_angle_measured_from_normal() {
        // 30° above horizontal hits the top wall 60° from its normal
        let walls = rect_room(0.0, 0.0, 1000.0, 100.0);
        let path = compute_ball_path(DVec2::new(10.0, 90.0), 30.0, &walls, &[], &[], 1);
        assert_eq!(path.bounces[0].incidence_angle, 60.0);
        assert_eq!(path.bounces[0].reflection_angle, 60.0);
    }

    #[test]
    fn test_targets_recorded_once_in_traversal_order() {
        let walls = rect_room(0.0, 0.0, 100.0, 100.0);
        let targets = [target("a", 30.0, 50.0, 5.0), target("b", 70.0, 50.0, 5.0)];
        // Rightward leg sweeps b, the return leg sweeps a (and b again)
        let path = compute_ball_path(DVec2::new(50.0, 50.0), 0.0, &walls, &[], &targets, 2);
        assert_eq!(path.targets_hit, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_reflector_redirects_ball() {
        let walls = rect_room(0.0, 0.0, 200.0, 200.0);
        let mirror = Reflector {
            id: "m".into(),
            center: DVec2::new(100.0, 100.0),
            angle: 45.0,
            half_length: 30.0,
        };
        let path = compute_ball_path(DVec2::new(20.0, 100.0), 0.0, &walls, &[mirror], &[], 1);
        assert!((path.points[1] - DVec2::new(100.0, 100.0)).length() < 1e-6);
        // 45° mirror (canvas space) turns a rightward ray downward
        let out = path.bounces[0].outgoing;
        assert!(out.x.abs() < 1e-9 && (out.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_escape_is_flagged_not_fatal() {
        let walls = vec![Wall::new("only", DVec2::new(0.0, 0.0), DVec2::new(0.0, 100.0))];
        let path = compute_ball_path(DVec2::new(50.0, 50.0), 0.0, &walls, &[], &[], 10);
        assert!(path.escaped);
        assert!(path.bounces.is_empty());
        assert!((path.points[1] - DVec2::new(50.0 + ESCAPE_TAIL, 50.0)).length() < 1e-9);

        let preview = compute_prediction_path(DVec2::new(50.0, 50.0), 0.0, &walls, &[], 10);
        assert!((preview[1] - DVec2::new(50.0 + PREDICTION_ESCAPE_TAIL, 50.0)).length() < 1e-9);
    }

    #[test]
    fn test_parallel_corridor_terminates() {
        let walls = vec![
            Wall::new("a", DVec2::new(0.0, 0.0), DVec2::new(1000.0, 0.0)),
            Wall::new("b", DVec2::new(0.0, 10.0), DVec2::new(1000.0, 10.0)),
        ];
        let path = compute_ball_path(DVec2::new(5.0, 5.0), 80.0, &walls, &[], &[], 25);
        assert!(path.bounces.len() <= 25);
        // Running along the corridor never bounces
        let path = compute_ball_path(DVec2::new(5.0, 5.0), 0.0, &walls, &[], &[], 25);
        assert!(path.escaped);
    }

    #[test]
    fn test_prediction_matches_shot() {
        let walls = rect_room(40.0, 80.0, 320.0, 440.0);
        let start = DVec2::new(80.0, 460.0);
        let shot = compute_ball_path(start, 37.0, &walls, &[], &[], 5);
        let preview = compute_prediction_path(start, 37.0, &walls, &[], 5);
        assert_eq!(shot.points, preview);
    }

    #[test]
    fn test_interpolate_endpoints_and_middle() {
        let pts = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), DVec2::new(10.0, 10.0)];
        assert_eq!(interpolate_path(&pts, 0.0), pts[0]);
        assert_eq!(interpolate_path(&pts, 1.0), pts[2]);
        assert_eq!(interpolate_path(&pts, -3.0), pts[0]);
        assert_eq!(interpolate_path(&pts, 7.0), pts[2]);
        assert!((interpolate_path(&pts, 0.75) - DVec2::new(10.0, 5.0)).length() < 1e-12);
        assert_eq!(path_length(&pts), 20.0);
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(interpolate_path(&[], 0.5), DVec2::ZERO);
        let same = [DVec2::new(3.0, 4.0); 4];
        assert_eq!(path_length(&same), 0.0);
        assert_eq!(interpolate_path(&same, 0.5), same[0]);
    }

    proptest! {
        #[test]
        fn prop_bounce_budget_respected(angle in -180.0f64..180.0, max in 0u32..40) {
            let walls = rect_room(40.0, 80.0, 320.0, 440.0);
            let path = compute_ball_path(DVec2::new(200.0, 300.0), angle, &walls, &[], &[], max);
            prop_assert!(path.bounces.len() <= max as usize);
            prop_assert!(path.points.len() <= max as usize + 1);
        }

        #[test]
        fn prop_interpolation_hits_endpoints(
            coords in proptest::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 2..8)
        ) {
            let pts: Vec<DVec2> = coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
            prop_assert_eq!(interpolate_path(&pts, 0.0), pts[0]);
            prop_assert_eq!(interpolate_path(&pts, 1.0), pts[pts.len() - 1]);
        }
    }
}
