//! Shot timing and pointer mapping
//!
//! The ball's on-screen position is a pure function of elapsed time: the
//! shot lasts `path_length / speed` seconds and the ball sits at
//! `interpolate_path(points, elapsed / duration)`.

use glam::DVec2;

use super::geometry::{Reflector, Target};
use super::trace::{BallPath, interpolate_path, path_length};
use crate::{angle_deg, rad_to_deg};

/// Seconds needed to roll the whole path at `speed` units per second
pub fn shot_duration(path: &BallPath, speed: f64) -> f64 {
    if speed <= 0.0 {
        return 0.0;
    }
    path_length(&path.points) / speed
}

/// Animation progress in [0, 1]; a zero-length shot is immediately done
pub fn progress_at(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Targets from `path.targets_hit` the ball is touching at `progress`.
///
/// Ids already in `announced` are skipped; newly touched ids are appended to
/// it and returned.
pub fn announce_targets(
    path: &BallPath,
    targets: &[Target],
    progress: f64,
    ball_radius: f64,
    announced: &mut Vec<String>,
) -> Vec<String> {
    if path.targets_hit.is_empty() {
        return Vec::new();
    }

    let ball = interpolate_path(&path.points, progress);
    let mut fresh = Vec::new();
    for id in &path.targets_hit {
        if announced.contains(id) {
            continue;
        }
        let Some(target) = targets.iter().find(|t| &t.id == id) else {
            continue;
        };
        if ball.distance(target.center) < target.radius + ball_radius {
            announced.push(id.clone());
            fresh.push(id.clone());
        }
    }
    fresh
}

/// Aim angle for a pointer dragged around the launch point (0° = right, CCW)
pub fn aim_angle_from_pointer(launch: DVec2, pointer: DVec2) -> f64 {
    angle_deg(pointer - launch)
}

/// Reflector angle for a pointer dragged around its centre (canvas
/// convention, y down)
pub fn reflector_angle_from_pointer(center: DVec2, pointer: DVec2) -> f64 {
    let d = pointer - center;
    rad_to_deg(d.y.atan2(d.x))
}

/// First reflector whose centre lies within `half_length + slack` of `point`
pub fn reflector_at<'a>(point: DVec2, reflectors: &'a [Reflector], slack: f64) -> Option<&'a Reflector> {
    reflectors
        .iter()
        .find(|r| point.distance(r.center) < r.half_length + slack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(targets_hit: &[&str]) -> BallPath {
        BallPath {
            points: vec![DVec2::new(0.0, 0.0), DVec2::new(450.0, 0.0)],
            bounces: vec![],
            targets_hit: targets_hit.iter().map(|s| s.to_string()).collect(),
            escaped: false,
        }
    }

    #[test]
    fn test_duration_and_progress() {
        let path = straight_path(&[]);
        assert_eq!(shot_duration(&path, 450.0), 1.0);
        assert_eq!(shot_duration(&path, 0.0), 0.0);
        assert_eq!(progress_at(0.5, 1.0), 0.5);
        assert_eq!(progress_at(3.0, 1.0), 1.0);
        assert_eq!(progress_at(-1.0, 1.0), 0.0);
        assert_eq!(progress_at(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_targets_announced_once_when_reached() {
        let path = straight_path(&["t1"]);
        let targets = [Target {
            id: "t1".into(),
            center: DVec2::new(300.0, 0.0),
            radius: 20.0,
            hit: false,
        }];
        let mut announced = Vec::new();

        assert!(announce_targets(&path, &targets, 0.2, 7.0, &mut announced).is_empty());
        let fresh = announce_targets(&path, &targets, 0.65, 7.0, &mut announced);
        assert_eq!(fresh, vec!["t1".to_string()]);
        assert!(announce_targets(&path, &targets, 0.66, 7.0, &mut announced).is_empty());
        assert_eq!(announced, vec!["t1".to_string()]);
    }

    #[test]
    fn test_unknown_target_ids_are_skipped() {
        let path = straight_path(&["ghost"]);
        let mut announced = Vec::new();
        assert!(announce_targets(&path, &[], 0.5, 7.0, &mut announced).is_empty());
    }

    #[test]
    fn test_pointer_angles() {
        let launch = DVec2::new(100.0, 100.0);
        assert!((aim_angle_from_pointer(launch, DVec2::new(200.0, 100.0))).abs() < 1e-9);
        // Pointer above the launch point on a y-down canvas aims up
        assert!((aim_angle_from_pointer(launch, DVec2::new(100.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((reflector_angle_from_pointer(launch, DVec2::new(100.0, 200.0)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflector_hit_test() {
        let reflectors = [Reflector {
            id: "ref1".into(),
            center: DVec2::new(200.0, 340.0),
            angle: 45.0,
            half_length: 40.0,
        }];
        assert_eq!(
            reflector_at(DVec2::new(250.0, 340.0), &reflectors, 20.0).map(|r| r.id.as_str()),
            Some("ref1")
        );
        assert!(reflector_at(DVec2::new(261.0, 340.0), &reflectors, 20.0).is_none());
    }
}
