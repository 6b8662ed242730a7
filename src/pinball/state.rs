//! Pinball session state machine
//!
//! `LevelSelect -> Aiming -> Animating -> {Complete | Aiming}`. A fired shot
//! carries a shot number; frame events for any other shot are dropped, so a
//! level switch mid-animation cannot be overwritten by stale callbacks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Reflector, Target};
use super::levels::{LevelConfig, level_by_id, levels};
use super::shot::{
    aim_angle_from_pointer, announce_targets, progress_at, reflector_angle_from_pointer,
    reflector_at, shot_duration,
};
use super::trace::{BallPath, compute_ball_path, compute_prediction_path, interpolate_path};
use crate::progress::Progress;
use crate::settings::Settings;

/// Aim angle a level starts with, in degrees
pub const INITIAL_AIM_ANGLE: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    LevelSelect,
    #[default]
    Aiming,
    Animating,
    Complete,
}

/// Player input and animation events
#[derive(Debug, Clone, PartialEq)]
pub enum PinballAction {
    StartAim,
    SetAimAngle(f64),
    FireShot(BallPath),
    UpdateAnimation { shot: u32, progress: f64 },
    HitTarget { shot: u32, target_id: String },
    ShotComplete { shot: u32 },
    ResetLevel,
    SelectLevel(u32),
    GoToLevelSelect,
    SelectReflector(Option<String>),
    RotateReflector { id: String, angle: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinballState {
    pub levels: Vec<LevelConfig>,
    pub level: LevelConfig,
    pub phase: GamePhase,
    /// Degrees, 0 = right, counter-clockwise positive
    pub aim_angle: f64,
    /// The player is dragging to aim
    pub is_aiming: bool,
    pub current_path: Option<BallPath>,
    /// 0 = launch point, 1 = end of path
    pub animation_progress: f64,
    pub shots_taken: u32,
    /// Level targets with their hit flags for this attempt
    pub targets: Vec<Target>,
    /// Reflectors as the player has rotated them
    pub reflectors: Vec<Reflector>,
    pub selected_reflector: Option<String>,
    /// Stars earned on completion
    pub stars: u8,
    pub progress: Progress,
    /// Number of the shot currently allowed to drive the animation
    pub shot: u32,
}

impl PinballState {
    pub fn new() -> Self {
        Self::with_levels(levels())
    }

    pub fn with_levels(levels: Vec<LevelConfig>) -> Self {
        let level = levels.first().cloned().unwrap_or_else(|| {
            log::warn!("Empty Pinball level set, using built-in levels");
            super::levels::levels()[0].clone()
        });
        let mut state = Self {
            levels,
            phase: GamePhase::Aiming,
            aim_angle: INITIAL_AIM_ANGLE,
            is_aiming: false,
            current_path: None,
            animation_progress: 0.0,
            shots_taken: 0,
            targets: Vec::new(),
            reflectors: Vec::new(),
            selected_reflector: None,
            stars: 0,
            progress: Progress::new(),
            shot: 0,
            level,
        };
        state.load_level();
        state
    }

    fn load_level(&mut self) {
        self.phase = GamePhase::Aiming;
        self.aim_angle = INITIAL_AIM_ANGLE;
        self.is_aiming = false;
        self.current_path = None;
        self.animation_progress = 0.0;
        self.shots_taken = 0;
        self.targets = reset_targets(&self.level.targets);
        self.reflectors = self.level.reflectors.clone();
        self.selected_reflector = None;
        self.stars = 0;
        // Invalidate any in-flight shot
        self.shot = self.shot.wrapping_add(1);
    }

    pub fn all_targets_hit(&self) -> bool {
        self.targets.iter().all(|t| t.hit)
    }

    pub fn shots_remaining(&self) -> u32 {
        self.level.max_shots.saturating_sub(self.shots_taken)
    }

    fn is_current_shot(&self, shot: u32) -> bool {
        self.phase == GamePhase::Animating && shot == self.shot
    }
}

impl Default for PinballState {
    fn default() -> Self {
        Self::new()
    }
}

fn reset_targets(targets: &[Target]) -> Vec<Target> {
    targets
        .iter()
        .map(|t| Target {
            hit: false,
            ..t.clone()
        })
        .collect()
}

/// Stars for clearing a level in `shots_taken` shots
pub fn calculate_stars(shots_taken: u32, par_shots: u32, max_shots: u32) -> u8 {
    if shots_taken <= par_shots {
        3
    } else if shots_taken <= (par_shots + max_shots).div_ceil(2) {
        2
    } else {
        1
    }
}

/// Apply one action
pub fn reduce(mut state: PinballState, action: PinballAction) -> PinballState {
    apply(&mut state, action);
    state
}

fn apply(state: &mut PinballState, action: PinballAction) {
    match action {
        PinballAction::StartAim => {
            if state.phase == GamePhase::Aiming {
                state.is_aiming = true;
            }
        }
        PinballAction::SetAimAngle(angle) => state.aim_angle = angle,
        PinballAction::FireShot(path) => {
            if state.phase == GamePhase::Aiming {
                state.phase = GamePhase::Animating;
                state.is_aiming = false;
                state.current_path = Some(path);
                state.animation_progress = 0.0;
                state.shots_taken += 1;
                state.shot = state.shot.wrapping_add(1);
                log::debug!(
                    "Shot {} of {} at {:.1}°",
                    state.shots_taken,
                    state.level.max_shots,
                    state.aim_angle
                );
            }
        }
        PinballAction::UpdateAnimation { shot, progress } => {
            if state.is_current_shot(shot) {
                state.animation_progress = progress.clamp(0.0, 1.0);
            }
        }
        PinballAction::HitTarget { shot, target_id } => {
            if state.is_current_shot(shot) {
                if let Some(target) = state.targets.iter_mut().find(|t| t.id == target_id) {
                    target.hit = true;
                }
            }
        }
        PinballAction::ShotComplete { shot } => {
            if !state.is_current_shot(shot) {
                return;
            }
            state.current_path = None;
            if state.all_targets_hit() {
                let stars = calculate_stars(
                    state.shots_taken,
                    state.level.par_shots,
                    state.level.max_shots,
                );
                log::info!(
                    "Pinball level {} cleared in {} shots: {} stars",
                    state.level.id,
                    state.shots_taken,
                    stars
                );
                state.phase = GamePhase::Complete;
                state.stars = stars;
                state.progress.record(state.level.id, stars);
            } else if state.shots_taken >= state.level.max_shots {
                log::info!("Out of shots on pinball level {}, restarting", state.level.id);
                state.phase = GamePhase::Aiming;
                state.targets = reset_targets(&state.level.targets);
                state.shots_taken = 0;
            } else {
                state.phase = GamePhase::Aiming;
            }
        }
        PinballAction::ResetLevel => state.load_level(),
        PinballAction::SelectLevel(id) => {
            if let Some(level) = level_by_id(&state.levels, id).cloned() {
                log::info!("Pinball level {}: {}", level.id, level.name);
                state.level = level;
                state.load_level();
            }
        }
        PinballAction::GoToLevelSelect => state.phase = GamePhase::LevelSelect,
        PinballAction::SelectReflector(id) => state.selected_reflector = id,
        PinballAction::RotateReflector { id, angle } => {
            if state.phase != GamePhase::Animating {
                if let Some(r) = state.reflectors.iter_mut().find(|r| r.id == id) {
                    r.angle = angle;
                }
            }
        }
    }
}

/// A running Pinball game: pointer handling and the shot clock
pub struct PinballSession {
    pub state: PinballState,
    pub settings: Settings,
    /// Seconds since the current shot was fired
    elapsed: f64,
    announced: Vec<String>,
}

impl PinballSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: PinballState::new(),
            settings,
            elapsed: 0.0,
            announced: Vec::new(),
        }
    }

    /// Apply an action; a new shot number restarts the shot clock
    pub fn dispatch(&mut self, action: PinballAction) {
        let shot = self.state.shot;
        apply(&mut self.state, action);
        if self.state.shot != shot {
            self.elapsed = 0.0;
            self.announced.clear();
        }
    }

    pub fn pointer_down(&mut self, point: DVec2) {
        if self.state.phase != GamePhase::Aiming {
            return;
        }

        if let Some(r) = reflector_at(
            point,
            &self.state.reflectors,
            self.settings.pinball_reflector_grab_slack,
        ) {
            let id = r.id.clone();
            self.dispatch(PinballAction::SelectReflector(Some(id)));
            return;
        }

        if self.state.selected_reflector.is_some() {
            self.dispatch(PinballAction::SelectReflector(None));
        }

        if point.distance(self.state.level.launch_point) < self.settings.pinball_aim_grab_radius {
            self.dispatch(PinballAction::StartAim);
        }
    }

    pub fn pointer_move(&mut self, point: DVec2) {
        if self.state.is_aiming && self.state.phase == GamePhase::Aiming {
            let angle = aim_angle_from_pointer(self.state.level.launch_point, point);
            self.dispatch(PinballAction::SetAimAngle(angle));
        } else if let Some(id) = self.state.selected_reflector.clone() {
            let center = self
                .state
                .reflectors
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.center);
            if let Some(center) = center {
                let angle = reflector_angle_from_pointer(center, point);
                self.dispatch(PinballAction::RotateReflector { id, angle });
            }
        }
    }

    /// Releasing an aim drag fires
    pub fn pointer_up(&mut self) {
        if self.state.is_aiming && self.state.phase == GamePhase::Aiming {
            self.fire();
        }
    }

    /// Trace and fire a shot at the current aim angle
    pub fn fire(&mut self) {
        if self.state.phase != GamePhase::Aiming {
            return;
        }
        let level = &self.state.level;
        let path = compute_ball_path(
            level.launch_point,
            self.state.aim_angle,
            &level.walls,
            &self.state.reflectors,
            &self.state.targets,
            level.max_bounces,
        );
        self.dispatch(PinballAction::FireShot(path));
    }

    /// Advance the shot clock by `dt` seconds
    pub fn frame(&mut self, dt: f64) {
        if self.state.phase != GamePhase::Animating {
            return;
        }
        let Some(path) = self.state.current_path.as_ref() else {
            return;
        };
        let shot = self.state.shot;

        self.elapsed += dt.max(0.0);
        let duration = shot_duration(path, self.settings.pinball_ball_speed);
        let progress = progress_at(self.elapsed, duration);

        let mut hits = announce_targets(
            path,
            &self.state.targets,
            progress,
            self.settings.pinball_ball_radius,
            &mut self.announced,
        );

        if progress >= 1.0 {
            // Frames can step over a target; the traced path is authoritative
            for id in &path.targets_hit {
                if !self.announced.contains(id) {
                    self.announced.push(id.clone());
                    hits.push(id.clone());
                }
            }
        }

        self.dispatch(PinballAction::UpdateAnimation { shot, progress });
        for target_id in hits {
            self.dispatch(PinballAction::HitTarget { shot, target_id });
        }

        if progress >= 1.0 {
            self.dispatch(PinballAction::ShotComplete { shot });
        }
    }

    /// Preview polyline for the current aim, empty when the level has none
    pub fn prediction(&self) -> Vec<DVec2> {
        let level = &self.state.level;
        if self.state.phase != GamePhase::Aiming || level.prediction_bounces == 0 {
            return Vec::new();
        }
        compute_prediction_path(
            level.launch_point,
            self.state.aim_angle,
            &level.walls,
            &self.state.reflectors,
            level.prediction_bounces,
        )
    }

    /// Where the ball is drawn this frame
    pub fn ball_position(&self) -> Option<DVec2> {
        if self.state.phase != GamePhase::Animating {
            return None;
        }
        self.state
            .current_path
            .as_ref()
            .map(|p| interpolate_path(&p.points, self.state.animation_progress))
    }

    /// Fire at `angle` and run the shot to completion
    pub fn play_shot(&mut self, angle: f64) {
        self.dispatch(PinballAction::SetAimAngle(angle));
        self.fire();
        let mut guard = 0;
        while self.state.phase == GamePhase::Animating && guard < 10_000 {
            self.frame(1.0 / 60.0);
            guard += 1;
        }
    }
}
