//! Voyager session: drawing the chain, launching, landing
//!
//! Dragging near the end of the chain adds a vector; dragging an arrowhead
//! adjusts that vector and carries every later vector along with it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collision, check_collisions};
use super::flight::{FlightOutcome, FlightPlan, ShipPose};
use super::levels::{LevelConfig, level_by_id, levels};
use super::scoring::{compute_stars, is_over_budget, total_fuel_used};
use super::vectors::{GameVector, clamp_to_board, magnitude, move_head, resultant_end};
use crate::ids::IdAllocator;
use crate::progress::Progress;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VoyagerPhase {
    /// Player draws vectors
    #[default]
    Planning,
    /// Ship is flying
    Launching,
    Success,
    Collision,
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragMode {
    /// Dragging the head of a freshly added last vector
    New,
    /// Dragging the head of an existing vector
    Adjust(usize),
}

/// Drag and flight thresholds taken from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handling {
    pub grab_radius: f64,
    pub handle_radius: f64,
    pub min_vector_len: f64,
    pub board_margin: f64,
    pub ship_speed: f64,
    pub min_flight_secs: f64,
}

impl From<&Settings> for Handling {
    fn from(s: &Settings) -> Self {
        Self {
            grab_radius: s.voyager_grab_radius,
            handle_radius: s.voyager_handle_radius,
            min_vector_len: s.voyager_min_vector_len,
            board_margin: s.voyager_board_margin,
            ship_speed: s.voyager_ship_speed,
            min_flight_secs: s.voyager_min_flight_secs,
        }
    }
}

impl Default for Handling {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Player input and flight events
#[derive(Debug, Clone, PartialEq)]
pub enum VoyagerAction {
    BeginDrag(DVec2),
    DragMove(DVec2),
    EndDrag,
    Undo,
    Clear,
    Launch,
    /// The flight numbered `flight` reached its end
    FlightFinished { flight: u32 },
    SelectLevel(u32),
    NextLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyagerState {
    pub levels: Vec<LevelConfig>,
    pub level: LevelConfig,
    pub phase: VoyagerPhase,
    pub vectors: Vec<GameVector>,
    pub drag: Option<DragMode>,
    pub flight_plan: Option<FlightPlan>,
    /// Number of the flight allowed to report landing
    pub flight: u32,
    pub stars: u8,
    pub progress: Progress,
    pub handling: Handling,
    ids: IdAllocator,
}

impl VoyagerState {
    pub fn new() -> Self {
        Self::with_levels(levels())
    }

    pub fn with_levels(levels: Vec<LevelConfig>) -> Self {
        let level = levels.first().cloned().unwrap_or_else(|| {
            log::warn!("Empty Voyager level set, using built-in levels");
            super::levels::levels()[0].clone()
        });
        Self {
            levels,
            level,
            phase: VoyagerPhase::Planning,
            vectors: Vec::new(),
            drag: None,
            flight_plan: None,
            flight: 0,
            stars: 0,
            progress: Progress::new(),
            handling: Handling::default(),
            ids: IdAllocator::new(),
        }
    }

    fn reset(&mut self) {
        self.phase = VoyagerPhase::Planning;
        self.vectors.clear();
        self.drag = None;
        self.flight_plan = None;
        self.stars = 0;
        // Invalidate any flight still animating
        self.flight = self.flight.wrapping_add(1);
    }

    pub fn fuel_used(&self) -> f64 {
        total_fuel_used(&self.vectors)
    }

    pub fn over_budget(&self) -> bool {
        is_over_budget(self.fuel_used(), self.level.fuel_budget)
    }

    /// Collision the current chain would run into
    pub fn predicted_collision(&self) -> Option<Collision> {
        check_collisions(&self.vectors, &self.level.asteroids)
    }

    /// Launch button state: something drawn, nothing in the way, within budget
    pub fn can_launch(&self) -> bool {
        self.phase == VoyagerPhase::Planning
            && !self.vectors.is_empty()
            && !self.over_budget()
            && self.predicted_collision().is_none()
    }

    /// Where the next vector starts
    pub fn chain_end(&self) -> DVec2 {
        resultant_end(&self.vectors).unwrap_or(self.level.ship_start)
    }

    pub fn has_next_level(&self) -> bool {
        self.levels.iter().any(|l| l.id == self.level.id + 1)
    }

    fn handle_at(&self, point: DVec2) -> Option<usize> {
        self.vectors
            .iter()
            .rposition(|v| v.end.distance(point) <= self.handling.handle_radius)
    }

    fn select_level(&mut self, id: u32) {
        if let Some(level) = level_by_id(&self.levels, id).cloned() {
            log::info!("Voyager level {}: {}", level.id, level.name);
            self.level = level;
            self.reset();
        }
    }
}

impl Default for VoyagerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one action
pub fn reduce(mut state: VoyagerState, action: VoyagerAction) -> VoyagerState {
    apply(&mut state, action);
    state
}

fn apply(state: &mut VoyagerState, action: VoyagerAction) {
    match action {
        VoyagerAction::BeginDrag(point) => {
            if state.phase != VoyagerPhase::Planning {
                return;
            }
            if let Some(idx) = state.handle_at(point) {
                state.drag = Some(DragMode::Adjust(idx));
                return;
            }
            let start = state.chain_end();
            if start.distance(point) > state.handling.grab_radius {
                return;
            }
            let id = state.ids.next_id();
            state.vectors.push(GameVector {
                id,
                start,
                end: clamp_to_board(point, state.handling.board_margin),
            });
            state.drag = Some(DragMode::New);
        }
        VoyagerAction::DragMove(point) => {
            let head = clamp_to_board(point, state.handling.board_margin);
            match state.drag {
                Some(DragMode::New) => {
                    if let Some(last) = state.vectors.last_mut() {
                        last.end = head;
                    }
                }
                Some(DragMode::Adjust(idx)) => move_head(&mut state.vectors, idx, head),
                None => {}
            }
        }
        VoyagerAction::EndDrag => {
            if state.drag.take().is_some()
                && state
                    .vectors
                    .last()
                    .is_some_and(|v| magnitude(v) < state.handling.min_vector_len)
            {
                state.vectors.pop();
            }
        }
        VoyagerAction::Undo => {
            if state.phase == VoyagerPhase::Planning {
                state.drag = None;
                state.vectors.pop();
            }
        }
        VoyagerAction::Clear => state.reset(),
        VoyagerAction::Launch => {
            if state.phase != VoyagerPhase::Planning || state.vectors.is_empty() || state.over_budget() {
                return;
            }
            let h = state.handling;
            let plan = FlightPlan::new(
                state.level.ship_start,
                &state.vectors,
                &state.level.asteroids,
                state.level.target,
                state.level.target_radius,
                h.ship_speed,
                h.min_flight_secs,
            );
            log::debug!(
                "Launching {} vectors, {:.1} fuel, {:.2}s flight",
                state.vectors.len(),
                state.fuel_used(),
                plan.duration()
            );
            state.drag = None;
            state.flight = state.flight.wrapping_add(1);
            state.flight_plan = Some(plan);
            state.phase = VoyagerPhase::Launching;
        }
        VoyagerAction::FlightFinished { flight } => {
            if state.phase != VoyagerPhase::Launching || flight != state.flight {
                return;
            }
            let outcome = state
                .flight_plan
                .as_ref()
                .map_or(FlightOutcome::Missed, |p| p.outcome());
            state.phase = match outcome {
                FlightOutcome::Collision(c) => {
                    log::info!(
                        "Ship hit asteroid {} on vector {}",
                        c.asteroid_idx,
                        c.vector_idx + 1
                    );
                    VoyagerPhase::Collision
                }
                FlightOutcome::Success => {
                    let stars = compute_stars(
                        true,
                        state.vectors.len(),
                        state.level.par,
                        state.fuel_used(),
                        state.level.fuel_budget,
                    );
                    log::info!("Voyager level {} reached: {} stars", state.level.id, stars);
                    state.stars = stars;
                    state.progress.record(state.level.id, stars);
                    VoyagerPhase::Success
                }
                FlightOutcome::Missed => VoyagerPhase::Missed,
            };
        }
        VoyagerAction::SelectLevel(id) => state.select_level(id),
        VoyagerAction::NextLevel => {
            if state.phase == VoyagerPhase::Success && state.has_next_level() {
                state.select_level(state.level.id + 1);
            }
        }
    }
}

/// A running Voyager game: the reducer plus the flight clock
pub struct VoyagerSession {
    pub state: VoyagerState,
    /// Seconds since launch
    elapsed: f64,
}

impl VoyagerSession {
    pub fn new(settings: &Settings) -> Self {
        let mut state = VoyagerState::new();
        state.handling = Handling::from(settings);
        Self { state, elapsed: 0.0 }
    }

    /// Apply an action; a new flight number restarts the flight clock
    pub fn dispatch(&mut self, action: VoyagerAction) {
        let flight = self.state.flight;
        apply(&mut self.state, action);
        if self.state.flight != flight {
            self.elapsed = 0.0;
        }
    }

    pub fn launch(&mut self) {
        self.dispatch(VoyagerAction::Launch);
    }

    /// Advance the flight clock by `dt` seconds
    pub fn frame(&mut self, dt: f64) {
        if self.state.phase != VoyagerPhase::Launching {
            return;
        }
        self.elapsed += dt.max(0.0);
        let finished = self
            .state
            .flight_plan
            .as_ref()
            .is_none_or(|p| p.is_finished(self.elapsed));
        if finished {
            let flight = self.state.flight;
            self.dispatch(VoyagerAction::FlightFinished { flight });
        }
    }

    /// Ship pose for drawing
    pub fn ship_pose(&self) -> ShipPose {
        match (&self.state.flight_plan, self.state.phase) {
            (_, VoyagerPhase::Planning) | (None, _) => ShipPose {
                position: self.state.level.ship_start,
                heading: 0.0,
            },
            (Some(plan), _) => plan.sample(self.elapsed),
        }
    }

    /// Draw a vector from the chain end to `head` in one gesture.
    ///
    /// The press lands between the arrowhead handle and the grab radius so
    /// it starts a new vector instead of adjusting the last one.
    pub fn draw_vector(&mut self, head: DVec2) {
        let start = self.state.chain_end();
        let h = self.state.handling;
        let reach = (h.handle_radius + h.grab_radius) / 2.0;
        let press = start + (head - start).normalize_or_zero() * reach;
        self.dispatch(VoyagerAction::BeginDrag(press));
        self.dispatch(VoyagerAction::DragMove(head));
        self.dispatch(VoyagerAction::EndDrag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voyager::vectors::direction;

    fn session() -> VoyagerSession {
        VoyagerSession::new(&Settings::default())
    }

    fn fly(session: &mut VoyagerSession) {
        session.launch();
        let mut guard = 0;
        while session.state.phase == VoyagerPhase::Launching && guard < 10_000 {
            session.frame(1.0 / 60.0);
            guard += 1;
        }
    }

    #[test]
    fn test_drag_creates_vector_from_ship() {
        let mut s = session();
        let start = s.state.level.ship_start;
        s.dispatch(VoyagerAction::BeginDrag(start + DVec2::new(10.0, 0.0)));
        assert_eq!(s.state.vectors.len(), 1);
        assert_eq!(s.state.vectors[0].start, start);
        s.dispatch(VoyagerAction::DragMove(DVec2::new(200.0, 300.0)));
        s.dispatch(VoyagerAction::EndDrag);
        assert_eq!(s.state.vectors[0].end, DVec2::new(200.0, 300.0));
        assert!(s.state.drag.is_none());
    }

    #[test]
    fn test_far_press_is_ignored() {
        let mut s = session();
        s.dispatch(VoyagerAction::BeginDrag(DVec2::new(400.0, 40.0)));
        assert!(s.state.vectors.is_empty());
        assert!(s.state.drag.is_none());
    }

    #[test]
    fn test_tiny_vector_dropped_on_release() {
        let mut s = session();
        let start = s.state.level.ship_start;
        s.dispatch(VoyagerAction::BeginDrag(start + DVec2::new(3.0, 0.0)));
        s.dispatch(VoyagerAction::EndDrag);
        assert!(s.state.vectors.is_empty());
    }

    #[test]
    fn test_drag_is_clamped_to_board() {
        let mut s = session();
        let start = s.state.level.ship_start;
        s.dispatch(VoyagerAction::BeginDrag(start));
        s.dispatch(VoyagerAction::DragMove(DVec2::new(900.0, -50.0)));
        assert_eq!(s.state.vectors[0].end, DVec2::new(434.0, 6.0));
    }

    #[test]
    fn test_adjust_cascades_through_chain() {
        let mut s = session();
        s.draw_vector(DVec2::new(160.0, 300.0));
        s.draw_vector(DVec2::new(260.0, 300.0));
        s.draw_vector(DVec2::new(260.0, 200.0));
        let deltas: Vec<DVec2> = s.state.vectors.iter().map(direction).collect();

        s.dispatch(VoyagerAction::BeginDrag(DVec2::new(162.0, 302.0)));
        assert_eq!(s.state.drag, Some(DragMode::Adjust(0)));
        s.dispatch(VoyagerAction::DragMove(DVec2::new(150.0, 250.0)));
        s.dispatch(VoyagerAction::EndDrag);

        let vs = &s.state.vectors;
        assert_eq!(vs.len(), 3);
        assert_eq!(vs[1].start, DVec2::new(150.0, 250.0));
        assert_eq!(direction(&vs[1]), deltas[1]);
        assert_eq!(vs[2].start, vs[1].end);
        assert_eq!(direction(&vs[2]), deltas[2]);
    }

    #[test]
    fn test_undo_and_clear() {
        let mut s = session();
        s.draw_vector(DVec2::new(160.0, 300.0));
        s.draw_vector(DVec2::new(260.0, 300.0));
        s.dispatch(VoyagerAction::Undo);
        assert_eq!(s.state.vectors.len(), 1);
        s.dispatch(VoyagerAction::Clear);
        assert!(s.state.vectors.is_empty());
        assert_eq!(s.state.phase, VoyagerPhase::Planning);
        // Ids keep counting within the session
        s.draw_vector(DVec2::new(160.0, 300.0));
        assert_eq!(s.state.vectors[0].id, 2);
    }

    #[test]
    fn test_launch_refused_when_empty_or_over_budget() {
        let mut s = session();
        s.launch();
        assert_eq!(s.state.phase, VoyagerPhase::Planning);

        s.dispatch(VoyagerAction::SelectLevel(3));
        // Around the asteroid the long way: well over the 420 budget
        s.draw_vector(DVec2::new(60.0, 40.0));
        s.draw_vector(DVec2::new(380.0, 40.0));
        s.draw_vector(DVec2::new(380.0, 220.0));
        assert!(s.state.over_budget());
        assert!(!s.state.can_launch());
        s.launch();
        assert_eq!(s.state.phase, VoyagerPhase::Planning);
    }

    #[test]
    fn test_successful_flight_scores_and_records() {
        let mut s = session();
        s.draw_vector(DVec2::new(380.0, 380.0));
        assert!(s.state.can_launch());
        fly(&mut s);
        assert_eq!(s.state.phase, VoyagerPhase::Success);
        assert_eq!(s.state.stars, 3);
        assert_eq!(s.state.progress.best(1), 3);
        assert_eq!(s.ship_pose().position, DVec2::new(380.0, 380.0));

        s.dispatch(VoyagerAction::NextLevel);
        assert_eq!(s.state.level.id, 2);
        assert!(s.state.vectors.is_empty());
    }

    #[test]
    fn test_missed_flight() {
        let mut s = session();
        s.draw_vector(DVec2::new(200.0, 380.0));
        fly(&mut s);
        assert_eq!(s.state.phase, VoyagerPhase::Missed);
        assert_eq!(s.state.stars, 0);
        assert!(s.state.progress.is_empty());
    }

    #[test]
    fn test_collision_flight_stops_at_impact() {
        let mut s = session();
        s.dispatch(VoyagerAction::SelectLevel(3));
        s.draw_vector(DVec2::new(100.0, 220.0));
        s.draw_vector(DVec2::new(380.0, 220.0));
        assert!(s.state.predicted_collision().is_some());
        assert!(!s.state.can_launch());

        fly(&mut s);
        assert_eq!(s.state.phase, VoyagerPhase::Collision);
        assert!((s.ship_pose().position - DVec2::new(180.0, 220.0)).length() < 1e-9);
    }

    #[test]
    fn test_dispatched_launch_gets_a_fresh_clock() {
        let mut s = session();
        s.draw_vector(DVec2::new(380.0, 380.0));
        fly(&mut s);
        assert_eq!(s.state.phase, VoyagerPhase::Success);

        s.dispatch(VoyagerAction::Clear);
        s.draw_vector(DVec2::new(380.0, 380.0));
        s.dispatch(VoyagerAction::Launch);
        s.frame(1.0 / 60.0);
        assert_eq!(s.state.phase, VoyagerPhase::Launching);
        assert!(s.ship_pose().position.x < 100.0);

        fly(&mut s);
        assert_eq!(s.state.phase, VoyagerPhase::Success);
    }

    #[test]
    fn test_stale_flight_ignored_after_level_change() {
        let mut s = session();
        s.draw_vector(DVec2::new(380.0, 380.0));
        s.launch();
        let stale = s.state.flight;
        s.dispatch(VoyagerAction::SelectLevel(2));
        s.dispatch(VoyagerAction::FlightFinished { flight: stale });
        assert_eq!(s.state.phase, VoyagerPhase::Planning);
        assert!(s.state.progress.is_empty());
    }

    #[test]
    fn test_no_editing_while_flying() {
        let mut s = session();
        s.draw_vector(DVec2::new(380.0, 380.0));
        s.launch();
        s.dispatch(VoyagerAction::BeginDrag(DVec2::new(380.0, 380.0)));
        s.dispatch(VoyagerAction::Undo);
        assert_eq!(s.state.vectors.len(), 1);
        assert!(s.state.drag.is_none());
    }
}
