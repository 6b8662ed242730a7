//! Plinko session state and transitions
//!
//! The presentation layer owns a [`PlinkoState`] and feeds it
//! [`PlinkoAction`]s through [`reduce`]. Random draws happen outside the
//! reducer ([`PlinkoSession::drop_balls`]) so every transition is pure.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{PEG_RADIUS, PegGrid, create_pegs, get_bin_count, peg_at, snap_probability};
use super::levels::{LevelConfig, level_by_id, levels};
use super::path::{BallPath, compute_ball_path};
use super::scoring::{BinStats, compute_match_percent, compute_stats, level_stars};
use crate::ids::IdAllocator;
use crate::progress::Progress;
use crate::settings::{DropCount, DropSpeed, Settings};

/// A ball currently falling through the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBall {
    pub id: u32,
    pub path: BallPath,
    /// Animation progress, 0 = drop point, 1 = in bin
    pub progress: f64,
    /// Display hue in degrees
    pub hue: u32,
}

/// Player input and frame events
#[derive(Debug, Clone, PartialEq)]
pub enum PlinkoAction {
    SelectLevel(u32),
    /// Tap toggles selection of an unlocked peg
    TapPeg { row: usize, col: usize },
    DeselectPeg,
    /// Raw slider value; snapped to 5% and ignored for locked pegs
    SetProbability { row: usize, col: usize, prob: f64 },
    /// Release balls whose paths were computed against the current pegs
    Drop(Vec<BallPath>),
    /// Advance every falling ball; finished balls land in their bins
    Advance { step: f64 },
    ResetBins,
    SetSpeed(DropSpeed),
    SetDropCount(DropCount),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlinkoState {
    pub levels: Vec<LevelConfig>,
    pub level: LevelConfig,
    pub pegs: PegGrid,
    /// Histogram bin counts
    pub bins: Vec<u32>,
    pub total_balls: u32,
    pub selected_peg: Option<(usize, usize)>,
    pub active_balls: Vec<ActiveBall>,
    pub speed: DropSpeed,
    pub drop_count: DropCount,
    pub progress: Progress,
    ids: IdAllocator,
}

impl PlinkoState {
    /// Start on the first built-in level
    pub fn new() -> Self {
        Self::with_levels(levels())
    }

    /// Start on the first level of a custom level set
    pub fn with_levels(levels: Vec<LevelConfig>) -> Self {
        let level = levels.first().cloned().unwrap_or_else(|| {
            log::warn!("Empty Plinko level set, using built-in levels");
            super::levels::levels()[0].clone()
        });
        let mut state = Self {
            levels,
            pegs: Vec::new(),
            bins: Vec::new(),
            total_balls: 0,
            selected_peg: None,
            active_balls: Vec::new(),
            speed: DropSpeed::default(),
            drop_count: DropCount::default(),
            progress: Progress::new(),
            ids: IdAllocator::new(),
            level,
        };
        state.load_level();
        state
    }

    fn load_level(&mut self) {
        self.pegs = create_pegs(&self.level);
        self.bins = vec![0; get_bin_count(self.level.rows)];
        self.total_balls = 0;
        self.active_balls.clear();
        self.selected_peg = None;
    }

    pub fn match_percent(&self) -> f64 {
        compute_match_percent(&self.bins, &self.level.target_distribution)
    }

    pub fn stars(&self) -> u8 {
        level_stars(self.match_percent(), self.total_balls, &self.level)
    }

    pub fn stats(&self) -> BinStats {
        compute_stats(&self.bins)
    }

    pub fn is_dropping(&self) -> bool {
        !self.active_balls.is_empty()
    }

    fn peg_is_editable(&self, row: usize, col: usize) -> bool {
        self.pegs
            .get(row)
            .and_then(|r| r.get(col))
            .is_some_and(|p| !p.locked)
    }
}

impl Default for PlinkoState {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one action
pub fn reduce(mut state: PlinkoState, action: PlinkoAction) -> PlinkoState {
    apply(&mut state, action);
    state
}

fn apply(state: &mut PlinkoState, action: PlinkoAction) {
    match action {
        PlinkoAction::SelectLevel(id) => {
            if let Some(level) = level_by_id(&state.levels, id).cloned() {
                log::info!("Plinko level {}: {}", level.id, level.name);
                state.level = level;
                state.load_level();
            }
        }
        PlinkoAction::TapPeg { row, col } => {
            if state.peg_is_editable(row, col) {
                state.selected_peg = if state.selected_peg == Some((row, col)) {
                    None
                } else {
                    Some((row, col))
                };
            }
        }
        PlinkoAction::DeselectPeg => state.selected_peg = None,
        PlinkoAction::SetProbability { row, col, prob } => {
            if state.peg_is_editable(row, col) {
                state.pegs[row][col].left_prob = snap_probability(prob);
            }
        }
        PlinkoAction::Drop(paths) => {
            let bin_count = state.bins.len();
            for (i, path) in paths.into_iter().enumerate() {
                if path.bin_index >= bin_count {
                    log::warn!("Discarding ball for bin {} of {}", path.bin_index, bin_count);
                    continue;
                }
                let id = state.ids.next_id();
                let hue = ((id as u64 + 1) * 47 + i as u64 * 137) % 360;
                state.active_balls.push(ActiveBall {
                    id,
                    path,
                    progress: 0.0,
                    hue: hue as u32,
                });
            }
        }
        PlinkoAction::Advance { step } => {
            let step = step.max(0.0);
            let mut landed = 0;
            for ball in &mut state.active_balls {
                ball.progress = (ball.progress + step).min(1.0);
                if ball.progress >= 1.0 {
                    state.bins[ball.path.bin_index] += 1;
                    landed += 1;
                }
            }
            if landed > 0 {
                state.active_balls.retain(|b| b.progress < 1.0);
                state.total_balls += landed;
                let stars = state.stars();
                state.progress.record(state.level.id, stars);
            }
        }
        PlinkoAction::ResetBins => {
            state.bins = vec![0; get_bin_count(state.level.rows)];
            state.total_balls = 0;
            state.active_balls.clear();
        }
        PlinkoAction::SetSpeed(speed) => state.speed = speed,
        PlinkoAction::SetDropCount(count) => state.drop_count = count,
    }
}

/// A running Plinko game: state, its RNG and tuning
pub struct PlinkoSession {
    pub state: PlinkoState,
    pub settings: Settings,
    rng: Pcg32,
}

impl PlinkoSession {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            state: PlinkoState::new(),
            settings,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Session seeded from the thread RNG
    pub fn unseeded(settings: Settings) -> Self {
        Self::new(rand::random(), settings)
    }

    pub fn dispatch(&mut self, action: PlinkoAction) {
        apply(&mut self.state, action);
    }

    /// Select the peg under a tap, or deselect when the tap misses
    pub fn tap(&mut self, point: DVec2) {
        match peg_at(point, self.state.level.rows, PEG_RADIUS * 2.0) {
            Some((row, col)) => self.dispatch(PlinkoAction::TapPeg { row, col }),
            None => self.dispatch(PlinkoAction::DeselectPeg),
        }
    }

    /// Compute paths for the current drop count and release them
    pub fn drop_balls(&mut self) {
        let rows = self.state.level.rows;
        let paths = (0..self.state.drop_count.count())
            .map(|_| compute_ball_path(&self.state.pegs, rows, &mut self.rng))
            .collect();
        self.dispatch(PlinkoAction::Drop(paths));
    }

    /// One animation frame at the selected speed
    pub fn frame(&mut self) {
        let step = self.settings.plinko_progress(self.state.speed);
        self.dispatch(PlinkoAction::Advance { step });
    }

    /// Drop `count` balls straight into the histogram, skipping animation
    pub fn simulate(&mut self, count: usize) {
        let rows = self.state.level.rows;
        let paths = (0..count)
            .map(|_| compute_ball_path(&self.state.pegs, rows, &mut self.rng))
            .collect();
        self.dispatch(PlinkoAction::Drop(paths));
        self.dispatch(PlinkoAction::Advance { step: 1.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plinko::scoring::TUTORIAL_AUTO_WIN_BALLS;

    fn path_to(bin_index: usize) -> BallPath {
        BallPath {
            points: Vec::new(),
            bin_index,
        }
    }

    #[test]
    fn test_new_state_matches_first_level() {
        let state = PlinkoState::new();
        assert_eq!(state.level.id, 1);
        assert_eq!(state.bins.len(), get_bin_count(state.level.rows));
        assert_eq!(state.match_percent(), 0.0);
        assert_eq!(state.stars(), 0);
        assert!(!state.is_dropping());
    }

    #[test]
    fn test_locked_pegs_ignore_taps_and_edits() {
        let state = PlinkoState::new();
        assert!(state.level.all_locked);
        let state = reduce(state, PlinkoAction::TapPeg { row: 0, col: 0 });
        assert_eq!(state.selected_peg, None);
        let state = reduce(
            state,
            PlinkoAction::SetProbability {
                row: 0,
                col: 0,
                prob: 0.9,
            },
        );
        assert_eq!(state.pegs[0][0].left_prob, 0.5);
    }

    #[test]
    fn test_tap_toggles_and_prob_snaps() {
        let state = reduce(PlinkoState::new(), PlinkoAction::SelectLevel(2));
        let state = reduce(state, PlinkoAction::TapPeg { row: 1, col: 1 });
        assert_eq!(state.selected_peg, Some((1, 1)));
        let state = reduce(
            state,
            PlinkoAction::SetProbability {
                row: 1,
                col: 1,
                prob: 0.83,
            },
        );
        assert_eq!(state.pegs[1][1].left_prob, 0.85);
        let state = reduce(state, PlinkoAction::TapPeg { row: 1, col: 1 });
        assert_eq!(state.selected_peg, None);
        // Out of range is ignored
        let state = reduce(state, PlinkoAction::TapPeg { row: 40, col: 0 });
        assert_eq!(state.selected_peg, None);
    }

    #[test]
    fn test_drop_and_advance_lands_balls() {
        let mut state = PlinkoState::new();
        state = reduce(state, PlinkoAction::Drop(vec![path_to(1), path_to(2), path_to(2)]));
        assert!(state.is_dropping());
        assert_eq!(state.active_balls[0].id, 0);
        assert_eq!(state.active_balls[2].id, 2);

        state = reduce(state, PlinkoAction::Advance { step: 0.6 });
        assert_eq!(state.total_balls, 0);
        state = reduce(state, PlinkoAction::Advance { step: 0.6 });
        assert_eq!(state.total_balls, 3);
        assert_eq!(state.bins, vec![0, 1, 2, 0]);
        assert!(!state.is_dropping());
    }

    #[test]
    fn test_out_of_range_bins_are_discarded() {
        let state = reduce(PlinkoState::new(), PlinkoAction::Drop(vec![path_to(17)]));
        assert!(!state.is_dropping());
    }

    #[test]
    fn test_tutorial_awards_three_stars_after_enough_balls() {
        let mut state = PlinkoState::new();
        let paths = (0..TUTORIAL_AUTO_WIN_BALLS).map(|_| path_to(0)).collect();
        state = reduce(state, PlinkoAction::Drop(paths));
        state = reduce(state, PlinkoAction::Advance { step: 1.0 });
        assert_eq!(state.stars(), 3);
        assert_eq!(state.progress.best(1), 3);
    }

    #[test]
    fn test_level_change_resets_board_but_keeps_progress() {
        let mut state = PlinkoState::new();
        state.progress.record(1, 2);
        state = reduce(state, PlinkoAction::Drop(vec![path_to(0)]));
        state = reduce(state, PlinkoAction::SelectLevel(5));
        assert_eq!(state.level.id, 5);
        assert_eq!(state.bins.len(), get_bin_count(6));
        assert!(state.active_balls.is_empty());
        assert_eq!(state.progress.best(1), 2);
    }

    #[test]
    fn test_reset_bins() {
        let mut state = PlinkoState::new();
        state = reduce(state, PlinkoAction::Drop(vec![path_to(0)]));
        state = reduce(state, PlinkoAction::Advance { step: 1.0 });
        state = reduce(state, PlinkoAction::ResetBins);
        assert_eq!(state.total_balls, 0);
        assert!(state.bins.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_session_tap_selects_peg_under_pointer() {
        let mut session = PlinkoSession::new(1, Settings::default());
        session.dispatch(PlinkoAction::SelectLevel(2));
        let rows = session.state.level.rows;
        let peg = crate::plinko::board::peg_position(1, 1, rows);
        session.tap(peg + DVec2::new(3.0, 2.0));
        assert_eq!(session.state.selected_peg, Some((1, 1)));
        session.tap(DVec2::new(5.0, 5.0));
        assert_eq!(session.state.selected_peg, None);
    }

    #[test]
    fn test_session_drop_count_and_frames() {
        let mut session = PlinkoSession::new(99, Settings::default());
        session.dispatch(PlinkoAction::SetDropCount(DropCount::Ten));
        session.dispatch(PlinkoAction::SetSpeed(DropSpeed::Turbo));
        session.drop_balls();
        assert_eq!(session.state.active_balls.len(), 10);
        // 0.08 per frame needs 13 frames
        for _ in 0..13 {
            session.frame();
        }
        assert_eq!(session.state.total_balls, 10);
    }

    #[test]
    fn test_session_simulate_is_seeded() {
        let mut a = PlinkoSession::new(5, Settings::default());
        let mut b = PlinkoSession::new(5, Settings::default());
        a.simulate(200);
        b.simulate(200);
        assert_eq!(a.state.bins, b.state.bins);
        assert_eq!(a.state.total_balls, 200);
    }
}
