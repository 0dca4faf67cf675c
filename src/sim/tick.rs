//! Externally driven play session
//!
//! The host owns real time. It calls `tick` with the elapsed seconds (or the
//! explicit `expire_round` / `expire_level` when it runs its own timers) and reads
//! the session back to render. Nothing in here sleeps or schedules.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::color::GameColor;
use super::ledger::{LedgerView, RunSummary, total_score};
use super::rules::{Board, ColorAnnouncer, GameType, generate_board, is_correct_tap};
use super::state::{LevelOutcome, LevelRun, MistakeTolerance, RunEvent};
use crate::consts::BOARD_SIZE;
use crate::settings::{RunTiming, Settings};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tile tapped this tick
    pub tap: Option<usize>,
    /// Pause toggle
    pub pause: bool,
}

/// How a tap was judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResult {
    Correct,
    Wrong,
    /// Paused, not playing, or off the board
    Ignored,
}

/// A run plus the round it is currently showing
#[derive(Debug, Clone)]
pub struct PlaySession {
    /// Run seed for reproducibility
    pub seed: u64,
    run: LevelRun,
    settings: Settings,
    rng: Pcg32,
    announcer: ColorAnnouncer,
    announced: GameColor,
    board: Board,
    timing: RunTiming,
    level_time_left: f32,
    round_time_left: Option<f32>,
    paused: bool,
    /// Rounds dealt this run
    rounds: u64,
}

impl PlaySession {
    /// Start a fresh run
    pub fn new(
        seed: u64,
        game_type: GameType,
        tolerance: MistakeTolerance,
        settings: &Settings,
    ) -> Self {
        Self::with_run(seed, LevelRun::new(), game_type, tolerance, settings)
    }

    /// Start a run on a pre-configured `LevelRun` (e.g. with a streak rule)
    pub fn with_run(
        seed: u64,
        mut run: LevelRun,
        game_type: GameType,
        tolerance: MistakeTolerance,
        settings: &Settings,
    ) -> Self {
        run.start_run_with_limit(game_type, tolerance, settings.max_mistakes(tolerance));

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut announcer = ColorAnnouncer::new();
        let announced = announcer.next(&mut rng);
        let board = generate_board(&mut rng, game_type, announced, None);

        let mut session = Self {
            seed,
            run,
            settings: settings.clone(),
            rng,
            announcer,
            announced,
            board,
            timing: RunTiming {
                level_duration_secs: 0.0,
                round_timeout_secs: None,
            },
            level_time_left: 0.0,
            round_time_left: None,
            paused: false,
            rounds: 1,
        };
        session.reset_timers();
        log::info!("Session started with seed {}", seed);
        session
    }

    /// Play again with the same mode, reusing this session
    pub fn restart(&mut self) {
        let game_type = self.run.game_type();
        let tolerance = self.run.tolerance();
        self.run.reset();
        self.run
            .start_run_with_limit(game_type, tolerance, self.settings.max_mistakes(tolerance));
        self.announcer.reset();
        self.paused = false;
        self.begin_level();
    }

    fn reset_timers(&mut self) {
        if let Some(cfg) = self.run.level_config() {
            self.timing = self.settings.timing(self.run.tolerance(), cfg);
        }
        self.level_time_left = self.timing.level_duration_secs;
        self.round_time_left = self.timing.round_timeout_secs;
    }

    fn begin_level(&mut self) {
        self.reset_timers();
        self.next_round();
    }

    /// New announced color and board
    fn next_round(&mut self) {
        self.announced = self.announcer.next(&mut self.rng);
        self.board = generate_board(
            &mut self.rng,
            self.run.game_type(),
            self.announced,
            Some(&self.board),
        );
        self.round_time_left = self.timing.round_timeout_secs;
        self.rounds += 1;
    }

    /// Reshuffle the board keeping the announced color
    pub fn refresh_board(&mut self) {
        self.board = generate_board(
            &mut self.rng,
            self.run.game_type(),
            self.announced,
            Some(&self.board),
        );
        self.round_time_left = self.timing.round_timeout_secs;
        log::debug!("Board refreshed (still {})", self.announced);
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_active() && self.run.outcome() == LevelOutcome::InProgress
    }

    pub fn tap(&mut self, index: usize) -> TapResult {
        if self.paused || !self.is_playing() || index >= BOARD_SIZE {
            return TapResult::Ignored;
        }
        let result = if is_correct_tap(self.run.game_type(), &self.board, index, self.announced) {
            self.run.add_correct_answer();
            TapResult::Correct
        } else {
            self.run.add_wrong_answer();
            TapResult::Wrong
        };
        if self.is_playing() {
            self.next_round();
        }
        result
    }

    /// Round timer ran out without a tap
    pub fn expire_round(&mut self) {
        if !self.is_playing() {
            return;
        }
        let Some(cfg) = self.run.level_config() else {
            return;
        };
        if !cfg.has_time_limit() {
            return;
        }
        if cfg.is_non_punitive_refresh() {
            self.refresh_board();
            return;
        }
        self.run.add_timeout();
        if self.is_playing() {
            self.next_round();
        }
    }

    /// Level timer ran out. Returns the decision; a pass is committed and the
    /// next level dealt immediately.
    pub fn expire_level(&mut self) -> LevelOutcome {
        if !self.is_playing() {
            return self.run.outcome();
        }
        self.level_time_left = 0.0;
        let decision = self.run.handle_time_up();
        if decision == LevelOutcome::Complete {
            if let Some(done) = self.run.complete_level() {
                if !done.run_completed {
                    self.begin_level();
                }
            }
        }
        decision
    }

    /// Retry after an insufficient-score failure
    pub fn retry_level(&mut self) -> bool {
        if !self.run.retry_level() {
            return false;
        }
        self.begin_level();
        true
    }

    /// Jump to a level (debug/testing)
    pub fn skip_to_level(&mut self, n: u32) -> bool {
        if !self.run.jump_to_level(n) {
            return false;
        }
        self.begin_level();
        true
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    // === Accessors ===

    pub fn run(&self) -> &LevelRun {
        &self.run
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn announced(&self) -> GameColor {
        self.announced
    }

    /// Canonical name for speech
    pub fn announced_name(&self) -> &'static str {
        self.announced.name()
    }

    pub fn level_time_left(&self) -> f32 {
        self.level_time_left
    }

    pub fn round_time_left(&self) -> Option<f32> {
        self.round_time_left
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Score to submit to the leaderboard
    pub fn final_score(&self) -> i32 {
        total_score(&self.run)
    }

    pub fn view(&self) -> LedgerView {
        LedgerView::of(&self.run)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::of(&self.run)
    }

    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        self.run.drain_events()
    }
}

/// Advance the session by `dt` seconds
pub fn tick(session: &mut PlaySession, input: &TickInput, dt: f32) {
    if input.pause {
        session.paused = !session.paused;
        log::debug!("Paused: {}", session.paused);
    }
    if session.paused || !session.is_playing() {
        return;
    }

    if let Some(index) = input.tap {
        session.tap(index);
        if !session.is_playing() {
            return;
        }
    }

    let round_expired = match session.round_time_left.as_mut() {
        Some(left) => {
            *left -= dt;
            *left <= 0.0
        }
        None => false,
    };
    if round_expired {
        session.expire_round();
        if !session.is_playing() {
            return;
        }
    }

    session.level_time_left = (session.level_time_left - dt).max(0.0);
    if session.level_time_left <= 0.0 {
        session.expire_level();
    }
}
