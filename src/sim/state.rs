//! Level-run state machine
//!
//! Two score ledgers run side by side:
//! - `current_score` / `level_positive_points`: this level attempt only
//! - `global_score`: the whole run
//!
//! Penalties hit both ledgers immediately. Positive points stay provisional in
//! `level_positive_points` until `complete_level` folds them into `global_score`;
//! a failed or retried attempt throws them away.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{LevelConfig, get_level, total_levels};
use super::rules::GameType;
use crate::consts::{TIMEOUT_PENALTY, WRONG_TAP_PENALTY};

/// Run-wide mistake budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MistakeTolerance {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl MistakeTolerance {
    pub const ALL: [MistakeTolerance; 3] = [
        MistakeTolerance::Easy,
        MistakeTolerance::Normal,
        MistakeTolerance::Hard,
    ];

    /// Default number of mistakes allowed before game over
    pub fn max_mistakes(&self) -> u32 {
        match self {
            MistakeTolerance::Easy => 5,
            MistakeTolerance::Normal => 3,
            MistakeTolerance::Hard => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeTolerance::Easy => "easy",
            MistakeTolerance::Normal => "normal",
            MistakeTolerance::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(MistakeTolerance::Easy),
            "normal" | "medium" => Some(MistakeTolerance::Normal),
            "hard" => Some(MistakeTolerance::Hard),
            _ => None,
        }
    }
}

/// State of the current level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LevelOutcome {
    #[default]
    InProgress,
    /// Required score reached; waiting for `complete_level`
    Complete,
    /// Timer ran out short of the required score (retry allowed)
    FailedInsufficientScore,
    /// Mistake budget exceeded (run over)
    FailedMaxMistakes,
    /// Score dropped below zero (run over)
    FailedNegativeScore,
}

impl LevelOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LevelOutcome::FailedInsufficientScore
                | LevelOutcome::FailedMaxMistakes
                | LevelOutcome::FailedNegativeScore
        )
    }

    /// No retry: the run is finished
    pub fn ends_run(&self) -> bool {
        matches!(
            self,
            LevelOutcome::FailedMaxMistakes | LevelOutcome::FailedNegativeScore
        )
    }
}

/// Bonus for consecutive correct taps (off unless configured)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRule {
    /// Consecutive correct taps per bonus
    pub run_length: u32,
    /// Points per completed streak
    pub bonus: i32,
}

impl Default for StreakRule {
    fn default() -> Self {
        Self {
            run_length: 10,
            bonus: 20,
        }
    }
}

/// Notifications for the presentation layer, drained after each mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    RunStarted {
        game_type: GameType,
        tolerance: MistakeTolerance,
    },
    LevelStarted {
        level: u32,
    },
    CorrectAnswer {
        points: i32,
    },
    StreakBonus {
        bonus: i32,
    },
    WrongAnswer,
    Timeout,
    LevelCompleted {
        level: u32,
        committed_points: i32,
        perfect_bonus: Option<i32>,
    },
    LevelFailed {
        level: u32,
        outcome: LevelOutcome,
    },
    RunCompleted {
        final_score: i32,
    },
}

/// What `complete_level` committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCompletion {
    pub level: u32,
    /// Positive points folded into the global score (excludes the perfect bonus)
    pub committed_points: i32,
    pub perfect_bonus: Option<i32>,
    /// This was the last level
    pub run_completed: bool,
}

/// Undrained events kept before the oldest are dropped
pub const MAX_QUEUED_EVENTS: usize = 256;

/// One player's run through the level catalog
///
/// Every mutation queues `RunEvent`s. Hosts that care should call
/// `drain_events` after each mutation; past `MAX_QUEUED_EVENTS` the oldest
/// undrained events are discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRun {
    current_level: u32,
    game_type: GameType,
    tolerance: MistakeTolerance,
    /// Effective budget (tolerance default or player override)
    max_mistakes: u32,
    is_active: bool,
    is_completed: bool,
    outcome: LevelOutcome,

    // Level attempt
    current_score: i32,
    level_positive_points: i32,
    level_mistakes: u32,
    level_timeouts: u32,
    level_correct_answers: u32,
    /// Insufficient-score mistake already charged this attempt
    level_score_shortfall: bool,

    // Run-wide
    global_score: i32,
    mistakes: u32,
    timeouts: u32,

    // History
    completed_levels: Vec<u32>,
    failed_levels: Vec<u32>,
    perfect_levels: Vec<u32>,
    level_scores: BTreeMap<u32, i32>,

    // Streaks
    streak_rule: Option<StreakRule>,
    consecutive_correct: u32,
    level_streak_bonuses: i32,
    last_bonus_earned: i32,

    #[serde(skip)]
    events: Vec<RunEvent>,
}

impl Default for LevelRun {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelRun {
    /// An idle run; call `start_run` to begin
    pub fn new() -> Self {
        Self {
            current_level: 0,
            game_type: GameType::default(),
            tolerance: MistakeTolerance::default(),
            max_mistakes: MistakeTolerance::default().max_mistakes(),
            is_active: false,
            is_completed: false,
            outcome: LevelOutcome::InProgress,
            current_score: 0,
            level_positive_points: 0,
            level_mistakes: 0,
            level_timeouts: 0,
            level_correct_answers: 0,
            level_score_shortfall: false,
            global_score: 0,
            mistakes: 0,
            timeouts: 0,
            completed_levels: Vec::new(),
            failed_levels: Vec::new(),
            perfect_levels: Vec::new(),
            level_scores: BTreeMap::new(),
            streak_rule: None,
            consecutive_correct: 0,
            level_streak_bonuses: 0,
            last_bonus_earned: 0,
            events: Vec::new(),
        }
    }

    /// Enable streak bonuses for subsequent runs
    pub fn with_streak_rule(mut self, rule: StreakRule) -> Self {
        self.streak_rule = Some(rule);
        self
    }

    // === Lifecycle ===

    pub fn start_run(&mut self, game_type: GameType, tolerance: MistakeTolerance) {
        self.start_run_with_limit(game_type, tolerance, tolerance.max_mistakes());
    }

    /// Start a run with a player-chosen mistake budget
    pub fn start_run_with_limit(
        &mut self,
        game_type: GameType,
        tolerance: MistakeTolerance,
        max_mistakes: u32,
    ) {
        self.game_type = game_type;
        self.tolerance = tolerance;
        self.max_mistakes = max_mistakes;
        self.current_level = 1;
        self.is_active = true;
        self.is_completed = false;
        self.reset_run_stats();

        log::info!(
            "Run started: {} / {} (max mistakes {})",
            game_type.as_str(),
            tolerance.as_str(),
            max_mistakes
        );
        self.emit(RunEvent::RunStarted {
            game_type,
            tolerance,
        });
        self.start_level();
    }

    /// Begin (or restart) the current level
    pub fn start_level(&mut self) {
        self.reset_level_stats();
        self.outcome = LevelOutcome::InProgress;
        if get_level(self.current_level).is_some() {
            self.emit(RunEvent::LevelStarted {
                level: self.current_level,
            });
        }
    }

    /// Zero the level-attempt ledger; run-wide totals are untouched
    pub fn reset_level_stats(&mut self) {
        self.current_score = 0;
        self.level_positive_points = 0;
        self.level_mistakes = 0;
        self.level_timeouts = 0;
        self.level_correct_answers = 0;
        self.level_score_shortfall = false;
        self.consecutive_correct = 0;
        self.level_streak_bonuses = 0;
        self.last_bonus_earned = 0;
    }

    /// Retry after an insufficient-score failure. Penalties already charged stay.
    pub fn retry_level(&mut self) -> bool {
        if !self.is_active || self.outcome != LevelOutcome::FailedInsufficientScore {
            return false;
        }
        log::info!(
            "Retrying level {} (discarding {} provisional points)",
            self.current_level,
            self.level_positive_points
        );
        self.start_level();
        true
    }

    /// Zero every ledger and clear history
    pub fn reset_run_stats(&mut self) {
        self.reset_level_stats();
        self.global_score = 0;
        self.mistakes = 0;
        self.timeouts = 0;
        self.perfect_levels.clear();
        self.completed_levels.clear();
        self.failed_levels.clear();
        self.level_scores.clear();
    }

    /// Back to an idle run (keeps the streak configuration)
    pub fn reset(&mut self) {
        let streak_rule = self.streak_rule;
        *self = Self::new();
        self.streak_rule = streak_rule;
    }

    /// Jump straight to level `n` (debug/testing)
    pub fn jump_to_level(&mut self, n: u32) -> bool {
        if !self.is_active || get_level(n).is_none() {
            return false;
        }
        self.current_level = n;
        self.start_level();
        true
    }

    // === Play ===

    /// Level config if taps and timers currently count
    fn playable_level(&self) -> Option<&'static LevelConfig> {
        if !self.is_active || self.outcome != LevelOutcome::InProgress {
            return None;
        }
        get_level(self.current_level)
    }

    pub fn add_correct_answer(&mut self) -> LevelOutcome {
        let Some(cfg) = self.playable_level() else {
            return self.outcome;
        };
        self.current_score += cfg.points_per_round;
        self.level_positive_points += cfg.points_per_round;
        self.level_correct_answers += 1;
        self.emit(RunEvent::CorrectAnswer {
            points: cfg.points_per_round,
        });
        self.extend_streak();
        self.outcome
    }

    pub fn add_wrong_answer(&mut self) -> LevelOutcome {
        if self.playable_level().is_none() {
            return self.outcome;
        }
        self.current_score -= WRONG_TAP_PENALTY;
        self.global_score -= WRONG_TAP_PENALTY;
        self.mistakes += 1;
        self.level_mistakes += 1;
        self.break_streak();
        self.emit(RunEvent::WrongAnswer);
        self.check_failure()
    }

    /// Round timer ran out without a tap. No-op on refresh levels.
    pub fn add_timeout(&mut self) -> LevelOutcome {
        let Some(cfg) = self.playable_level() else {
            return self.outcome;
        };
        if cfg.is_non_punitive_refresh() {
            log::debug!("Level {} timeout is a refresh, no penalty", cfg.id);
            return self.outcome;
        }
        self.current_score -= TIMEOUT_PENALTY;
        self.global_score -= TIMEOUT_PENALTY;
        self.timeouts += 1;
        self.level_timeouts += 1;
        self.break_streak();
        self.emit(RunEvent::Timeout);
        self.check_failure()
    }

    /// Level timer ran out: pass, or charge one mistake (no points) and fail
    pub fn handle_time_up(&mut self) -> LevelOutcome {
        let Some(cfg) = self.playable_level() else {
            return self.outcome;
        };
        if self.current_score >= cfg.required_score {
            self.outcome = LevelOutcome::Complete;
            return self.outcome;
        }

        self.mistakes += 1;
        self.level_mistakes += 1;
        self.level_score_shortfall = true;
        if self.mistakes > self.max_mistakes {
            self.fail(LevelOutcome::FailedMaxMistakes);
        } else {
            self.fail(LevelOutcome::FailedInsufficientScore);
        }
        self.outcome
    }

    /// Game-over checks run after every tap and timeout
    pub fn check_failure(&mut self) -> LevelOutcome {
        if !self.is_active || self.outcome != LevelOutcome::InProgress {
            return self.outcome;
        }
        // Level 1 has no banked score yet, so it judges the level ledger
        let negative = if self.current_level <= 1 {
            self.current_score < 0
        } else {
            self.global_score < 0
        };
        if negative {
            self.fail(LevelOutcome::FailedNegativeScore);
        } else if self.mistakes > self.max_mistakes {
            self.fail(LevelOutcome::FailedMaxMistakes);
        }
        self.outcome
    }

    fn fail(&mut self, outcome: LevelOutcome) {
        self.outcome = outcome;
        self.failed_levels.push(self.current_level);
        if outcome.ends_run() {
            self.is_active = false;
        }
        log::info!(
            "Level {} failed: {:?} (score {}, global {}, mistakes {}/{})",
            self.current_level,
            outcome,
            self.current_score,
            self.global_score,
            self.mistakes,
            self.max_mistakes
        );
        self.emit(RunEvent::LevelFailed {
            level: self.current_level,
            outcome,
        });
    }

    /// Commit the level: positive points first, then the perfect bonus.
    /// Advances to the next level or finishes the run.
    pub fn complete_level(&mut self) -> Option<LevelCompletion> {
        if !self.is_active
            || !matches!(
                self.outcome,
                LevelOutcome::InProgress | LevelOutcome::Complete
            )
        {
            return None;
        }
        let cfg = get_level(self.current_level)?;

        let committed_points = self.level_positive_points;
        self.global_score += committed_points;
        // Folded in; must not be counted again by `total_score`
        self.level_positive_points = 0;

        let perfect = self.level_mistakes == 0 && self.level_timeouts == 0;
        let perfect_bonus = if perfect { cfg.perfect_bonus } else { None };
        if let Some(bonus) = perfect_bonus {
            self.global_score += bonus;
            self.perfect_levels.push(cfg.id);
        }

        self.level_scores.insert(cfg.id, self.current_score);
        self.completed_levels.push(cfg.id);
        self.outcome = LevelOutcome::Complete;

        log::info!(
            "Level {} complete: +{} points{}, global {}",
            cfg.id,
            committed_points,
            perfect_bonus
                .map(|b| format!(" +{} perfect", b))
                .unwrap_or_default(),
            self.global_score
        );
        self.emit(RunEvent::LevelCompleted {
            level: cfg.id,
            committed_points,
            perfect_bonus,
        });

        let run_completed = cfg.id == total_levels();
        if run_completed {
            self.is_completed = true;
            self.is_active = false;
            log::info!("Run completed with {}", self.global_score);
            self.emit(RunEvent::RunCompleted {
                final_score: self.global_score,
            });
        } else {
            self.current_level += 1;
            self.start_level();
        }

        Some(LevelCompletion {
            level: cfg.id,
            committed_points,
            perfect_bonus,
            run_completed,
        })
    }

    fn extend_streak(&mut self) {
        self.consecutive_correct += 1;
        self.last_bonus_earned = 0;
        let Some(rule) = self.streak_rule else {
            return;
        };
        if rule.run_length > 0 && self.consecutive_correct % rule.run_length == 0 {
            self.current_score += rule.bonus;
            self.level_positive_points += rule.bonus;
            self.level_streak_bonuses += rule.bonus;
            self.last_bonus_earned = rule.bonus;
            self.emit(RunEvent::StreakBonus { bonus: rule.bonus });
        }
    }

    fn break_streak(&mut self) {
        self.consecutive_correct = 0;
        self.last_bonus_earned = 0;
    }

    fn emit(&mut self, event: RunEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take queued notifications
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    // === Accessors ===

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn level_config(&self) -> Option<&'static LevelConfig> {
        get_level(self.current_level)
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn tolerance(&self) -> MistakeTolerance {
        self.tolerance
    }

    pub fn max_mistakes(&self) -> u32 {
        self.max_mistakes
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    /// Run ended by failure (no retry possible)
    pub fn is_game_over(&self) -> bool {
        self.outcome.ends_run()
    }

    pub fn current_score(&self) -> i32 {
        self.current_score
    }

    pub fn level_positive_points(&self) -> i32 {
        self.level_positive_points
    }

    pub fn global_score(&self) -> i32 {
        self.global_score
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    pub fn level_mistakes(&self) -> u32 {
        self.level_mistakes
    }

    pub fn level_timeouts(&self) -> u32 {
        self.level_timeouts
    }

    pub fn level_correct_answers(&self) -> u32 {
        self.level_correct_answers
    }

    /// Level mistakes from wrong taps only (excludes the insufficient-score mistake)
    pub fn level_mistakes_from_wrong_taps(&self) -> u32 {
        self.level_mistakes.saturating_sub(u32::from(self.level_score_shortfall))
    }

    pub fn completed_levels(&self) -> &[u32] {
        &self.completed_levels
    }

    pub fn failed_levels(&self) -> &[u32] {
        &self.failed_levels
    }

    pub fn perfect_levels(&self) -> &[u32] {
        &self.perfect_levels
    }

    pub fn level_scores(&self) -> &BTreeMap<u32, i32> {
        &self.level_scores
    }

    pub fn streak_rule(&self) -> Option<StreakRule> {
        self.streak_rule
    }

    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    pub fn level_streak_bonuses(&self) -> i32 {
        self.level_streak_bonuses
    }

    pub fn last_bonus_earned(&self) -> i32 {
        self.last_bonus_earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(tolerance: MistakeTolerance) -> LevelRun {
        let mut run = LevelRun::new();
        run.start_run(GameType::ColorOnly, tolerance);
        run
    }

    #[test]
    fn test_start_run() {
        let mut run = started(MistakeTolerance::Easy);
        assert_eq!(run.current_level(), 1);
        assert!(run.is_active());
        assert!(!run.is_completed());
        assert_eq!(run.max_mistakes(), 5);
        assert_eq!(run.outcome(), LevelOutcome::InProgress);
        let events = run.drain_events();
        assert!(matches!(events[0], RunEvent::RunStarted { .. }));
        assert_eq!(events[1], RunEvent::LevelStarted { level: 1 });
        assert!(run.drain_events().is_empty());
    }

    #[test]
    fn test_idle_run_ignores_play() {
        let mut run = LevelRun::new();
        run.add_correct_answer();
        run.add_wrong_answer();
        run.add_timeout();
        assert_eq!(run.current_score(), 0);
        assert_eq!(run.global_score(), 0);
        assert_eq!(run.mistakes(), 0);
        assert!(run.complete_level().is_none());
    }

    #[test]
    fn test_correct_answer_is_provisional() {
        let mut run = started(MistakeTolerance::Normal);
        run.add_correct_answer();
        assert_eq!(run.current_score(), 10);
        assert_eq!(run.level_positive_points(), 10);
        assert_eq!(run.level_correct_answers(), 1);
        assert_eq!(run.global_score(), 0);
    }

    #[test]
    fn test_wrong_answer_penalizes_immediately() {
        let mut run = started(MistakeTolerance::Normal);
        for _ in 0..3 {
            run.add_correct_answer();
        }
        run.add_wrong_answer();
        assert_eq!(run.current_score(), 20);
        assert_eq!(run.global_score(), -10);
        assert_eq!(run.mistakes(), 1);
        assert_eq!(run.level_mistakes(), 1);
        // Level 1 judges the level ledger, which is still positive
        assert_eq!(run.outcome(), LevelOutcome::InProgress);
    }

    #[test]
    fn test_timeout_penalizes_without_mistake() {
        let mut run = started(MistakeTolerance::Normal);
        run.add_correct_answer();
        run.add_timeout();
        assert_eq!(run.current_score(), 5);
        assert_eq!(run.global_score(), -5);
        assert_eq!(run.timeouts(), 1);
        assert_eq!(run.level_timeouts(), 1);
        assert_eq!(run.mistakes(), 0);
    }

    #[test]
    fn test_timeout_on_refresh_level_is_noop() {
        let mut run = started(MistakeTolerance::Normal);
        assert!(run.jump_to_level(9));
        run.add_timeout();
        assert_eq!(run.current_score(), 0);
        assert_eq!(run.global_score(), 0);
        assert_eq!(run.timeouts(), 0);
        assert_eq!(run.level_timeouts(), 0);
    }

    #[test]
    fn test_time_up_pass() {
        let mut run = started(MistakeTolerance::Normal);
        for _ in 0..20 {
            run.add_correct_answer();
        }
        assert_eq!(run.handle_time_up(), LevelOutcome::Complete);
        assert_eq!(run.mistakes(), 0);
        let done = run.complete_level().unwrap();
        assert_eq!(done.committed_points, 200);
        assert_eq!(done.perfect_bonus, None);
        assert_eq!(run.current_level(), 2);
        assert_eq!(run.global_score(), 200);
        assert_eq!(run.level_scores().get(&1), Some(&200));
    }

    #[test]
    fn test_time_up_short_costs_one_mistake_no_points() {
        let mut run = started(MistakeTolerance::Normal);
        for _ in 0..5 {
            run.add_correct_answer();
        }
        assert_eq!(run.handle_time_up(), LevelOutcome::FailedInsufficientScore);
        assert_eq!(run.current_score(), 50);
        assert_eq!(run.global_score(), 0);
        assert_eq!(run.mistakes(), 1);
        assert_eq!(run.level_mistakes(), 1);
        assert_eq!(run.level_mistakes_from_wrong_taps(), 0);
        assert_eq!(run.failed_levels(), &[1]);
        assert!(run.is_active());
        // Failed attempts cannot be committed
        assert!(run.complete_level().is_none());
    }

    #[test]
    fn test_time_up_short_over_budget_ends_run() {
        let mut run = started(MistakeTolerance::Hard);
        run.add_correct_answer();
        assert_eq!(run.handle_time_up(), LevelOutcome::FailedMaxMistakes);
        assert!(!run.is_active());
        assert!(run.is_game_over());
        assert!(!run.retry_level());
    }

    #[test]
    fn test_wrong_tap_breakdown_does_not_double_count() {
        let mut run = started(MistakeTolerance::Easy);
        for _ in 0..5 {
            run.add_correct_answer();
        }
        run.add_wrong_answer();
        run.add_wrong_answer();
        run.handle_time_up();
        assert_eq!(run.level_mistakes(), 3);
        assert_eq!(run.level_mistakes_from_wrong_taps(), 2);
    }

    #[test]
    fn test_retry_discards_provisional_points_keeps_penalties() {
        let mut run = started(MistakeTolerance::Easy);
        for _ in 0..4 {
            run.add_correct_answer();
        }
        run.add_wrong_answer();
        run.handle_time_up();
        let global = run.global_score();
        let mistakes = run.mistakes();
        assert!(run.retry_level());
        assert_eq!(run.current_score(), 0);
        assert_eq!(run.level_positive_points(), 0);
        assert_eq!(run.level_mistakes(), 0);
        assert_eq!(run.global_score(), global);
        assert_eq!(run.mistakes(), mistakes);
        assert_eq!(run.outcome(), LevelOutcome::InProgress);
    }

    #[test]
    fn test_retry_only_after_insufficient_score() {
        let mut run = started(MistakeTolerance::Normal);
        assert!(!run.retry_level());
    }

    #[test]
    fn test_negative_level_one_uses_level_score() {
        let mut run = started(MistakeTolerance::Easy);
        assert_eq!(run.add_wrong_answer(), LevelOutcome::FailedNegativeScore);
        assert!(!run.is_active());
        // No further play
        run.add_correct_answer();
        assert_eq!(run.current_score(), -10);
    }

    #[test]
    fn test_negative_later_levels_use_global_score() {
        let mut run = started(MistakeTolerance::Easy);
        for _ in 0..20 {
            run.add_correct_answer();
        }
        run.handle_time_up();
        run.complete_level();
        assert_eq!(run.current_level(), 2);
        assert_eq!(run.global_score(), 200);

        // Level score negative but global still positive: keep playing
        run.add_wrong_answer();
        assert_eq!(run.current_score(), -10);
        assert_eq!(run.outcome(), LevelOutcome::InProgress);
    }

    #[test]
    fn test_negative_check_beats_mistake_check() {
        let mut run = started(MistakeTolerance::Hard);
        assert_eq!(run.add_wrong_answer(), LevelOutcome::FailedNegativeScore);
    }

    #[test]
    fn test_perfect_bonus_after_positive_points() {
        let mut run = started(MistakeTolerance::Normal);
        run.jump_to_level(3);
        for _ in 0..20 {
            run.add_correct_answer();
        }
        run.drain_events();
        let done = run.complete_level().unwrap();
        assert_eq!(done.committed_points, 300);
        assert_eq!(done.perfect_bonus, Some(30));
        assert_eq!(run.global_score(), 330);
        assert_eq!(run.perfect_levels(), &[3]);
        let events = run.drain_events();
        assert_eq!(
            events[0],
            RunEvent::LevelCompleted {
                level: 3,
                committed_points: 300,
                perfect_bonus: Some(30)
            }
        );
    }

    #[test]
    fn test_timeout_forfeits_perfect_bonus() {
        let mut run = started(MistakeTolerance::Normal);
        // Bank some points so the global ledger absorbs the penalty
        for _ in 0..20 {
            run.add_correct_answer();
        }
        run.complete_level();
        run.jump_to_level(3);
        for _ in 0..21 {
            run.add_correct_answer();
        }
        run.add_timeout();
        let before = run.global_score();
        let done = run.complete_level().unwrap();
        assert_eq!(done.perfect_bonus, None);
        assert_eq!(run.global_score(), before + 315);
        assert!(run.perfect_levels().is_empty());
    }

    #[test]
    fn test_final_level_completes_run() {
        let mut run = started(MistakeTolerance::Normal);
        run.jump_to_level(10);
        for _ in 0..24 {
            run.add_correct_answer();
        }
        assert_eq!(run.handle_time_up(), LevelOutcome::Complete);
        let done = run.complete_level().unwrap();
        assert!(done.run_completed);
        assert!(run.is_completed());
        assert!(!run.is_active());
        assert_eq!(run.current_level(), 10);
        assert_eq!(run.global_score(), 720 + 70);
        assert_eq!(run.level_positive_points(), 0);
        // Nothing left to commit
        assert!(run.complete_level().is_none());
    }

    #[test]
    fn test_streak_bonus_opt_in() {
        let mut run = LevelRun::new().with_streak_rule(StreakRule::default());
        run.start_run(GameType::ColorOnly, MistakeTolerance::Normal);
        for _ in 0..10 {
            run.add_correct_answer();
        }
        assert_eq!(run.current_score(), 120);
        assert_eq!(run.level_positive_points(), 120);
        assert_eq!(run.level_streak_bonuses(), 20);
        assert_eq!(run.last_bonus_earned(), 20);

        run.add_correct_answer();
        assert_eq!(run.last_bonus_earned(), 0);
        run.add_wrong_answer();
        assert_eq!(run.consecutive_correct(), 0);
        for _ in 0..9 {
            run.add_correct_answer();
        }
        assert_eq!(run.level_streak_bonuses(), 20);
    }

    #[test]
    fn test_reset_run_stats_clears_everything() {
        let mut run = started(MistakeTolerance::Easy);
        for _ in 0..20 {
            run.add_correct_answer();
        }
        run.complete_level();
        run.add_correct_answer();
        run.add_wrong_answer();
        run.reset_run_stats();
        assert_eq!(run.current_score(), 0);
        assert_eq!(run.level_positive_points(), 0);
        assert_eq!(run.global_score(), 0);
        assert_eq!(run.mistakes(), 0);
        assert_eq!(run.timeouts(), 0);
        assert!(run.completed_levels().is_empty());
        assert!(run.level_scores().is_empty());
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let mut run = started(MistakeTolerance::Normal);
        for _ in 0..MAX_QUEUED_EVENTS + 50 {
            run.add_correct_answer();
        }
        let events = run.drain_events();
        assert_eq!(events.len(), MAX_QUEUED_EVENTS);
        assert!(events.iter().all(|e| matches!(e, RunEvent::CorrectAnswer { .. })));
        assert!(run.drain_events().is_empty());
    }

    #[test]
    fn test_tolerance_parse() {
        for t in MistakeTolerance::ALL {
            assert_eq!(MistakeTolerance::from_str(t.as_str()), Some(t));
        }
        assert_eq!(MistakeTolerance::from_str("nope"), None);
    }
}
