//! Read-only score views for HUD and result screens

use std::collections::BTreeMap;

use super::state::{LevelOutcome, LevelRun};
use crate::consts::{TIMEOUT_PENALTY, WRONG_TAP_PENALTY};

/// Mistakes left before game over
pub fn remaining_lives(run: &LevelRun) -> u32 {
    run.max_mistakes().saturating_sub(run.mistakes())
}

/// Displayed "Total Score": banked score plus this attempt's uncommitted points.
/// Also the value submitted to the leaderboard.
///
/// `complete_level` zeroes `level_positive_points` once it folds them into the
/// global score, including after the final level, so committed points are
/// never counted twice here. Before a commit (mid-level, or after a failure)
/// the provisional points are included.
pub fn total_score(run: &LevelRun) -> i32 {
    run.global_score() + run.level_positive_points()
}

/// Points breakdown for the current level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBreakdown {
    pub level: u32,
    pub correct_answers: u32,
    /// Earned from correct taps and streaks, still provisional
    pub points_earned: i32,
    pub streak_bonuses: i32,
    pub wrong_taps: u32,
    pub wrong_tap_penalty: i32,
    pub timeouts: u32,
    pub timeout_penalty: i32,
    /// Bonus this attempt would earn if completed now
    pub perfect_bonus: Option<i32>,
}

impl LevelBreakdown {
    pub fn of(run: &LevelRun) -> Self {
        let wrong_taps = run.level_mistakes_from_wrong_taps();
        let timeouts = run.level_timeouts();
        let perfect = run.level_mistakes() == 0 && timeouts == 0;
        Self {
            level: run.current_level(),
            correct_answers: run.level_correct_answers(),
            points_earned: run.level_positive_points(),
            streak_bonuses: run.level_streak_bonuses(),
            wrong_taps,
            wrong_tap_penalty: wrong_taps as i32 * WRONG_TAP_PENALTY,
            timeouts,
            timeout_penalty: timeouts as i32 * TIMEOUT_PENALTY,
            perfect_bonus: if perfect {
                run.level_config().and_then(|c| c.perfect_bonus)
            } else {
                None
            },
        }
    }

    /// Net effect on the level score
    pub fn net(&self) -> i32 {
        self.points_earned - self.wrong_tap_penalty - self.timeout_penalty
    }
}

/// Snapshot of everything the HUD shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerView {
    pub level: u32,
    pub current_score: i32,
    pub required_score: Option<i32>,
    pub global_score: i32,
    pub total_score: i32,
    pub mistakes: u32,
    pub remaining_lives: u32,
    pub timeouts: u32,
    pub outcome: LevelOutcome,
    pub breakdown: LevelBreakdown,
}

impl LedgerView {
    pub fn of(run: &LevelRun) -> Self {
        Self {
            level: run.current_level(),
            current_score: run.current_score(),
            required_score: run.level_config().map(|c| c.required_score),
            global_score: run.global_score(),
            total_score: total_score(run),
            mistakes: run.mistakes(),
            remaining_lives: remaining_lives(run),
            timeouts: run.timeouts(),
            outcome: run.outcome(),
            breakdown: LevelBreakdown::of(run),
        }
    }

    /// Fraction of the required score reached (0..=1)
    pub fn progress(&self) -> f32 {
        match self.required_score {
            Some(req) if req > 0 => (self.current_score.max(0) as f32 / req as f32).min(1.0),
            _ => 0.0,
        }
    }
}

/// End-of-run statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub final_score: i32,
    pub completed: bool,
    pub highest_level: u32,
    pub levels_completed: usize,
    pub perfect_levels: usize,
    pub failed_attempts: usize,
    pub mistakes: u32,
    pub timeouts: u32,
    pub level_scores: BTreeMap<u32, i32>,
}

impl RunSummary {
    pub fn of(run: &LevelRun) -> Self {
        Self {
            final_score: total_score(run),
            completed: run.is_completed(),
            highest_level: run.current_level(),
            levels_completed: run.completed_levels().len(),
            perfect_levels: run.perfect_levels().len(),
            failed_attempts: run.failed_levels().len(),
            mistakes: run.mistakes(),
            timeouts: run.timeouts(),
            level_scores: run.level_scores().clone(),
        }
    }
}
