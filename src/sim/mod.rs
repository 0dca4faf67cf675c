//! Deterministic level-run module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - No owned timers (the host supplies elapsed time)
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies

pub mod catalog;
pub mod color;
pub mod ledger;
pub mod rules;
pub mod state;
pub mod tick;

pub use catalog::{LevelConfig, get_level, levels, total_levels};
pub use color::GameColor;
pub use ledger::{LedgerView, LevelBreakdown, RunSummary, remaining_lives, total_score};
pub use rules::{
    Board, ColorAnnouncer, GameType, Tile, fallback_board, generate_board, is_correct_tap,
    is_correct_tile, satisfies_constraints,
};
pub use state::{
    LevelCompletion, LevelOutcome, LevelRun, MistakeTolerance, RunEvent, StreakRule,
};
pub use tick::{PlaySession, TapResult, TickInput, tick};
