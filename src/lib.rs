//! Off Color - tap the tile that does NOT match the announced color
//!
//! Core modules:
//! - `sim`: Deterministic level-run logic (catalog, board rules, scoring state machine)
//! - `persistence`: Key-value store seam with versioned JSON envelopes
//! - `platform`: Browser/native platform abstraction (logging, clock)
//! - `settings`: Player-tunable difficulty settings
//! - `highscores`: Per-tier leaderboards

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, Leaderboards};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Tiles on the board
    pub const BOARD_SIZE: usize = 4;
    /// Number of levels in a run
    pub const TOTAL_LEVELS: u32 = 10;

    /// Points removed from both ledgers on a wrong tap
    pub const WRONG_TAP_PENALTY: i32 = 10;
    /// Points removed from both ledgers when a round times out
    pub const TIMEOUT_PENALTY: i32 = 5;

    /// Board generation attempts before falling back to a constructed board
    pub const MAX_BOARD_ATTEMPTS: usize = 10;
    /// First level where a round timeout reshuffles instead of penalizing
    pub const REFRESH_FROM_LEVEL: u32 = 9;

    /// Leaderboard size per tier
    pub const MAX_HIGH_SCORES: usize = 10;
}
