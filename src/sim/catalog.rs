//! Static level table
//!
//! Ten levels, each with a fixed timer, pass threshold and payout.
//! Levels 1-2 have no round timer and no perfect bonus.

use serde::{Deserialize, Serialize};

use crate::consts::{REFRESH_FROM_LEVEL, TOTAL_LEVELS};

/// Rules for a single level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level number
    pub id: u32,
    /// Length of the level timer
    pub duration_secs: f32,
    /// Per-round deadline (None = no round timer)
    pub time_per_response: Option<f32>,
    /// Minimum level score to pass when the level timer runs out
    pub required_score: i32,
    /// Points per correct tap
    pub points_per_round: i32,
    /// Added to the global score for a level with no mistakes and no timeouts
    pub perfect_bonus: Option<i32>,
}

impl LevelConfig {
    pub fn has_time_limit(&self) -> bool {
        self.time_per_response.is_some()
    }

    /// Round timeouts reshuffle the board instead of costing points
    pub fn is_non_punitive_refresh(&self) -> bool {
        self.id >= REFRESH_FROM_LEVEL
    }
}

const fn level(
    id: u32,
    time_per_response: Option<f32>,
    required_score: i32,
    points_per_round: i32,
    perfect_bonus: Option<i32>,
) -> LevelConfig {
    LevelConfig {
        id,
        duration_secs: 60.0,
        time_per_response,
        required_score,
        points_per_round,
        perfect_bonus,
    }
}

static LEVELS: [LevelConfig; TOTAL_LEVELS as usize] = [
    level(1, None, 200, 10, None),
    level(2, None, 250, 10, None),
    level(3, Some(3.0), 300, 15, Some(30)),
    level(4, Some(2.5), 350, 15, Some(35)),
    level(5, Some(2.5), 400, 20, Some(40)),
    level(6, Some(2.0), 450, 20, Some(45)),
    level(7, Some(2.0), 500, 25, Some(50)),
    level(8, Some(1.5), 550, 25, Some(55)),
    level(9, Some(1.5), 600, 30, Some(60)),
    level(10, Some(1.2), 700, 30, Some(70)),
];

/// Look up a level (None outside 1..=10)
pub fn get_level(n: u32) -> Option<&'static LevelConfig> {
    if n == 0 {
        return None;
    }
    LEVELS.get((n - 1) as usize)
}

pub fn total_levels() -> u32 {
    TOTAL_LEVELS
}

/// All levels in order
pub fn levels() -> &'static [LevelConfig] {
    &LEVELS
}
