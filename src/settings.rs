//! Game settings and preferences
//!
//! Persisted separately from leaderboards. Only the easy and normal tiers
//! are tunable; hard always plays the catalog timings with zero mistakes.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};
use crate::sim::{LevelConfig, MistakeTolerance};

/// Level timer range for easy mode (seconds)
pub const EASY_DURATION_RANGE: (f32, f32) = (15.0, 180.0);
/// Round timeout range for normal mode (seconds)
pub const ROUND_TIMEOUT_RANGE: (f32, f32) = (0.5, 10.0);
/// Largest mistake budget a player can choose
pub const MAX_MISTAKE_SETTING: u32 = 20;

/// Player-tunable difficulty settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Easy ===
    /// Level timer length for easy runs
    pub easy_level_duration_secs: f32,
    /// Mistake budget for easy runs
    pub easy_max_mistakes: u32,

    // === Normal ===
    /// Round timeout for timed levels in normal runs (None = catalog value)
    pub normal_round_timeout_secs: Option<f32>,
    /// Mistake budget for normal runs
    pub normal_max_mistakes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            easy_level_duration_secs: 60.0,
            easy_max_mistakes: MistakeTolerance::Easy.max_mistakes(),
            normal_round_timeout_secs: None,
            normal_max_mistakes: MistakeTolerance::Normal.max_mistakes(),
        }
    }
}

/// Timers for one level, resolved from the catalog and settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunTiming {
    pub level_duration_secs: f32,
    pub round_timeout_secs: Option<f32>,
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "off_color_settings";
    const VERSION: u32 = 1;

    /// Mistake budget for a tier
    pub fn max_mistakes(&self, tolerance: MistakeTolerance) -> u32 {
        match tolerance {
            MistakeTolerance::Easy => self.easy_max_mistakes,
            MistakeTolerance::Normal => self.normal_max_mistakes,
            MistakeTolerance::Hard => MistakeTolerance::Hard.max_mistakes(),
        }
    }

    /// Effective timers for `level` in a run of the given tier
    pub fn timing(&self, tolerance: MistakeTolerance, level: &LevelConfig) -> RunTiming {
        let level_duration_secs = match tolerance {
            MistakeTolerance::Easy => self.easy_level_duration_secs,
            _ => level.duration_secs,
        };
        // Only levels that already have a round timer get the override
        let round_timeout_secs = match (tolerance, level.time_per_response) {
            (MistakeTolerance::Normal, Some(catalog)) => {
                Some(self.normal_round_timeout_secs.unwrap_or(catalog))
            }
            (_, t) => t,
        };
        RunTiming {
            level_duration_secs,
            round_timeout_secs,
        }
    }

    /// Replace out-of-range values with defaults
    pub fn sanitize(mut self) -> Self {
        let defaults = Self::default();
        let (lo, hi) = EASY_DURATION_RANGE;
        if !(lo..=hi).contains(&self.easy_level_duration_secs) {
            log::warn!(
                "easy_level_duration_secs {} out of range, using default",
                self.easy_level_duration_secs
            );
            self.easy_level_duration_secs = defaults.easy_level_duration_secs;
        }
        if let Some(t) = self.normal_round_timeout_secs {
            let (lo, hi) = ROUND_TIMEOUT_RANGE;
            if !(lo..=hi).contains(&t) {
                log::warn!("normal_round_timeout_secs {} out of range, using catalog", t);
                self.normal_round_timeout_secs = None;
            }
        }
        if self.easy_max_mistakes > MAX_MISTAKE_SETTING {
            self.easy_max_mistakes = defaults.easy_max_mistakes;
        }
        if self.normal_max_mistakes > MAX_MISTAKE_SETTING {
            self.normal_max_mistakes = defaults.normal_max_mistakes;
        }
        self
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match persistence::load_json::<Settings>(store, Self::STORAGE_KEY, Self::VERSION) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitize()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> bool {
        let ok = persistence::save_json(store, Self::STORAGE_KEY, Self::VERSION, self);
        if ok {
            log::info!("Settings saved");
        }
        ok
    }
}
