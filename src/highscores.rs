//! High score leaderboard system
//!
//! One top-10 table per mistake-tolerance tier, each stored under its own key.
//!
//! Final scores are submitted on every run end, game over included, but only
//! scores above zero are kept. A run that ends at or below zero (e.g. a wrong
//! tap on the first round of level 1 ends at -10) never qualifies, and such
//! entries are dropped when a stored board is loaded.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::persistence::{self, KeyValueStore};
use crate::sim::{LevelRun, MistakeTolerance, total_score};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score (global + uncommitted level points)
    pub score: i32,
    /// Level reached
    pub level: u32,
    /// All ten levels cleared
    #[serde(default)]
    pub completed: bool,
    /// Number of perfect levels
    #[serde(default)]
    pub perfect_levels: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard for one tier
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: i32) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry (if it qualifies); returns the rank achieved
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Sorted descending; ties go after existing entries
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i32> {
        self.entries.first().map(|e| e.score)
    }

    /// Drop entries that could not have been produced by the game
    fn sanitize(mut self) -> Self {
        self.entries.retain(|e| e.score > 0);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self
    }
}

/// Leaderboards for every tier
#[derive(Debug, Clone, Default)]
pub struct Leaderboards {
    easy: HighScores,
    normal: HighScores,
    hard: HighScores,
}

impl Leaderboards {
    const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Storage key for a tier
    pub fn storage_key(tolerance: MistakeTolerance) -> String {
        format!("off_color_highscores_{}", tolerance.as_str())
    }

    pub fn get(&self, tolerance: MistakeTolerance) -> &HighScores {
        match tolerance {
            MistakeTolerance::Easy => &self.easy,
            MistakeTolerance::Normal => &self.normal,
            MistakeTolerance::Hard => &self.hard,
        }
    }

    fn get_mut(&mut self, tolerance: MistakeTolerance) -> &mut HighScores {
        match tolerance {
            MistakeTolerance::Easy => &mut self.easy,
            MistakeTolerance::Normal => &mut self.normal,
            MistakeTolerance::Hard => &mut self.hard,
        }
    }

    /// Record a final score on the tier's board; returns the rank achieved
    pub fn submit(
        &mut self,
        score: i32,
        tolerance: MistakeTolerance,
        level: u32,
        completed: bool,
        perfect_levels: u32,
        timestamp: f64,
    ) -> Option<usize> {
        let rank = self.get_mut(tolerance).add(HighScoreEntry {
            score,
            level,
            completed,
            perfect_levels,
            timestamp,
        });
        if let Some(rank) = rank {
            log::info!("New {} high score #{}: {}", tolerance.as_str(), rank, score);
        }
        rank
    }

    /// Submit the end state of a run
    pub fn submit_run(&mut self, run: &LevelRun, timestamp: f64) -> Option<usize> {
        self.submit(
            total_score(run),
            run.tolerance(),
            run.current_level(),
            run.is_completed(),
            run.perfect_levels().len() as u32,
            timestamp,
        )
    }

    /// Load all tiers, falling back to empty boards
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut boards = Self::new();
        for tolerance in MistakeTolerance::ALL {
            let key = Self::storage_key(tolerance);
            if let Some(scores) = persistence::load_json::<HighScores>(store, &key, Self::VERSION) {
                let scores = scores.sanitize();
                log::info!(
                    "Loaded {} {} high scores",
                    scores.entries.len(),
                    tolerance.as_str()
                );
                *boards.get_mut(tolerance) = scores;
            }
        }
        boards
    }

    /// Save one tier
    pub fn save(&self, store: &mut dyn KeyValueStore, tolerance: MistakeTolerance) -> bool {
        let scores = self.get(tolerance);
        let ok = persistence::save_json(
            store,
            &Self::storage_key(tolerance),
            Self::VERSION,
            scores,
        );
        if ok {
            log::info!(
                "High scores saved ({} {} entries)",
                scores.entries.len(),
                tolerance.as_str()
            );
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::GameType;

    fn entry(score: i32) -> HighScoreEntry {
        HighScoreEntry {
            score,
            level: 1,
            completed: false,
            perfect_levels: 0,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_non_positive_scores_never_qualify() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(!scores.qualifies(-40));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_game_over_below_zero_not_recorded() {
        let mut run = LevelRun::new();
        run.start_run(GameType::ColorOnly, MistakeTolerance::Hard);
        run.add_wrong_answer();
        assert_eq!(total_score(&run), -10);

        let mut boards = Leaderboards::new();
        assert_eq!(boards.submit_run(&run, 0.0), None);
        assert!(boards.get(MistakeTolerance::Hard).is_empty());
    }

    #[test]
    fn test_sanitize_drops_non_positive() {
        let mut store = MemoryStore::new();
        let stored = HighScores {
            entries: vec![entry(40), entry(0), entry(-30)],
        };
        let key = Leaderboards::storage_key(MistakeTolerance::Easy);
        assert!(persistence::save_json(&mut store, &key, 1, &stored));
        let loaded = Leaderboards::load(&store);
        let easy = loaded.get(MistakeTolerance::Easy);
        assert_eq!(easy.entries.len(), 1);
        assert_eq!(easy.top_score(), Some(40));
    }

    #[test]
    fn test_sorted_and_bounded() {
        let mut scores = HighScores::new();
        for s in [50, 300, 10, 200, 120, 90, 75, 60, 40, 30, 20] {
            scores.add(entry(s));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(300));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
        // 10 fell off
        assert!(!scores.qualifies(10));
        assert_eq!(scores.potential_rank(250), Some(2));
        assert_eq!(scores.add(entry(250)), Some(2));
    }

    #[test]
    fn test_tiers_are_separate() {
        let mut boards = Leaderboards::new();
        assert_eq!(
            boards.submit(500, MistakeTolerance::Hard, 4, false, 1, 0.0),
            Some(1)
        );
        assert!(boards.get(MistakeTolerance::Easy).is_empty());
        assert_eq!(boards.get(MistakeTolerance::Hard).top_score(), Some(500));
    }

    #[test]
    fn test_load_save() {
        let mut store = MemoryStore::new();
        let mut boards = Leaderboards::new();
        boards.submit(120, MistakeTolerance::Normal, 2, false, 0, 1.0);
        assert!(boards.save(&mut store, MistakeTolerance::Normal));

        let loaded = Leaderboards::load(&store);
        assert_eq!(loaded.get(MistakeTolerance::Normal).top_score(), Some(120));
        assert!(loaded.get(MistakeTolerance::Easy).is_empty());

        store.set(&Leaderboards::storage_key(MistakeTolerance::Normal), "[1,2");
        assert!(Leaderboards::load(&store).get(MistakeTolerance::Normal).is_empty());
    }
}
