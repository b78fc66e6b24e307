//! High score leaderboard
//!
//! Persisted through [`Storage`]: the best score on its own key as an integer
//! string, and the top 10 runs as a JSON array.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::error::StorageError;
use crate::persistence::{HIGH_SCORE_KEY, HIGH_SCORES_KEY, Storage};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
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
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and size after loading foreign data
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load the table; a missing or malformed record yields an empty table
    pub fn load<S: Storage + ?Sized>(store: &S) -> Self {
        let json = match store.get_item(HIGH_SCORES_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("Could not read high scores: {e}");
                return Self::new();
            }
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.normalize();
                log::info!("Loaded {} high scores", scores.len());
                scores
            }
            Err(e) => {
                log::warn!("Ignoring malformed high scores: {e}");
                Self::new()
            }
        }
    }

    /// Save the table
    pub fn save<S: Storage + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set_item(HIGH_SCORES_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Best score on record; absent or unreadable means no prior best
pub fn load_best_score<S: Storage + ?Sized>(store: &S) -> u64 {
    match store.get_item(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring non-numeric best score {raw:?}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not read best score: {e}");
            0
        }
    }
}

pub fn save_best_score<S: Storage + ?Sized>(store: &mut S, score: u64) -> Result<(), StorageError> {
    store.set_item(HIGH_SCORE_KEY, &score.to_string())
}
