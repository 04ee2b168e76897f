//! High score leaderboard system
//!
//! Persisted as a flat JSON array, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_KEY;
use crate::persistence::KeyValueStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Three upper-case letters
    pub initials: String,
    /// Final score (including time bonus)
    pub score: i32,
    /// Seconds the session took
    pub time: f64,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
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

    /// Check if a score qualifies for the leaderboard.
    /// Any score qualifies while the table has free slots.
    pub fn qualifies(&self, score: i32) -> bool {
        self.potential_rank(score).is_some()
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify).
    /// With free slots the rank is `len + 1`.
    pub fn potential_rank(&self, score: i32) -> Option<usize> {
        if self.entries.len() < MAX_HIGH_SCORES {
            return Some(self.entries.len() + 1);
        }
        self.entries
            .iter()
            .position(|e| score > e.score)
            .map(|i| i + 1)
    }

    /// Add a new score, re-sort and keep the top 10.
    /// Returns the rank achieved (1-indexed) or None if it fell off the table.
    pub fn add_score(&mut self, initials: &str, score: i32, time: f64) -> Option<usize> {
        let entry = HighScoreEntry {
            initials: initials.to_string(),
            score,
            time,
        };

        // Insert after equal scores so earlier entries keep their place
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i32> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse a stored leaderboard, normalizing order and size
    pub fn from_json(json: &str) -> Option<Self> {
        let mut scores: HighScores = serde_json::from_str(json).ok()?;
        scores.normalize();
        Some(scores)
    }

    /// Sort descending (stable) and truncate
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load high scores from a store. Missing or corrupt data is an empty table.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(LEADERBOARD_KEY) {
            Some(json) => match Self::from_json(&json) {
                Some(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                None => {
                    log::warn!("High scores unreadable, starting fresh");
                    Self::new()
                }
            },
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to a store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if store.set_item(LEADERBOARD_KEY, &json) {
                    log::info!("High scores saved ({} entries)", self.entries.len());
                } else {
                    log::warn!("High scores could not be saved");
                }
            }
            Err(e) => log::warn!("High scores not serializable: {}", e),
        }
    }
}
