//! Local best-score boards
//!
//! One top-10 board per game, persisted in the key/value store. This is the
//! player's own history on this device; the shared leaderboard lives behind
//! the ledger.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the run
    pub score: u64,
    /// Coins the run was worth
    pub coins: u32,
    /// Monotonic ms at which the run started
    pub started_at: f64,
}

/// High score board for one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn storage_key(game_key: &str) -> String {
        format!("arcadehub_{}_best", game_key)
    }

    /// Check if a score qualifies for the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score, returning the rank achieved (1-indexed) if it qualified
    pub fn add_score(&mut self, score: u64, coins: u32, started_at: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            coins,
            started_at,
        };

        // Sorted descending; ties keep the older run first
        let pos = self.entries.iter().position(|e| score > e.score);
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

    /// Best score so far (0 when empty)
    pub fn best(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Load the board for `game_key`
    pub fn load(store: &dyn KeyValueStore, game_key: &str) -> Self {
        load_json(store, &Self::storage_key(game_key)).unwrap_or_default()
    }

    /// Save the board for `game_key`
    pub fn save(&self, store: &mut dyn KeyValueStore, game_key: &str) -> Result<(), ArcadeError> {
        save_json(store, &Self::storage_key(game_key), self)?;
        log::info!("{} best scores saved ({} entries)", game_key, self.entries.len());
        Ok(())
    }
}
