//! High score leaderboard system
//!
//! Persisted to LocalStorage, tracks the top 10 runs by score, then WPM.

use serde::{Deserialize, Serialize};

use crate::report::{ReportError, ReportOutcome, ScoreReporter};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Gaming name the run was played under
    pub name: String,
    pub score: u64,
    pub wpm: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Whether a (score, wpm) pair ranks strictly above this entry
    fn beaten_by(&self, score: u64, wpm: u32) -> bool {
        (score, wpm) > (self.score, self.wpm)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "wordfall_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, wpm: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .is_none_or(|e| e.beaten_by(score, wpm))
    }

    /// Add a run to the leaderboard. Returns the 1-indexed rank achieved, or
    /// `None` if it didn't qualify. Equal runs rank below earlier ones.
    pub fn add_score(&mut self, name: &str, score: u64, wpm: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score, wpm) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
            wpm,
            timestamp,
        };

        let index = self
            .entries
            .iter()
            .position(|e| e.beaten_by(score, wpm))
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best WPM across all kept runs
    pub fn best_wpm(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.wpm).max()
    }

    /// Best rank held by `name`, 1-indexed
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), ReportError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ReportError::Storage("LocalStorage unavailable".into()))?;
        let json =
            serde_json::to_string(self).map_err(|e| ReportError::Storage(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| ReportError::Storage("LocalStorage write refused".into()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Reports finished runs into the local leaderboard under a gaming name.
/// Without a name the run counts as guest play and is not stored.
#[derive(Debug, Clone, Default)]
pub struct LocalReporter {
    pub scores: HighScores,
    player: Option<String>,
    clock: Option<fn() -> f64>,
}

impl LocalReporter {
    pub fn new(scores: HighScores, player: Option<String>) -> Self {
        Self {
            scores,
            player,
            clock: None,
        }
    }

    /// Override the timestamp source
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn set_player(&mut self, player: Option<String>) {
        self.player = player;
    }
}

impl ScoreReporter for LocalReporter {
    fn report_result(&mut self, score: u64, wpm: u32) -> Result<ReportOutcome, ReportError> {
        let Some(name) = self.player.as_deref() else {
            return Ok(ReportOutcome::Skipped {
                reason: "guest play".into(),
            });
        };
        let now = self.clock.map_or_else(crate::platform::wall_clock_ms, |clock| clock());
        match self.scores.add_score(name, score, wpm, now) {
            Some(rank) => {
                self.scores.save()?;
                Ok(ReportOutcome::Saved { rank: Some(rank) })
            }
            None => Ok(ReportOutcome::NotRanked),
        }
    }
}
