//! Score, lives and typing-speed bookkeeping

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Authoritative session counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    score: u64,
    lives: u8,
    max_lives: u8,
    words_typed: u32,
    /// Session start (ms), base for elapsed time and WPM
    started_at_ms: f64,
    life_gain_threshold: u64,
    min_wpm_duration_ms: f64,
}

impl Ledger {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.max_lives,
            max_lives: tuning.max_lives,
            words_typed: 0,
            started_at_ms: 0.0,
            life_gain_threshold: tuning.life_gain_threshold,
            min_wpm_duration_ms: tuning.min_wpm_duration_ms,
        }
    }

    /// Fresh counters for a session starting at `now_ms`
    pub fn restart(&mut self, now_ms: f64) {
        self.score = 0;
        self.lives = self.max_lives;
        self.words_typed = 0;
        self.started_at_ms = now_ms;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    pub fn words_typed(&self) -> u32 {
        self.words_typed
    }

    pub fn started_at_ms(&self) -> f64 {
        self.started_at_ms
    }

    /// Add points, then grant a life if the score crossed a threshold multiple.
    /// Returns true when a life was actually gained.
    pub fn award_points(&mut self, points: u64) -> bool {
        self.add_points(points);
        let threshold = self.life_gain_threshold;
        if threshold == 0 || self.score == 0 || self.score % threshold >= points {
            return false;
        }
        self.gain_life()
    }

    /// Add points without the life-gain check
    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn credit_words(&mut self, count: u32) {
        self.words_typed = self.words_typed.saturating_add(count);
    }

    /// Returns false at the cap
    pub fn gain_life(&mut self) -> bool {
        if self.lives < self.max_lives {
            self.lives += 1;
            log::debug!("Gained life, lives = {}", self.lives);
            true
        } else {
            log::debug!("Max lives reached");
            false
        }
    }

    /// Remaining lives after the loss, or `None` when already out of lives
    pub fn lose_life(&mut self) -> Option<u8> {
        if self.lives == 0 {
            return None;
        }
        self.lives -= 1;
        log::debug!("Lost life, lives = {}", self.lives);
        Some(self.lives)
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.started_at_ms).max(0.0)
    }

    /// Words per minute, 0 before any words or inside the warm-up window
    pub fn wpm(&self, now_ms: f64) -> u32 {
        let elapsed = self.elapsed_ms(now_ms);
        if self.words_typed == 0 || elapsed < self.min_wpm_duration_ms || elapsed <= 0.0 {
            return 0;
        }
        let minutes = elapsed / 60_000.0;
        (self.words_typed as f64 / minutes).round() as u32
    }
}
