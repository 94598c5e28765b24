//! Wordfall - A falling-words typing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (words, power-ups, scoring, session control)
//! - `platform`: Browser/native drivers
//! - `report`: Final score hand-off
//! - `highscores`: Local leaderboard
//! - `profile`: Gaming-name rules
//! - `tuning`: Data-driven game balance
//! - `vocabulary`: Word list

pub mod highscores;
pub mod platform;
pub mod profile;
pub mod report;
pub mod sim;
pub mod tuning;
pub mod vocabulary;

pub use highscores::{HighScores, LocalReporter};
pub use report::{ReportError, ReportOutcome, ScoreReporter, submit_result};
pub use sim::{FinalResult, GameSession, InputOutcome};
pub use tuning::{Tuning, TuningError};
pub use vocabulary::Vocabulary;

/// Driver configuration constants
pub mod consts {
    /// Play area used when no browser element is available
    pub const HEADLESS_WIDTH: f32 = 800.0;
    pub const HEADLESS_HEIGHT: f32 = 600.0;

    /// CSS selector of the play-area element
    pub const GAME_AREA_SELECTOR: &str = ".game-area";

    /// Demo player reaction time between keystroke bursts
    pub const AUTOPILOT_REACTION_MS: f64 = 700.0;
    /// Simulated frame step for the native demo (~60 Hz)
    pub const DEMO_STEP_MS: f64 = 16.0;
    /// Give up on a demo run after this long
    pub const DEMO_LIMIT_MS: f64 = 20.0 * 60_000.0;
}
