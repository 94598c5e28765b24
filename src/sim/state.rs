//! Game state and core simulation types
//!
//! Everything a session owns lives in [`GameState`]; the session controller
//! wraps it with the clock and timers.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ledger::Ledger;
use super::powerups::PowerupRegistry;
use super::scheduler::TimerHandle;
use super::words::WordRegistry;
use crate::tuning::Tuning;

/// Why a session is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseCause {
    /// Pause power-up; resumes on its own timer
    Powerup,
    /// Player left the game screen; board was cleared
    Navigation,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started, or reset
    #[default]
    Idle,
    /// Tick loop advancing
    Running,
    Paused(PauseCause),
    /// Lives ran out
    Ended,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, GamePhase::Paused(_))
    }

    /// Running or paused
    pub fn is_live(&self) -> bool {
        self.is_running() || self.is_paused()
    }
}

/// A word falling toward the miss boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub word: String,
    pub pos: Vec2,
    /// Current downward velocity (units per tick)
    pub speed: f32,
    /// Unslowed speed to restore when a slowdown ends
    pub base_speed: Option<f32>,
}

impl FallingObject {
    /// Points for matching or destroying this word
    pub fn points(&self) -> u64 {
        self.word.chars().count().max(1) as u64
    }

    pub fn is_slowed(&self) -> bool {
        self.base_speed.is_some_and(|base| self.speed < base)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerupKind {
    ExtraLife,
    Slowdown,
    Pause,
    DestroyAll,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::ExtraLife,
        PowerupKind::Slowdown,
        PowerupKind::Pause,
        PowerupKind::DestroyAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::ExtraLife => "extra-life",
            PowerupKind::Slowdown => "slowdown",
            PowerupKind::Pause => "pause",
            PowerupKind::DestroyAll => "destroy-all",
        }
    }
}

/// A power-up entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// Temporary global modifiers and their pending expiry timers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub slowdown: Option<TimerHandle>,
    pub pause: Option<TimerHandle>,
}

impl Effects {
    pub fn slowdown_active(&self) -> bool {
        self.slowdown.is_some()
    }

    pub fn pause_active(&self) -> bool {
        self.pause.is_some()
    }
}

/// Notable things that happened since the last drain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WordSpawned { id: u32, word: String },
    WordMatched { id: u32, word: String, points: u64, pos: Vec2 },
    WordMissed { id: u32, word: String, pos: Vec2 },
    WordsDestroyed { count: u32, points: u64 },
    LifeGained { lives: u8 },
    LifeLost { lives: u8 },
    PowerupSpawned { id: u32, kind: PowerupKind },
    PowerupActivated { id: u32, kind: PowerupKind },
    PowerupLost { id: u32, kind: PowerupKind },
    SlowdownStarted,
    SlowdownEnded,
    Paused { cause: PauseCause },
    Resumed,
    GameOver { score: u64, wpm: u32 },
}

/// Complete per-session simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub ledger: Ledger,
    pub words: WordRegistry,
    pub powerups: PowerupRegistry,
    pub effects: Effects,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events for the platform layer
    pub events: Vec<GameEvent>,
    /// Configuration problems already reported this session
    pub config_warned: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            ledger: Ledger::new(tuning),
            words: WordRegistry::new(),
            powerups: PowerupRegistry::new(),
            effects: Effects::default(),
            time_ticks: 0,
            events: Vec::new(),
            config_warned: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_use_character_count_with_floor_of_one() {
        let mut obj = FallingObject {
            id: 1,
            word: "HACK".into(),
            pos: Vec2::ZERO,
            speed: 2.0,
            base_speed: Some(2.0),
        };
        assert_eq!(obj.points(), 4);
        obj.word.clear();
        assert_eq!(obj.points(), 1);
    }

    #[test]
    fn powerup_kind_names_match_serialized_form() {
        for kind in PowerupKind::ALL {
            let json = format!("\"{}\"", kind.as_str());
            assert_eq!(serde_json::to_string(&kind).unwrap(), json);
            assert_eq!(serde_json::from_str::<PowerupKind>(&json).unwrap(), kind);
        }
        assert!(serde_json::from_str::<PowerupKind>("\"bogus\"").is_err());
    }

    #[test]
    fn entity_ids_are_unique() {
        let mut state = GameState::new(1, &Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }
}
