//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, driven by a caller-supplied clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; output goes through [`Surface`]

pub mod ledger;
pub mod matcher;
pub mod powerups;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tick;
pub mod view;
pub mod words;

pub use ledger::Ledger;
pub use powerups::{PowerupRegistry, SpawnRoll};
pub use scheduler::{FiredTimer, Scheduler, TickClock, TimerEvent, TimerHandle};
pub use session::{FinalResult, GameSession, InputOutcome};
pub use state::{
    Effects, FallingObject, GameEvent, GamePhase, GameState, PauseCause, Powerup, PowerupKind,
};
pub use tick::{TickOutcome, spawn_word, tick};
pub use view::{Frame, PlayArea, PowerupSprite, Surface, WordSprite};
pub use words::{WordRegistry, max_objects, object_width, speed_range};
