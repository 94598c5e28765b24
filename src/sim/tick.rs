//! Fixed timestep simulation tick
//!
//! One tick advances words (and resolves misses), runs the word spawn policy,
//! then runs the power-up spawn policy and moves power-ups. Speeds are in
//! units per tick, so there is no `dt`.

use rand::Rng;

use super::powerups::SpawnRoll;
use super::state::{GameEvent, GameState};
use super::view::PlayArea;
use super::words::max_objects;
use crate::tuning::Tuning;
use crate::vocabulary::Vocabulary;

/// What the session controller must react to after a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Words that crossed the miss boundary this tick
    pub missed: u32,
    /// A miss took the last life
    pub lives_depleted: bool,
}

/// Advance the game state by one tick
pub fn tick(
    state: &mut GameState,
    tuning: &Tuning,
    vocabulary: &Vocabulary,
    area: PlayArea,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if !state.phase.is_running() {
        return outcome;
    }

    state.time_ticks += 1;

    // Words fall, anything past the boundary costs a life
    state.words.advance();
    let boundary = area.miss_boundary(tuning.miss_margin);
    for obj in state.words.take_missed(boundary) {
        outcome.missed += 1;
        log::debug!("Missed {} at y={:.1}", obj.word, obj.pos.y);
        state.push_event(GameEvent::WordMissed {
            id: obj.id,
            word: obj.word,
            pos: obj.pos,
        });
        if let Some(lives) = state.ledger.lose_life() {
            state.push_event(GameEvent::LifeLost { lives });
            if lives == 0 {
                outcome.lives_depleted = true;
            }
        }
    }
    if outcome.lives_depleted {
        return outcome;
    }

    // Word spawn policy: fewer live words, better odds
    let ceiling = max_objects(state.ledger.score(), &tuning.spawn);
    let live = state.words.len() as u32;
    if ceiling > 0 && live < ceiling {
        let probability = (1.0 - live as f64 / ceiling as f64) * tuning.spawn.base_probability;
        if state.rng.random::<f64>() < probability {
            spawn_word(state, tuning, vocabulary, area);
        }
    }

    // Power-up spawn policy
    let score = state.ledger.score();
    let roll = state
        .powerups
        .roll_spawn(score, &tuning.powerup, &mut state.rng);
    if let SpawnRoll::Won { bracket } = roll {
        let id = state.next_entity_id();
        let powerup = state
            .powerups
            .spawn(id, area, &tuning.powerup, &mut state.rng);
        let kind = powerup.kind;
        log::info!("Spawned power-up {} (bracket {})", kind.as_str(), bracket);
        state.push_event(GameEvent::PowerupSpawned { id, kind });
    }

    for powerup in state.powerups.advance(tuning.powerup.fall_speed, area.height) {
        log::debug!("Power-up {} fell off unclaimed", powerup.kind.as_str());
        state.push_event(GameEvent::PowerupLost {
            id: powerup.id,
            kind: powerup.kind,
        });
    }

    outcome
}

/// Spawn one random word. Skipped (with a warning) when the vocabulary is
/// empty; skipped silently when the session is not running.
pub fn spawn_word(
    state: &mut GameState,
    tuning: &Tuning,
    vocabulary: &Vocabulary,
    area: PlayArea,
) -> Option<u32> {
    if !state.phase.is_running() {
        return None;
    }
    let Some(word) = vocabulary.pick(&mut state.rng) else {
        if !state.config_warned {
            log::warn!("Word list empty, nothing to spawn");
            state.config_warned = true;
        }
        return None;
    };

    let id = state.next_entity_id();
    let slow_factor = state
        .effects
        .slowdown_active()
        .then_some(tuning.slowdown_factor);
    let obj = state.words.spawn(
        id,
        word,
        area,
        state.ledger.score(),
        slow_factor,
        &tuning.speed,
        &tuning.spawn,
        &mut state.rng,
    );
    log::debug!(
        "Spawned {} at x={:.0}, speed={:.2}",
        obj.word,
        obj.pos.x,
        obj.speed
    );
    let word = obj.word.clone();
    state.push_event(GameEvent::WordSpawned { id, word });
    Some(id)
}
