//! Game session controller
//!
//! Owns one [`GameState`] plus the clock and timers that drive it, and is the
//! only place phase transitions happen:
//!
//! ```text
//! Idle -> Running <-> Paused -> Running ... -> Ended
//! ```
//!
//! Every timer is tagged with the session generation it was scheduled under.
//! Starting, resetting or navigating away bumps the generation, so anything
//! left over from before is inert when it fires.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::matcher;
use super::scheduler::{FiredTimer, Scheduler, TickClock, TimerEvent, TimerHandle};
use super::state::{Effects, GameEvent, GamePhase, GameState, PauseCause, PowerupKind};
use super::tick::{spawn_word, tick};
use super::view::{Frame, PlayArea, PowerupSprite, Surface, WordSprite};
use crate::tuning::Tuning;
use crate::vocabulary::Vocabulary;

/// Result of feeding one input value to the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Blank input, or no session in progress
    Ignored,
    /// Session is paused; typing is discarded
    Blocked,
    /// Nothing matches yet, keep typing
    NoMatch,
    Matched {
        id: u32,
        word: String,
        points: u64,
        life_gained: bool,
    },
}

impl InputOutcome {
    /// Whether the input field should be emptied
    pub fn clears_input(&self) -> bool {
        matches!(self, InputOutcome::Blocked | InputOutcome::Matched { .. })
    }
}

/// Terminal numbers handed to the score reporter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub score: u64,
    pub wpm: u32,
    pub words_typed: u32,
    pub duration_ms: f64,
}

pub struct GameSession {
    tuning: Tuning,
    vocabulary: Vocabulary,
    state: GameState,
    scheduler: Scheduler,
    clock: TickClock,
    generation: u64,
    /// Latest time the session has been advanced to
    now_ms: f64,
    result: Option<FinalResult>,
    area_warned: bool,
    /// State changed since the last presented frame
    dirty: bool,
}

impl GameSession {
    pub fn new(tuning: Tuning, vocabulary: Vocabulary, seed: u64) -> Self {
        if vocabulary.is_empty() {
            log::warn!("Session created with an empty word list; no words will spawn");
        }
        let state = GameState::new(seed, &tuning);
        let clock = TickClock::new(tuning.tick_interval_ms);
        Self {
            tuning,
            vocabulary,
            state,
            scheduler: Scheduler::new(),
            clock,
            generation: 0,
            now_ms: 0.0,
            result: None,
            area_warned: false,
            dirty: true,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.ledger.score()
    }

    pub fn lives(&self) -> u8 {
        self.state.ledger.lives()
    }

    pub fn words_typed(&self) -> u32 {
        self.state.ledger.words_typed()
    }

    /// Live WPM; frozen at the game-over value once the session ends
    pub fn wpm(&self) -> u32 {
        match self.result {
            Some(result) => result.wpm,
            None => self.state.ledger.wpm(self.now_ms),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn slowdown_active(&self) -> bool {
        self.state.effects.slowdown_active()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn final_result(&self) -> Option<FinalResult> {
        self.result
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    // === Lifecycle ===

    /// Start a fresh session, seeding it from the previous run's RNG
    pub fn start(&mut self, now_ms: f64) {
        let seed = self.state.rng.random::<u64>();
        self.start_with_seed(now_ms, seed);
    }

    /// Start a fresh session; all prior state, timers and effects are dropped
    pub fn start_with_seed(&mut self, now_ms: f64, seed: u64) {
        self.generation += 1;
        self.scheduler.cancel_all();
        self.state = GameState::new(seed, &self.tuning);
        self.state.ledger.restart(now_ms);
        self.state.phase = GamePhase::Running;
        self.clock = TickClock::new(self.tuning.tick_interval_ms);
        self.clock.start(now_ms);
        self.now_ms = now_ms;
        self.result = None;
        self.area_warned = false;
        self.dirty = true;

        // Opening words: one right away, one after a short random delay
        let spawn = &self.tuning.spawn;
        let jitter = self.state.rng.random::<f64>() * spawn.initial_jitter_ms;
        let second = now_ms + spawn.initial_delay_ms + jitter;
        self.scheduler
            .schedule(now_ms, self.generation, TimerEvent::SpawnWord);
        self.scheduler
            .schedule(second, self.generation, TimerEvent::SpawnWord);

        log::info!(
            "Session {} started (seed {}, tick {} ms)",
            self.generation,
            seed,
            self.tuning.tick_interval_ms
        );
    }

    /// Back to `Idle` with empty registries
    pub fn reset(&mut self) {
        self.generation += 1;
        self.scheduler.cancel_all();
        self.clock.stop();
        let seed = self.state.rng.random::<u64>();
        self.state = GameState::new(seed, &self.tuning);
        self.result = None;
        self.dirty = true;
        log::info!("Session reset");
    }

    /// Player left the game screen: cancel every timer and clear the board
    pub fn navigate_away(&mut self) {
        if !self.state.phase.is_live() {
            return;
        }
        self.generation += 1;
        self.scheduler.cancel_all();
        self.clock.stop();
        self.state.effects = Effects::default();
        self.state.words.clear();
        self.state.powerups.clear_active();
        self.state.phase = GamePhase::Paused(PauseCause::Navigation);
        self.dirty = true;
        self.state.push_event(GameEvent::Paused {
            cause: PauseCause::Navigation,
        });
        log::info!("Navigated away, stopping tick loop and timers");
    }

    /// Return from a navigation pause; power-up pauses resume on their timer
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.state.phase != GamePhase::Paused(PauseCause::Navigation) {
            return false;
        }
        let now_ms = now_ms.max(self.now_ms);
        self.now_ms = now_ms;
        self.state.phase = GamePhase::Running;
        self.clock.start(now_ms);
        self.dirty = true;
        self.state.push_event(GameEvent::Resumed);
        log::info!("Session resumed");
        true
    }

    // === Clock ===

    /// Run every timer and tick due up to `now_ms`, in time order. Timers due
    /// at the same instant as a tick run first. Each tick is presented to the
    /// surface, and so is any change made outside a tick (input, power-ups,
    /// timers while the tick clock is stopped). Returns the number of ticks run.
    pub fn advance(&mut self, now_ms: f64, surface: &mut dyn Surface) -> u32 {
        let now_ms = now_ms.max(self.now_ms);
        let area = self.poll_area(surface);
        let mut ticks = 0;

        loop {
            let timer_due = self.scheduler.next_due().filter(|&t| t <= now_ms);
            let tick_due = self.clock.next_due().filter(|&t| t <= now_ms);
            match (timer_due, tick_due) {
                (None, None) => break,
                (Some(t), Some(k)) if t <= k => self.fire_timer(t, area),
                (Some(t), None) => self.fire_timer(t, area),
                (_, Some(k)) => {
                    if ticks >= self.tuning.max_catch_up_ticks {
                        log::debug!("Dropping tick backlog at {:.0} ms", now_ms);
                        self.clock.resync(now_ms);
                        continue;
                    }
                    self.clock.consume();
                    self.now_ms = k;
                    ticks += 1;
                    self.run_tick(area, surface);
                }
            }
        }

        if self.dirty {
            surface.present(&self.frame());
            self.dirty = false;
        }
        self.now_ms = now_ms;
        ticks
    }

    fn poll_area(&mut self, surface: &dyn Surface) -> Option<PlayArea> {
        let area = surface.play_area().filter(PlayArea::is_usable);
        if area.is_none() && self.state.phase.is_running() && !self.area_warned {
            log::warn!("Play area missing or zero-sized; simulation stalled");
            self.area_warned = true;
        }
        area
    }

    fn run_tick(&mut self, area: Option<PlayArea>, surface: &mut dyn Surface) {
        if let Some(area) = area {
            let outcome = tick(&mut self.state, &self.tuning, &self.vocabulary, area);
            if outcome.lives_depleted {
                self.finish();
            }
        }
        surface.present(&self.frame());
        self.dirty = false;
    }

    fn fire_timer(&mut self, due_ms: f64, area: Option<PlayArea>) {
        let Some(fired) = self.scheduler.pop_due(due_ms) else {
            return;
        };
        self.now_ms = self.now_ms.max(fired.due_ms);
        self.dispatch(fired, area);
    }

    fn dispatch(&mut self, fired: FiredTimer, area: Option<PlayArea>) {
        if fired.generation != self.generation {
            log::debug!(
                "Discarding stale {:?} timer from session {}",
                fired.event,
                fired.generation
            );
            return;
        }
        self.dirty = true;
        match fired.event {
            TimerEvent::SpawnWord => {
                if let Some(area) = area {
                    spawn_word(&mut self.state, &self.tuning, &self.vocabulary, area);
                }
            }
            TimerEvent::SlowdownExpired => self.end_slowdown(fired.handle),
            TimerEvent::PauseExpired => self.end_pause(fired.handle, fired.due_ms),
        }
    }

    // === Input ===

    /// Match one input value against the live words; at most one is removed
    pub fn submit_input(&mut self, text: &str) -> InputOutcome {
        match self.state.phase {
            GamePhase::Running => {}
            GamePhase::Paused(_) => return InputOutcome::Blocked,
            GamePhase::Idle | GamePhase::Ended => return InputOutcome::Ignored,
        }
        let Some(key) = matcher::normalize(text) else {
            return InputOutcome::Ignored;
        };
        let Some(obj) = self.state.words.remove_by_word(&key) else {
            return InputOutcome::NoMatch;
        };

        self.dirty = true;
        let points = obj.points();
        self.state.ledger.credit_words(1);
        let life_gained = self.state.ledger.award_points(points);
        log::debug!("Matched {} for {} points", obj.word, points);

        self.state.push_event(GameEvent::WordMatched {
            id: obj.id,
            word: obj.word.clone(),
            points,
            pos: obj.pos,
        });
        if life_gained {
            self.state.push_event(GameEvent::LifeGained {
                lives: self.state.ledger.lives(),
            });
        }

        InputOutcome::Matched {
            id: obj.id,
            word: obj.word,
            points,
            life_gained,
        }
    }

    // === Power-ups ===

    /// Claim a power-up and apply its effect. The power-up is consumed even
    /// when its effect turns out to be a no-op.
    pub fn activate_powerup(&mut self, id: u32, now_ms: f64) -> Option<PowerupKind> {
        if !self.state.phase.is_live() {
            return None;
        }
        let now_ms = now_ms.max(self.now_ms);
        let powerup = self.state.powerups.take(id)?;
        let kind = powerup.kind;
        self.dirty = true;
        log::info!("Activating power-up {}", kind.as_str());
        self.state
            .push_event(GameEvent::PowerupActivated { id, kind });

        match kind {
            PowerupKind::ExtraLife => {
                if self.state.ledger.gain_life() {
                    self.state.push_event(GameEvent::LifeGained {
                        lives: self.state.ledger.lives(),
                    });
                }
            }
            PowerupKind::Slowdown => self.apply_slowdown(now_ms),
            PowerupKind::Pause => self.apply_pause(now_ms),
            PowerupKind::DestroyAll => self.destroy_all(),
        }
        Some(kind)
    }

    fn apply_slowdown(&mut self, now_ms: f64) {
        match self.state.effects.slowdown.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                log::debug!("Slowdown already active, timer reset");
            }
            None => {
                self.state.words.apply_slowdown(self.tuning.slowdown_factor);
                self.state.push_event(GameEvent::SlowdownStarted);
            }
        }
        let handle = self.scheduler.schedule(
            now_ms + self.tuning.slowdown_duration_ms,
            self.generation,
            TimerEvent::SlowdownExpired,
        );
        self.state.effects.slowdown = Some(handle);
    }

    fn end_slowdown(&mut self, handle: TimerHandle) {
        if self.state.effects.slowdown != Some(handle) {
            return;
        }
        self.state.effects.slowdown = None;
        self.state.words.restore_speeds();
        self.state.push_event(GameEvent::SlowdownEnded);
        log::info!("Slowdown ended");
    }

    fn apply_pause(&mut self, now_ms: f64) {
        if !self.state.phase.is_running() || self.state.effects.pause_active() {
            log::info!("Cannot pause: already paused or game stopped");
            return;
        }
        self.clock.stop();
        self.state.phase = GamePhase::Paused(PauseCause::Powerup);
        let handle = self.scheduler.schedule(
            now_ms + self.tuning.pause_duration_ms,
            self.generation,
            TimerEvent::PauseExpired,
        );
        self.state.effects.pause = Some(handle);
        self.state.push_event(GameEvent::Paused {
            cause: PauseCause::Powerup,
        });
        log::info!("Game paused");
    }

    fn end_pause(&mut self, handle: TimerHandle, due_ms: f64) {
        if self.state.effects.pause != Some(handle) {
            return;
        }
        self.state.effects.pause = None;
        if self.state.phase == GamePhase::Paused(PauseCause::Powerup) {
            self.state.phase = GamePhase::Running;
            self.clock.start(due_ms);
            self.state.push_event(GameEvent::Resumed);
            log::info!("Game resumed");
        }
    }

    fn destroy_all(&mut self) {
        let destroyed = self.state.words.destroy_all();
        if destroyed.is_empty() {
            log::info!("Destroy all: no words on screen");
            return;
        }
        let points: u64 = destroyed.iter().map(|o| o.points()).sum();
        let count = destroyed.len() as u32;
        self.state.ledger.add_points(points);
        self.state.ledger.credit_words(count);
        self.state
            .push_event(GameEvent::WordsDestroyed { count, points });
        log::info!("Destroy all: +{} points", points);
    }

    // === Game over ===

    fn finish(&mut self) {
        if !self.state.phase.is_running() {
            return;
        }
        let now_ms = self.now_ms;
        self.clock.stop();
        self.scheduler.cancel_all();
        self.state.effects = Effects::default();
        self.state.words.clear();
        self.state.powerups.clear_active();
        self.state.phase = GamePhase::Ended;
        self.dirty = true;

        let ledger = &self.state.ledger;
        let result = FinalResult {
            score: ledger.score(),
            wpm: ledger.wpm(now_ms),
            words_typed: ledger.words_typed(),
            duration_ms: ledger.elapsed_ms(now_ms),
        };
        log::info!("Game over: score {}, wpm {}", result.score, result.wpm);
        self.state.push_event(GameEvent::GameOver {
            score: result.score,
            wpm: result.wpm,
        });
        self.result = Some(result);
    }

    // === Scripted spawns ===

    /// Spawn one word from the vocabulary right away
    pub fn spawn_word(&mut self, area: PlayArea) -> Option<u32> {
        let id = spawn_word(&mut self.state, &self.tuning, &self.vocabulary, area)?;
        self.dirty = true;
        Some(id)
    }

    /// Drop a specific power-up at the top of the play area
    pub fn spawn_powerup(&mut self, kind: PowerupKind, area: PlayArea) -> Option<u32> {
        if !self.state.phase.is_live() {
            return None;
        }
        let id = self.state.next_entity_id();
        let rng = &mut self.state.rng;
        let tuning = &self.tuning.powerup;
        self.state.powerups.spawn_kind(id, kind, area, tuning, rng);
        self.dirty = true;
        self.state
            .push_event(GameEvent::PowerupSpawned { id, kind });
        Some(id)
    }

    // === Rendering ===

    pub fn frame(&self) -> Frame {
        let state = &self.state;
        Frame {
            tick: state.time_ticks,
            phase: state.phase,
            score: state.ledger.score(),
            lives: state.ledger.lives(),
            max_lives: state.ledger.max_lives(),
            wpm: self.wpm(),
            slowdown_active: state.effects.slowdown_active(),
            words: state
                .words
                .iter()
                .map(|o| WordSprite {
                    id: o.id,
                    word: o.word.clone(),
                    pos: o.pos,
                    slowed: o.is_slowed(),
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .map(|p| PowerupSprite {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FallingObject;
    use glam::Vec2;

    struct TestSurface {
        area: Option<PlayArea>,
        frames: u32,
    }

    impl TestSurface {
        fn new() -> Self {
            Self {
                area: Some(PlayArea::new(800.0, 600.0)),
                frames: 0,
            }
        }
    }

    impl Surface for TestSurface {
        fn play_area(&self) -> Option<PlayArea> {
            self.area
        }

        fn present(&mut self, _frame: &Frame) {
            self.frames += 1;
        }
    }

    /// No random spawns so tests control the board
    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.spawn.base_probability = 0.0;
        tuning.powerup.spawn_chance = 0.0;
        tuning
    }

    /// Started session with the opening spawn timers cancelled
    fn session() -> GameSession {
        let mut session = GameSession::new(quiet_tuning(), Vocabulary::builtin(), 42);
        session.start_with_seed(0.0, 42);
        session.scheduler.cancel_all();
        session
    }

    fn put_word(session: &mut GameSession, text: &str, y: f32, speed: f32) -> u32 {
        let state = session.state_mut();
        let id = state.next_entity_id();
        state.words.insert(FallingObject {
            id,
            word: text.to_string(),
            pos: Vec2::new(10.0, y),
            speed,
            base_speed: Some(speed),
        });
        id
    }

    fn put_powerup(session: &mut GameSession, kind: PowerupKind) -> u32 {
        let state = session.state_mut();
        let id = state.next_entity_id();
        let mut rng = rand_pcg::Pcg32::new(1, 1);
        state.powerups.spawn_kind(
            id,
            kind,
            PlayArea::new(800.0, 600.0),
            &Tuning::default().powerup,
            &mut rng,
        );
        id
    }

    #[test]
    fn start_initializes_from_scratch() {
        let mut session = GameSession::new(quiet_tuning(), Vocabulary::builtin(), 1);
        assert_eq!(session.phase(), GamePhase::Idle);
        session.start(1_000.0);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.words_typed(), 0);
        assert_eq!(session.pending_timers(), 2);
    }

    #[test]
    fn opening_words_spawn_on_timers() {
        let mut session = GameSession::new(quiet_tuning(), Vocabulary::builtin(), 1);
        let mut surface = TestSurface::new();
        session.start(0.0);
        session.advance(0.0, &mut surface);
        assert_eq!(session.state().words.len(), 1);
        session.advance(2_000.0, &mut surface);
        assert_eq!(session.state().words.len(), 2);
    }

    #[test]
    fn matching_word_scores_and_removes() {
        let mut session = session();
        put_word(&mut session, "CODE", 50.0, 2.0);
        let outcome = session.submit_input("code");
        assert!(matches!(outcome, InputOutcome::Matched { points: 4, .. }));
        assert!(outcome.clears_input());
        assert_eq!(session.score(), 4);
        assert_eq!(session.words_typed(), 1);
        assert_eq!(session.lives(), 3);
        assert!(session.state().words.is_empty());
    }

    #[test]
    fn unmatched_input_is_kept() {
        let mut session = session();
        put_word(&mut session, "CODE", 50.0, 2.0);
        let outcome = session.submit_input("cod");
        assert_eq!(outcome, InputOutcome::NoMatch);
        assert!(!outcome.clears_input());
        assert_eq!(session.submit_input("   "), InputOutcome::Ignored);
        assert_eq!(session.state().words.len(), 1);
    }

    #[test]
    fn most_urgent_duplicate_is_removed() {
        let mut session = session();
        let upper = put_word(&mut session, "HACK", 100.0, 2.0);
        let lower = put_word(&mut session, "HACK", 300.0, 2.0);
        let InputOutcome::Matched { id, .. } = session.submit_input("hack") else {
            panic!("expected a match");
        };
        assert_eq!(id, lower);
        assert!(session.state().words.get(upper).is_some());
    }

    #[test]
    fn crossing_fifty_gains_life() {
        let mut session = session();
        session.state_mut().ledger.add_points(48);
        session.state_mut().ledger.lose_life();
        put_word(&mut session, "CAT", 50.0, 2.0);
        let outcome = session.submit_input("CAT");
        assert!(matches!(outcome, InputOutcome::Matched { life_gained: true, .. }));
        assert_eq!(session.score(), 51);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn last_life_miss_ends_once() {
        let mut session = session();
        let mut surface = TestSurface::new();
        session.state_mut().ledger.lose_life();
        session.state_mut().ledger.lose_life();
        put_word(&mut session, "CODE", 569.0, 2.0);
        put_word(&mut session, "HACK", 569.5, 2.0);

        session.advance(50.0, &mut surface);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.lives(), 0);
        let overs = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(session.final_result().is_some());
        assert_eq!(session.pending_timers(), 0);

        // Nothing advances after the end
        assert_eq!(session.advance(10_000.0, &mut surface), 0);
    }

    #[test]
    fn destroy_all_awards_every_word() {
        let mut session = session();
        put_word(&mut session, "CODE", 10.0, 2.0);
        put_word(&mut session, "DEBUG", 20.0, 2.0);
        put_word(&mut session, "SYSTEM", 30.0, 2.0);
        let id = put_powerup(&mut session, PowerupKind::DestroyAll);
        assert_eq!(session.activate_powerup(id, 0.0), Some(PowerupKind::DestroyAll));
        assert_eq!(session.score(), 15);
        assert_eq!(session.words_typed(), 3);
        assert!(session.state().words.is_empty());
        assert!(session.state().powerups.is_empty());
    }

    #[test]
    fn extra_life_is_capped() {
        let mut session = session();
        let id = put_powerup(&mut session, PowerupKind::ExtraLife);
        session.activate_powerup(id, 0.0);
        assert_eq!(session.lives(), 3);

        session.state_mut().ledger.lose_life();
        let id = put_powerup(&mut session, PowerupKind::ExtraLife);
        session.activate_powerup(id, 0.0);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn slowdown_halves_then_restores() {
        let mut session = session();
        let mut surface = TestSurface::new();
        let word = put_word(&mut session, "CODE", 0.0, 2.0);
        let id = put_powerup(&mut session, PowerupKind::Slowdown);
        session.activate_powerup(id, 0.0);
        assert!(session.slowdown_active());
        assert_eq!(session.state().words.get(word).unwrap().speed, 1.0);

        session.advance(9_999.0, &mut surface);
        assert_eq!(session.state().words.get(word).unwrap().speed, 1.0);
        session.advance(10_000.0, &mut surface);
        assert!(!session.slowdown_active());
        assert_eq!(session.state().words.get(word).unwrap().speed, 2.0);
    }

    #[test]
    fn slowdown_reactivation_resets_timer_without_rehalving() {
        let mut session = session();
        let mut surface = TestSurface::new();
        let word = put_word(&mut session, "CODE", -5_000.0, 2.0);
        let first = put_powerup(&mut session, PowerupKind::Slowdown);
        let second = put_powerup(&mut session, PowerupKind::Slowdown);

        session.activate_powerup(first, 0.0);
        session.advance(6_000.0, &mut surface);
        session.activate_powerup(second, 6_000.0);
        assert_eq!(session.pending_timers(), 1);
        assert_eq!(session.state().words.get(word).unwrap().speed, 1.0);

        session.advance(12_000.0, &mut surface);
        assert!(session.slowdown_active());
        session.advance(16_000.0, &mut surface);
        assert!(!session.slowdown_active());
        assert_eq!(session.state().words.get(word).unwrap().speed, 2.0);
    }

    #[test]
    fn pause_freezes_ticks_then_auto_resumes() {
        let mut session = session();
        let mut surface = TestSurface::new();
        let word = put_word(&mut session, "CODE", 0.0, 2.0);
        let id = put_powerup(&mut session, PowerupKind::Pause);

        session.activate_powerup(id, 0.0);
        assert_eq!(session.phase(), GamePhase::Paused(PauseCause::Powerup));
        assert_eq!(session.advance(4_999.0, &mut surface), 0);
        assert_eq!(session.state().words.get(word).unwrap().pos.y, 0.0);
        assert_eq!(session.submit_input("code"), InputOutcome::Blocked);

        session.advance(5_000.0, &mut surface);
        assert_eq!(session.phase(), GamePhase::Running);
        session.advance(5_050.0, &mut surface);
        assert_eq!(session.state().words.get(word).unwrap().pos.y, 2.0);
    }

    #[test]
    fn pause_while_paused_is_wasted() {
        let mut session = session();
        let mut surface = TestSurface::new();
        let first = put_powerup(&mut session, PowerupKind::Pause);
        let second = put_powerup(&mut session, PowerupKind::Pause);

        session.activate_powerup(first, 0.0);
        let pending = session.pending_timers();
        assert_eq!(session.activate_powerup(second, 3_000.0), Some(PowerupKind::Pause));
        assert_eq!(session.pending_timers(), pending);
        assert!(session.state().powerups.is_empty());

        // Still resumes on the original schedule
        session.advance(5_000.0, &mut surface);
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn slowdown_timer_runs_during_pause() {
        let mut session = session();
        let mut surface = TestSurface::new();
        let word = put_word(&mut session, "CODE", 0.0, 2.0);
        let slow = put_powerup(&mut session, PowerupKind::Slowdown);
        let pause = put_powerup(&mut session, PowerupKind::Pause);

        session.activate_powerup(slow, 0.0);
        session.advance(9_000.0, &mut surface);
        session.activate_powerup(pause, 9_000.0);
        session.advance(10_500.0, &mut surface);
        assert!(session.state().phase.is_paused());
        assert!(!session.slowdown_active());
        assert_eq!(session.state().words.get(word).unwrap().speed, 2.0);
    }

    #[test]
    fn navigation_clears_board_and_timers() {
        let mut session = session();
        let mut surface = TestSurface::new();
        put_word(&mut session, "CODE", 0.0, 2.0);
        let id = put_powerup(&mut session, PowerupKind::Slowdown);
        session.activate_powerup(id, 0.0);
        put_powerup(&mut session, PowerupKind::Pause);

        session.navigate_away();
        assert_eq!(session.phase(), GamePhase::Paused(PauseCause::Navigation));
        assert_eq!(session.pending_timers(), 0);
        assert!(!session.slowdown_active());
        assert!(session.state().words.is_empty());
        assert!(session.state().powerups.is_empty());

        assert!(session.resume(20_000.0));
        assert_eq!(session.advance(20_050.0, &mut surface), 1);
    }

    #[test]
    fn stale_timer_is_inert() {
        let mut session = session();
        let mut surface = TestSurface::new();
        let word = put_word(&mut session, "CODE", 0.0, 2.0);
        let id = put_powerup(&mut session, PowerupKind::Slowdown);
        session.activate_powerup(id, 0.0);

        // Leftover from an earlier session, pointing at the live effect
        let old_generation = session.generation() - 1;
        let stale = session
            .scheduler
            .schedule(100.0, old_generation, TimerEvent::SlowdownExpired);
        session.state_mut().effects.slowdown = Some(stale);

        session.advance(150.0, &mut surface);
        assert!(session.slowdown_active());
        assert_eq!(session.state().words.get(word).unwrap().speed, 1.0);
    }

    #[test]
    fn missing_play_area_stalls_without_crashing() {
        let mut session = session();
        let mut surface = TestSurface {
            area: None,
            frames: 0,
        };
        let word = put_word(&mut session, "CODE", 0.0, 2.0);
        let ticks = session.advance(500.0, &mut surface);
        assert_eq!(ticks, 8);
        assert_eq!(surface.frames, 8);
        assert_eq!(session.state().words.get(word).unwrap().pos.y, 0.0);
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn changes_between_ticks_are_presented_once() {
        let mut session = session();
        let mut surface = TestSurface::new();
        session.advance(50.0, &mut surface);
        assert_eq!(surface.frames, 1);

        let pause = put_powerup(&mut session, PowerupKind::Pause);
        session.activate_powerup(pause, 60.0);
        assert_eq!(session.advance(1_000.0, &mut surface), 0);
        assert_eq!(surface.frames, 2);

        // Nothing changed since
        session.advance(2_000.0, &mut surface);
        assert_eq!(surface.frames, 2);

        // Auto-resume is presented even before the next tick is due
        session.advance(5_060.0, &mut surface);
        assert_eq!(surface.frames, 3);
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut session = session();
        let mut surface = TestSurface::new();
        assert_eq!(session.advance(60_000.0, &mut surface), 8);
        assert_eq!(session.advance(60_050.0, &mut surface), 1);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = session();
        put_word(&mut session, "CODE", 0.0, 2.0);
        session.reset();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(session.state().words.is_empty());
        assert_eq!(session.pending_timers(), 0);
        assert_eq!(session.submit_input("code"), InputOutcome::Ignored);
    }
}
