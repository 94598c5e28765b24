//! Browser driver
//!
//! [`WebGame`] wraps a [`GameSession`] for JavaScript. The play area is measured
//! from a DOM element every frame, each tick's [`Frame`] goes to a JS render
//! callback as JSON, and final scores go either to an async JS reporter or to
//! the local leaderboard.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use crate::highscores::{HighScores, LocalReporter};
use crate::profile::validate_gaming_name;
use crate::report::{self, ReportError, ReportOutcome};
use crate::sim::{
    FinalResult, Frame, GameEvent, GamePhase, GameSession, PauseCause, PlayArea, Surface,
};
use crate::tuning::Tuning;
use crate::vocabulary::Vocabulary;

/// Play area read from a DOM element, frames pushed to a JS callback
struct DomSurface {
    selector: String,
    on_frame: Option<js_sys::Function>,
}

impl Surface for DomSurface {
    fn play_area(&self) -> Option<PlayArea> {
        let element = web_sys::window()?
            .document()?
            .query_selector(&self.selector)
            .ok()??;
        Some(PlayArea::new(
            element.client_width() as f32,
            element.client_height() as f32,
        ))
    }

    fn present(&mut self, frame: &Frame) {
        let Some(callback) = &self.on_frame else {
            return;
        };
        match serde_json::to_string(frame) {
            Ok(json) => {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Frame callback failed: {:?}", e);
                }
            }
            Err(e) => log::error!("Could not serialize frame: {}", e),
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    surface: DomSurface,
    local: LocalReporter,
    /// `(score, wpm) => Promise`
    remote: Option<js_sys::Function>,
    on_refresh: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WebGame {
    /// `selector` locates the play-area element, e.g. `".game-area"`
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        Self {
            session: GameSession::new(Tuning::load(), Vocabulary::builtin(), seed),
            surface: DomSurface {
                selector: selector.to_string(),
                on_frame: None,
            },
            local: LocalReporter::new(HighScores::load(), None),
            remote: None,
            on_refresh: None,
        }
    }

    pub fn set_on_frame(&mut self, callback: js_sys::Function) {
        self.surface.on_frame = Some(callback);
    }

    /// Route final scores to `(score, wpm) => Promise` instead of the local board
    pub fn set_reporter(&mut self, callback: js_sys::Function) {
        self.remote = Some(callback);
    }

    /// Called after every score submission, successful or not
    pub fn set_on_refresh(&mut self, callback: js_sys::Function) {
        self.on_refresh = Some(callback);
    }

    /// Play under a gaming name; returns the sanitized name
    pub fn set_player(&mut self, name: &str) -> Result<String, JsValue> {
        let name = validate_gaming_name(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.local.set_player(Some(name.clone()));
        Ok(name)
    }

    pub fn play_as_guest(&mut self) {
        self.local.set_player(None);
    }

    pub fn start(&mut self, now: f64) {
        self.session.start(now);
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Advance to `now` (ms, same clock as `start`). Returns the events since
    /// the last frame as a JSON array.
    pub fn frame(&mut self, now: f64) -> String {
        self.session.advance(now, &mut self.surface);
        let events = self.session.drain_events();
        if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
            if let Some(result) = self.session.final_result() {
                self.report(result);
            }
        }
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Could not serialize events: {}", e);
            "[]".to_string()
        })
    }

    /// Feed the input field's value; true when the field should be cleared
    pub fn input(&mut self, text: &str) -> bool {
        self.session.submit_input(text).clears_input()
    }

    /// Claim a power-up by id; returns its kind name
    pub fn activate(&mut self, id: u32, now: f64) -> Option<String> {
        self.session
            .activate_powerup(id, now)
            .map(|kind| kind.as_str().to_string())
    }

    pub fn navigate_away(&mut self) {
        self.session.navigate_away();
    }

    pub fn resume(&mut self, now: f64) -> bool {
        self.session.resume(now)
    }

    pub fn score(&self) -> f64 {
        self.session.score() as f64
    }

    pub fn lives(&self) -> u8 {
        self.session.lives()
    }

    pub fn wpm(&self) -> u32 {
        self.session.wpm()
    }

    pub fn phase(&self) -> String {
        match self.session.phase() {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::Paused(PauseCause::Powerup) => "paused",
            GamePhase::Paused(PauseCause::Navigation) => "away",
            GamePhase::Ended => "ended",
        }
        .to_string()
    }

    /// Local leaderboard as JSON
    pub fn high_scores(&self) -> String {
        serde_json::to_string(&self.local.scores).unwrap_or_else(|_| "{\"entries\":[]}".to_string())
    }
}

impl WebGame {
    fn report(&mut self, result: FinalResult) {
        let refresh = self.on_refresh.clone();
        let fire_refresh = move || {
            if let Some(callback) = &refresh {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    log::warn!("Refresh callback failed: {:?}", e);
                }
            }
        };

        match self.remote.clone() {
            None => {
                let _ = report::submit_result(&mut self.local, &result, fire_refresh);
            }
            Some(remote) => spawn_local(async move {
                let outcome = report_remote(&remote, result).await;
                report::log_outcome(&outcome);
                fire_refresh();
            }),
        }
    }
}

async fn report_remote(
    remote: &js_sys::Function,
    result: FinalResult,
) -> Result<ReportOutcome, ReportError> {
    log::info!("Submitting score {} (wpm {})", result.score, result.wpm);
    let pending = remote
        .call2(
            &JsValue::NULL,
            &JsValue::from_f64(result.score as f64),
            &JsValue::from(result.wpm),
        )
        .map_err(|e| ReportError::Rejected(format!("{e:?}")))?;
    JsFuture::from(js_sys::Promise::resolve(&pending))
        .await
        .map_err(|e| ReportError::Unavailable(format!("{e:?}")))?;
    Ok(ReportOutcome::Saved { rank: None })
}
