//! Headless driver
//!
//! A fixed-size [`Surface`] plus a scripted player, used by the native demo
//! binary and by tests that run whole sessions on a simulated clock.

use crate::sim::{
    FinalResult, Frame, GamePhase, GameSession, InputOutcome, PlayArea, PowerupKind, Surface,
};

/// In-memory surface that keeps the latest frame
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    area: Option<PlayArea>,
    /// Frames presented so far
    pub frames: u64,
    pub last_frame: Option<Frame>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            area: Some(PlayArea::new(width, height)),
            ..Self::default()
        }
    }

    /// Surface with no play area, as when the game element is missing
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn set_area(&mut self, area: Option<PlayArea>) {
        self.area = area;
    }
}

impl Surface for HeadlessSurface {
    fn play_area(&self) -> Option<PlayArea> {
        self.area
    }

    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
    }
}

/// Scripted player: after each reaction delay it types the lowest word on
/// screen, or claims a power-up when one is worth having.
#[derive(Debug, Clone)]
pub struct Autopilot {
    reaction_ms: f64,
    next_action_ms: f64,
    /// Words typed, power-ups claimed
    pub typed: u32,
    pub claimed: u32,
}

impl Autopilot {
    pub fn new(reaction_ms: f64) -> Self {
        Self {
            reaction_ms,
            next_action_ms: 0.0,
            typed: 0,
            claimed: 0,
        }
    }

    /// Take at most one action if the reaction delay has passed
    pub fn act(&mut self, session: &mut GameSession, now_ms: f64) -> Option<InputOutcome> {
        if now_ms < self.next_action_ms || session.phase() != GamePhase::Running {
            return None;
        }
        self.next_action_ms = now_ms + self.reaction_ms;

        if let Some(id) = self.pick_powerup(session) {
            if let Some(kind) = session.activate_powerup(id, now_ms) {
                log::debug!("Autopilot claimed {}", kind.as_str());
                self.claimed += 1;
            }
            return None;
        }

        let target = session
            .state()
            .words
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|o| o.word.to_lowercase())?;
        let outcome = session.submit_input(&target);
        if matches!(outcome, InputOutcome::Matched { .. }) {
            self.typed += 1;
        }
        Some(outcome)
    }

    fn pick_powerup(&self, session: &GameSession) -> Option<u32> {
        let state = session.state();
        let crowded = state.words.len() >= 4;
        let hurt = state.ledger.lives() < state.ledger.max_lives();
        state
            .powerups
            .iter()
            .find(|p| match p.kind {
                PowerupKind::ExtraLife => hurt,
                PowerupKind::DestroyAll => crowded,
                PowerupKind::Slowdown => !session.slowdown_active(),
                PowerupKind::Pause => false,
            })
            .map(|p| p.id)
    }
}

/// Play a whole session on a simulated clock, stepping `step_ms` at a time.
/// Returns the final result, or `None` if the session outlived `limit_ms`.
pub fn run_demo(
    session: &mut GameSession,
    autopilot: &mut Autopilot,
    surface: &mut HeadlessSurface,
    step_ms: f64,
    limit_ms: f64,
) -> Option<FinalResult> {
    let start = session.now_ms();
    if !session.phase().is_live() {
        session.start(start);
    }

    let mut now = start;
    while now - start < limit_ms {
        now += step_ms;
        session.advance(now, surface);
        if session.phase() == GamePhase::Ended {
            break;
        }
        autopilot.act(session, now);
    }
    session.final_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use crate::vocabulary::Vocabulary;

    #[test]
    fn detached_surface_has_no_area() {
        assert!(HeadlessSurface::detached().play_area().is_none());
        assert!(HeadlessSurface::new(800.0, 600.0).play_area().is_some());
    }

    #[test]
    fn slow_autopilot_eventually_loses() {
        let mut session = GameSession::new(Tuning::default(), Vocabulary::builtin(), 99);
        let mut autopilot = Autopilot::new(2_500.0);
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let result = run_demo(&mut session, &mut autopilot, &mut surface, 16.0, 30.0 * 60_000.0)
            .expect("session should end");
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.lives(), 0);
        assert_eq!(result.words_typed, session.words_typed());
        assert!(surface.frames > 0);
    }

    #[test]
    fn autopilot_scores() {
        let mut session = GameSession::new(Tuning::default(), Vocabulary::builtin(), 5);
        let mut autopilot = Autopilot::new(400.0);
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        run_demo(&mut session, &mut autopilot, &mut surface, 16.0, 60_000.0);
        assert!(autopilot.typed > 0);
        assert!(session.score() > 0);
    }
}
