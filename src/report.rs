//! Score submission hand-off
//!
//! At game over the session's [`FinalResult`] is passed to a [`ScoreReporter`].
//! The outcome is only logged; whatever happens, the caller's refresh signal
//! fires afterwards so leaderboards can reload.

use thiserror::Error;

use crate::sim::FinalResult;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("score rejected: {0}")]
    Rejected(String),
    #[error("score service unavailable: {0}")]
    Unavailable(String),
    #[error("could not store score: {0}")]
    Storage(String),
}

/// What a reporter did with a submitted score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Stored; `rank` is the 1-indexed leaderboard position when known
    Saved { rank: Option<usize> },
    /// Accepted but below the leaderboard cut
    NotRanked,
    /// Deliberately not stored (guest play)
    Skipped { reason: String },
}

/// Destination for a finished session's score
pub trait ScoreReporter {
    fn report_result(&mut self, score: u64, wpm: u32) -> Result<ReportOutcome, ReportError>;
}

/// Reporter for guest play: nothing is stored
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestReporter;

impl ScoreReporter for GuestReporter {
    fn report_result(&mut self, score: u64, _wpm: u32) -> Result<ReportOutcome, ReportError> {
        Ok(ReportOutcome::Skipped {
            reason: format!("guest score {score} not saved"),
        })
    }
}

pub fn log_outcome(outcome: &Result<ReportOutcome, ReportError>) {
    match outcome {
        Ok(ReportOutcome::Saved { rank: Some(rank) }) => {
            log::info!("Score saved at rank #{}", rank)
        }
        Ok(ReportOutcome::Saved { rank: None }) => log::info!("Score saved"),
        Ok(ReportOutcome::NotRanked) => log::info!("Score saved, not on the leaderboard"),
        Ok(ReportOutcome::Skipped { reason }) => log::info!("Score not saved: {}", reason),
        Err(e) => log::error!("Score submission failed: {}", e),
    }
}

/// Report `result`, log the outcome, then fire `refresh` regardless of success
pub fn submit_result<R, F>(
    reporter: &mut R,
    result: &FinalResult,
    refresh: F,
) -> Result<ReportOutcome, ReportError>
where
    R: ScoreReporter + ?Sized,
    F: FnOnce(),
{
    log::info!("Submitting score {} (wpm {})", result.score, result.wpm);
    let outcome = reporter.report_result(result.score, result.wpm);
    log_outcome(&outcome);
    refresh();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl ScoreReporter for Failing {
        fn report_result(&mut self, _score: u64, _wpm: u32) -> Result<ReportOutcome, ReportError> {
            Err(ReportError::Unavailable("offline".into()))
        }
    }

    fn result() -> FinalResult {
        FinalResult {
            score: 120,
            wpm: 35,
            words_typed: 24,
            duration_ms: 41_000.0,
        }
    }

    #[test]
    fn refresh_fires_on_failure() {
        let mut refreshed = false;
        let outcome = submit_result(&mut Failing, &result(), || refreshed = true);
        assert!(matches!(outcome, Err(ReportError::Unavailable(_))));
        assert!(refreshed);
    }

    #[test]
    fn guest_scores_are_skipped() {
        let mut refreshed = false;
        let outcome = submit_result(&mut GuestReporter, &result(), || refreshed = true);
        assert!(matches!(outcome, Ok(ReportOutcome::Skipped { .. })));
        assert!(refreshed);
    }

    #[test]
    fn works_through_trait_object() {
        let mut reporter: Box<dyn ScoreReporter> = Box::new(GuestReporter);
        assert!(submit_result(reporter.as_mut(), &result(), || {}).is_ok());
    }
}
