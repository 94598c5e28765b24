//! Simulation clock
//!
//! Two time sources drive a session: the fixed-period [`TickClock`] and the
//! one-shot timers held by [`Scheduler`]. Both are plain data advanced by an
//! externally supplied millisecond timestamp, so tests can run a whole session
//! on a simulated clock.

use serde::{Deserialize, Serialize};

/// What a one-shot timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Staggered opening word spawn
    SpawnWord,
    /// Slowdown effect runs out
    SlowdownExpired,
    /// Pause effect auto-resumes
    PauseExpired,
}

/// Cancellation handle returned by [`Scheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    /// Session generation the timer was scheduled under
    pub generation: u64,
    pub due_ms: f64,
    pub event: TimerEvent,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: u64,
    due_ms: f64,
    generation: u64,
    event: TimerEvent,
}

/// Cancellable one-shot timers, fired in due order (ties by creation order)
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<PendingTimer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, generation: u64, event: TimerEvent) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due_ms,
            generation,
            event,
        });
        TimerHandle(id)
    }

    /// Returns false when the timer already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != handle.0);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)
    }

    /// Due time of the next timer to fire
    pub fn next_due(&self) -> Option<f64> {
        self.earliest().map(|i| self.pending[i].due_ms)
    }

    /// Remove and return the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<FiredTimer> {
        let index = self.earliest()?;
        if self.pending[index].due_ms > now_ms {
            return None;
        }
        let timer = self.pending.swap_remove(index);
        Some(FiredTimer {
            handle: TimerHandle(timer.id),
            generation: timer.generation,
            due_ms: timer.due_ms,
            event: timer.event,
        })
    }
}

/// Fixed-period tick source; stopped while the session is not running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    interval_ms: f64,
    next_tick_ms: Option<f64>,
}

impl TickClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_tick_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// First tick lands one interval after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_tick_ms = Some(now_ms + self.interval_ms);
    }

    pub fn stop(&mut self) {
        self.next_tick_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_tick_ms.is_some()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.next_tick_ms
    }

    /// Mark the pending tick as run
    pub fn consume(&mut self) {
        if let Some(next) = self.next_tick_ms.as_mut() {
            *next += self.interval_ms;
        }
    }

    /// Drop any backlog so the next tick is one interval after `now_ms`
    pub fn resync(&mut self, now_ms: f64) {
        if self.is_running() {
            self.start(now_ms);
        }
    }
}
