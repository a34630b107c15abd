//! Settle-once task primitive.
//!
//! # Responsibilities
//! - Track the task state (created, executing, settled)
//! - Hold exactly one outcome once resolved or rejected
//! - Let any number of parties await that outcome
//! - Optionally capture timestamps for each transition

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use crate::lifecycle::state::TaskState;

/// Timestamps captured when timing capture is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// When the task was constructed.
    pub created: Instant,
    /// When execution started, if it did.
    pub executing: Option<Instant>,
    /// When the task settled, if it did.
    pub settled: Option<Instant>,
}

impl Timings {
    /// Time between the start of execution and settlement.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.settled?.saturating_duration_since(self.executing?))
    }
}

#[derive(Debug)]
struct TimingMarks {
    created: Instant,
    executing: OnceLock<Instant>,
    settled: OnceLock<Instant>,
}

/// A settle-once container with async waiting.
///
/// `resolve` and `reject` race freely; whichever lands first wins and every
/// later call returns `false` without touching the stored outcome.
#[derive(Debug)]
pub struct Executor<T, E> {
    state: AtomicU8,
    outcome: OnceLock<Result<T, E>>,
    settled: Notify,
    timings: Option<TimingMarks>,
}

impl<T, E> Executor<T, E> {
    /// Create an executor in the `Created` state.
    pub fn new(capture_timings: bool) -> Self {
        let timings = capture_timings.then(|| TimingMarks {
            created: Instant::now(),
            executing: OnceLock::new(),
            settled: OnceLock::new(),
        });

        Self {
            state: AtomicU8::new(TaskState::Created as u8),
            outcome: OnceLock::new(),
            settled: Notify::new(),
            timings,
        }
    }

    /// Move from `Created` to `Executing`.
    ///
    /// Returns `false` if execution already started or the task settled.
    pub fn begin(&self) -> bool {
        let started = self
            .state
            .compare_exchange(
                TaskState::Created as u8,
                TaskState::Executing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        if started {
            if let Some(marks) = &self.timings {
                let _ = marks.executing.set(Instant::now());
            }
        }
        started
    }

    /// Settle with a value. Returns whether this call settled the task.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with an error. Returns whether this call settled the task.
    pub fn reject(&self, error: E) -> bool {
        self.settle(Err(error))
    }

    fn settle(&self, outcome: Result<T, E>) -> bool {
        let terminal = if outcome.is_ok() {
            TaskState::Resolved
        } else {
            TaskState::Rejected
        };

        if self.outcome.set(outcome).is_err() {
            return false;
        }

        self.state.store(terminal as u8, Ordering::Release);
        if let Some(marks) = &self.timings {
            let _ = marks.settled.set(Instant::now());
        }
        self.settled.notify_waiters();
        true
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        match self.outcome.get() {
            Some(Ok(_)) => TaskState::Resolved,
            Some(Err(_)) => TaskState::Rejected,
            None => TaskState::from(self.state.load(Ordering::Acquire)),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Borrow the outcome if the task has settled.
    pub fn outcome(&self) -> Option<&Result<T, E>> {
        self.outcome.get()
    }

    /// Captured timestamps, or `None` when capture is disabled.
    pub fn timings(&self) -> Option<Timings> {
        self.timings.as_ref().map(|marks| Timings {
            created: marks.created,
            executing: marks.executing.get().copied(),
            settled: marks.settled.get().copied(),
        })
    }
}

impl<T: Clone, E: Clone> Executor<T, E> {
    /// Wait until the task settles and return a copy of the outcome.
    pub async fn wait(&self) -> Result<T, E> {
        loop {
            // Registered before the check so a concurrent settle cannot be missed.
            let notified = self.settled.notified();
            if let Some(outcome) = self.outcome.get() {
                return outcome.clone();
            }
            notified.await;
        }
    }
}
