//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race a request against an optional deadline
//! - Cancel the request's signal when the deadline wins
//! - Drop the timer as soon as the request finishes first

use std::future::Future;
use std::time::Duration;
use tokio::time::error::Elapsed;

use crate::resilience::abort::{AbortController, AbortReason};

/// Optional deadline raced against a future.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutRace {
    deadline: Option<Duration>,
}

impl TimeoutRace {
    /// A zero duration disables the race.
    pub fn new(deadline: Option<Duration>) -> Self {
        Self {
            deadline: deadline.filter(|d| !d.is_zero()),
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Drive `fut` to completion unless the deadline elapses first.
    ///
    /// On expiry the controller is aborted with [`AbortReason::Timeout`] and
    /// the `Elapsed` marker is returned.
    pub async fn run<F>(&self, controller: &AbortController, fut: F) -> Result<F::Output, Elapsed>
    where
        F: Future,
    {
        let Some(deadline) = self.deadline else {
            return Ok(fut.await);
        };

        match tokio::time::timeout(deadline, fut).await {
            Ok(output) => Ok(output),
            Err(elapsed) => {
                tracing::debug!(timeout_ms = deadline.as_millis() as u64, "Request deadline elapsed");
                controller.abort(AbortReason::Timeout);
                Err(elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_disables_race() {
        assert_eq!(TimeoutRace::new(Some(Duration::ZERO)).deadline(), None);
        assert_eq!(TimeoutRace::new(None).deadline(), None);
        assert_eq!(
            TimeoutRace::new(Some(Duration::from_millis(5))).deadline(),
            Some(Duration::from_millis(5))
        );
    }

    #[tokio::test]
    async fn test_deadline_aborts_controller() {
        let controller = AbortController::new();
        let race = TimeoutRace::new(Some(Duration::from_millis(20)));

        let result = race
            .run(&controller, tokio::time::sleep(Duration::from_secs(5)))
            .await;

        assert!(result.is_err());
        assert_eq!(controller.reason(), Some(AbortReason::Timeout));
    }

    #[tokio::test]
    async fn test_completion_before_deadline() {
        let controller = AbortController::new();
        let race = TimeoutRace::new(Some(Duration::from_millis(500)));

        let result = race.run(&controller, async { 42 }).await;

        assert_eq!(result.ok(), Some(42));
        assert!(!controller.is_aborted());
    }

    #[tokio::test]
    async fn test_no_deadline_never_aborts() {
        let controller = AbortController::new();
        let race = TimeoutRace::new(None);

        let result = race
            .run(&controller, async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                "done"
            })
            .await;

        assert_eq!(result.ok(), Some("done"));
        assert!(!controller.is_aborted());
    }
}
