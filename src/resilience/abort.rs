//! Cancellation control.
//!
//! # Responsibilities
//! - Own the single cancellation signal of a task
//! - Record why cancellation happened (caller or deadline)
//! - Issue the underlying cancellation exactly once

use std::sync::OnceLock;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::observability::metrics;

/// Origin of a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// `abort()` was called on the task.
    User,
    /// The timeout race fired.
    Timeout,
}

impl AbortReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AbortReason::User => "user",
            AbortReason::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when a request is cancelled through its signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("The user aborted a request.")]
pub struct AbortError;

/// Owner of a task's cancellation signal.
#[derive(Debug, Default)]
pub struct AbortController {
    token: CancellationToken,
    reason: OnceLock<AbortReason>,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signal handed to transports.
    pub fn signal(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Request cancellation.
    ///
    /// Only the first call records its reason and cancels the signal; it
    /// returns `true`. Every later call is a no-op returning `false`.
    pub fn abort(&self, reason: AbortReason) -> bool {
        if self.reason.set(reason).is_err() {
            return false;
        }

        self.token.cancel();
        metrics::record_abort(reason.as_str());
        tracing::debug!(reason = %reason, "Cancellation issued");
        true
    }

    /// Why the signal was cancelled, if it was.
    pub fn reason(&self) -> Option<AbortReason> {
        self.reason.get().copied()
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal is cancelled.
    pub async fn cancelled(&self) -> AbortReason {
        self.token.cancelled().await;
        self.reason().unwrap_or(AbortReason::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_abort_is_idempotent() {
        let controller = AbortController::new();
        assert!(!controller.is_aborted());
        assert!(controller.reason().is_none());

        assert!(controller.abort(AbortReason::User));
        for _ in 0..10 {
            assert!(!controller.abort(AbortReason::User));
        }
        assert!(controller.is_aborted());
        assert_eq!(controller.reason(), Some(AbortReason::User));
    }

    #[test]
    fn test_first_reason_wins() {
        let controller = AbortController::new();
        assert!(controller.abort(AbortReason::Timeout));
        assert!(!controller.abort(AbortReason::User));
        assert_eq!(controller.reason(), Some(AbortReason::Timeout));
    }

    #[test]
    fn test_signal_observes_abort() {
        let controller = AbortController::new();
        let signal = controller.signal();
        assert!(!signal.is_cancelled());
        controller.abort(AbortReason::User);
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_reports_reason() {
        let controller = std::sync::Arc::new(AbortController::new());
        let c = controller.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            c.abort(AbortReason::Timeout);
        });

        assert_eq!(controller.cancelled().await, AbortReason::Timeout);
    }

    #[test]
    fn test_abort_error_message() {
        assert_eq!(AbortError.to_string(), "The user aborted a request.");
    }
}
