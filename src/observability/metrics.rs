//! Metrics collection.
//!
//! # Metrics
//! - `loader_requests_total` (counter): settled tasks by outcome
//! - `loader_request_duration_seconds` (histogram): execute-to-settle latency by outcome
//! - `loader_aborts_total` (counter): issued cancellations by reason
//!
//! Outcome labels are `resolved` or the canonical error name of the rejection.
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use std::time::Instant;

/// Record a settled task.
pub fn record_settlement(outcome: &'static str, started: Instant) {
    let duration = started.elapsed().as_secs_f64();

    metrics::counter!("loader_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("loader_request_duration_seconds", "outcome" => outcome).record(duration);
}

/// Record an issued cancellation.
pub fn record_abort(reason: &'static str) {
    metrics::counter!("loader_aborts_total", "reason" => reason).increment(1);
}
