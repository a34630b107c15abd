//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! RequestTask / AbortController / TimeoutRace produce:
//!     → tracing events inside a per-task `request_task` span
//!     → metrics.rs (settlement counters and latency, abort counters)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → whatever `metrics` recorder the embedding application installs
//! ```

pub mod logging;
pub mod metrics;
