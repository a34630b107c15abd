//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! RequestTask::execute
//!     → timeouts.rs (race the exchange against the deadline)
//!     → abort.rs (cancel the signal on deadline or caller abort)
//!     → transport observes the signal and releases its resources
//! ```
//!
//! # Design Decisions
//! - One signal per task, cancelled at most once
//! - The abort reason is recorded before the signal fires
//! - Nothing is retried here; retries belong to the caller

pub mod abort;
pub mod timeouts;

pub use abort::{AbortController, AbortError, AbortReason};
pub use timeouts::TimeoutRace;
