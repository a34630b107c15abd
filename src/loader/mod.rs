//! Request task subsystem.
//!
//! # Data Flow
//! ```text
//! RequestTask::new(url, LoaderOptions)
//!     → execute() (spawn once on the current runtime)
//!     → race: abort signal | deadline | transport → decode
//!     → classify failures → settle the executor
//!     → wait() / .await yields Payload or LoaderError
//! ```
//!
//! # Design Decisions
//! - A task holds an executor; it does not extend one
//! - Aborts and deadlines share one cancellation signal
//! - Settlement happens exactly once, whatever wins the race

pub mod options;
pub mod task;

pub use options::{LoaderOptions, OptionsError};
pub use task::RequestTask;
