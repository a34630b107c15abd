//! Task lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! RequestTask::new → Executor (Created)
//!     → execute(): Executor::begin (Executing)
//!     → exchange / timeout / abort race
//!     → Executor::resolve | Executor::reject (terminal)
//!     → every wait() caller observes the same outcome
//! ```
//!
//! # Design Decisions
//! - Settlement is a single `OnceLock::set`; losers of the race are dropped
//! - Waiters park on a `Notify`, no polling
//! - Timing capture is opt-in per task

pub mod executor;
pub mod state;

pub use executor::{Executor, Timings};
pub use state::TaskState;
