//! Error taxonomy.
//!
//! # Data Flow
//! ```text
//! transport error | non-2xx | decode error | abort | deadline
//!     → classify.rs (precedence rules)
//!     → kind.rs LoaderError { kind, message, cause, response, request_url }
//! ```
//!
//! # Design Decisions
//! - Exactly four kinds; no backend error type reaches the caller unwrapped
//! - The original error is always kept as `cause`
//! - The raw response rides along whenever the exchange produced one

pub mod classify;
pub mod kind;

pub use classify::{classify, ClassifyContext, Failure, TIMEOUT_MESSAGE};
pub use kind::{
    Cause, ErrorKind, HttpStatusError, LoaderError, UnknownErrorKind, REQUEST_ABORT_ERROR,
    REQUEST_ERROR, RESPONSE_PARSING_ERROR, TIMEOUT_ERROR, TIMEOUT_EXCEEDED_ERROR,
};
