//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! LoaderOptions (method, headers, query, body)
//!     → transport.rs (TransportRequest, Transport trait)
//!     → client.rs (reqwest backend, observes the abort signal)
//!     → TransportResponse { head, body future }
//!     → response.rs (RawResponse once the body is buffered)
//! ```
//!
//! # Design Decisions
//! - The transport is a trait object so tests can script it
//! - Head and body arrive separately; the body read stays cancellable
//! - Non-canonical reason phrases from the server are preserved

pub mod client;
pub mod response;
pub mod transport;

pub use client::ReqwestTransport;
pub use response::RawResponse;
pub use transport::{
    BodyFuture, BoxError, ResponseHead, Transport, TransportRequest, TransportResponse,
};
