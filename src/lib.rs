//! Cancellable, deadline-bounded HTTP request tasks.

pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod loader;
pub mod observability;
pub mod resilience;

pub use config::schema::LoaderConfig;
pub use decode::{MimeType, Payload};
pub use error::{ErrorKind, LoaderError};
pub use http::RawResponse;
pub use lifecycle::TaskState;
pub use loader::{LoaderOptions, RequestTask};
