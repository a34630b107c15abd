//! Response decoding subsystem.
//!
//! # Data Flow
//! ```text
//! RawResponse (2xx, body buffered)
//!     → mime.rs (override or Content-Type → decode target)
//!     → decoder.rs (JSON / text / document / raw)
//!     → document.rs (markup bodies)
//!     → Payload, or DecodeError for the classifier
//! ```

pub mod decoder;
pub mod document;
pub mod mime;

pub use decoder::{decode, DecodeError, Payload};
pub use document::Document;
pub use mime::{DecodeTarget, MimeType, UnknownMimeType};
