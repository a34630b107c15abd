//! Raw response representation.
//!
//! # Responsibilities
//! - Snapshot status, reason phrase, final URL and headers
//! - Keep the buffered body for decoding and inspection
//! - Stay cheap to clone so a rejection can carry it

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::decode::mime::media_type;
use crate::http::transport::ResponseHead;

/// An HTTP response before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    status_text: String,
    url: String,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(head: ResponseHead, body: Bytes) -> Self {
        Self {
            status: head.status,
            status_text: head.status_text,
            url: head.url,
            headers: head.headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase as sent by the server.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Final URL of the exchange.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Declared media type, lowercased and without parameters.
    pub fn content_type(&self) -> Option<String> {
        let value = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        media_type(value)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Canonical reason phrase for a status, or an empty string.
pub fn canonical_status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

/// Reason phrase to report: the server's own when it sent one, else canonical.
pub fn status_text(status: StatusCode, reason: Option<&[u8]>) -> String {
    match reason {
        Some(bytes) if !bytes.is_empty() => String::from_utf8_lossy(bytes).into_owned(),
        _ => canonical_status_text(status),
    }
}
