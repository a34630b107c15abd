//! Response body decoding.
//!
//! # Decode table
//! ```text
//! application/json                       → Payload::Json
//! text/plain                             → Payload::Text
//! text/xml, text/html, application/xml,
//! image/svg+xml                          → Payload::Document
//! raw, unknown, absent, unparseable      → Payload::Raw
//! ```
//!
//! The explicit `mime_type` override wins over the declared `Content-Type`.

use thiserror::Error;

use crate::decode::document::Document;
use crate::decode::mime::{DecodeTarget, MimeType};
use crate::http::response::RawResponse;
use crate::http::transport::BoxError;

/// Decoded body of a successful response.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Document(Document),
    Raw(RawResponse),
}

impl Payload {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Payload::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RawResponse> {
        match self {
            Payload::Raw(response) => Some(response),
            _ => None,
        }
    }

    pub fn target(&self) -> DecodeTarget {
        match self {
            Payload::Json(_) => DecodeTarget::Json,
            Payload::Text(_) => DecodeTarget::Text,
            Payload::Document(_) => DecodeTarget::Document,
            Payload::Raw(_) => DecodeTarget::Raw,
        }
    }
}

/// Failure to turn a successful response into its decode target.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid json response body at {url} reason: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid text response body at {url} reason: {source}")]
    Text {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("invalid markup response body at {url} reason: {reason}")]
    Markup { url: String, reason: String },

    #[error("failed to read response body at {url} reason: {source}")]
    Body {
        url: String,
        #[source]
        source: BoxError,
    },
}

/// Pick the decode target and the markup flavour, if any.
pub fn resolve(response: &RawResponse, forced: Option<MimeType>) -> (DecodeTarget, Option<MimeType>) {
    let mime = forced.or_else(|| {
        response
            .content_type()
            .and_then(|media_type| MimeType::from_media_type(&media_type))
    });

    match mime {
        Some(mime) => (mime.target(), Some(mime)),
        None => (DecodeTarget::Raw, None),
    }
}

/// Decode `response` according to `forced` or its declared content type.
pub fn decode(response: &RawResponse, forced: Option<MimeType>) -> Result<Payload, DecodeError> {
    let (target, mime) = resolve(response, forced);
    tracing::trace!(decode_target = ?target, url = %response.url(), "Decoding response body");

    match target {
        DecodeTarget::Json => response
            .json()
            .map(Payload::Json)
            .map_err(|source| DecodeError::Json {
                url: response.url().to_string(),
                source,
            }),
        DecodeTarget::Text => response
            .text()
            .map(|text| Payload::Text(text.to_string()))
            .map_err(|source| DecodeError::Text {
                url: response.url().to_string(),
                source,
            }),
        DecodeTarget::Document => {
            let text = response.text().map_err(|source| DecodeError::Text {
                url: response.url().to_string(),
                source,
            })?;
            let mime = mime.unwrap_or(MimeType::Html);
            Document::parse(text.to_string(), mime)
                .map(Payload::Document)
                .map_err(|reason| DecodeError::Markup {
                    url: response.url().to_string(),
                    reason,
                })
        }
        DecodeTarget::Raw => Ok(Payload::Raw(response.clone())),
    }
}
