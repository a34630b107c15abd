//! Decode targets and media type normalization.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Representation a successful body is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeTarget {
    Json,
    Text,
    Document,
    Raw,
}

/// Accepted values for the `mime_type` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "text/plain")]
    Text,
    #[serde(rename = "text/xml")]
    TextXml,
    #[serde(rename = "text/html")]
    Html,
    #[serde(rename = "application/xml")]
    ApplicationXml,
    #[serde(rename = "image/svg+xml")]
    Svg,
    #[serde(rename = "raw")]
    Raw,
}

impl MimeType {
    pub const ALL: [MimeType; 7] = [
        MimeType::Json,
        MimeType::Text,
        MimeType::TextXml,
        MimeType::Html,
        MimeType::ApplicationXml,
        MimeType::Svg,
        MimeType::Raw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Json => "application/json",
            MimeType::Text => "text/plain",
            MimeType::TextXml => "text/xml",
            MimeType::Html => "text/html",
            MimeType::ApplicationXml => "application/xml",
            MimeType::Svg => "image/svg+xml",
            MimeType::Raw => "raw",
        }
    }

    pub fn target(self) -> DecodeTarget {
        match self {
            MimeType::Json => DecodeTarget::Json,
            MimeType::Text => DecodeTarget::Text,
            MimeType::TextXml | MimeType::Html | MimeType::ApplicationXml | MimeType::Svg => {
                DecodeTarget::Document
            }
            MimeType::Raw => DecodeTarget::Raw,
        }
    }

    /// Whether bodies of this type must be well-formed XML.
    pub fn is_xml(self) -> bool {
        matches!(self, MimeType::TextXml | MimeType::ApplicationXml | MimeType::Svg)
    }

    /// Look up a normalized media type in the decode table.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        MimeType::ALL
            .into_iter()
            .find(|mime| mime.as_str() == media_type)
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value passed as `mime_type` is not one of the accepted types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported mime type '{0}'")]
pub struct UnknownMimeType(pub String);

impl FromStr for MimeType {
    type Err = UnknownMimeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        MimeType::from_media_type(&normalized).ok_or_else(|| UnknownMimeType(s.to_string()))
    }
}

/// Media type portion of a `Content-Type` value, lowercased.
///
/// Returns `None` when the value does not parse as a media type.
pub fn media_type(content_type: &str) -> Option<String> {
    let parsed: ::mime::Mime = content_type.trim().parse().ok()?;
    Some(parsed.essence_str().to_ascii_lowercase())
}
