//! Per-task options.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use thiserror::Error;

use crate::config::DefaultsConfig;
use crate::decode::MimeType;
use crate::http::transport::TransportRequest;

/// Options recognized by a request task.
///
/// `method`, `headers`, `query` and `body` pass through to the transport
/// untouched; the rest steer the task itself.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Target URL when the task is built from options alone.
    pub url: Option<String>,
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
    /// Deadline for the whole exchange; `None` or zero disables it.
    pub timeout: Option<Duration>,
    /// Forced decode target.
    pub mime_type: Option<MimeType>,
    /// Capture lifecycle timestamps.
    pub timings: bool,
}

/// Options that cannot produce a task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("request options do not contain a url")]
    MissingUrl,
}

impl LoaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options seeded from the `[defaults]` configuration section.
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            timeout: defaults.timeout(),
            mime_type: defaults.mime_type,
            timings: defaults.timings,
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_mime_type(mut self, mime_type: MimeType) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    pub fn with_timings(mut self, timings: bool) -> Self {
        self.timings = timings;
        self
    }

    /// The passthrough portion, addressed at `url`.
    pub fn transport_request(&self, url: &str) -> TransportRequest {
        TransportRequest {
            method: self.method.clone(),
            url: url.to_string(),
            headers: self.headers.clone(),
            query: self.query.clone(),
            body: self.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT;

    #[test]
    fn test_defaults() {
        let options = LoaderOptions::new();
        assert_eq!(options.method, Method::GET);
        assert!(options.url.is_none());
        assert!(options.timeout.is_none());
        assert!(options.mime_type.is_none());
        assert!(!options.timings);
    }

    #[test]
    fn test_from_defaults_config() {
        let defaults = DefaultsConfig {
            timeout_ms: 250,
            mime_type: Some(MimeType::Raw),
            timings: true,
        };
        let options = LoaderOptions::from_defaults(&defaults);
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
        assert_eq!(options.mime_type, Some(MimeType::Raw));
        assert!(options.timings);
    }

    #[test]
    fn test_transport_request_carries_passthrough_fields() {
        let options = LoaderOptions::new()
            .with_method(Method::POST)
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
            .with_query("page", "2")
            .with_body("{}")
            .with_timeout(Duration::from_secs(1));

        let request = options.transport_request("http://localhost/people/");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://localhost/people/");
        assert_eq!(request.headers[ACCEPT], "application/json");
        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }
}
