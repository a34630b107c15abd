//! Transport seam.
//!
//! A transport issues one HTTP exchange and hands back the response head
//! together with a body future. Cancellation arrives through the signal; a
//! transport should stop work and release its resources once the signal is
//! cancelled, but the task never waits for it to do so.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use tokio_util::sync::CancellationToken;

use crate::http::response::canonical_status_text;

/// Type-erased error raised by a transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pending response body.
pub type BodyFuture = BoxFuture<'static, Result<Bytes, BoxError>>;

/// Everything a transport needs to issue a call.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// A bodiless GET for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

/// Status line and headers of a response.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub status_text: String,
    pub url: String,
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Head with the canonical reason phrase for `status`.
    pub fn new(status: StatusCode, url: impl Into<String>) -> Self {
        Self {
            status,
            status_text: canonical_status_text(status),
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }
}

/// Response as returned by a transport, body not yet read.
pub struct TransportResponse {
    pub head: ResponseHead,
    pub body: BodyFuture,
}

impl TransportResponse {
    pub fn new(head: ResponseHead, body: BodyFuture) -> Self {
        Self { head, body }
    }

    /// Response whose body is already in memory.
    pub fn buffered(head: ResponseHead, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(head, Box::pin(async move { Ok(body) }))
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// A backend capable of issuing HTTP exchanges.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `request`, giving up once `signal` is cancelled.
    async fn issue(
        &self,
        request: TransportRequest,
        signal: CancellationToken,
    ) -> Result<TransportResponse, BoxError>;
}
