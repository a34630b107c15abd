//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::config::TransportConfig;
use crate::http::response::status_text;
use crate::http::transport::{
    BodyFuture, BoxError, ResponseHead, Transport, TransportRequest, TransportResponse,
};
use crate::resilience::AbortError;

/// Default transport issuing calls through a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the `[transport]` configuration section.
    pub fn from_config(config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn issue(
        &self,
        request: TransportRequest,
        signal: CancellationToken,
    ) -> Result<TransportResponse, BoxError> {
        let mut builder = self
            .client
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = tokio::select! {
            _ = signal.cancelled() => return Err(BoxError::from(AbortError)),
            sent = builder.send() => sent?,
        };

        let status = response.status();
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|reason| reason.as_bytes());
        let head = ResponseHead {
            status,
            status_text: status_text(status, reason),
            url: response.url().to_string(),
            headers: response.headers().clone(),
        };

        let body: BodyFuture = Box::pin(async move {
            tokio::select! {
                _ = signal.cancelled() => Err(BoxError::from(AbortError)),
                bytes = response.bytes() => bytes.map_err(BoxError::from),
            }
        });

        Ok(TransportResponse::new(head, body))
    }
}
