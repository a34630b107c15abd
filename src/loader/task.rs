//! Request task orchestration.
//!
//! # Responsibilities
//! - Start the transport call once, under the task's abort signal
//! - Race it against the optional deadline and caller aborts
//! - Decode successful responses, classify everything else
//! - Settle the underlying executor exactly once
//!
//! # Race
//! ```text
//! execute()
//!     → spawn ─┬─ abort signal ───────────────┐
//!              ├─ transport → body → decode ──┼─ first wins → classify → settle
//!              └─ deadline (TimeoutRace) ─────┘
//! ```
//! The select is biased towards the abort signal so that the error a
//! transport raises because of that same abort never wins the race.

use std::future::IntoFuture;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use tracing::Instrument;
use uuid::Uuid;

use crate::decode::{decode, DecodeError, Payload};
use crate::error::{classify, ClassifyContext, ErrorKind, Failure, LoaderError};
use crate::http::client::ReqwestTransport;
use crate::http::response::RawResponse;
use crate::http::transport::{Transport, TransportResponse};
use crate::lifecycle::{Executor, TaskState, Timings};
use crate::loader::options::{LoaderOptions, OptionsError};
use crate::observability::metrics;
use crate::resilience::{AbortController, AbortError, AbortReason, TimeoutRace};

/// A single cancellable, deadline-bounded HTTP request.
///
/// Cloning is cheap; every clone drives and observes the same request.
#[derive(Clone)]
pub struct RequestTask {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    request_url: String,
    options: LoaderOptions,
    transport: Arc<dyn Transport>,
    controller: AbortController,
    deadline: TimeoutRace,
    executor: Executor<Payload, LoaderError>,
    response: OnceLock<RawResponse>,
    /// Serializes caller aborts against settlement.
    settling: Mutex<()>,
}

impl RequestTask {
    /// Create an unstarted task using the default reqwest transport.
    pub fn new(url: impl Into<String>, options: LoaderOptions) -> Self {
        Self::with_transport(url, options, Arc::new(ReqwestTransport::default()))
    }

    /// Create an unstarted task from options carrying the URL.
    pub fn from_options(options: LoaderOptions) -> Result<Self, OptionsError> {
        let url = options.url.clone().ok_or(OptionsError::MissingUrl)?;
        Ok(Self::new(url, options))
    }

    /// Create an unstarted task issuing its call through `transport`.
    pub fn with_transport(
        url: impl Into<String>,
        options: LoaderOptions,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let inner = Inner {
            id: Uuid::new_v4(),
            request_url: url.into(),
            controller: AbortController::new(),
            deadline: TimeoutRace::new(options.timeout),
            executor: Executor::new(options.timings),
            response: OnceLock::new(),
            settling: Mutex::new(()),
            transport,
            options,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn request_url(&self) -> &str {
        &self.inner.request_url
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.inner.options
    }

    pub fn state(&self) -> TaskState {
        self.inner.executor.state()
    }

    pub fn is_settled(&self) -> bool {
        self.inner.executor.is_settled()
    }

    /// Lifecycle timestamps, when the task was created with `timings`.
    pub fn timings(&self) -> Option<Timings> {
        self.inner.executor.timings()
    }

    /// The raw response, once the exchange produced one.
    pub fn response(&self) -> Option<&RawResponse> {
        self.inner.response.get()
    }

    /// Start the request on the current Tokio runtime.
    ///
    /// Only the first call does anything. Without a runtime the task is
    /// rejected with a `RequestError` instead.
    pub fn execute(&self) -> &Self {
        if !self.inner.executor.begin() {
            return self;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(self.inner.clone().run());
            }
            Err(err) => {
                let error = classify(Failure::Transport(Box::new(err)), self.inner.context());
                self.inner.executor.reject(error);
            }
        }
        self
    }

    /// Alias of [`execute`](Self::execute).
    pub fn send(&self) -> &Self {
        self.execute()
    }

    /// Alias of [`execute`](Self::execute).
    pub fn load(&self) -> &Self {
        self.execute()
    }

    /// Request cancellation.
    ///
    /// Returns `true` only for the call that actually issued it; calls after
    /// settlement or after an earlier abort do nothing. A `true` return
    /// guarantees the task rejects, even if the exchange had already
    /// succeeded.
    pub fn abort(&self) -> bool {
        let _guard = self.inner.lock_settling();
        if self.inner.executor.is_settled() {
            return false;
        }
        self.inner.controller.abort(AbortReason::User)
    }

    /// Wait for the outcome. Does not start the task.
    pub async fn wait(&self) -> Result<Payload, LoaderError> {
        self.inner.executor.wait().await
    }
}

impl<'a> IntoFuture for &'a RequestTask {
    type Output = Result<Payload, LoaderError>;
    type IntoFuture = BoxFuture<'a, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

impl std::fmt::Debug for RequestTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTask")
            .field("id", &self.inner.id)
            .field("request_url", &self.inner.request_url)
            .field("state", &self.state())
            .finish()
    }
}

impl Inner {
    fn lock_settling(&self) -> std::sync::MutexGuard<'_, ()> {
        self.settling.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn context(&self) -> ClassifyContext<'_> {
        ClassifyContext {
            request_url: &self.request_url,
            abort_reason: self.controller.reason(),
        }
    }

    async fn run(self: Arc<Self>) {
        let span = tracing::info_span!(
            "request_task",
            task_id = %self.id,
            method = %self.options.method,
            url = %self.request_url,
        );

        async move {
            let started = Instant::now();
            tracing::debug!(timeout = ?self.deadline.deadline(), "Request started");

            let outcome = self.drive().await;
            self.settle(outcome, started);
        }
        .instrument(span)
        .await
    }

    async fn drive(&self) -> Result<Payload, LoaderError> {
        let raced = async {
            tokio::select! {
                biased;
                _ = self.controller.cancelled() => Err(Failure::Aborted(AbortError)),
                result = self.exchange() => result,
            }
        };

        let result = match self.deadline.run(&self.controller, raced).await {
            Ok(result) => result,
            Err(elapsed) => Err(Failure::TimedOut(elapsed)),
        };

        result.map_err(|failure| {
            let error = classify(failure, self.context());
            if error.kind() == ErrorKind::Timeout {
                // Backend-reported timeouts still need the signal cancelled.
                self.controller.abort(AbortReason::Timeout);
            }
            error
        })
    }

    async fn exchange(&self) -> Result<Payload, Failure> {
        let request = self.options.transport_request(&self.request_url);
        let TransportResponse { head, body } = self
            .transport
            .issue(request, self.controller.signal())
            .await
            .map_err(Failure::Transport)?;

        tracing::debug!(status = head.status.as_u16(), "Response received");

        let (response, body_error) = match body.await {
            Ok(bytes) => (RawResponse::new(head, bytes), None),
            Err(err) => (RawResponse::new(head, Bytes::new()), Some(err)),
        };
        let _ = self.response.set(response.clone());

        if !response.ok() {
            return Err(Failure::Status(response));
        }
        if let Some(source) = body_error {
            return Err(Failure::Decode {
                error: DecodeError::Body {
                    url: response.url().to_string(),
                    source,
                },
                response,
            });
        }

        decode(&response, self.options.mime_type)
            .map_err(|error| Failure::Decode { error, response })
    }

    fn settle(&self, outcome: Result<Payload, LoaderError>, started: Instant) {
        let _guard = self.lock_settling();

        // An abort that slipped in after the exchange finished still wins.
        let outcome = match outcome {
            Ok(_) if self.controller.reason() == Some(AbortReason::User) => {
                Err(classify(Failure::Aborted(AbortError), self.context()))
            }
            other => other,
        };

        let (label, settled) = match outcome {
            Ok(payload) => {
                tracing::debug!(decoded = ?payload.target(), "Request resolved");
                ("resolved", self.executor.resolve(payload))
            }
            Err(error) => {
                tracing::warn!(kind = %error.kind(), error = %error, "Request rejected");
                (error.name(), self.executor.reject(error))
            }
        };

        if settled {
            metrics::record_settlement(label, started);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::REQUEST_ABORT_ERROR;
    use crate::http::transport::{BoxError, TransportRequest};
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn issue(
            &self,
            _request: TransportRequest,
            _signal: CancellationToken,
        ) -> Result<TransportResponse, BoxError> {
            Err("not used".into())
        }
    }

    fn task() -> RequestTask {
        RequestTask::with_transport(
            "http://localhost/people/1/",
            LoaderOptions::new(),
            Arc::new(Unreachable),
        )
    }

    #[tokio::test]
    async fn test_abort_between_exchange_and_settle_rejects() {
        let task = task();
        assert!(task.inner.executor.begin());

        // Exchange already produced a payload when the abort lands.
        assert!(task.abort());
        task.inner
            .settle(Ok(Payload::Text("late".into())), Instant::now());

        let err = task.wait().await.unwrap_err();
        assert_eq!(err.name(), REQUEST_ABORT_ERROR);
        assert!(err.cause().is::<AbortError>());
        assert_eq!(task.state(), TaskState::Rejected);
    }

    #[tokio::test]
    async fn test_settled_task_ignores_abort() {
        let task = task();
        assert!(task.inner.executor.begin());
        task.inner
            .settle(Ok(Payload::Text("done".into())), Instant::now());

        assert!(!task.abort());
        assert!(!task.inner.controller.is_aborted());
        assert_eq!(task.wait().await.unwrap().as_text(), Some("done"));
    }
}
