//! Failure classification.
//!
//! Maps a raw failure onto one of the four canonical kinds. First match wins:
//!
//! ```text
//! 1. abort signal origin         → RequestAbortError
//! 2. deadline origin             → TimeoutError
//! 3. decode of a 2xx response    → ResponseParsingError (response attached)
//! 4. non-2xx status              → RequestError (response attached)
//! 5. any other transport error   → RequestError
//! ```

use std::sync::Arc;
use tokio::time::error::Elapsed;

use crate::decode::DecodeError;
use crate::error::kind::{Cause, ErrorKind, HttpStatusError, LoaderError};
use crate::http::response::RawResponse;
use crate::http::transport::BoxError;
use crate::resilience::{AbortError, AbortReason};

pub const TIMEOUT_MESSAGE: &str = "Request timeout exceeded";

/// An unclassified failure of the request pipeline.
#[derive(Debug)]
pub enum Failure {
    /// The task's signal fired before the exchange finished.
    Aborted(AbortError),
    /// The timeout race fired.
    TimedOut(Elapsed),
    /// The body of a successful response could not be decoded.
    Decode {
        error: DecodeError,
        response: RawResponse,
    },
    /// The transport returned a non-2xx response.
    Status(RawResponse),
    /// The transport itself failed.
    Transport(BoxError),
}

/// Facts about the task the classifier needs besides the failure.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub request_url: &'a str,
    /// Reason recorded by the abort controller, if it fired.
    pub abort_reason: Option<AbortReason>,
}

/// Turn a raw failure into a rejection.
pub fn classify(failure: Failure, ctx: ClassifyContext<'_>) -> LoaderError {
    match failure {
        Failure::Aborted(err) => aborted(Arc::new(err), ctx),
        Failure::TimedOut(elapsed) => timed_out(Arc::new(elapsed), ctx),
        Failure::Decode { error, response } => LoaderError::new(
            ErrorKind::ResponseParsing,
            format!("Response parsing error: {error}"),
            Arc::new(error),
            Some(response),
            ctx.request_url,
        ),
        Failure::Status(response) => {
            let cause = HttpStatusError {
                status: response.status(),
                status_text: response.status_text().to_string(),
            };
            LoaderError::new(
                ErrorKind::Request,
                format!("Request error: {}", response.status_text()),
                Arc::new(cause),
                Some(response),
                ctx.request_url,
            )
        }
        Failure::Transport(err) => {
            let is_abort = err.is::<AbortError>();
            let is_timeout = is_backend_timeout(err.as_ref());
            let cause: Cause = Arc::from(err);

            match ctx.abort_reason {
                Some(AbortReason::User) => aborted(cause, ctx),
                Some(AbortReason::Timeout) => timed_out(cause, ctx),
                None if is_abort => aborted(cause, ctx),
                None if is_timeout => timed_out(cause, ctx),
                None => LoaderError::new(
                    ErrorKind::Request,
                    format!("Request error: {cause}"),
                    cause,
                    None,
                    ctx.request_url,
                ),
            }
        }
    }
}

fn aborted(cause: Cause, ctx: ClassifyContext<'_>) -> LoaderError {
    LoaderError::new(
        ErrorKind::RequestAbort,
        format!("Request aborted: {cause}"),
        cause,
        None,
        ctx.request_url,
    )
}

fn timed_out(cause: Cause, ctx: ClassifyContext<'_>) -> LoaderError {
    LoaderError::new(ErrorKind::Timeout, TIMEOUT_MESSAGE, cause, None, ctx.request_url)
}

/// Whether a transport error is the backend's own timeout.
fn is_backend_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>() {
            if reqwest_err.is_timeout() {
                return true;
            }
        }
        if err.is::<Elapsed>() {
            return true;
        }
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            if io_err.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = err.source();
    }
    false
}
