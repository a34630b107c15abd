//! Canonical error kinds and the rejection record.

use std::str::FromStr;
use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::response::RawResponse;

pub const REQUEST_ABORT_ERROR: &str = "RequestAbortError";
pub const TIMEOUT_ERROR: &str = "TimeoutError";
/// Historical alias of [`TIMEOUT_ERROR`], accepted when parsing.
pub const TIMEOUT_EXCEEDED_ERROR: &str = "TimeoutExceededError";
pub const REQUEST_ERROR: &str = "RequestError";
pub const RESPONSE_PARSING_ERROR: &str = "ResponseParsingError";

/// Closed set of rejection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Cancelled through the task's signal.
    RequestAbort,
    /// Deadline elapsed before settlement.
    Timeout,
    /// Non-2xx status or any other transport failure.
    Request,
    /// A successful response could not be decoded.
    ResponseParsing,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::RequestAbort,
        ErrorKind::Timeout,
        ErrorKind::Request,
        ErrorKind::ResponseParsing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::RequestAbort => REQUEST_ABORT_ERROR,
            ErrorKind::Timeout => TIMEOUT_ERROR,
            ErrorKind::Request => REQUEST_ERROR,
            ErrorKind::ResponseParsing => RESPONSE_PARSING_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error kind '{0}'")]
pub struct UnknownErrorKind(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            REQUEST_ABORT_ERROR => Ok(ErrorKind::RequestAbort),
            TIMEOUT_ERROR | TIMEOUT_EXCEEDED_ERROR => Ok(ErrorKind::Timeout),
            REQUEST_ERROR => Ok(ErrorKind::Request),
            RESPONSE_PARSING_ERROR => Ok(ErrorKind::ResponseParsing),
            other => Err(UnknownErrorKind(other.to_string())),
        }
    }
}

/// Original error behind a rejection.
pub type Cause = Arc<dyn std::error::Error + Send + Sync>;

/// Cause attached to rejections for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP status {status}: {status_text}")]
pub struct HttpStatusError {
    pub status: StatusCode,
    pub status_text: String,
}

/// Rejection value of a request task.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LoaderError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Cause,
    response: Option<RawResponse>,
    request_url: String,
}

impl LoaderError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: Cause,
        response: Option<RawResponse>,
        request_url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause,
            response,
            request_url: request_url.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Canonical name of the kind, e.g. `"RequestError"`.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying error, untouched.
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Response obtained before the failure, if the exchange got that far.
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }
}
