use std::{fmt, time::Duration};

use reqwest::StatusCode;

use crate::Payload;

/// Closed set of failure kinds a call can end in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ErrorKind {
    /// The remote rejected the request as malformed.
    ClientError,
    /// The remote failed while processing a well-formed request.
    ServerError,
    /// No terminal response arrived within the configured bound.
    TimeoutError,
    /// The remote kept throttling until the attempt budget ran out.
    RateLimitExhaustedError,
    /// Anything else: transport failures, unexpected statuses, bad bodies.
    UndefinedError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::ClientError,
        ErrorKind::ServerError,
        ErrorKind::TimeoutError,
        ErrorKind::RateLimitExhaustedError,
        ErrorKind::UndefinedError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientError => "ClientError",
            Self::ServerError => "ServerError",
            Self::TimeoutError => "TimeoutError",
            Self::RateLimitExhaustedError => "RateLimitExhaustedError",
            Self::UndefinedError => "UndefinedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type returned by [`CallExecutor::execute`](crate::CallExecutor::execute).
///
/// Every variant maps to exactly one [`ErrorKind`]; raw transport errors are
/// folded into [`CallError::Undefined`] or [`CallError::Timeout`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CallError {
    /// Remote answered with a configured client-error status.
    #[error("client error {status}: {body}")]
    Client { status: u16, body: String },
    /// Remote answered with a configured server-error status.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    /// Attempt did not finish within `limit`.
    #[error("request exceeded {limit:?} (attempt {attempt})")]
    Timeout { limit: Duration, attempt: usize },
    /// Throttling status was returned on every permitted attempt.
    #[error("still throttled after {attempts} attempts")]
    RateLimitExhausted { attempts: usize },
    /// Catch-all for unclassified failures.
    #[error("undefined error: {0}")]
    Undefined(String),
}

impl CallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client { .. } => ErrorKind::ClientError,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Timeout { .. } => ErrorKind::TimeoutError,
            Self::RateLimitExhausted { .. } => ErrorKind::RateLimitExhaustedError,
            Self::Undefined(_) => ErrorKind::UndefinedError,
        }
    }

    pub(crate) fn unexpected_status(status: StatusCode, body: &str) -> Self {
        Self::Undefined(format!("unexpected status {}: {body}", status.as_u16()))
    }
}

/// Result of one call: a payload or exactly one classified failure.
pub type Outcome = std::result::Result<Payload, CallError>;
