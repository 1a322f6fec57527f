use std::time::Duration;

use crate::StatusPolicy;

/// Default bound for latency-sensitive calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default total attempts on the rate-limited path, first attempt included.
pub const DEFAULT_RATE_LIMIT_ATTEMPTS: usize = 5;
/// Default fixed wait between throttled attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Immutable description of one outbound call.
///
/// Built once per call site and handed to
/// [`CallExecutor::execute`](crate::CallExecutor::execute) by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct CallDescriptor {
    url: String,
    timeout: Option<Duration>,
    max_attempts: usize,
    backoff: Duration,
    policy: StatusPolicy,
}

impl CallDescriptor {
    /// Single attempt, no deadline beyond the HTTP client's own, default policy.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            max_attempts: 1,
            backoff: Duration::ZERO,
            policy: StatusPolicy::default(),
        }
    }

    /// Latency-sensitive fetch: 5 second bound, no retry.
    ///
    /// Error statuses surface as `UndefinedError`, never as client or
    /// server errors.
    pub fn timeout_sensitive(url: impl Into<String>) -> Self {
        Self::new(url)
            .with_timeout(DEFAULT_TIMEOUT)
            .with_policy(StatusPolicy::throttling_only())
    }

    /// Throttled fetch: 5 attempts with a fixed 500 ms backoff.
    ///
    /// Only 429 is classified; other error statuses are `UndefinedError`.
    pub fn rate_limited(url: impl Into<String>) -> Self {
        Self::new(url)
            .with_max_attempts(DEFAULT_RATE_LIMIT_ATTEMPTS)
            .with_backoff(DEFAULT_BACKOFF)
            .with_policy(StatusPolicy::throttling_only())
    }

    /// Endpoint expected to reject with "bad request".
    pub fn client_error_probe(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    /// Endpoint expected to fail with "internal server error".
    pub fn server_error_probe(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the total attempt budget. Zero is treated as one.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Per-attempt bound, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    pub fn policy(&self) -> &StatusPolicy {
        &self.policy
    }
}
