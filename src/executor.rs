use std::fmt;

use reqwest::header;
use tokio::time::{sleep, timeout, Instant};

use crate::{
    classify::{classify, AttemptRecord, AttemptStatus, Verdict},
    CallDescriptor, Outcome,
};

/// Attempt and backoff counts for one finished call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallStats {
    pub attempts: usize,
    pub backoff_waits: usize,
}

#[derive(Clone, Default)]
/// Runs [`CallDescriptor`]s against the network.
///
/// Holds no per-call state: the same executor may serve any number of
/// concurrent calls. Cloning is cheap and shares the connection pool.
pub struct CallExecutor {
    http: reqwest::Client,
}

impl fmt::Debug for CallExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallExecutor").finish_non_exhaustive()
    }
}

impl CallExecutor {
    /// Creates an executor with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor on top of a preconfigured `reqwest` client.
    ///
    /// Client-level timeouts still apply; the descriptor's bound is enforced
    /// in addition to them.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Executes one call, retrying only on the throttling status.
    ///
    /// Never returns a raw transport error: every failure is classified into
    /// one [`ErrorKind`](crate::ErrorKind). Each attempt gets its own timeout
    /// window; the backoff between attempts is fixed.
    pub async fn execute(&self, descriptor: &CallDescriptor) -> Outcome {
        self.execute_with_stats(descriptor).await.0
    }

    /// Like [`execute`](Self::execute), also reporting how many attempts
    /// were made and how many backoff waits separated them.
    pub async fn execute_with_stats(&self, descriptor: &CallDescriptor) -> (Outcome, CallStats) {
        let mut stats = CallStats::default();
        loop {
            let started = Instant::now();
            let status = self.attempt(descriptor).await;
            let record = AttemptRecord {
                index: stats.attempts,
                elapsed: started.elapsed(),
                status,
            };
            stats.attempts += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                url = descriptor.url(),
                attempt = stats.attempts,
                elapsed_ms = record.elapsed.as_millis() as u64,
                status = ?record.status_code(),
                "attempt finished"
            );

            match classify(record, descriptor) {
                Verdict::Success(payload) => return (Ok(payload), stats),
                Verdict::Fail(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(url = descriptor.url(), kind = %err.kind(), "call failed: {err}");
                    return (Err(err), stats);
                }
                Verdict::Retry => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "throttled, retrying {} after {} ms",
                        descriptor.url(),
                        descriptor.backoff().as_millis()
                    );
                    sleep(descriptor.backoff()).await;
                    stats.backoff_waits += 1;
                }
            }
        }
    }

    async fn attempt(&self, descriptor: &CallDescriptor) -> AttemptStatus {
        let mut request = self
            .http
            .get(descriptor.url())
            .header(header::ACCEPT, "application/json");
        if let Some(limit) = descriptor.timeout() {
            request = request.timeout(limit);
        }

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        // The outer deadline covers the body read even if the transport's
        // own timeout does not fire in time.
        let result = match descriptor.timeout() {
            Some(limit) => match timeout(limit, exchange).await {
                Ok(result) => result,
                Err(_) => return AttemptStatus::TimedOut,
            },
            None => exchange.await,
        };

        match result {
            Ok((status, body)) => AttemptStatus::Response { status, body },
            Err(err) if err.is_timeout() => AttemptStatus::TimedOut,
            Err(err) => AttemptStatus::Transport(err.to_string()),
        }
    }
}

#[cfg(feature = "tracing")]
impl AttemptRecord {
    fn status_code(&self) -> Option<u16> {
        match &self.status {
            AttemptStatus::Response { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }
}
