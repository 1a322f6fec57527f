use std::{future::Future, time::Duration};

use crate::{CallDescriptor, CallExecutor, Endpoints, Outcome};

/// The four call patterns consumed by the verification harness.
///
/// Implementations must classify every failure; the harness treats the
/// returned [`CallError`](crate::CallError) kinds as the only failure signal.
pub trait ApiClient {
    /// Latency-sensitive fetch returning a map with at least `name`.
    fn get_timeout(&self) -> impl Future<Output = Outcome> + Send;
    /// Throttled fetch returning a list whose first element has `word`.
    fn get_rate_limit(&self) -> impl Future<Output = Outcome> + Send;
    /// Probe answered with "bad request".
    fn get_client_error(&self) -> impl Future<Output = Outcome> + Send;
    /// Probe answered with "internal server error".
    fn get_server_error(&self) -> impl Future<Output = Outcome> + Send;

    /// Bound enforced on the timeout-sensitive fetch, if the client knows it.
    fn timeout_bound(&self) -> Option<Duration> {
        None
    }
}

/// [`ApiClient`] backed by a [`CallExecutor`] and one descriptor per pattern.
#[derive(Clone, Debug)]
pub struct PatternClient {
    executor: CallExecutor,
    timeout: CallDescriptor,
    rate_limit: CallDescriptor,
    client_error: CallDescriptor,
    server_error: CallDescriptor,
}

impl PatternClient {
    /// Builds the preset descriptors for `endpoints`.
    pub fn new(executor: CallExecutor, endpoints: Endpoints) -> Self {
        Self {
            executor,
            timeout: CallDescriptor::timeout_sensitive(endpoints.timeout),
            rate_limit: CallDescriptor::rate_limited(endpoints.rate_limit),
            client_error: CallDescriptor::client_error_probe(endpoints.client_error),
            server_error: CallDescriptor::server_error_probe(endpoints.server_error),
        }
    }

    /// Replaces the timeout-sensitive descriptor.
    pub fn with_timeout_descriptor(mut self, descriptor: CallDescriptor) -> Self {
        self.timeout = descriptor;
        self
    }

    /// Replaces the rate-limited descriptor.
    pub fn with_rate_limit_descriptor(mut self, descriptor: CallDescriptor) -> Self {
        self.rate_limit = descriptor;
        self
    }

    pub fn timeout_descriptor(&self) -> &CallDescriptor {
        &self.timeout
    }

    pub fn rate_limit_descriptor(&self) -> &CallDescriptor {
        &self.rate_limit
    }
}

impl Default for PatternClient {
    fn default() -> Self {
        Self::new(CallExecutor::new(), Endpoints::default())
    }
}

impl ApiClient for PatternClient {
    async fn get_timeout(&self) -> Outcome {
        self.executor.execute(&self.timeout).await
    }

    async fn get_rate_limit(&self) -> Outcome {
        self.executor.execute(&self.rate_limit).await
    }

    async fn get_client_error(&self) -> Outcome {
        self.executor.execute(&self.client_error).await
    }

    async fn get_server_error(&self) -> Outcome {
        self.executor.execute(&self.server_error).await
    }

    fn timeout_bound(&self) -> Option<Duration> {
        self.timeout.timeout()
    }
}
