//! Verification harness.
//!
//! Drives an [`ApiClient`] through repeated independent trials per call
//! pattern and checks latency, payload shape and which error kinds surface.
//! Expected kinds are reported to the injected [`TrialObserver`] and
//! counted; anything else aborts the run with a [`HarnessError`].

use std::{collections::BTreeMap, fmt, future::Future, time::Duration};

use crate::{
    descriptor::DEFAULT_TIMEOUT, ApiClient, CallError, ErrorKind, Outcome, Payload, ProductError,
    ProductLookup,
};

/// Call pattern exercised by the harness.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Pattern {
    Timeout,
    RateLimit,
    ClientError,
    ServerError,
}

impl Pattern {
    /// Error kinds that count as an expected, logged outcome.
    pub fn acceptable(self) -> &'static [ErrorKind] {
        match self {
            Self::Timeout => &[ErrorKind::TimeoutError, ErrorKind::UndefinedError],
            Self::RateLimit => &[
                ErrorKind::RateLimitExhaustedError,
                ErrorKind::UndefinedError,
            ],
            Self::ClientError => &[ErrorKind::ClientError, ErrorKind::UndefinedError],
            Self::ServerError => &[ErrorKind::ServerError, ErrorKind::UndefinedError],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "get_timeout",
            Self::RateLimit => "get_rate_limit",
            Self::ClientError => "get_client_error",
            Self::ServerError => "get_server_error",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Harness-level failure, distinct from an expected [`CallError`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HarnessError {
    #[error("{pattern} trial {trial} took {elapsed:?}, limit {limit:?}")]
    TooSlow {
        pattern: Pattern,
        trial: usize,
        elapsed: Duration,
        limit: Duration,
    },
    #[error("{pattern} trial {trial} returned unexpected payload: {detail}")]
    UnexpectedPayload {
        pattern: Pattern,
        trial: usize,
        detail: String,
    },
    #[error("{pattern} trial {trial} surfaced unacceptable {kind}: {error}")]
    UnexpectedKind {
        pattern: Pattern,
        trial: usize,
        kind: ErrorKind,
        error: CallError,
    },
    #[error("product {id}: {detail}")]
    ProductMismatch { id: u64, detail: String },
}

/// Receives harness progress. All methods default to doing nothing.
pub trait TrialObserver {
    fn trial_started(&self, _pattern: Pattern, _trial: usize, _total: usize) {}

    fn trial_succeeded(&self, _pattern: Pattern, _trial: usize, _total: usize, _elapsed: Duration) {
    }

    fn expected_failure(&self, _pattern: Pattern, _trial: usize, _total: usize, _error: &CallError) {
    }

    fn violation(&self, _error: &HarnessError) {}

    fn product_unavailable(&self, _id: u64, _error: &ProductError) {}
}

/// Observer that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TrialObserver for NoopObserver {}

/// Observer that forwards progress to `tracing`.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl TrialObserver for TracingObserver {
    fn trial_started(&self, pattern: Pattern, trial: usize, total: usize) {
        tracing::debug!("[{trial}/{total}] sending {pattern}");
    }

    fn trial_succeeded(&self, pattern: Pattern, trial: usize, total: usize, elapsed: Duration) {
        tracing::debug!(
            "[{trial}/{total}] {pattern} finished in {:.2}s",
            elapsed.as_secs_f64()
        );
    }

    fn expected_failure(&self, pattern: Pattern, trial: usize, total: usize, error: &CallError) {
        tracing::warn!(kind = %error.kind(), "[{trial}/{total}] {pattern}: {error}");
    }

    fn violation(&self, error: &HarnessError) {
        tracing::error!("{error}");
    }

    fn product_unavailable(&self, id: u64, error: &ProductError) {
        tracing::error!(id, "{error}");
    }
}

/// Number of trials per pattern.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrialCounts {
    pub timeout: usize,
    pub rate_limit: usize,
    pub client_error: usize,
    pub server_error: usize,
}

impl Default for TrialCounts {
    fn default() -> Self {
        Self {
            timeout: 100,
            rate_limit: 100,
            client_error: 10,
            server_error: 10,
        }
    }
}

impl TrialCounts {
    fn for_pattern(&self, pattern: Pattern) -> usize {
        match pattern {
            Pattern::Timeout => self.timeout,
            Pattern::RateLimit => self.rate_limit,
            Pattern::ClientError => self.client_error,
            Pattern::ServerError => self.server_error,
        }
    }
}

/// Expectations applied by the harness.
#[derive(Clone, Debug, PartialEq)]
pub struct HarnessSettings {
    pub trials: TrialCounts,
    /// Bound checked on the timeout-sensitive pattern when the client does
    /// not report one through [`ApiClient::timeout_bound`].
    pub timeout_bound: Duration,
    /// Scheduling slack allowed on top of `timeout_bound`.
    pub tolerance: Duration,
    /// Required `name` of the timeout-sensitive payload.
    pub expected_name: String,
    /// Substring required in the first `word` of the rate-limited payload.
    pub expected_word: String,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            trials: TrialCounts::default(),
            timeout_bound: DEFAULT_TIMEOUT,
            tolerance: Duration::from_millis(250),
            expected_name: "Apple".to_owned(),
            expected_word: "hello".to_owned(),
        }
    }
}

/// Tally for one pattern run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PatternReport {
    pub trials: usize,
    pub successes: usize,
    /// Expected failures by kind.
    pub failures: BTreeMap<ErrorKind, usize>,
}

impl PatternReport {
    pub fn failures_of(&self, kind: ErrorKind) -> usize {
        self.failures.get(&kind).copied().unwrap_or(0)
    }
}

/// Tally for a product check.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProductReport {
    pub found: usize,
    pub not_found: usize,
    pub undefined: usize,
}

/// Runs call patterns against an [`ApiClient`].
#[derive(Debug)]
pub struct Harness<C, O> {
    client: C,
    observer: O,
    settings: HarnessSettings,
}

impl<C: ApiClient, O: TrialObserver> Harness<C, O> {
    pub fn new(client: C, observer: O) -> Self {
        Self {
            client,
            observer,
            settings: HarnessSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: HarnessSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Successful calls must finish within bound plus tolerance and carry the
    /// expected `name`.
    pub async fn check_timeout(&self) -> Result<PatternReport, HarnessError> {
        let limit = self.latency_limit();
        self.run_pattern(
            Pattern::Timeout,
            || self.client.get_timeout(),
            |payload| self.expect_name(payload),
            Some(limit),
        )
        .await
    }

    pub async fn check_rate_limit(&self) -> Result<PatternReport, HarnessError> {
        self.run_pattern(
            Pattern::RateLimit,
            || self.client.get_rate_limit(),
            |payload| self.expect_word(payload),
            None,
        )
        .await
    }

    pub async fn check_client_error(&self) -> Result<PatternReport, HarnessError> {
        self.run_pattern(
            Pattern::ClientError,
            || self.client.get_client_error(),
            |_| Ok(()),
            None,
        )
        .await
    }

    pub async fn check_server_error(&self) -> Result<PatternReport, HarnessError> {
        self.run_pattern(
            Pattern::ServerError,
            || self.client.get_server_error(),
            |_| Ok(()),
            None,
        )
        .await
    }

    /// Runs all four patterns in order, stopping at the first violation.
    pub async fn run_all(&self) -> Result<BTreeMap<Pattern, PatternReport>, HarnessError> {
        let mut reports = BTreeMap::new();
        reports.insert(Pattern::Timeout, self.check_timeout().await?);
        reports.insert(Pattern::RateLimit, self.check_rate_limit().await?);
        reports.insert(Pattern::ClientError, self.check_client_error().await?);
        reports.insert(Pattern::ServerError, self.check_server_error().await?);
        Ok(reports)
    }

    /// Looks up each id and validates the returned product.
    ///
    /// Missing and undefined lookups are reported, not fatal.
    pub fn check_products<L: ProductLookup>(
        &self,
        lookup: &L,
        ids: &[u64],
    ) -> Result<ProductReport, HarnessError> {
        let mut report = ProductReport::default();
        for &id in ids {
            match lookup.get_product(id) {
                Ok(product) => {
                    let detail = if product.id != id {
                        Some(format!("id mismatch: {} != {id}", product.id))
                    } else if product.name.trim().is_empty() {
                        Some("name is empty".to_owned())
                    } else if product.brand.trim().is_empty() {
                        Some("brand is empty".to_owned())
                    } else {
                        None
                    };
                    if let Some(detail) = detail {
                        return Err(self.fail(HarnessError::ProductMismatch { id, detail }));
                    }
                    report.found += 1;
                }
                Err(err) => {
                    self.observer.product_unavailable(id, &err);
                    match err {
                        ProductError::NotFound(_) => report.not_found += 1,
                        ProductError::Undefined(_) => report.undefined += 1,
                    }
                }
            }
        }
        Ok(report)
    }

    async fn run_pattern<F, Fut, V>(
        &self,
        pattern: Pattern,
        call: F,
        validate: V,
        latency_limit: Option<Duration>,
    ) -> Result<PatternReport, HarnessError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome>,
        V: Fn(&Payload) -> Result<(), String>,
    {
        let total = self.settings.trials.for_pattern(pattern);
        let mut report = PatternReport {
            trials: total,
            ..PatternReport::default()
        };

        for trial in 1..=total {
            self.observer.trial_started(pattern, trial, total);
            let started = tokio::time::Instant::now();
            let outcome = call().await;
            let elapsed = started.elapsed();

            match outcome {
                Ok(payload) => {
                    if let Some(limit) = latency_limit.filter(|limit| elapsed > *limit) {
                        return Err(self.fail(HarnessError::TooSlow {
                            pattern,
                            trial,
                            elapsed,
                            limit,
                        }));
                    }
                    if let Err(detail) = validate(&payload) {
                        return Err(self.fail(HarnessError::UnexpectedPayload {
                            pattern,
                            trial,
                            detail,
                        }));
                    }
                    self.observer.trial_succeeded(pattern, trial, total, elapsed);
                    report.successes += 1;
                }
                Err(error) if pattern.acceptable().contains(&error.kind()) => {
                    self.observer.expected_failure(pattern, trial, total, &error);
                    *report.failures.entry(error.kind()).or_default() += 1;
                }
                Err(error) => {
                    return Err(self.fail(HarnessError::UnexpectedKind {
                        pattern,
                        trial,
                        kind: error.kind(),
                        error,
                    }));
                }
            }
        }

        Ok(report)
    }

    /// Latency ceiling for successful timeout-pattern calls.
    pub fn latency_limit(&self) -> Duration {
        self.client
            .timeout_bound()
            .unwrap_or(self.settings.timeout_bound)
            + self.settings.tolerance
    }

    fn expect_name(&self, payload: &Payload) -> Result<(), String> {
        match payload.get("name").and_then(Payload::as_str) {
            Some(name) if name == self.settings.expected_name => Ok(()),
            other => Err(format!(
                "expected name {:?}, got {other:?}",
                self.settings.expected_name
            )),
        }
    }

    fn expect_word(&self, payload: &Payload) -> Result<(), String> {
        let word = payload
            .at(0)
            .and_then(|first| first.get("word"))
            .and_then(Payload::as_str);
        match word {
            Some(word) if word.contains(self.settings.expected_word.as_str()) => Ok(()),
            other => Err(format!(
                "expected first word containing {:?}, got {other:?}",
                self.settings.expected_word
            )),
        }
    }

    fn fail(&self, error: HarnessError) -> HarnessError {
        self.observer.violation(&error);
        error
    }
}
