//! `resilient-http` is an outbound HTTP call layer with bounded timeouts,
//! rate-limit-aware retry and a closed error taxonomy.
//!
//! Every call goes through [`CallExecutor::execute`], which returns either a
//! [`Payload`] or a [`CallError`] mapped to one [`ErrorKind`]:
//! - [`ErrorKind::ClientError`]
//! - [`ErrorKind::ServerError`]
//! - [`ErrorKind::TimeoutError`]
//! - [`ErrorKind::RateLimitExhaustedError`]
//! - [`ErrorKind::UndefinedError`]
//!
//! The [`harness`] module exercises an [`ApiClient`] through repeated trials
//! and asserts which kinds may surface for each call pattern.

mod api;
pub mod classify;
mod config;
mod descriptor;
mod error;
mod executor;
pub mod harness;
mod payload;
mod policy;
mod product;

pub use api::{ApiClient, PatternClient};
pub use config::{Endpoints, CLIENT_ERROR_URL, RATE_LIMIT_URL, SERVER_ERROR_URL, TIMEOUT_URL};
pub use descriptor::{
    CallDescriptor, DEFAULT_BACKOFF, DEFAULT_RATE_LIMIT_ATTEMPTS, DEFAULT_TIMEOUT,
};
pub use error::{CallError, ErrorKind, Outcome};
pub use executor::{CallExecutor, CallStats};
pub use payload::Payload;
pub use policy::StatusPolicy;
pub use product::{Product, ProductError, ProductLookup};

pub type Result<T> = std::result::Result<T, CallError>;
