//! Pure classification of a single attempt.
//!
//! Kept free of I/O so the precedence order can be tested without a server.

use std::time::Duration;

use reqwest::StatusCode;

use crate::{CallDescriptor, CallError, Payload};

/// Raw status observed for one attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptStatus {
    /// The remote answered; body already read in full.
    Response { status: StatusCode, body: String },
    /// The per-attempt deadline fired before a terminal response.
    TimedOut,
    /// Connection, DNS, body-read or other transport failure.
    Transport(String),
}

/// What happened on one attempt. Owned by a single `execute` invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptRecord {
    /// Zero-based attempt index.
    pub index: usize,
    pub elapsed: Duration,
    pub status: AttemptStatus,
}

/// Decision taken after an attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Success(Payload),
    Retry,
    Fail(CallError),
}

/// Applies the classification precedence to one attempt.
///
/// Order: timeout, client-error status, server-error status, throttling
/// (retry or exhaustion), any other failure, success.
pub fn classify(record: AttemptRecord, descriptor: &CallDescriptor) -> Verdict {
    let policy = descriptor.policy();
    let attempt = record.index + 1;

    match record.status {
        AttemptStatus::TimedOut => Verdict::Fail(CallError::Timeout {
            limit: descriptor.timeout().unwrap_or(record.elapsed),
            attempt,
        }),
        AttemptStatus::Response { status, body } if policy.is_client_error(status) => {
            Verdict::Fail(CallError::Client {
                status: status.as_u16(),
                body,
            })
        }
        AttemptStatus::Response { status, body } if policy.is_server_error(status) => {
            Verdict::Fail(CallError::Server {
                status: status.as_u16(),
                body,
            })
        }
        AttemptStatus::Response { status, .. } if policy.is_throttling(status) => {
            if attempt < descriptor.max_attempts() {
                Verdict::Retry
            } else {
                Verdict::Fail(CallError::RateLimitExhausted { attempts: attempt })
            }
        }
        AttemptStatus::Response { status, body } if !status.is_success() => {
            Verdict::Fail(CallError::unexpected_status(status, &body))
        }
        AttemptStatus::Response { body, .. } => match decode_body(&body) {
            Ok(payload) => Verdict::Success(payload),
            Err(err) => Verdict::Fail(err),
        },
        AttemptStatus::Transport(message) => Verdict::Fail(CallError::Undefined(message)),
    }
}

/// Decodes a success body. An empty body decodes to [`Payload::Null`].
fn decode_body(body: &str) -> Result<Payload, CallError> {
    if body.trim().is_empty() {
        return Ok(Payload::Null);
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map(Payload::from)
        .map_err(|err| CallError::Undefined(format!("invalid response JSON: {err}; body: {body}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::{classify, AttemptRecord, AttemptStatus, Verdict};
    use crate::{CallDescriptor, CallError, ErrorKind, Payload, StatusPolicy};

    fn response(index: usize, status: StatusCode, body: &str) -> AttemptRecord {
        AttemptRecord {
            index,
            elapsed: Duration::from_millis(10),
            status: AttemptStatus::Response {
                status,
                body: body.to_owned(),
            },
        }
    }

    fn failed_kind(verdict: Verdict) -> ErrorKind {
        match verdict {
            Verdict::Fail(err) => err.kind(),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn timeout_wins_and_reports_configured_limit() {
        let descriptor = CallDescriptor::timeout_sensitive("http://x");
        let record = AttemptRecord {
            index: 0,
            elapsed: Duration::from_millis(5_003),
            status: AttemptStatus::TimedOut,
        };

        assert_eq!(
            classify(record, &descriptor),
            Verdict::Fail(CallError::Timeout {
                limit: Duration::from_secs(5),
                attempt: 1
            })
        );
    }

    #[test]
    fn bad_request_is_client_error_never_server_error() {
        let descriptor = CallDescriptor::client_error_probe("http://x");
        let verdict = classify(response(0, StatusCode::BAD_REQUEST, "nope"), &descriptor);
        assert_eq!(failed_kind(verdict), ErrorKind::ClientError);
    }

    #[test]
    fn internal_error_is_server_error() {
        let descriptor = CallDescriptor::server_error_probe("http://x");
        let verdict = classify(
            response(0, StatusCode::INTERNAL_SERVER_ERROR, ""),
            &descriptor,
        );
        assert_eq!(failed_kind(verdict), ErrorKind::ServerError);
    }

    #[test]
    fn throttling_retries_until_last_attempt() {
        let descriptor = CallDescriptor::rate_limited("http://x");
        for index in 0..4 {
            assert_eq!(
                classify(response(index, StatusCode::TOO_MANY_REQUESTS, ""), &descriptor),
                Verdict::Retry
            );
        }
        assert_eq!(
            classify(response(4, StatusCode::TOO_MANY_REQUESTS, ""), &descriptor),
            Verdict::Fail(CallError::RateLimitExhausted { attempts: 5 })
        );
    }

    #[test]
    fn throttling_on_single_attempt_descriptor_exhausts_immediately() {
        let descriptor = CallDescriptor::new("http://x");
        let verdict = classify(response(0, StatusCode::TOO_MANY_REQUESTS, ""), &descriptor);
        assert_eq!(failed_kind(verdict), ErrorKind::RateLimitExhaustedError);
    }

    #[test]
    fn other_statuses_are_undefined() {
        let descriptor = CallDescriptor::rate_limited("http://x");
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::NOT_FOUND,
            StatusCode::BAD_GATEWAY,
            StatusCode::MOVED_PERMANENTLY,
        ] {
            assert_eq!(
                failed_kind(classify(response(0, status, ""), &descriptor)),
                ErrorKind::UndefinedError
            );
        }
    }

    #[test]
    fn timeout_sensitive_fetch_folds_error_statuses_into_undefined() {
        let descriptor = CallDescriptor::timeout_sensitive("http://x");
        for status in [StatusCode::BAD_REQUEST, StatusCode::INTERNAL_SERVER_ERROR] {
            assert_eq!(
                failed_kind(classify(response(0, status, ""), &descriptor)),
                ErrorKind::UndefinedError
            );
        }
    }

    #[test]
    fn policy_controls_which_statuses_are_classified() {
        let policy = StatusPolicy {
            client_errors: vec![StatusCode::BAD_REQUEST, StatusCode::UNPROCESSABLE_ENTITY],
            server_errors: vec![StatusCode::INTERNAL_SERVER_ERROR, StatusCode::BAD_GATEWAY],
            throttling: StatusCode::SERVICE_UNAVAILABLE,
        };
        let descriptor = CallDescriptor::new("http://x").with_policy(policy);

        assert_eq!(
            failed_kind(classify(
                response(0, StatusCode::UNPROCESSABLE_ENTITY, ""),
                &descriptor
            )),
            ErrorKind::ClientError
        );
        assert_eq!(
            failed_kind(classify(response(0, StatusCode::BAD_GATEWAY, ""), &descriptor)),
            ErrorKind::ServerError
        );
        assert_eq!(
            failed_kind(classify(
                response(0, StatusCode::TOO_MANY_REQUESTS, ""),
                &descriptor
            )),
            ErrorKind::UndefinedError
        );
    }

    #[test]
    fn transport_failure_is_undefined() {
        let descriptor = CallDescriptor::rate_limited("http://x");
        let record = AttemptRecord {
            index: 0,
            elapsed: Duration::from_millis(1),
            status: AttemptStatus::Transport("connection reset".to_owned()),
        };
        assert_eq!(
            classify(record, &descriptor),
            Verdict::Fail(CallError::Undefined("connection reset".to_owned()))
        );
    }

    #[test]
    fn success_decodes_json_and_rejects_garbage() {
        let descriptor = CallDescriptor::timeout_sensitive("http://x");
        match classify(response(0, StatusCode::OK, r#"{"name":"Apple"}"#), &descriptor) {
            Verdict::Success(payload) => {
                assert_eq!(payload.get("name").and_then(Payload::as_str), Some("Apple"))
            }
            other => panic!("expected success, got {other:?}"),
        }

        assert_eq!(
            failed_kind(classify(response(0, StatusCode::OK, "<html>"), &descriptor)),
            ErrorKind::UndefinedError
        );
        assert_eq!(
            classify(response(0, StatusCode::OK, ""), &descriptor),
            Verdict::Success(Payload::Null)
        );
    }

    #[test]
    fn same_record_always_yields_same_verdict() {
        let descriptor = CallDescriptor::server_error_probe("http://x");
        let record = response(0, StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let first = classify(record.clone(), &descriptor);
        let second = classify(record, &descriptor);
        assert_eq!(first, second);
    }
}
