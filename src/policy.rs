use reqwest::StatusCode;

/// Maps remote statuses onto the error taxonomy.
///
/// Statuses listed here are inspected explicitly, regardless of whether the
/// transport considers the exchange successful.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusPolicy {
    /// Statuses classified as `ClientError`.
    pub client_errors: Vec<StatusCode>,
    /// Statuses classified as `ServerError`.
    pub server_errors: Vec<StatusCode>,
    /// The throttling status that drives the retry path.
    pub throttling: StatusCode,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            client_errors: vec![StatusCode::BAD_REQUEST],
            server_errors: vec![StatusCode::INTERNAL_SERVER_ERROR],
            throttling: StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl StatusPolicy {
    /// Only the throttling status is classified; every other non-success
    /// status falls through to `UndefinedError`.
    pub fn throttling_only() -> Self {
        Self {
            client_errors: Vec::new(),
            server_errors: Vec::new(),
            throttling: StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn is_client_error(&self, status: StatusCode) -> bool {
        self.client_errors.contains(&status)
    }

    pub fn is_server_error(&self, status: StatusCode) -> bool {
        self.server_errors.contains(&status)
    }

    pub fn is_throttling(&self, status: StatusCode) -> bool {
        self.throttling == status
    }
}
