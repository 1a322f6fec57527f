/// Reference endpoint for the timeout-sensitive fetch.
pub const TIMEOUT_URL: &str = "https://www.fruityvice.com/api/fruit/apple";
/// Reference endpoint for the rate-limited fetch.
pub const RATE_LIMIT_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/hello";
/// Reference endpoint that always answers "bad request".
pub const CLIENT_ERROR_URL: &str = "https://httpbin.org/status/400";
/// Reference endpoint that always answers "internal server error".
pub const SERVER_ERROR_URL: &str = "https://httpbin.org/status/500";

/// URLs backing the four call patterns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoints {
    pub timeout: String,
    pub rate_limit: String,
    pub client_error: String,
    pub server_error: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            timeout: TIMEOUT_URL.to_owned(),
            rate_limit: RATE_LIMIT_URL.to_owned(),
            client_error: CLIENT_ERROR_URL.to_owned(),
            server_error: SERVER_ERROR_URL.to_owned(),
        }
    }
}

impl Endpoints {
    /// Derives all four endpoints from one base URL.
    ///
    /// Paths: `/fruit/apple`, `/entries/en/hello`, `/status/400`, `/status/500`.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            timeout: format!("{base}/fruit/apple"),
            rate_limit: format!("{base}/entries/en/hello"),
            client_error: format!("{base}/status/400"),
            server_error: format!("{base}/status/500"),
        }
    }

    /// Starts from the defaults and applies environment overrides.
    ///
    /// Reads (all optional):
    /// - `RESILIENT_HTTP_TIMEOUT_URL`
    /// - `RESILIENT_HTTP_RATE_LIMIT_URL`
    /// - `RESILIENT_HTTP_CLIENT_ERROR_URL`
    /// - `RESILIENT_HTTP_SERVER_ERROR_URL`
    ///
    /// Returns an error if a variable is set but empty.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut endpoints = Self::default();
        let slots = [
            ("RESILIENT_HTTP_TIMEOUT_URL", &mut endpoints.timeout),
            ("RESILIENT_HTTP_RATE_LIMIT_URL", &mut endpoints.rate_limit),
            ("RESILIENT_HTTP_CLIENT_ERROR_URL", &mut endpoints.client_error),
            ("RESILIENT_HTTP_SERVER_ERROR_URL", &mut endpoints.server_error),
        ];
        for (name, slot) in slots {
            if let Some(value) = lookup(name) {
                if value.trim().is_empty() {
                    return Err(format!("{name} is set but empty"));
                }
                *slot = value.trim().to_owned();
            }
        }
        Ok(endpoints)
    }
}
