//! Immutable connection settings for a LibreNMS instance.

use std::fmt;
use std::time::Duration;

/// Path segment appended to every base URL.
pub const API_VERSION_PATH: &str = "/api/v0";

/// Header carrying the API token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Connection settings shared by every request a client issues.
///
/// Built once and never mutated. The effective base URL is the caller's URL
/// with trailing slashes removed and `/api/v0` appended exactly once.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_token: String,
    tls_verify: bool,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// No validation of the URL or token is performed.
    pub fn new(base_url: &str, api_token: &str) -> Self {
        Self {
            base_url: format!("{}{API_VERSION_PATH}", base_url.trim_end_matches('/')),
            api_token: api_token.to_string(),
            tls_verify: true,
            timeout: None,
        }
    }

    pub fn with_tls_verify(mut self, tls_verify: bool) -> Self {
        self.tls_verify = tls_verify;
        self
    }

    /// Overall per-request timeout. Without one the transport's defaults
    /// apply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL including the API version segment.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Headers sent on every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            (AUTH_TOKEN_HEADER.to_string(), self.api_token.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("tls_verify", &self.tls_verify)
            .field("timeout", &self.timeout)
            .finish()
    }
}
