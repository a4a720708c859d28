//! Configuration for the client and session layers.

use std::time::Duration;

use resumatch_domain::{endpoints, request::DEFAULT_TIMEOUT, session::DEFAULT_INACTIVITY_TIMEOUT};

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Timeout applied to the health check.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(5_000);

/// `User-Agent` sent by the HTTP transport.
pub const DEFAULT_USER_AGENT: &str = concat!("resumatch/", env!("CARGO_PKG_VERSION"));

/// API client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to; no trailing slash
    pub base_url: String,
    /// Timeout for calls that do not override it
    pub default_timeout: Duration,
    /// Liveness path
    pub health_path: String,
    /// Timeout for the health check
    pub health_timeout: Duration,
    /// Transport `User-Agent`
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with default timeouts.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Overrides the default timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_timeout: DEFAULT_TIMEOUT,
            health_path: endpoints::HEALTH.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Session manager settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Inactivity window before a forced logout
    pub inactivity_timeout: Duration,
    /// Whether a restored token is checked against `/auth/profile`
    pub verify_on_restore: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            verify_on_restore: true,
        }
    }
}
