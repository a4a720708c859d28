//! Environment-variable configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use resumatch_application::{ClientConfig, RetryPolicy, SessionConfig};

use crate::storage::FileKeyValueStore;

/// Base URL of the backend API.
pub const ENV_API_URL: &str = "RESUMATCH_API_URL";
/// Default request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "RESUMATCH_TIMEOUT_MS";
/// Inactivity window in minutes.
pub const ENV_SESSION_TIMEOUT_MINUTES: &str = "RESUMATCH_SESSION_TIMEOUT_MINUTES";
/// Location of the session file.
pub const ENV_SESSION_FILE: &str = "RESUMATCH_SESSION_FILE";

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but is not a valid number.
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// The base URL does not parse or is not http(s).
    #[error("{name} is not a valid http(s) URL: {value:?}")]
    InvalidUrl {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// No session file was configured and the platform has no config
    /// directory.
    #[error("no session file location; set {var}", var = ENV_SESSION_FILE)]
    NoSessionFile,
}

/// Everything the binary needs to wire the client and session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Client settings
    pub client: ClientConfig,
    /// Session settings
    pub session: SessionConfig,
    /// Retry settings for idempotent startup calls
    pub retry: RetryPolicy,
    /// Session file backing the key-value store
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; unset or empty variables fall
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut client = match var(ENV_API_URL) {
            Some(url) => ClientConfig::new(&parse_base_url(url)?),
            None => ClientConfig::default(),
        };
        if let Some(ms) = var(ENV_TIMEOUT_MS) {
            client.default_timeout = Duration::from_millis(parse_positive(ENV_TIMEOUT_MS, ms)?);
        }

        let mut session = SessionConfig::default();
        if let Some(minutes) = var(ENV_SESSION_TIMEOUT_MINUTES) {
            let minutes = parse_positive(ENV_SESSION_TIMEOUT_MINUTES, minutes)?;
            session.inactivity_timeout = Duration::from_secs(minutes.saturating_mul(60));
        }

        let session_file = var(ENV_SESSION_FILE)
            .map(PathBuf::from)
            .or_else(FileKeyValueStore::default_path)
            .ok_or(ConfigError::NoSessionFile)?;

        Ok(Self {
            client,
            session,
            retry: RetryPolicy::default(),
            session_file,
        })
    }
}

fn parse_positive(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}

fn parse_base_url(value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidUrl {
            name: ENV_API_URL,
            value,
        }),
    }
}
