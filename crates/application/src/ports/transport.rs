//! Transport port

use async_trait::async_trait;
use resumatch_domain::{ApiError, HttpRequest, RawResponse};

/// Errors raised by a transport adapter before any response arrived.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// The host that failed to resolve
        host: String,
        /// Error message
        message: String,
    },

    /// Connection was refused.
    #[error("Connection refused: {host}:{port}")]
    ConnectionRefused {
        /// The target host
        host: String,
        /// The target port
        port: u16,
    },

    /// Connection failed for another reason.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// TLS handshake or certificate failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The adapter's own timer fired.
    #[error("Request timed out")]
    TimedOut,

    /// The body could not be encoded.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::TimedOut => Self::timeout(),
            other => Self::network(other.to_string()),
        }
    }
}

/// Port for performing a single network exchange.
///
/// Implementations execute exactly one request and never retry. Non-2xx
/// statuses are returned as responses, not errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}
