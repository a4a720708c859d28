//! Error taxonomy for every call that reaches (or tries to reach) the backend.

use thiserror::Error;

use crate::response::FieldErrors;

/// Status code reported for transport failures.
pub const STATUS_NETWORK: u16 = 0;
/// Status code reported when the timeout race is lost.
pub const STATUS_TIMEOUT: u16 = 408;
/// Status code reported for locally detected session expiry.
pub const STATUS_SESSION_EXPIRED: u16 = 401;
/// Status code reported when the health check fails.
pub const STATUS_UNAVAILABLE: u16 = 503;

/// A failed backend call.
///
/// Every variant maps to a status code through [`ApiError::status_code`];
/// transport failures use 0 and timeouts use 408.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// DNS, connection or TLS failure; nothing reached the backend.
    #[error("{message}")]
    Network {
        /// Description of the failure
        message: String,
    },

    /// The timeout elapsed before the response settled.
    #[error("{message}")]
    Timeout {
        /// Description of the failure
        message: String,
    },

    /// The backend rejected the request (4xx).
    #[error("{message}")]
    Validation {
        /// HTTP status code
        status: u16,
        /// Message from the envelope or a generic one
        message: String,
        /// Field-level messages from the envelope
        errors: Option<FieldErrors>,
    },

    /// The backend failed (5xx or any other non-2xx status).
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the envelope or a generic one
        message: String,
        /// Field-level messages from the envelope
        errors: Option<FieldErrors>,
    },

    /// Raised locally by the inactivity monitor; never produced by the network.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
}

impl ApiError {
    /// Creates a transport failure.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates the error produced when the timeout race is lost.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout {
            message: "Request timeout".to_string(),
        }
    }

    /// Classifies a non-success status into the matching variant.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>, errors: Option<FieldErrors>) -> Self {
        let message = message.into();
        match status {
            STATUS_NETWORK => Self::Network { message },
            STATUS_TIMEOUT => Self::Timeout { message },
            400..=499 => Self::Validation {
                status,
                message,
                errors,
            },
            _ => Self::Server {
                status,
                message,
                errors,
            },
        }
    }

    /// Returns the status code carried by this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Network { .. } => STATUS_NETWORK,
            Self::Timeout { .. } => STATUS_TIMEOUT,
            Self::Validation { status, .. } | Self::Server { status, .. } => *status,
            Self::SessionExpired => STATUS_SESSION_EXPIRED,
        }
    }

    /// Returns field-level messages, if the backend supplied any.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } | Self::Server { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }

    /// Returns true for 401-class failures that a token refresh may fix.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Validation { status: 401, .. })
    }

    /// Returns true for transient failures worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. } | Self::Server { .. })
    }
}
