//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while parsing or validating plain data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The theme name is not one of `light`, `dark` or `system`.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// Query parameters could not be URL-encoded.
    #[error("invalid query parameters: {0}")]
    InvalidQuery(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
