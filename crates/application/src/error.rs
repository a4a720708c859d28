//! Application error types

use resumatch_domain::ApiError;
use thiserror::Error;

use crate::ports::StorageError;

/// Errors from session operations that are not reported as envelopes.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No refresh token is held; nothing was sent.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The backend answered but declined the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persisting session data failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// An inactivity monitor is already attached to this session.
    #[error("inactivity monitor already running")]
    MonitorAlreadyRunning,
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
