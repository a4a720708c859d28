//! Fully-formed request descriptors handed to the transport.

use std::time::Duration;

use super::{Headers, HttpMethod, MultipartForm};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// An encoded request body ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// JSON text; the `Content-Type` header is already set.
    Json(String),
    /// Multipart form; the transport must supply `Content-Type` with its
    /// own boundary.
    Multipart(MultipartForm),
}

/// A single HTTP exchange described as plain data.
///
/// Constructed fresh for every call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: String,
    /// Final header set
    pub headers: Headers,
    /// Encoded body; always `None` for GET
    pub body: Option<HttpBody>,
    /// Time allowed before the call is abandoned
    pub timeout: Duration,
}

impl HttpRequest {
    /// Creates a body-less request with default headers and timeout.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Returns the bearer token carried in the `Authorization` header, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get("Authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}
