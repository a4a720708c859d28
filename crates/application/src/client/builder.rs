//! Request Builder
//!
//! Turns an endpoint path and a per-call configuration into a fully-formed
//! [`HttpRequest`]: URL with query string, merged headers, encoded body.

use std::time::Duration;

use resumatch_domain::{
    ApiError, Headers, HttpBody, HttpMethod, HttpRequest, QueryParams, RequestBody,
};

/// Per-call options shared by every verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Caller headers; these win over the defaults
    pub headers: Headers,
    /// Whether a stored token is attached as `Authorization: Bearer`
    pub requires_auth: bool,
    /// Overrides the client's default timeout
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: Headers::new(),
            requires_auth: true,
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// Options for public routes (no `Authorization` header).
    #[must_use]
    pub fn public() -> Self {
        Self {
            requires_auth: false,
            ..Self::default()
        }
    }

    /// Adds a caller header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Everything the builder needs for one call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestConfig {
    /// HTTP verb
    pub method: HttpMethod,
    /// Query parameters; absent values are dropped
    pub params: QueryParams,
    /// Body before encoding
    pub body: RequestBody,
    /// Headers, auth flag and timeout
    pub options: RequestOptions,
}

/// Returns the headers every request starts from.
#[must_use]
pub fn default_headers() -> Headers {
    Headers::new()
        .with("Content-Type", "application/json")
        .with("Accept", "application/json")
}

/// Builds requests against a fixed base URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    default_timeout: Duration,
}

impl RequestBuilder {
    /// Creates a builder. A trailing slash on `base_url` is ignored.
    #[must_use]
    pub fn new(base_url: &str, default_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_timeout,
        }
    }

    /// Joins the base URL, the endpoint path and the rendered query string.
    ///
    /// # Errors
    ///
    /// Returns a network-class error if the query cannot be encoded.
    pub fn url(&self, endpoint: &str, params: &QueryParams) -> Result<String, ApiError> {
        let mut url = self.base_url.clone();
        if !endpoint.is_empty() && !endpoint.starts_with('/') {
            url.push('/');
        }
        url.push_str(endpoint);

        let query = params
            .to_query_string()
            .map_err(|e| ApiError::network(format!("Invalid request: {e}")))?;
        if !query.is_empty() {
            url.push(if endpoint.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        Ok(url)
    }

    /// Assembles the final request.
    ///
    /// `token` is attached only when `requires_auth` is set and a token is
    /// present; a missing token is not an error here.
    ///
    /// # Errors
    ///
    /// Returns a network-class error if the query or body cannot be encoded.
    pub fn build(
        &self,
        endpoint: &str,
        config: RequestConfig,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let RequestConfig {
            method,
            params,
            body,
            options,
        } = config;

        let url = self.url(endpoint, &params)?;

        let mut headers = default_headers();
        headers.merge(&options.headers);
        if options.requires_auth
            && let Some(token) = token.filter(|t| !t.is_empty())
        {
            headers.set("Authorization", format!("Bearer {token}"));
        }

        let body = if method == HttpMethod::Get {
            None
        } else {
            match body {
                RequestBody::None => None,
                RequestBody::Json(value) => Some(HttpBody::Json(
                    serde_json::to_string(&value)
                        .map_err(|e| ApiError::network(format!("Invalid request body: {e}")))?,
                )),
                RequestBody::Multipart(form) => {
                    headers.remove("Content-Type");
                    Some(HttpBody::Multipart(form))
                }
            }
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: options.timeout.unwrap_or(self.default_timeout),
        })
    }
}
