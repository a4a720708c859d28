//! API Client
//!
//! Composes the request builder, the timeout-raced transport and the
//! normalizer behind one operation per HTTP verb.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use resumatch_domain::{
    ApiError, FilePart, HttpMethod, MultipartForm, QueryParams, RequestBody, ResponseEnvelope,
    api_error::STATUS_UNAVAILABLE,
};

use super::builder::{RequestBuilder, RequestConfig, RequestOptions};
use super::dispatch::send_with_timeout;
use super::normalizer::{decode, normalize};
use crate::config::ClientConfig;
use crate::ports::{TokenSource, Transport};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Upload progress in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub sent: u64,
    /// Total bytes to send
    pub total: u64,
}

impl UploadProgress {
    /// Returns the completed percentage in `0..=100`.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = u128::from(self.sent.min(self.total)) * 100 / u128::from(self.total);
        u8::try_from(pct).unwrap_or(100)
    }
}

/// Callback receiving upload progress. Reporting is best-effort.
pub type ProgressCallback = dyn Fn(UploadProgress) + Send + Sync;

/// Serializes `value` into a JSON request body.
///
/// # Errors
///
/// Returns a network-class error if `value` cannot be serialized.
pub fn json_body<B: Serialize>(value: &B) -> Result<RequestBody, ApiError> {
    RequestBody::json(value).map_err(|e| ApiError::network(format!("Invalid request body: {e}")))
}

/// Verb-oriented client for the backend.
///
/// Holds no mutable state; concurrent calls are independent. The client
/// reads the bearer token through [`TokenSource`] and never writes session
/// state.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
    builder: RequestBuilder,
    config: ClientConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client.
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let builder = RequestBuilder::new(&config.base_url, config.default_timeout);
        Self {
            transport,
            tokens,
            builder,
            config,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds, dispatches and normalizes one call.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures, timeouts and non-2xx
    /// statuses.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let token = if config.options.requires_auth {
            self.tokens.access_token().await
        } else {
            None
        };
        let request = self.builder.build(endpoint, config, token.as_deref())?;
        let response = send_with_timeout(self.transport.as_ref(), &request).await?;
        normalize(&response).map(decode)
    }

    /// `GET endpoint?params`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: QueryParams,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let config = RequestConfig {
            method: HttpMethod::Get,
            params,
            body: RequestBody::None,
            options,
        };
        self.request(endpoint, config).await
    }

    /// `POST endpoint` with `body`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        self.with_body(HttpMethod::Post, endpoint, body, options).await
    }

    /// `PUT endpoint` with `body`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        self.with_body(HttpMethod::Put, endpoint, body, options).await
    }

    /// `PATCH endpoint` with `body`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        self.with_body(HttpMethod::Patch, endpoint, body, options).await
    }

    /// `DELETE endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        self.with_body(HttpMethod::Delete, endpoint, RequestBody::None, options)
            .await
    }

    async fn with_body<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let config = RequestConfig {
            method,
            params: QueryParams::new(),
            body,
            options,
        };
        self.request(endpoint, config).await
    }

    /// Uploads `file` plus `extra_fields` as a multipart `POST`.
    ///
    /// Progress is reported before dispatch and after a successful
    /// response; intermediate progress is not available from the transport.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        file: FilePart,
        extra_fields: &[(&str, &str)],
        on_progress: Option<&ProgressCallback>,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let mut form = MultipartForm::new().file(UPLOAD_FILE_FIELD, file);
        for (name, value) in extra_fields {
            form = form.text(*name, *value);
        }

        let total = form.file_bytes();
        if let Some(report) = on_progress {
            report(UploadProgress { sent: 0, total });
        }

        let envelope = self
            .post(endpoint, RequestBody::Multipart(form), RequestOptions::default())
            .await?;

        if let Some(report) = on_progress {
            report(UploadProgress { sent: total, total });
        }
        Ok(envelope)
    }

    /// Probes the liveness route without authentication and with a short
    /// timeout.
    ///
    /// # Errors
    ///
    /// Any failure is reported as a 503 [`ApiError::Server`].
    pub async fn health_check(&self) -> Result<ResponseEnvelope<Value>, ApiError> {
        let options = RequestOptions::public().timeout(self.config.health_timeout);
        let health_path = self.config.health_path.clone();

        match self.get::<Value>(&health_path, QueryParams::new(), options).await {
            Ok(envelope) if envelope.success => Ok(envelope),
            Ok(envelope) => Err(unavailable(
                envelope
                    .message
                    .as_deref()
                    .unwrap_or("health check reported failure"),
            )),
            Err(error) => Err(unavailable(&error.to_string())),
        }
    }
}

fn unavailable(reason: &str) -> ApiError {
    ApiError::Server {
        status: STATUS_UNAVAILABLE,
        message: format!("Service unavailable: {reason}"),
        errors: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::Anonymous;
    use crate::test_support::{DelayedTransport, RecordingTransport, StaticToken};
    use pretty_assertions::assert_eq;
    use resumatch_domain::{HttpBody, RawResponse};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    fn client(transport: Arc<dyn Transport>, token: Option<&str>) -> ApiClient {
        let tokens: Arc<dyn TokenSource> = match token {
            Some(t) => Arc::new(StaticToken(t.to_string())),
            None => Arc::new(Anonymous),
        };
        ApiClient::new(ClientConfig::new("http://stub/api"), transport, tokens)
    }

    #[tokio::test]
    async fn get_sends_query_and_bearer() {
        let transport = Arc::new(RecordingTransport::replying(
            200,
            r#"{"success": true, "data": [1, 2, 3]}"#,
        ));
        let api = client(transport.clone(), Some("T1"));

        let envelope: ResponseEnvelope<Vec<u32>> = api
            .get(
                "/analysis/history",
                QueryParams::new().with("page", 2),
                RequestOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
        let sent = transport.last_request().expect("request recorded");
        assert_eq!(sent.url, "http://stub/api/analysis/history?page=2");
        assert_eq!(sent.bearer_token(), Some("T1"));
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn post_serializes_json_body() {
        let transport = Arc::new(RecordingTransport::replying(201, r#"{"success": true}"#));
        let api = client(transport.clone(), None);

        let _: ResponseEnvelope<Value> = api
            .post(
                "/user/experience",
                json_body(&json!({"title": "Dev"})).unwrap(),
                RequestOptions::default(),
            )
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.body, Some(HttpBody::Json(r#"{"title":"Dev"}"#.into())));
    }

    #[tokio::test]
    async fn protected_call_without_token_surfaces_401() {
        let transport = Arc::new(RecordingTransport::replying(
            401,
            r#"{"success": false, "message": "Authentication required"}"#,
        ));
        let api = client(transport.clone(), None);

        let err = api
            .get::<Value>("/user/profile", QueryParams::new(), RequestOptions::default())
            .await
            .unwrap_err();

        assert!(transport.last_request().unwrap().bearer_token().is_none());
        assert!(matches!(err, ApiError::Validation { status: 401, .. }));
        assert_eq!(err.to_string(), "Authentication required");
    }

    #[tokio::test]
    async fn server_error_is_server_variant() {
        let transport = Arc::new(RecordingTransport::replying(500, r#"{"success": false, "message": "db down"}"#));
        let api = client(transport, Some("T1"));
        let err = api
            .delete::<Value>("/analysis/a1", RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn upload_builds_multipart_and_reports_progress() {
        let transport = Arc::new(RecordingTransport::replying(
            200,
            r#"{"success": true, "data": {"id": "a1"}}"#,
        ));
        let api = client(transport.clone(), Some("T1"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = move |p: UploadProgress| sink.lock().unwrap().push(p.percent());

        let _: ResponseEnvelope<Value> = api
            .upload_file(
                "/analysis/upload",
                FilePart::new("cv.pdf", vec![0; 10]),
                &[("jobTitle", "Engineer")],
                Some(&progress),
            )
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert!(!sent.headers.contains("Content-Type"));
        let Some(HttpBody::Multipart(form)) = sent.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.fields().len(), 2);
        assert_eq!(form.file_bytes(), 10);
        assert_eq!(*seen.lock().unwrap(), vec![0, 100]);
    }

    #[tokio::test]
    async fn health_check_is_public_with_short_timeout() {
        let transport = Arc::new(RecordingTransport::replying(200, r#"{"success": true, "data": {"status": "ok"}}"#));
        let api = client(transport.clone(), Some("T1"));

        let envelope = api.health_check().await.unwrap();

        assert_eq!(envelope.data, Some(json!({"status": "ok"})));
        let sent = transport.last_request().unwrap();
        assert!(sent.bearer_token().is_none());
        assert_eq!(sent.timeout, Duration::from_secs(5));
        assert_eq!(sent.url, "http://stub/api/health");
    }

    #[tokio::test(start_paused = true)]
    async fn health_check_failure_is_503() {
        let transport = Arc::new(DelayedTransport::new(
            Duration::from_secs(10),
            RawResponse::new(200, "{}"),
        ));
        let api = client(transport, None);

        let err = api.health_check().await.unwrap_err();

        assert_eq!(err.status_code(), 503);
        assert!(err.to_string().contains("Request timeout"));
    }

    #[test]
    fn progress_percent() {
        assert_eq!(UploadProgress { sent: 5, total: 10 }.percent(), 50);
        assert_eq!(UploadProgress { sent: 0, total: 0 }.percent(), 100);
        assert_eq!(UploadProgress { sent: 20, total: 10 }.percent(), 100);
        let huge = u64::MAX - 1;
        assert_eq!(UploadProgress { sent: huge / 2, total: huge }.percent(), 50);
        assert_eq!(UploadProgress { sent: huge, total: huge }.percent(), 100);
    }

    #[test]
    fn json_body_accepts_references() {
        assert_eq!(
            json_body(&json!({"a": 1})).unwrap(),
            RequestBody::Json(json!({"a": 1}))
        );
    }
}
