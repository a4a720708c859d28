//! HTTP transport using reqwest.
//!
//! Implements the `Transport` port: one request in, one raw response out.
//! Multipart bodies get their boundary and `Content-Type` from reqwest.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Url};

use resumatch_application::ClientConfig;
use resumatch_application::ports::{Transport, TransportError};
use resumatch_domain::request::MultipartField;
use resumatch_domain::response::canonical_reason;
use resumatch_domain::{Headers, HttpBody, HttpMethod, HttpRequest, MultipartForm, RawResponse};

const MAX_REDIRECTS: usize = 10;

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport using the configured `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn build_form(form: &MultipartForm) -> Result<Form, TransportError> {
        let mut built = Form::new();
        for field in form.fields() {
            built = match field {
                MultipartField::Text { name, value } => built.text(name.clone(), value.clone()),
                MultipartField::File { name, file } => {
                    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
                    if let Some(content_type) = file.content_type.as_deref() {
                        part = part.mime_str(content_type).map_err(|e| {
                            TransportError::InvalidBody(format!("Invalid MIME type: {e}"))
                        })?;
                    }
                    built.part(name.clone(), part)
                }
            };
        }
        Ok(built)
    }

    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::TimedOut;
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return TransportError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            if lowered.contains("certificate") || lowered.contains("tls") {
                return TransportError::Tls(message);
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_builder() {
            return TransportError::InvalidBody(error.to_string());
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(request.timeout);

        for header in request.headers.iter() {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        builder = match &request.body {
            None => builder,
            Some(HttpBody::Json(text)) => builder.body(text.clone()),
            Some(HttpBody::Multipart(form)) => builder.multipart(Self::build_form(form)?),
        };

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or_else(|| canonical_reason(status.as_u16()))
                .to_string(),
            headers,
            body,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resumatch_domain::FilePart;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_mime_type_is_invalid_body() {
        let form = MultipartForm::new().file(
            "file",
            FilePart::new("cv.pdf", vec![1]).with_content_type("not a mime"),
        );
        let result = ReqwestTransport::build_form(&form);
        assert!(matches!(result, Err(TransportError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        let request = HttpRequest::new(HttpMethod::Get, "not a url");
        let result = transport.execute(&request).await;
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }
}
