//! Timeout-raced dispatch over the transport port.

use tokio::time::Instant;
use tracing::debug;

use resumatch_domain::{ApiError, HttpRequest, RawResponse};

use crate::ports::Transport;

/// Executes one request, racing it against `request.timeout`.
///
/// Exactly one of response, timeout error or network error results. When
/// the timer wins, the in-flight transport future is dropped, which aborts
/// the underlying call.
///
/// # Errors
///
/// Returns [`ApiError::Timeout`] (408) if the timer elapses first and
/// [`ApiError::Network`] (0) for transport failures.
pub async fn send_with_timeout(
    transport: &dyn Transport,
    request: &HttpRequest,
) -> Result<RawResponse, ApiError> {
    let started = Instant::now();
    let outcome = tokio::time::timeout(request.timeout, transport.execute(request)).await;
    let elapsed_ms = started.elapsed().as_millis();

    match outcome {
        Ok(Ok(response)) => {
            debug!(
                method = %request.method,
                url = %request.url,
                status = response.status,
                elapsed_ms,
                "request completed"
            );
            Ok(response)
        }
        Ok(Err(error)) => {
            debug!(method = %request.method, url = %request.url, %error, "transport failed");
            Err(error.into())
        }
        Err(_) => {
            debug!(
                method = %request.method,
                url = %request.url,
                timeout_ms = request.timeout.as_millis(),
                "request timed out"
            );
            Err(ApiError::timeout())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::TransportError;
    use crate::test_support::{DelayedTransport, FailingTransport};
    use resumatch_domain::HttpMethod;
    use std::time::Duration;

    fn request(timeout_ms: u64) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Get, "http://stub/health");
        req.timeout = Duration::from_millis(timeout_ms);
        req
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_loses_the_race() {
        let transport = DelayedTransport::new(Duration::from_millis(50), RawResponse::new(200, "{}"));
        let err = send_with_timeout(&transport, &request(5)).await.unwrap_err();
        assert_eq!(err.status_code(), 408);
        assert_eq!(err, ApiError::timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn fast_backend_wins_the_race() {
        let transport = DelayedTransport::new(Duration::from_millis(5), RawResponse::new(201, "{}"));
        let response = send_with_timeout(&transport, &request(50)).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn transport_failure_becomes_network_error() {
        let transport = FailingTransport(TransportError::ConnectionRefused {
            host: "localhost".into(),
            port: 5000,
        });
        let err = send_with_timeout(&transport, &request(1000)).await.unwrap_err();
        assert_eq!(err.status_code(), 0);
        assert!(err.to_string().contains("Connection refused"));
    }

    #[tokio::test]
    async fn adapter_timeout_becomes_timeout_error() {
        let transport = FailingTransport(TransportError::TimedOut);
        let err = send_with_timeout(&transport, &request(1000)).await.unwrap_err();
        assert_eq!(err.status_code(), 408);
    }
}
