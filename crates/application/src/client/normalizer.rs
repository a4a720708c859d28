//! Response Normalizer
//!
//! Parses raw responses into [`ResponseEnvelope`]s and turns non-2xx
//! statuses into typed [`ApiError`]s.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use resumatch_domain::{ApiError, RawResponse, ResponseEnvelope};

/// Message used when a body is not a valid envelope.
pub const INVALID_RESPONSE_FORMAT: &str = "Invalid response format";

/// Parses `response` into an untyped envelope.
///
/// An unparsable body yields `{success: false, message: "Invalid response
/// format"}`. An empty 2xx body yields `{success: true}`.
///
/// # Errors
///
/// Returns an [`ApiError`] carrying the original status for every non-2xx
/// response. The envelope's `message` and `errors` are used when the body
/// parsed, otherwise the message is `HTTP <status>: <statusText>`.
pub fn normalize(response: &RawResponse) -> Result<ResponseEnvelope<Value>, ApiError> {
    let parsed = if response.body.trim().is_empty() && response.is_success() {
        Some(ResponseEnvelope {
            success: true,
            data: None,
            message: None,
            errors: None,
            meta: None,
        })
    } else {
        serde_json::from_str::<ResponseEnvelope<Value>>(&response.body).ok()
    };

    if !response.is_success() {
        let generic = || format!("HTTP {}: {}", response.status, response.status_text);
        return Err(match parsed {
            Some(envelope) => ApiError::from_status(
                response.status,
                envelope.message.unwrap_or_else(generic),
                envelope.errors.filter(|e| !e.is_empty()),
            ),
            None => ApiError::from_status(response.status, generic(), None),
        });
    }

    Ok(parsed
        .unwrap_or_else(|| ResponseEnvelope::failure(INVALID_RESPONSE_FORMAT))
        .normalized())
}

/// Converts the untyped payload into `T`.
///
/// A payload that does not match `T` is reported the same way as an
/// unparsable body.
#[must_use]
pub fn decode<T: DeserializeOwned>(mut envelope: ResponseEnvelope<Value>) -> ResponseEnvelope<T> {
    let Some(data) = envelope.data.take() else {
        return envelope.without_data();
    };

    match serde_json::from_value::<T>(data) {
        Ok(data) => ResponseEnvelope {
            data: Some(data),
            ..envelope.without_data()
        },
        Err(error) => {
            warn!(%error, "response payload did not match the expected shape");
            ResponseEnvelope::failure(INVALID_RESPONSE_FORMAT)
        }
    }
}
