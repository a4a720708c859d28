//! The uniform response envelope every backend route returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to list of validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Pagination details attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page (1-based)
    #[serde(default)]
    pub page: u32,
    /// Page size
    #[serde(default)]
    pub limit: u32,
    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,
    /// Total number of pages
    #[serde(default)]
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Returns true if a page follows the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `{success, data?, message?, errors?, meta?}`
///
/// After [`ResponseEnvelope::normalized`], `success == true` implies `errors`
/// is absent and `success == false` implies `data` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    /// Whether the backend considers the call successful
    pub success: bool,
    /// Payload on success
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-level validation messages on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Pagination for list responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ResponseEnvelope<T> {
    /// Creates a successful envelope carrying `data`.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: None,
        }
    }

    /// Creates a failed envelope with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            meta: None,
        }
    }

    /// Attaches field-level errors. Empty maps are ignored.
    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        if !errors.is_empty() {
            self.errors = Some(errors);
        }
        self
    }

    /// Enforces the success/data/errors invariant.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.success {
            self.errors = None;
        } else {
            self.data = None;
        }
        self
    }

    /// Re-types a payload-less envelope, dropping any data.
    #[must_use]
    pub fn without_data<U>(self) -> ResponseEnvelope<U> {
        ResponseEnvelope {
            success: self.success,
            data: None,
            message: self.message,
            errors: self.errors,
            meta: self.meta,
        }
    }

    /// Returns the first message recorded for `field`.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|e| e.get(field))
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_backend_shape() {
        let json = r#"{
            "success": true,
            "data": [1, 2],
            "meta": {"page": 1, "limit": 2, "total": 5, "totalPages": 3}
        }"#;
        let envelope: ResponseEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data, Some(vec![1, 2]));
        assert!(envelope.meta.unwrap().has_next());
    }

    #[test]
    fn test_missing_data_is_none() {
        let envelope: ResponseEnvelope<String> =
            serde_json::from_str(r#"{"success": false, "message": "nope"}"#).unwrap();
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_normalized_enforces_invariant() {
        let mut errors = FieldErrors::new();
        errors.insert("email".into(), vec!["taken".into()]);

        let mut ok = ResponseEnvelope::success(1).with_errors(errors.clone());
        ok = ok.normalized();
        assert!(ok.errors.is_none());
        assert_eq!(ok.data, Some(1));

        let mut failed = ResponseEnvelope::<u32>::failure("bad").with_errors(errors);
        failed.data = Some(7);
        let failed = failed.normalized();
        assert!(failed.data.is_none());
        assert_eq!(failed.field_error("email"), Some("taken"));
    }

    #[test]
    fn test_empty_errors_ignored() {
        let env = ResponseEnvelope::<()>::failure("x").with_errors(FieldErrors::new());
        assert!(env.errors.is_none());
    }
}
