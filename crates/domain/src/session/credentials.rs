//! Credentials and token payloads exchanged with the auth routes.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::response::FieldErrors;
use crate::user::User;

/// Minimum accepted password length for signup.
pub const MIN_PASSWORD_LEN: usize = 6;

#[allow(clippy::expect_used)] // literal pattern
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

impl LoginCredentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signup form contents, including the confirmation field.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupCredentials {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Chosen password
    pub password: String,
    /// Must equal `password`; never sent to the backend
    pub confirm_password: String,
}

impl SignupCredentials {
    /// Creates signup credentials.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Checks the form before any network call.
    ///
    /// # Errors
    ///
    /// Returns field-level messages keyed by `name`, `email`, `password`
    /// and `confirmPassword`.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            push_error(&mut errors, "name", "Name is required");
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            push_error(&mut errors, "email", "Please enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            push_error(
                &mut errors,
                "password",
                "Password must be at least 6 characters",
            );
        }
        if self.password != self.confirm_password {
            push_error(&mut errors, "confirmPassword", "Passwords do not match");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns the payload actually transmitted, without the confirmation.
    #[must_use]
    pub fn to_request(&self) -> SignupRequest<'_> {
        SignupRequest {
            name: self.name.trim(),
            email: self.email.trim(),
            password: &self.password,
        }
    }
}

impl fmt::Debug for SignupCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupCredentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    /// Display name
    pub name: &'a str,
    /// Account email
    pub email: &'a str,
    /// Chosen password
    pub password: &'a str,
}

/// `data` of a successful login or signup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// The authenticated user
    pub user: User,
    /// Access token
    pub token: String,
    /// Refresh token, when the backend issues one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPayload")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// `data` of a successful token refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// New access token
    pub token: String,
    /// New refresh token; the previous one is kept when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

/// Body of `POST /auth/refresh`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    /// The refresh token being exchanged
    pub refresh_token: &'a str,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account email
    pub email: String,
}

/// Body of `POST /auth/reset-password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Reset token from the email link
    pub token: String,
    /// New password
    pub password: String,
}
