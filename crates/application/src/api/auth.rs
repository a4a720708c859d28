//! `/auth` routes.

use serde_json::Value;

use resumatch_domain::session::{ForgotPasswordRequest, RefreshRequest, ResetPasswordRequest};
use resumatch_domain::{
    ApiError, AuthPayload, LoginCredentials, QueryParams, RequestBody, ResponseEnvelope,
    SignupCredentials, TokenPair, User, endpoints::auth,
};

use crate::client::{ApiClient, RequestOptions, json_body};

/// Authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Wraps a client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ResponseEnvelope<AuthPayload>, ApiError> {
        self.client
            .post(auth::LOGIN, json_body(credentials)?, RequestOptions::public())
            .await
    }

    /// `POST /auth/signup`. Only name, email and password are sent.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn signup(
        &self,
        credentials: &SignupCredentials,
    ) -> Result<ResponseEnvelope<AuthPayload>, ApiError> {
        self.client
            .post(
                auth::SIGNUP,
                json_body(&credentials.to_request())?,
                RequestOptions::public(),
            )
            .await
    }

    /// `POST /auth/logout` with the current bearer token.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn logout(&self) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.client
            .post(auth::LOGOUT, RequestBody::None, RequestOptions::default())
            .await
    }

    /// `GET /auth/profile`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn profile(&self) -> Result<ResponseEnvelope<User>, ApiError> {
        self.client
            .get(auth::PROFILE, QueryParams::new(), RequestOptions::default())
            .await
    }

    /// `POST /auth/refresh`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn refresh(&self, refresh_token: &str) -> Result<ResponseEnvelope<TokenPair>, ApiError> {
        self.client
            .post(
                auth::REFRESH,
                json_body(&RefreshRequest { refresh_token })?,
                RequestOptions::public(),
            )
            .await
    }

    /// `POST /auth/forgot-password`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn forgot_password(&self, email: &str) -> Result<ResponseEnvelope<Value>, ApiError> {
        let body = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        self.client
            .post(auth::FORGOT_PASSWORD, json_body(&body)?, RequestOptions::public())
            .await
    }

    /// `POST /auth/reset-password`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.client
            .post(auth::RESET_PASSWORD, json_body(request)?, RequestOptions::public())
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::test_support::{RecordingTransport, StaticToken};
    use pretty_assertions::assert_eq;
    use resumatch_domain::{HttpBody, HttpMethod};
    use std::sync::Arc;

    fn api(transport: Arc<RecordingTransport>) -> AuthApi {
        AuthApi::new(ApiClient::new(
            ClientConfig::new("http://stub/api"),
            transport,
            Arc::new(StaticToken("T0".into())),
        ))
    }

    fn sent_json(transport: &RecordingTransport) -> serde_json::Value {
        match transport.last_request().unwrap().body {
            Some(HttpBody::Json(text)) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_is_public_post() {
        let transport = Arc::new(RecordingTransport::replying(
            200,
            r#"{"success": true, "data": {"user": {"id": "u1", "name": "Ada", "email": "a@b.com"}, "token": "T1"}}"#,
        ));
        let envelope = api(transport.clone())
            .login(&LoginCredentials::new("a@b.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(envelope.data.unwrap().token, "T1");
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "http://stub/api/auth/login");
        assert!(sent.bearer_token().is_none());
        assert_eq!(
            sent_json(&transport),
            serde_json::json!({"email": "a@b.com", "password": "secret1"})
        );
    }

    #[tokio::test]
    async fn refresh_sends_camel_case_token() {
        let transport = Arc::new(RecordingTransport::replying(
            200,
            r#"{"success": true, "data": {"token": "T2"}}"#,
        ));
        let envelope = api(transport.clone()).refresh("R1").await.unwrap();

        assert_eq!(envelope.data.unwrap().token, "T2");
        assert_eq!(sent_json(&transport), serde_json::json!({"refreshToken": "R1"}));
    }

    #[tokio::test]
    async fn logout_and_profile_carry_bearer() {
        let transport = Arc::new(RecordingTransport::replying(200, r#"{"success": true}"#));
        let auth = api(transport.clone());

        auth.logout().await.unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.bearer_token(), Some("T0"));
        assert!(sent.body.is_none());

        let _ = auth.profile().await.unwrap();
        assert_eq!(transport.last_request().unwrap().url, "http://stub/api/auth/profile");
    }

    #[tokio::test]
    async fn password_reset_routes() {
        let transport = Arc::new(RecordingTransport::replying(200, r#"{"success": true, "message": "sent"}"#));
        let auth = api(transport.clone());

        let envelope = auth.forgot_password(" a@b.com ").await.unwrap();
        assert_eq!(envelope.message.as_deref(), Some("sent"));
        assert_eq!(sent_json(&transport), serde_json::json!({"email": "a@b.com"}));

        auth.reset_password(&ResetPasswordRequest {
            token: "reset".into(),
            password: "newpass".into(),
        })
        .await
        .unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            "http://stub/api/auth/reset-password"
        );
    }
}
