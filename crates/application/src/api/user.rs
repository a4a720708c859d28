//! `/user` routes.

use serde_json::Value;

use resumatch_domain::{
    ApiError, AvatarUpload, Education, Experience, ExportLink, FilePart, ProfileUpdate,
    QueryParams, ResponseEnvelope, User, UserPreferences, UserStats, endpoints::user,
};

use crate::client::{ApiClient, ProgressCallback, RequestOptions, json_body};

/// Account endpoints. Every call requires authentication.
#[derive(Debug, Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    /// Wraps a client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /user/profile`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn profile(&self) -> Result<ResponseEnvelope<User>, ApiError> {
        self.client
            .get(user::PROFILE, QueryParams::new(), RequestOptions::default())
            .await
    }

    /// `PUT /user/profile`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<ResponseEnvelope<User>, ApiError> {
        self.client
            .put(user::PROFILE, json_body(update)?, RequestOptions::default())
            .await
    }

    /// `GET /user/preferences`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn preferences(&self) -> Result<ResponseEnvelope<UserPreferences>, ApiError> {
        self.client
            .get(user::PREFERENCES, QueryParams::new(), RequestOptions::default())
            .await
    }

    /// `PUT /user/preferences`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn update_preferences(
        &self,
        preferences: &UserPreferences,
    ) -> Result<ResponseEnvelope<UserPreferences>, ApiError> {
        self.client
            .put(user::PREFERENCES, json_body(preferences)?, RequestOptions::default())
            .await
    }

    /// `POST /user/experience`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn add_experience(
        &self,
        entry: &Experience,
    ) -> Result<ResponseEnvelope<Experience>, ApiError> {
        self.client
            .post(user::EXPERIENCE, json_body(entry)?, RequestOptions::default())
            .await
    }

    /// `PUT /user/experience/{id}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn update_experience(
        &self,
        id: &str,
        entry: &Experience,
    ) -> Result<ResponseEnvelope<Experience>, ApiError> {
        self.client
            .put(&user::experience(id), json_body(entry)?, RequestOptions::default())
            .await
    }

    /// `DELETE /user/experience/{id}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn delete_experience(&self, id: &str) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.client
            .delete(&user::experience(id), RequestOptions::default())
            .await
    }

    /// `POST /user/education`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn add_education(
        &self,
        entry: &Education,
    ) -> Result<ResponseEnvelope<Education>, ApiError> {
        self.client
            .post(user::EDUCATION, json_body(entry)?, RequestOptions::default())
            .await
    }

    /// `PUT /user/education/{id}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn update_education(
        &self,
        id: &str,
        entry: &Education,
    ) -> Result<ResponseEnvelope<Education>, ApiError> {
        self.client
            .put(&user::education(id), json_body(entry)?, RequestOptions::default())
            .await
    }

    /// `DELETE /user/education/{id}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn delete_education(&self, id: &str) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.client
            .delete(&user::education(id), RequestOptions::default())
            .await
    }

    /// `POST /user/avatar` as multipart.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn upload_avatar(
        &self,
        image: FilePart,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<ResponseEnvelope<AvatarUpload>, ApiError> {
        self.client
            .upload_file(user::AVATAR, image, &[], on_progress)
            .await
    }

    /// `GET /user/stats`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn stats(&self) -> Result<ResponseEnvelope<UserStats>, ApiError> {
        self.client
            .get(user::STATS, QueryParams::new(), RequestOptions::default())
            .await
    }

    /// `DELETE /user/account`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn delete_account(&self) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.client
            .delete(user::ACCOUNT, RequestOptions::default())
            .await
    }

    /// `GET /user/export`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn export_data(&self) -> Result<ResponseEnvelope<ExportLink>, ApiError> {
        self.client
            .get(user::EXPORT, QueryParams::new(), RequestOptions::default())
            .await
    }
}
