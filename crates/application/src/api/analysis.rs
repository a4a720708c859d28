//! `/analysis` routes.

use serde_json::Value;

use resumatch_domain::{
    Analysis, AnalysisExport, AnalysisStats, ApiError, ExportFormat, FilePart, HistoryQuery,
    QueryParams, RequestBody, ResponseEnvelope, SkillSuggestion, endpoints::analysis,
};

use crate::client::{ApiClient, ProgressCallback, RequestOptions};

/// A resume plus the job it is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    /// The resume document
    pub resume: FilePart,
    /// Job description text
    pub job_description: String,
    /// Target job title
    pub job_title: Option<String>,
    /// Target company
    pub company: Option<String>,
}

impl ResumeUpload {
    /// Creates an upload without title or company.
    #[must_use]
    pub fn new(resume: FilePart, job_description: impl Into<String>) -> Self {
        Self {
            resume,
            job_description: job_description.into(),
            job_title: None,
            company: None,
        }
    }

    fn text_fields(&self) -> Vec<(&str, &str)> {
        let mut fields = vec![("jobDescription", self.job_description.as_str())];
        if let Some(title) = self.job_title.as_deref() {
            fields.push(("jobTitle", title));
        }
        if let Some(company) = self.company.as_deref() {
            fields.push(("company", company));
        }
        fields
    }
}

/// Resume analysis endpoints. Every call requires authentication.
#[derive(Debug, Clone)]
pub struct AnalysisApi {
    client: ApiClient,
}

impl AnalysisApi {
    /// Wraps a client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /analysis/upload` as multipart.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn upload_resume(
        &self,
        upload: ResumeUpload,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<ResponseEnvelope<Analysis>, ApiError> {
        let fields = upload.text_fields();
        self.client
            .upload_file(analysis::UPLOAD, upload.resume.clone(), &fields, on_progress)
            .await
    }

    /// `GET /analysis/{id}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn get(&self, id: &str) -> Result<ResponseEnvelope<Analysis>, ApiError> {
        self.client
            .get(&analysis::by_id(id), QueryParams::new(), RequestOptions::default())
            .await
    }

    /// `DELETE /analysis/{id}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn delete(&self, id: &str) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.client
            .delete(&analysis::by_id(id), RequestOptions::default())
            .await
    }

    /// `GET /analysis/history`; pagination arrives in `meta`.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<ResponseEnvelope<Vec<Analysis>>, ApiError> {
        self.client
            .get(analysis::HISTORY, query.to_params(), RequestOptions::default())
            .await
    }

    /// `GET /analysis/{id}/export?format=`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn export(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> Result<ResponseEnvelope<AnalysisExport>, ApiError> {
        self.client
            .get(
                &analysis::export(id),
                QueryParams::new().with("format", format.as_str()),
                RequestOptions::default(),
            )
            .await
    }

    /// `POST /analysis/{id}/reprocess`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn reprocess(&self, id: &str) -> Result<ResponseEnvelope<Analysis>, ApiError> {
        self.client
            .post(&analysis::reprocess(id), RequestBody::None, RequestOptions::default())
            .await
    }

    /// `GET /analysis/stats`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn stats(&self) -> Result<ResponseEnvelope<AnalysisStats>, ApiError> {
        self.client
            .get(analysis::STATS, QueryParams::new(), RequestOptions::default())
            .await
    }

    /// `GET /analysis/skill-suggestions`, optionally narrowed to a job title.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client.
    pub async fn skill_suggestions(
        &self,
        job_title: Option<&str>,
    ) -> Result<ResponseEnvelope<Vec<SkillSuggestion>>, ApiError> {
        self.client
            .get(
                analysis::SKILL_SUGGESTIONS,
                QueryParams::new().with_opt("jobTitle", job_title),
                RequestOptions::default(),
            )
            .await
    }
}
