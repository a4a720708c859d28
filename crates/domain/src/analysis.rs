//! Resume analysis records returned by the `/analysis` routes.
//!
//! These are transport shapes only; the scoring happens on the backend.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::QueryParams;

/// Processing state of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Uploaded, waiting for a worker
    #[default]
    Pending,
    /// Being analysed
    Processing,
    /// Results available
    Completed,
    /// Analysis failed
    Failed,
}

impl AnalysisStatus {
    /// Returns the lowercase name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns true once the analysis will not change any more.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resume-to-job match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Backend identifier
    pub id: String,
    /// Name of the uploaded resume file
    pub file_name: String,
    /// Target job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Target company
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Processing state
    #[serde(default)]
    pub status: AnalysisStatus,
    /// Overall match score in `0..=100`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    /// Skills found in both resume and job description
    #[serde(default)]
    pub matched_skills: Vec<String>,
    /// Skills the job asks for that the resume lacks
    #[serde(default)]
    pub missing_skills: Vec<String>,
    /// Suggested resume improvements
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Upload time
    pub created_at: DateTime<Utc>,
}

/// Aggregate analysis statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Number of analyses
    #[serde(default)]
    pub total: u32,
    /// Number of completed analyses
    #[serde(default)]
    pub completed: u32,
    /// Mean match score of completed analyses
    #[serde(default)]
    pub average_score: f64,
    /// Skills most often missing, most frequent first
    #[serde(default)]
    pub top_missing_skills: Vec<String>,
}

/// A skill the backend suggests adding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSuggestion {
    /// Skill name
    pub skill: String,
    /// Relevance in `0.0..=1.0`
    #[serde(default)]
    pub relevance: f64,
    /// Skill family (e.g. "language", "framework")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// `data` of a successful export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisExport {
    /// Where the export can be downloaded
    pub download_url: String,
    /// Format of the exported document
    pub format: ExportFormat,
}

/// Document format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PDF report
    #[default]
    Pdf,
    /// Raw JSON
    Json,
    /// Spreadsheet
    Csv,
}

impl ExportFormat {
    /// Returns the lowercase name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Filters for `GET /analysis/history`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Only analyses in this state
    pub status: Option<AnalysisStatus>,
    /// Free-text search over job title and company
    pub search: Option<String>,
}

impl HistoryQuery {
    /// Creates a query for one page.
    #[must_use]
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Converts the filters into query parameters; unset filters are absent.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("page", self.page)
            .with_opt("limit", self.limit)
            .with_opt("status", self.status.map(AnalysisStatus::as_str))
            .with_opt("search", self.search.as_deref())
    }
}
