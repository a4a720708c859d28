//! User records returned by the `/user` and `/auth` routes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Theme;

/// The account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Current job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// City / country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Account creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial profile update; omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New job title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Short biography
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Stored user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Theme preference
    #[serde(default)]
    pub theme: Theme,
    /// Whether analysis results are emailed
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    /// Whether matching job alerts are sent
    #[serde(default)]
    pub job_alerts: bool,
    /// UI language tag
    #[serde(default = "default_language")]
    pub language: String,
}

const fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            email_notifications: default_true(),
            job_alerts: false,
            language: default_language(),
        }
    }
}

/// A work-history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Backend identifier; absent before creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role title
    pub title: String,
    /// Employer
    pub company: String,
    /// Start date
    pub start_date: NaiveDate,
    /// End date; `None` for the current role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An education entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    /// Backend identifier; absent before creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// School or university
    pub institution: String,
    /// Degree name
    pub degree: String,
    /// Field of study
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Graduation year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
}

/// Aggregate account statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of analyses run
    #[serde(default)]
    pub total_analyses: u32,
    /// Mean match score across analyses
    #[serde(default)]
    pub average_score: f64,
    /// Best match score
    #[serde(default)]
    pub best_score: f64,
    /// Analyses run in the current month
    #[serde(default)]
    pub analyses_this_month: u32,
}

/// `data` of a successful avatar upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUpload {
    /// Public URL of the stored avatar
    pub avatar_url: String,
}

/// `data` of a successful data-export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLink {
    /// Where the export can be downloaded
    pub download_url: String,
    /// When the link stops working
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preferences_fill_defaults() {
        let prefs: UserPreferences = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.email_notifications);
        assert_eq!(prefs.language, "en");
    }

    #[test]
    fn profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            title: Some("Engineer".into()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Engineer"}));
    }

    #[test]
    fn experience_dates_round_trip_as_iso() {
        let exp: Experience = serde_json::from_str(
            r#"{"title": "Dev", "company": "Acme", "startDate": "2021-03-01"}"#,
        )
        .unwrap();
        assert_eq!(exp.start_date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert!(exp.end_date.is_none());
        assert!(exp.id.is_none());
    }
}
