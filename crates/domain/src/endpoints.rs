//! Backend route paths, relative to the API base URL.

/// Liveness probe.
pub const HEALTH: &str = "/health";

/// Authentication routes.
pub mod auth {
    /// `POST` credentials, returns user + tokens.
    pub const LOGIN: &str = "/auth/login";
    /// `POST` new account, returns user + tokens.
    pub const SIGNUP: &str = "/auth/signup";
    /// `POST` invalidates the current token.
    pub const LOGOUT: &str = "/auth/logout";
    /// `GET` the authenticated user.
    pub const PROFILE: &str = "/auth/profile";
    /// `POST` exchanges a refresh token.
    pub const REFRESH: &str = "/auth/refresh";
    /// `POST` requests a reset email.
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    /// `POST` sets a new password with a reset token.
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
}

/// Account routes.
pub mod user {
    /// `GET`/`PUT` profile.
    pub const PROFILE: &str = "/user/profile";
    /// `GET`/`PUT` preferences.
    pub const PREFERENCES: &str = "/user/preferences";
    /// `POST` new experience entry.
    pub const EXPERIENCE: &str = "/user/experience";
    /// `POST` new education entry.
    pub const EDUCATION: &str = "/user/education";
    /// `POST` multipart avatar.
    pub const AVATAR: &str = "/user/avatar";
    /// `GET` statistics.
    pub const STATS: &str = "/user/stats";
    /// `DELETE` the account.
    pub const ACCOUNT: &str = "/user/account";
    /// `GET` data export.
    pub const EXPORT: &str = "/user/export";

    /// `PUT`/`DELETE` one experience entry.
    #[must_use]
    pub fn experience(id: &str) -> String {
        format!("{EXPERIENCE}/{id}")
    }

    /// `PUT`/`DELETE` one education entry.
    #[must_use]
    pub fn education(id: &str) -> String {
        format!("{EDUCATION}/{id}")
    }
}

/// Resume analysis routes.
pub mod analysis {
    /// `POST` multipart resume upload.
    pub const UPLOAD: &str = "/analysis/upload";
    /// `GET` paginated history.
    pub const HISTORY: &str = "/analysis/history";
    /// `GET` statistics.
    pub const STATS: &str = "/analysis/stats";
    /// `GET` skill suggestions.
    pub const SKILL_SUGGESTIONS: &str = "/analysis/skill-suggestions";

    /// `GET`/`DELETE` one analysis.
    #[must_use]
    pub fn by_id(id: &str) -> String {
        format!("/analysis/{id}")
    }

    /// `GET` export of one analysis.
    #[must_use]
    pub fn export(id: &str) -> String {
        format!("/analysis/{id}/export")
    }

    /// `POST` re-run of one analysis.
    #[must_use]
    pub fn reprocess(id: &str) -> String {
        format!("/analysis/{id}/reprocess")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterised_paths() {
        assert_eq!(user::experience("e1"), "/user/experience/e1");
        assert_eq!(user::education("d2"), "/user/education/d2");
        assert_eq!(analysis::by_id("a9"), "/analysis/a9");
        assert_eq!(analysis::export("a9"), "/analysis/a9/export");
        assert_eq!(analysis::reprocess("a9"), "/analysis/a9/reprocess");
    }
}
