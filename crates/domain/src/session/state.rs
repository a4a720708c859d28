//! Client-side session state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppliedTheme, Theme};
use crate::user::{User, UserPreferences};

/// Inactivity window after which an authenticated session is ended.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Returns true while `now - last_activity` is strictly below `max_inactive`.
///
/// A gap of exactly `max_inactive` counts as expired. A `last_activity` in
/// the future counts as active.
#[must_use]
pub fn is_session_active(
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
    max_inactive: Duration,
) -> bool {
    let elapsed = now.signed_duration_since(last_activity);
    match elapsed.to_std() {
        Ok(elapsed) => elapsed < max_inactive,
        Err(_) => true,
    }
}

/// Snapshot of the authenticated-user state.
///
/// Collaborators always receive copies; the session manager owns the
/// original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Set once persisted state has been restored at startup
    pub is_initialized: bool,
    /// Whether a token and user are held
    pub is_authenticated: bool,
    /// The logged-in user
    pub current_user: Option<User>,
    /// The user's stored preferences
    pub preferences: Option<UserPreferences>,
    /// Theme preference
    pub theme: Theme,
    /// Concrete scheme after resolving `theme`
    pub applied_theme: AppliedTheme,
    /// Latest connectivity signal
    pub is_online: bool,
    /// Last qualifying user interaction
    pub last_activity: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            is_initialized: false,
            is_authenticated: false,
            current_user: None,
            preferences: None,
            theme: Theme::System,
            applied_theme: AppliedTheme::default(),
            is_online: true,
            last_activity: None,
        }
    }
}

impl SessionState {
    /// Returns true if activity was recorded within `max_inactive` of `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>, max_inactive: Duration) -> bool {
        self.last_activity
            .is_some_and(|last| is_session_active(last, now, max_inactive))
    }

    /// Resets every field to the unauthenticated shape, keeping only
    /// initialization and connectivity.
    pub fn clear(&mut self, prefers_dark: bool) {
        *self = Self {
            is_initialized: self.is_initialized,
            is_online: self.is_online,
            applied_theme: Theme::System.resolve(prefers_dark),
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(minutes_ago: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        now - TimeDelta::minutes(minutes_ago)
    }

    #[test]
    fn active_within_window() {
        let now = Utc::now();
        assert!(is_session_active(at(29, now), now, DEFAULT_INACTIVITY_TIMEOUT));
        assert!(is_session_active(now, now, DEFAULT_INACTIVITY_TIMEOUT));
    }

    #[test]
    fn exactly_at_window_is_expired() {
        let now = Utc::now();
        assert!(!is_session_active(at(30, now), now, DEFAULT_INACTIVITY_TIMEOUT));
    }

    #[test]
    fn one_millisecond_before_window_is_active() {
        let now = Utc::now();
        let last = now - TimeDelta::minutes(30) + TimeDelta::milliseconds(1);
        assert!(is_session_active(last, now, DEFAULT_INACTIVITY_TIMEOUT));
    }

    #[test]
    fn beyond_window_is_expired() {
        let now = Utc::now();
        assert!(!is_session_active(at(45, now), now, DEFAULT_INACTIVITY_TIMEOUT));
    }

    #[test]
    fn future_activity_counts_as_active() {
        let now = Utc::now();
        let later = now + TimeDelta::seconds(5);
        assert!(is_session_active(later, now, DEFAULT_INACTIVITY_TIMEOUT));
    }

    #[test]
    fn state_without_activity_is_inactive() {
        let state = SessionState::default();
        assert!(!state.is_active_at(Utc::now(), DEFAULT_INACTIVITY_TIMEOUT));
    }

    #[test]
    fn clear_keeps_connectivity_and_reverts_theme() {
        let mut state = SessionState {
            is_initialized: true,
            is_authenticated: true,
            theme: Theme::Dark,
            applied_theme: AppliedTheme::Dark,
            is_online: false,
            last_activity: Some(Utc::now()),
            ..SessionState::default()
        };

        state.clear(false);

        assert!(state.is_initialized);
        assert!(!state.is_authenticated);
        assert!(!state.is_online);
        assert_eq!(state.theme, Theme::System);
        assert_eq!(state.applied_theme, AppliedTheme::Light);
        assert!(state.last_activity.is_none());
    }
}
