//! Session lifecycle notifications.

/// Published on every authentication transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    /// Login, signup or a verified restore succeeded.
    LoggedIn,
    /// The user logged out.
    LoggedOut,
    /// The session ended on its own: inactivity, or a restored token the
    /// backend no longer accepts.
    Expired,
    /// The access token was exchanged for a new one.
    Refreshed,
}

impl SessionNotice {
    /// Returns true for notices that end the session.
    #[must_use]
    pub const fn ends_session(self) -> bool {
        matches!(self, Self::LoggedOut | Self::Expired)
    }
}
