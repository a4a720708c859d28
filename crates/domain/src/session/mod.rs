//! Session domain types

mod credentials;
mod state;
mod theme;

pub use credentials::{
    AuthPayload, ForgotPasswordRequest, LoginCredentials, MIN_PASSWORD_LEN, RefreshRequest,
    ResetPasswordRequest, SignupCredentials, SignupRequest, TokenPair,
};
pub use state::{DEFAULT_INACTIVITY_TIMEOUT, SessionState, is_session_active};
pub use theme::{AppliedTheme, Theme};
