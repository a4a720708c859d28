//! Resumatch Domain - Core types for the client/session layer
//!
//! This crate defines the data that flows between the API client, the
//! session manager and their collaborators. All types here are pure Rust
//! with no I/O dependencies.

pub mod analysis;
pub mod api_error;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod response;
pub mod routes;
pub mod session;
pub mod user;

pub use analysis::{
    Analysis, AnalysisExport, AnalysisStats, AnalysisStatus, ExportFormat, HistoryQuery,
    SkillSuggestion,
};
pub use api_error::ApiError;
pub use error::{DomainError, DomainResult};
pub use request::{
    FilePart, Headers, HttpBody, HttpMethod, HttpRequest, MultipartForm, QueryParams, RequestBody,
};
pub use response::{FieldErrors, PaginationMeta, RawResponse, ResponseEnvelope};
pub use routes::is_protected_route;
pub use session::{
    AppliedTheme, AuthPayload, LoginCredentials, SessionState, SignupCredentials, Theme, TokenPair,
    is_session_active,
};
pub use user::{
    AvatarUpload, Education, Experience, ExportLink, ProfileUpdate, User, UserPreferences,
    UserStats,
};
