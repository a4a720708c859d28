//! Typed wrappers over [`ApiClient`](crate::client::ApiClient), one per
//! backend resource.

mod analysis;
mod auth;
mod user;

pub use analysis::{AnalysisApi, ResumeUpload};
pub use auth::AuthApi;
pub use user::UserApi;
