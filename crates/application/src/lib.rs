//! Resumatch Application - API client, session manager and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, storage, tokens, clock, environment signals)
//! - The request pipeline: builder, timeout-raced dispatch, normalizer
//! - Typed resource APIs over the client
//! - The session manager and its inactivity monitor
//! - Retry with linear backoff

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod ports;
pub mod retry;
pub mod session;

#[cfg(test)]
mod test_support;

pub use api::{AnalysisApi, AuthApi, ResumeUpload, UserApi};
pub use client::{ApiClient, ProgressCallback, RequestOptions, UploadProgress};
pub use config::{ClientConfig, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use retry::{RetryPolicy, retry, retry_if};
pub use session::{MonitorHandle, SessionManager, SessionNotice, SessionTokens};
