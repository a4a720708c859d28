//! Session Manager
//!
//! Owns the authenticated-user state, persists it through the key-value
//! port and enforces inactivity expiry.

mod manager;
mod monitor;
mod notice;
mod tokens;

pub use manager::{SessionManager, keys};
pub use monitor::MonitorHandle;
pub use notice::SessionNotice;
pub use tokens::SessionTokens;
