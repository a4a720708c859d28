//! Wall-clock port

use chrono::{DateTime, Utc};

/// Source of the timestamps stored as session activity.
///
/// The inactivity deadline itself runs on tokio time; only recorded
/// timestamps and `is_session_active` go through this port.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
