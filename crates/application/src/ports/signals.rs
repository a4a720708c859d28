//! Environment signal port
//!
//! Abstracts the host environment's activity, connectivity and
//! color-scheme notifications so session logic runs without a UI.

use tokio::sync::broadcast;

/// User interactions that count as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// Pointer pressed
    PointerDown,
    /// Pointer moved
    PointerMove,
    /// Key pressed
    KeyDown,
    /// Content scrolled
    Scroll,
    /// Touch started
    TouchStart,
    /// Element clicked
    Click,
}

/// A signal from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentEvent {
    /// The user interacted with the application.
    Activity(ActivityKind),
    /// Network connectivity was regained.
    Online,
    /// Network connectivity was lost.
    Offline,
    /// The environment's color-scheme preference changed.
    ColorSchemeChanged {
        /// Whether a dark scheme is now preferred
        prefers_dark: bool,
    },
}

/// Port for subscribing to environment signals.
///
/// Dropping the returned receiver unsubscribes.
pub trait EnvironmentSignals: Send + Sync {
    /// Subscribes to all future events.
    fn subscribe(&self) -> broadcast::Receiver<EnvironmentEvent>;

    /// Returns the current connectivity.
    fn is_online(&self) -> bool;

    /// Returns the current "prefers dark" preference.
    fn prefers_dark(&self) -> bool;
}
