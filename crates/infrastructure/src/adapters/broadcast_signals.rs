//! Environment signal source for hosts without a UI event loop.
//!
//! The embedding application forwards its input, connectivity and
//! color-scheme events through [`BroadcastSignals::emit`].

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tracing::trace;

use resumatch_application::ports::{EnvironmentEvent, EnvironmentSignals};

const DEFAULT_CAPACITY: usize = 64;

/// Fans environment events out to every subscriber.
#[derive(Debug)]
pub struct BroadcastSignals {
    sender: broadcast::Sender<EnvironmentEvent>,
    online: AtomicBool,
    prefers_dark: AtomicBool,
}

impl Default for BroadcastSignals {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl BroadcastSignals {
    /// Creates a source with the given initial connectivity and scheme.
    #[must_use]
    pub fn new(online: bool, prefers_dark: bool) -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            sender,
            online: AtomicBool::new(online),
            prefers_dark: AtomicBool::new(prefers_dark),
        }
    }

    /// Records and publishes one event.
    ///
    /// Connectivity and color-scheme events also update the values returned
    /// by [`EnvironmentSignals::is_online`] and
    /// [`EnvironmentSignals::prefers_dark`].
    pub fn emit(&self, event: EnvironmentEvent) {
        match event {
            EnvironmentEvent::Online => self.online.store(true, Ordering::Release),
            EnvironmentEvent::Offline => self.online.store(false, Ordering::Release),
            EnvironmentEvent::ColorSchemeChanged { prefers_dark } => {
                self.prefers_dark.store(prefers_dark, Ordering::Release);
            }
            EnvironmentEvent::Activity(_) => {}
        }
        // No subscribers is not an error.
        if self.sender.send(event).is_err() {
            trace!(?event, "environment event dropped without subscribers");
        }
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EnvironmentSignals for BroadcastSignals {
    fn subscribe(&self) -> broadcast::Receiver<EnvironmentEvent> {
        self.sender.subscribe()
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resumatch_application::ports::ActivityKind;

    #[tokio::test]
    async fn events_reach_subscribers_and_update_flags() {
        let signals = BroadcastSignals::default();
        let mut events = signals.subscribe();

        signals.emit(EnvironmentEvent::Offline);
        signals.emit(EnvironmentEvent::ColorSchemeChanged { prefers_dark: true });
        signals.emit(EnvironmentEvent::Activity(ActivityKind::Scroll));

        assert!(!signals.is_online());
        assert!(signals.prefers_dark());
        assert_eq!(events.recv().await.unwrap(), EnvironmentEvent::Offline);
        assert_eq!(
            events.recv().await.unwrap(),
            EnvironmentEvent::ColorSchemeChanged { prefers_dark: true }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            EnvironmentEvent::Activity(ActivityKind::Scroll)
        );
    }

    #[test]
    fn dropping_the_receiver_unsubscribes() {
        let signals = BroadcastSignals::default();
        let events = signals.subscribe();
        assert_eq!(signals.subscriber_count(), 1);
        drop(events);
        assert_eq!(signals.subscriber_count(), 0);
        signals.emit(EnvironmentEvent::Online);
        assert!(signals.is_online());
    }
}
