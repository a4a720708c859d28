//! In-memory token slots shared between the session manager and the client.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::TokenSource;

#[derive(Default)]
struct Slots {
    access: Option<String>,
    refresh: Option<String>,
}

/// Holds the current access and refresh tokens.
///
/// Cloning shares the slots. Everyone can read the access token through
/// [`TokenSource`]; only the session manager writes.
#[derive(Clone, Default)]
pub struct SessionTokens {
    slots: Arc<RwLock<Slots>>,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens").finish_non_exhaustive()
    }
}

impl SessionTokens {
    /// Creates empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn access(&self) -> Option<String> {
        self.slots.read().await.access.clone()
    }

    pub(crate) async fn refresh(&self) -> Option<String> {
        self.slots.read().await.refresh.clone()
    }

    pub(crate) async fn replace(&self, access: String, refresh: Option<String>) {
        let mut slots = self.slots.write().await;
        slots.access = Some(access);
        slots.refresh = refresh;
    }

    /// Swaps the access token; keeps the refresh token when `refresh` is `None`.
    pub(crate) async fn rotate(&self, access: String, refresh: Option<String>) {
        let mut slots = self.slots.write().await;
        slots.access = Some(access);
        if refresh.is_some() {
            slots.refresh = refresh;
        }
    }

    pub(crate) async fn clear(&self) {
        *self.slots.write().await = Slots::default();
    }
}

#[async_trait]
impl TokenSource for SessionTokens {
    async fn access_token(&self) -> Option<String> {
        self.access().await
    }
}
