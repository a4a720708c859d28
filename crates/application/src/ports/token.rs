//! Access-token lookup port

use async_trait::async_trait;

/// Supplies the bearer token attached to authenticated requests.
///
/// The API client only reads through this port; the session manager is
/// the sole writer of the underlying token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns the current access token, if one is held.
    async fn access_token(&self) -> Option<String>;
}

/// A token source that never has a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

#[async_trait]
impl TokenSource for Anonymous {
    async fn access_token(&self) -> Option<String> {
        None
    }
}
