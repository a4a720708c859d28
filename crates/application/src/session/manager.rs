//! Session state, persistence and authentication transitions.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, broadcast, watch};
use tracing::{debug, info, warn};

use resumatch_domain::{
    ApiError, AuthPayload, LoginCredentials, ResponseEnvelope, SessionState, SignupCredentials,
    Theme, TokenPair, User, UserPreferences,
};

use super::notice::SessionNotice;
use super::tokens::SessionTokens;
use crate::api::{AuthApi, UserApi};
use crate::client::{ApiClient, INVALID_RESPONSE_FORMAT};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::ports::{Clock, EnvironmentEvent, EnvironmentSignals, KeyValueStore, StorageError};

/// Storage keys owned by the session manager.
pub mod keys {
    /// Access token
    pub const TOKEN: &str = "authToken";
    /// Refresh token
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// JSON-encoded user record
    pub const USER: &str = "user";
    /// Every key, cleared together
    pub const ALL: [&str; 3] = [TOKEN, REFRESH_TOKEN, USER];
}

/// Session keys paired with the values they held before a write.
type StoredKeys = Vec<(&'static str, Option<String>)>;

const SIGNUP_INVALID: &str = "Please correct the highlighted fields";
const NOTICE_CAPACITY: usize = 16;

struct Inner {
    auth: AuthApi,
    users: UserApi,
    tokens: SessionTokens,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    signals: Arc<dyn EnvironmentSignals>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    notices: broadcast::Sender<SessionNotice>,
    activity: Notify,
    monitor_running: AtomicBool,
    refresh_lock: Mutex<()>,
}

/// Sole owner of [`SessionState`] and the persisted session keys.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.inner.state.borrow())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a manager in the initial unauthenticated state.
    ///
    /// `tokens` must be the same slots the client reads its bearer token
    /// from.
    #[must_use]
    pub fn new(
        client: ApiClient,
        tokens: SessionTokens,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        signals: Arc<dyn EnvironmentSignals>,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                auth: AuthApi::new(client.clone()),
                users: UserApi::new(client),
                tokens,
                store,
                clock,
                signals,
                config,
                state,
                notices,
                activity: Notify::new(),
                monitor_running: AtomicBool::new(false),
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Returns a receiver for lifecycle notices.
    #[must_use]
    pub fn notices(&self) -> broadcast::Receiver<SessionNotice> {
        self.inner.notices.subscribe()
    }

    /// Returns true while a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    /// Restores a persisted session and marks the state initialized.
    ///
    /// A restored token is checked against the profile route when
    /// `verify_on_restore` is set: a 401 ends the session, any other
    /// failure keeps it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the store cannot be read.
    pub async fn initialize(&self) -> SessionResult<SessionState> {
        let store = &self.inner.store;
        let token = store.get(keys::TOKEN).await?.filter(|t| !t.is_empty());
        let refresh = store.get(keys::REFRESH_TOKEN).await?;
        let user = store.get(keys::USER).await?;

        let online = self.inner.signals.is_online();
        let prefers_dark = self.inner.signals.prefers_dark();
        self.inner.state.send_modify(|s| {
            s.is_online = online;
            s.applied_theme = s.theme.resolve(prefers_dark);
        });

        let restored = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => Some((token, user)),
                Err(error) => {
                    warn!(%error, "stored user record is unreadable, clearing session");
                    self.clear_storage().await;
                    None
                }
            },
            (None, None) => None,
            _ => {
                warn!("incomplete session in storage, clearing");
                self.clear_storage().await;
                None
            }
        };

        if let Some((token, user)) = restored {
            info!(user_id = %user.id, "session restored");
            self.inner.tokens.replace(token, refresh).await;
            let now = self.inner.clock.now();
            self.inner.state.send_modify(|s| {
                s.is_authenticated = true;
                s.current_user = Some(user);
                s.last_activity = Some(now);
            });
            if self.inner.config.verify_on_restore {
                self.verify_restored().await;
            }
            if self.is_authenticated() {
                self.inner.activity.notify_one();
                let _ = self.inner.notices.send(SessionNotice::LoggedIn);
            }
        }

        self.inner.state.send_modify(|s| s.is_initialized = true);
        Ok(self.snapshot())
    }

    async fn verify_restored(&self) {
        match self.inner.auth.profile().await {
            Ok(envelope) => {
                if let Some(user) = envelope.data {
                    self.save_user(&user).await;
                    self.inner.state.send_modify(|s| s.current_user = Some(user));
                }
            }
            Err(error) if error.is_unauthorized() => {
                info!("restored token was rejected");
                self.end_session(SessionNotice::Expired).await;
            }
            Err(error) => warn!(%error, "could not verify restored session, keeping it"),
        }
    }

    /// Authenticates with email and password.
    ///
    /// Failures come back as `{success: false}` envelopes carrying the
    /// backend message and field errors; state is then unchanged.
    pub async fn login(&self, credentials: &LoginCredentials) -> ResponseEnvelope<User> {
        let result = self.inner.auth.login(credentials).await;
        self.complete_auth(result, "login").await
    }

    /// Creates an account and logs in.
    ///
    /// The form is validated locally first; invalid forms never reach the
    /// network.
    pub async fn signup(&self, credentials: &SignupCredentials) -> ResponseEnvelope<User> {
        if let Err(errors) = credentials.validate() {
            return ResponseEnvelope::failure(SIGNUP_INVALID).with_errors(errors);
        }
        let result = self.inner.auth.signup(credentials).await;
        self.complete_auth(result, "signup").await
    }

    async fn complete_auth(
        &self,
        result: Result<ResponseEnvelope<AuthPayload>, ApiError>,
        action: &'static str,
    ) -> ResponseEnvelope<User> {
        let mut envelope = match result {
            Ok(envelope) => envelope,
            Err(error) => {
                info!(action, status = error.status_code(), "authentication failed");
                return failure_from(&error);
            }
        };
        if !envelope.success {
            info!(action, "authentication rejected");
            return envelope.without_data();
        }
        let Some(payload) = envelope.data.take() else {
            warn!(action, "authentication response carried no payload");
            return ResponseEnvelope::failure(INVALID_RESPONSE_FORMAT);
        };

        match self.establish(payload).await {
            Ok(user) => {
                info!(action, user_id = %user.id, "authenticated");
                ResponseEnvelope {
                    data: Some(user),
                    ..envelope.without_data()
                }
            }
            Err(error) => {
                warn!(action, %error, "could not persist session");
                ResponseEnvelope::failure(format!("Could not save session: {error}"))
            }
        }
    }

    async fn establish(&self, payload: AuthPayload) -> Result<User, StorageError> {
        let AuthPayload {
            user,
            token,
            refresh_token,
        } = payload;

        let previous = self.read_keys(&keys::ALL).await?;
        if let Err(error) = self.persist(&token, refresh_token.as_deref(), &user).await {
            self.restore_keys(previous).await;
            return Err(error);
        }

        self.inner.tokens.replace(token, refresh_token).await;
        let now = self.inner.clock.now();
        let current = user.clone();
        self.inner.state.send_modify(|s| {
            s.is_authenticated = true;
            s.current_user = Some(current);
            s.last_activity = Some(now);
        });
        self.inner.activity.notify_one();
        let _ = self.inner.notices.send(SessionNotice::LoggedIn);
        Ok(user)
    }

    async fn persist(
        &self,
        token: &str,
        refresh_token: Option<&str>,
        user: &User,
    ) -> Result<(), StorageError> {
        let user = serde_json::to_string(user)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let store = &self.inner.store;
        store.set(keys::TOKEN, token).await?;
        match refresh_token {
            Some(refresh) => store.set(keys::REFRESH_TOKEN, refresh).await?,
            None => store.remove(keys::REFRESH_TOKEN).await?,
        }
        store.set(keys::USER, &user).await
    }

    async fn read_keys(&self, names: &[&'static str]) -> Result<StoredKeys, StorageError> {
        let mut saved = Vec::with_capacity(names.len());
        for &key in names {
            saved.push((key, self.inner.store.get(key).await?));
        }
        Ok(saved)
    }

    /// Puts back values captured by `read_keys`, skipping keys that still
    /// hold them.
    async fn restore_keys(&self, saved: StoredKeys) {
        let store = &self.inner.store;
        for (key, value) in saved {
            match store.get(key).await {
                Ok(current) if current == value => continue,
                Ok(_) => {}
                Err(error) => warn!(key, %error, "failed to read session key for rollback"),
            }
            let restored = match value.as_deref() {
                Some(value) => store.set(key, value).await,
                None => store.remove(key).await,
            };
            if let Err(error) = restored {
                warn!(key, %error, "failed to roll back session key");
            }
        }
    }

    async fn save_user(&self, user: &User) {
        let saved = match serde_json::to_string(user) {
            Ok(json) => self.inner.store.set(keys::USER, &json).await,
            Err(e) => Err(StorageError::Serialization(e.to_string())),
        };
        if let Err(error) = saved {
            warn!(%error, "failed to persist user record");
        }
    }

    /// Logs out. The backend is notified best-effort; local state always
    /// clears.
    pub async fn logout(&self) {
        self.notify_backend_logout().await;
        self.end_session(SessionNotice::LoggedOut).await;
        info!("logged out");
    }

    /// Ends the session because of inactivity.
    pub(crate) async fn expire(&self) {
        info!("session expired");
        self.notify_backend_logout().await;
        self.end_session(SessionNotice::Expired).await;
    }

    async fn notify_backend_logout(&self) {
        if self.inner.tokens.access().await.is_none() {
            return;
        }
        if let Err(error) = self.inner.auth.logout().await {
            warn!(%error, "logout notification failed");
        }
    }

    async fn end_session(&self, notice: SessionNotice) {
        self.inner.tokens.clear().await;
        self.clear_storage().await;
        let prefers_dark = self.inner.signals.prefers_dark();
        self.inner.state.send_modify(|s| s.clear(prefers_dark));
        let _ = self.inner.notices.send(notice);
    }

    async fn clear_storage(&self) {
        for key in keys::ALL {
            if let Err(error) = self.inner.store.remove(key).await {
                warn!(key, %error, "failed to remove session key");
            }
        }
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Only the token fields change; the user record is untouched. On
    /// failure the session stays as it was.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoRefreshToken`] without a network call when no
    /// refresh token is held, otherwise the backend or storage failure.
    pub async fn refresh_token(&self) -> SessionResult<()> {
        let Some(refresh) = self.inner.tokens.refresh().await else {
            return Err(SessionError::NoRefreshToken);
        };

        let envelope = self
            .inner
            .auth
            .refresh(&refresh)
            .await
            .inspect_err(|error| warn!(%error, "token refresh failed"))?;

        let Some(TokenPair {
            token,
            refresh_token,
        }) = envelope.data
        else {
            let reason = envelope
                .message
                .unwrap_or_else(|| INVALID_RESPONSE_FORMAT.to_string());
            warn!(%reason, "token refresh rejected");
            return Err(SessionError::Rejected(reason));
        };

        let previous = self.read_keys(&[keys::TOKEN, keys::REFRESH_TOKEN]).await?;
        if let Err(error) = self.store_tokens(&token, refresh_token.as_deref()).await {
            warn!(%error, "could not persist refreshed token");
            self.restore_keys(previous).await;
            return Err(error.into());
        }
        self.inner.tokens.rotate(token, refresh_token).await;
        let _ = self.inner.notices.send(SessionNotice::Refreshed);
        debug!("access token refreshed");
        Ok(())
    }

    async fn store_tokens(&self, token: &str, refresh: Option<&str>) -> Result<(), StorageError> {
        self.inner.store.set(keys::TOKEN, token).await?;
        if let Some(refresh) = refresh {
            self.inner.store.set(keys::REFRESH_TOKEN, refresh).await?;
        }
        Ok(())
    }

    /// Runs an authenticated call, refreshing the token once on a 401.
    ///
    /// An expired session is ended before `op` runs. If the refresh fails
    /// the original 401 is returned.
    ///
    /// # Errors
    ///
    /// [`ApiError::SessionExpired`] for an inactive session, otherwise
    /// whatever `op` returns.
    pub async fn with_auth_retry<T, F, Fut>(&self, op: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.ensure_active().await?;

        let used = self.inner.tokens.access().await;
        let result = match op().await {
            Err(error) if error.is_unauthorized() && used.is_some() => {
                if self.refresh_after(used.as_deref()).await {
                    op().await
                } else {
                    Err(error)
                }
            }
            other => other,
        };

        if result.is_ok() && self.is_authenticated() {
            self.record_activity();
        }
        result
    }

    /// Refreshes unless another caller already replaced `stale`.
    async fn refresh_after(&self, stale: Option<&str>) -> bool {
        let _guard = self.inner.refresh_lock.lock().await;
        let current = self.inner.tokens.access().await;
        if current.is_some() && current.as_deref() != stale {
            return true;
        }
        match self.refresh_token().await {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "refresh did not recover the call");
                false
            }
        }
    }

    /// Ends an authenticated session whose inactivity window has passed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SessionExpired`] if the session was ended.
    pub async fn ensure_active(&self) -> Result<(), ApiError> {
        let now = self.inner.clock.now();
        let expired = {
            let state = self.inner.state.borrow();
            state.is_authenticated && !state.is_active_at(now, self.inner.config.inactivity_timeout)
        };
        if expired {
            self.expire().await;
            return Err(ApiError::SessionExpired);
        }
        Ok(())
    }

    /// Records a user interaction and restarts the inactivity countdown.
    pub fn record_activity(&self) {
        let now = self.inner.clock.now();
        self.inner.state.send_modify(|s| s.last_activity = Some(now));
        self.inner.activity.notify_one();
    }

    /// Returns true if activity was recorded within the last
    /// `max_inactive_minutes`.
    #[must_use]
    pub fn is_session_active(&self, max_inactive_minutes: u64) -> bool {
        let window = Duration::from_secs(max_inactive_minutes.saturating_mul(60));
        self.inner
            .state
            .borrow()
            .is_active_at(self.inner.clock.now(), window)
    }

    /// Updates connectivity. Authentication is unaffected.
    pub fn set_online(&self, online: bool) {
        let changed = self.inner.state.send_if_modified(|s| {
            let changed = s.is_online != online;
            s.is_online = online;
            changed
        });
        if changed {
            info!(online, "connectivity changed");
        }
    }

    /// Sets the theme preference and applies it.
    pub fn set_theme(&self, theme: Theme) {
        let applied = theme.resolve(self.inner.signals.prefers_dark());
        self.inner.state.send_modify(|s| {
            s.theme = theme;
            s.applied_theme = applied;
            if let Some(preferences) = s.preferences.as_mut() {
                preferences.theme = theme;
            }
        });
    }

    /// Re-resolves the applied theme while following the system scheme.
    pub fn on_color_scheme_change(&self, prefers_dark: bool) {
        self.inner.state.send_if_modified(|s| {
            if !s.theme.follows_system() {
                return false;
            }
            let applied = s.theme.resolve(prefers_dark);
            let changed = s.applied_theme != applied;
            s.applied_theme = applied;
            changed
        });
    }

    /// Applies one environment signal.
    pub fn handle_event(&self, event: EnvironmentEvent) {
        match event {
            EnvironmentEvent::Activity(_) => self.record_activity(),
            EnvironmentEvent::Online => self.set_online(true),
            EnvironmentEvent::Offline => self.set_online(false),
            EnvironmentEvent::ColorSchemeChanged { prefers_dark } => {
                self.on_color_scheme_change(prefers_dark);
            }
        }
    }

    /// Fetches the stored preferences and applies their theme.
    ///
    /// # Errors
    ///
    /// Returns the backend failure, or [`SessionError::Rejected`] if the
    /// backend declined.
    pub async fn load_preferences(&self) -> SessionResult<UserPreferences> {
        let users = &self.inner.users;
        let envelope = self.with_auth_retry(move || users.preferences()).await?;
        self.accept_preferences(envelope)
    }

    /// Saves preferences on the backend and applies them locally.
    ///
    /// # Errors
    ///
    /// Returns the backend failure, or [`SessionError::Rejected`] if the
    /// backend declined.
    pub async fn update_preferences(
        &self,
        preferences: &UserPreferences,
    ) -> SessionResult<UserPreferences> {
        let users = &self.inner.users;
        let envelope = self
            .with_auth_retry(move || users.update_preferences(preferences))
            .await?;
        self.accept_preferences(envelope)
    }

    fn accept_preferences(
        &self,
        envelope: ResponseEnvelope<UserPreferences>,
    ) -> SessionResult<UserPreferences> {
        let Some(preferences) = envelope.data else {
            return Err(SessionError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| INVALID_RESPONSE_FORMAT.to_string()),
            ));
        };
        let applied = preferences.theme.resolve(self.inner.signals.prefers_dark());
        let stored = preferences.clone();
        self.inner.state.send_modify(|s| {
            s.theme = stored.theme;
            s.applied_theme = applied;
            s.preferences = Some(stored);
        });
        Ok(preferences)
    }

    pub(super) fn activity(&self) -> &Notify {
        &self.inner.activity
    }

    pub(super) fn monitor_flag(&self) -> &AtomicBool {
        &self.inner.monitor_running
    }

    pub(super) fn signals(&self) -> &dyn EnvironmentSignals {
        self.inner.signals.as_ref()
    }

    pub(super) fn inactivity_timeout(&self) -> Duration {
        self.inner.config.inactivity_timeout
    }
}

fn failure_from(error: &ApiError) -> ResponseEnvelope<User> {
    let envelope = ResponseEnvelope::failure(error.to_string());
    match error.field_errors() {
        Some(errors) => envelope.with_errors(errors.clone()),
        None => envelope,
    }
}
