//! # Session Store
//!
//! In-memory record of who is logged in, backed by a persisted token.
//!
//! The store owns the session token: it writes it to [`TokenStorage`] and
//! to the [`TokenSlot`] the HTTP client reads, so every API call made after
//! `login` is authenticated and every call after `logout` is anonymous.
//!
//! Account actions (`login`, `register`, `fetch_user_info`, ...) mark the
//! store as loading for their duration and record a user-facing error
//! message on failure. That message stays until the next action clears it;
//! only [`SessionStore::set_error`] schedules an automatic clear.

use parking_lot::RwLock;
use shared::{ChangePasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User, UserUpdate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::storage::TokenStorage;
use crate::core::error::{ClientError, Result};
use crate::core::service::MarketApi;
use crate::services::http::TokenSlot;

/// How long an error message stays visible.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(3);

const LOGIN_FAILED: &str = "登录失败，请检查用户名和密码";
const REGISTER_FAILED: &str = "注册失败，请稍后再试";
const REGISTER_SUCCEEDED: &str = "注册成功";
const FETCH_USER_FAILED: &str = "获取用户信息失败";
const UPDATE_USER_FAILED: &str = "更新用户信息失败";
const CHANGE_PASSWORD_FAILED: &str = "更改密码失败";
const CHANGE_PASSWORD_SUCCEEDED: &str = "密码更改成功";
const FORGOT_PASSWORD_FAILED: &str = "发送邮件失败";
const FORGOT_PASSWORD_SUCCEEDED: &str = "重置密码邮件已发送";
const RESET_PASSWORD_FAILED: &str = "重置密码失败";
const RESET_PASSWORD_SUCCEEDED: &str = "密码重置成功";

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_logged_in: bool,
    pub is_admin: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Clears `loading` when the action finishes, however it finishes.
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.write().loading = false;
    }
}

/// Session store.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn MarketApi>,
    storage: Arc<dyn TokenStorage>,
    token_slot: TokenSlot,
    state: Arc<RwLock<SessionState>>,
    error_generation: Arc<AtomicU64>,
    error_ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("is_logged_in", &self.is_logged_in())
            .field("user", &self.state.read().user.as_ref().map(|u| u.username.clone()))
            .finish()
    }
}

impl SessionStore {
    /// Build the store and restore a persisted token, if any.
    ///
    /// A token that cannot be read is logged and ignored; the user simply
    /// starts logged out.
    pub fn new(api: Arc<dyn MarketApi>, storage: Arc<dyn TokenStorage>, token_slot: TokenSlot) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore session token");
                None
            }
        };

        token_slot.set(token.clone());
        let state = SessionState {
            is_logged_in: token.is_some(),
            token,
            ..SessionState::default()
        };

        Self {
            api,
            storage,
            token_slot,
            state: Arc::new(RwLock::new(state)),
            error_generation: Arc::new(AtomicU64::new(0)),
            error_ttl: ERROR_DISPLAY_DURATION,
        }
    }

    pub fn with_error_ttl(mut self, ttl: Duration) -> Self {
        self.error_ttl = ttl;
        self
    }

    // ---- getters ----

    pub fn user_info(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.read().is_logged_in
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().is_admin
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    // ---- synchronous actions ----

    /// Store the token in memory, on disk and on the HTTP client.
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.save(token) {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
        self.token_slot.set(Some(token.to_string()));

        let mut state = self.state.write();
        state.token = Some(token.to_string());
        state.is_logged_in = true;
    }

    /// Forget the token and the user everywhere.
    pub fn clear_token(&self) {
        if let Err(e) = self.storage.remove() {
            tracing::warn!(error = %e, "Failed to remove persisted session token");
        }
        self.token_slot.clear();

        let mut state = self.state.write();
        state.token = None;
        state.user = None;
        state.is_logged_in = false;
        state.is_admin = false;
    }

    pub fn set_user_info(&self, user: User) {
        let mut state = self.state.write();
        state.is_admin = user.is_admin();
        state.user = Some(user);
    }

    /// Show `message` until it expires or a newer error replaces it.
    pub fn set_error(&self, message: impl Into<String>) {
        let generation = self.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().error = Some(message.into());

        // Without a runtime the message stays until the next action clears it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let state = self.state.clone();
            let current = self.error_generation.clone();
            let ttl = self.error_ttl;
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                let mut state = state.write();
                if current.load(Ordering::SeqCst) == generation {
                    state.error = None;
                }
            });
        }
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    fn loading(&self) -> LoadingGuard<'_> {
        self.state.write().loading = true;
        LoadingGuard { state: &self.state }
    }

    /// Start an action: mark loading and drop the previous error.
    fn begin(&self) -> LoadingGuard<'_> {
        let guard = self.loading();
        self.clear_error();
        guard
    }

    /// Record the user-facing message for `err` and hand the error back.
    ///
    /// The message does not expire. Bumping the generation keeps an older
    /// `set_error` timer from wiping it.
    fn fail(&self, err: ClientError, fallback: &str) -> ClientError {
        let message = err.server_message().unwrap_or(fallback).to_string();
        tracing::warn!(error = %err, message = %message, "Session action failed");
        self.error_generation.fetch_add(1, Ordering::SeqCst);
        self.state.write().error = Some(message);
        err
    }

    // ---- async actions ----

    /// Log in and load the returned profile.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User> {
        let _loading = self.begin();
        match self.api.login(credentials).await {
            Ok(response) => {
                self.set_token(&response.token);
                self.set_user_info(response.user.clone());
                tracing::info!(user_id = %response.user.id, "Logged in");
                Ok(response.user)
            }
            Err(e) => Err(self.fail(e, LOGIN_FAILED)),
        }
    }

    /// Register an account. Returns the server's message.
    pub async fn register(&self, data: &RegisterRequest) -> Result<String> {
        let _loading = self.begin();
        match self.api.register(data).await {
            Ok(response) if response.message.is_empty() => Ok(REGISTER_SUCCEEDED.to_string()),
            Ok(response) => Ok(response.message),
            Err(e) => Err(self.fail(e, REGISTER_FAILED)),
        }
    }

    /// Tell the server, then clear the session regardless of the outcome.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Logout request failed; clearing local session anyway");
        }
        self.clear_token();
        tracing::info!("Logged out");
    }

    /// Reload the profile. Does nothing without a token; a 401 ends the session.
    ///
    /// Unlike the other actions this leaves an earlier error in place.
    pub async fn fetch_user_info(&self) -> Result<Option<User>> {
        if self.token().is_none() {
            return Ok(None);
        }

        let _loading = self.loading();
        match self.api.get_current_user().await {
            Ok(user) => {
                self.set_user_info(user.clone());
                Ok(Some(user))
            }
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::info!("Session token rejected, clearing session");
                    self.clear_token();
                }
                Err(self.fail(e, FETCH_USER_FAILED))
            }
        }
    }

    pub async fn update_user_info(&self, update: &UserUpdate) -> Result<User> {
        let _loading = self.begin();
        match self.api.update_user_info(update).await {
            Ok(user) => {
                self.set_user_info(user.clone());
                Ok(user)
            }
            Err(e) => Err(self.fail(e, UPDATE_USER_FAILED)),
        }
    }

    pub async fn change_password(&self, data: &ChangePasswordRequest) -> Result<String> {
        let _loading = self.begin();
        match self.api.change_password(data).await {
            Ok(_) => Ok(CHANGE_PASSWORD_SUCCEEDED.to_string()),
            Err(e) => Err(self.fail(e, CHANGE_PASSWORD_FAILED)),
        }
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let _loading = self.begin();
        match self.api.forgot_password(email).await {
            Ok(_) => Ok(FORGOT_PASSWORD_SUCCEEDED.to_string()),
            Err(e) => Err(self.fail(e, FORGOT_PASSWORD_FAILED)),
        }
    }

    pub async fn reset_password(&self, data: &ResetPasswordRequest) -> Result<String> {
        let _loading = self.begin();
        match self.api.reset_password(data).await {
            Ok(_) => Ok(RESET_PASSWORD_SUCCEEDED.to_string()),
            Err(e) => Err(self.fail(e, RESET_PASSWORD_FAILED)),
        }
    }

    /// Load the profile on startup when a token was restored but no user is known yet.
    pub async fn initialize_user(&self) -> Result<Option<User>> {
        let needs_fetch = {
            let state = self.state.read();
            state.token.is_some() && state.user.is_none()
        };
        if needs_fetch {
            self.fetch_user_info().await
        } else {
            Ok(self.user_info())
        }
    }
}

/// Global session instance (initialized once at startup).
static SESSION: OnceLock<SessionStore> = OnceLock::new();

/// Install the global session store.
///
/// # Errors
///
/// Returns an error if a session has already been installed.
pub fn init_session(store: SessionStore) -> Result<&'static SessionStore> {
    SESSION
        .set(store)
        .map_err(|_| ClientError::Config("Session has already been initialized".to_string()))?;
    Ok(session())
}

/// Get the global session store.
///
/// # Panics
///
/// Panics if [`init_session()`] has not been called yet.
pub fn session() -> &'static SessionStore {
    SESSION.get().expect("Session must be initialized with init_session() before use")
}
