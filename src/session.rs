//! Session store: the single writer of client-side auth state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and pages read `Session` snapshots; only the methods here
//! change them. Persistence goes through `SessionStorage`, network through
//! `AuthGateway`.
//!
//! LIFECYCLE
//! =========
//! A store starts `loading`. `restore` reads the two cached entries
//! synchronously and always ends loading, so the UI unblocks before any
//! network round trip. It hands back a `Revalidation` ticket which the caller
//! drives in the background.
//!
//! TRADE-OFFS
//! ==========
//! Failed revalidation keeps the cached session alive (optimistic session):
//! a transient backend outage must not log everybody out. The cost is that a
//! revoked token stays usable in the UI until an explicit call fails.
//!
//! Every login, signup, logout, restore and profile edit bumps an epoch.
//! Revalidation results carry the epoch they started under and are dropped
//! if it moved, so a slow probe can never resurrect or overwrite a newer
//! session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::gateway::{AuthGateway, GatewayError};
use crate::role::RoleFlags;
use crate::storage::{SessionStorage, StorageError};
use crate::types::{AuthGrant, Credentials, SignupRequest, UserProfile};
use crate::validate;

/// Storage key for the JSON-encoded token.
pub const TOKEN_KEY: &str = "medportal.token";
/// Storage key for the JSON-encoded profile.
pub const USER_KEY: &str = "medportal.user";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("cached session is corrupt: {0}")]
    CorruptCache(String),
    #[error("no active session")]
    NotAuthenticated,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("operation not allowed in the current sign-up step")]
    InvalidStep,
    #[error("session changed while the request was in flight")]
    Superseded,
}

impl SessionError {
    /// Normalized message for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(e) => e.user_message(),
            Self::Storage(_) | Self::CorruptCache(_) => "Your session could not be saved on this device.".to_owned(),
            Self::NotAuthenticated => "Please sign in to continue.".to_owned(),
            Self::InvalidInput(message) => (*message).to_owned(),
            Self::InvalidStep => "Please start the sign-up again.".to_owned(),
            Self::Superseded => "Your session changed. Please try again.".to_owned(),
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Snapshot of the current auth state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    /// True until the first synchronous restore completes.
    pub loading: bool,
    /// Last normalized failure message from login/signup.
    pub error: Option<String>,
}

impl Session {
    /// Fresh state at process start: empty and still loading.
    #[must_use]
    pub fn pending() -> Self {
        Self { token: None, user: None, loading: true, error: None }
    }

    /// Empty, resolved state.
    #[must_use]
    pub fn signed_out() -> Self {
        Self { loading: false, ..Self::pending() }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Role flags for the current user, recomputed on each call.
    #[must_use]
    pub fn role_flags(&self) -> RoleFlags {
        RoleFlags::from_role(self.user.as_ref().map(|u| u.role.as_str()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::pending()
    }
}

/// Background token check handed out by [`SessionStore::restore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revalidation {
    token: String,
    epoch: u64,
}

struct Inner {
    session: Session,
    epoch: u64,
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the session. Cheap to clone; clones share state.
pub struct SessionStore<S, G> {
    inner: Arc<Mutex<Inner>>,
    storage: Arc<S>,
    gateway: Arc<G>,
}

impl<S, G> Clone for SessionStore<S, G> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner), storage: Arc::clone(&self.storage), gateway: Arc::clone(&self.gateway) }
    }
}

impl<S, G> SessionStore<S, G>
where
    S: SessionStorage,
    G: AuthGateway,
{
    #[must_use]
    pub fn new(storage: S, gateway: G) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { session: Session::pending(), epoch: 0 })),
            storage: Arc::new(storage),
            gateway: Arc::new(gateway),
        }
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // restore / revalidate
    // -------------------------------------------------------------------------

    /// Load the cached session and end the loading phase.
    ///
    /// Returns a ticket to revalidate the restored token, or `None` when
    /// nothing usable was cached (in which case the cache is wiped).
    pub fn restore(&self) -> Option<Revalidation> {
        let mut inner = self.lock();
        inner.epoch += 1;
        match read_cached(&*self.storage) {
            Ok(Some(AuthGrant { token, user })) => {
                tracing::info!(user_id = %user.id, role = %user.role, "restored cached session");
                inner.session = Session { token: Some(token.clone()), user: Some(user), loading: false, error: None };
                Some(Revalidation { token, epoch: inner.epoch })
            }
            Ok(None) => {
                tracing::debug!("no cached session");
                self.wipe_storage();
                inner.session = Session::signed_out();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "resetting corrupt cached session");
                self.wipe_storage();
                inner.session = Session::signed_out();
                None
            }
        }
    }

    /// Re-check a restored token against the backend.
    ///
    /// Returns `true` only when a fresh profile was applied. A rejected or
    /// unreachable probe leaves the session as it was; a probe that finished
    /// after a newer login, signup, logout, restore or profile edit is
    /// ignored.
    pub async fn revalidate(&self, ticket: Revalidation) -> bool {
        match self.gateway.test_token(&ticket.token).await {
            Ok(user) => match self.apply_profile(&ticket, user) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "revalidated profile not applied");
                    false
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "token revalidation failed; keeping cached session");
                false
            }
        }
    }

    /// Restore, then revalidate in the same task. Returns the final snapshot.
    pub async fn restore_and_revalidate(&self) -> Session {
        if let Some(ticket) = self.restore() {
            self.revalidate(ticket).await;
        }
        self.snapshot()
    }

    /// Manually re-fetch the profile for the current token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] without a token, or the
    /// gateway error. The session is never cleared by a failed refresh.
    pub async fn refresh(&self) -> Result<UserProfile, SessionError> {
        let ticket = {
            let inner = self.lock();
            let token = inner.session.token.clone().ok_or(SessionError::NotAuthenticated)?;
            Revalidation { token, epoch: inner.epoch }
        };
        let user = self.gateway.test_token(&ticket.token).await.map_err(|e| {
            tracing::warn!(error = %e, "manual session refresh failed");
            SessionError::from(e)
        })?;
        self.apply_profile(&ticket, user.clone())?;
        Ok(user)
    }

    fn apply_profile(&self, ticket: &Revalidation, user: UserProfile) -> Result<(), SessionError> {
        let mut inner = self.lock();
        if inner.epoch != ticket.epoch || inner.session.token.as_deref() != Some(ticket.token.as_str()) {
            return Err(SessionError::Superseded);
        }
        self.storage.set(USER_KEY, &serde_json::to_string(&user).map_err(StorageError::from)?)?;
        tracing::debug!(user_id = %user.id, "session profile revalidated");
        inner.session.user = Some(user);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // login / signup / logout
    // -------------------------------------------------------------------------

    /// Sign in and, on success, persist and activate the new session.
    ///
    /// # Errors
    ///
    /// Returns the validation, gateway or storage error. `error` on the
    /// session carries its normalized message; token and user are untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, SessionError> {
        let credentials = match validate_credentials(credentials) {
            Ok(c) => c,
            Err(e) => return Err(self.record_failure(e)),
        };
        let result = self.gateway.sign_in(&credentials).await;
        self.complete_auth("login", result)
    }

    /// Create an account and activate its session. Callers are expected to
    /// have verified the email OTP first (see `SignupFlow`).
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionStore::login`].
    pub async fn signup(&self, request: &SignupRequest) -> Result<UserProfile, SessionError> {
        let result = self.gateway.sign_up(request).await;
        self.complete_auth("signup", result)
    }

    fn complete_auth(
        &self,
        operation: &'static str,
        result: Result<AuthGrant, GatewayError>,
    ) -> Result<UserProfile, SessionError> {
        let grant = match result {
            Ok(grant) => grant,
            Err(e) => {
                tracing::warn!(operation, error = %e, "authentication failed");
                return Err(self.record_failure(e.into()));
            }
        };

        let mut inner = self.lock();
        if let Err(e) = self.persist_over(&inner.session, &grant) {
            tracing::error!(operation, error = %e, "failed to persist session");
            let e = SessionError::from(e);
            inner.session.error = Some(e.user_message());
            return Err(e);
        }
        inner.epoch += 1;
        tracing::info!(operation, user_id = %grant.user.id, role = %grant.user.role, "session established");
        let user = grant.user.clone();
        inner.session = Session { token: Some(grant.token), user: Some(grant.user), loading: false, error: None };
        Ok(user)
    }

    fn record_failure(&self, error: SessionError) -> SessionError {
        self.lock().session.error = Some(error.user_message());
        error
    }

    /// Sign out locally. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cached entries could not be removed;
    /// the in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), SessionError> {
        tracing::info!("signing out");
        self.clear_session()
    }

    /// Drop the in-memory session and both cached entries.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cached entries could not be removed;
    /// the in-memory session is cleared regardless.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.session = Session::signed_out();
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    /// Replace the cached profile after a profile edit. The token is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] without an active session,
    /// or a storage error.
    pub fn update_user(&self, user: UserProfile) -> Result<(), SessionError> {
        let mut inner = self.lock();
        if inner.session.token.is_none() {
            return Err(SessionError::NotAuthenticated);
        }
        self.storage.set(USER_KEY, &serde_json::to_string(&user).map_err(StorageError::from)?)?;
        inner.epoch += 1;
        inner.session.user = Some(user);
        Ok(())
    }

    /// Forget the last login/signup error message.
    pub fn clear_error(&self) {
        self.lock().session.error = None;
    }

    /// Write `grant` over the cached entries of `prior`. A failed profile
    /// write puts the token entry back, so the cache never mixes two accounts.
    fn persist_over(&self, prior: &Session, grant: &AuthGrant) -> Result<(), StorageError> {
        let token = serde_json::to_string(&grant.token)?;
        let user = serde_json::to_string(&grant.user)?;
        self.storage.set(TOKEN_KEY, &token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user) {
            self.roll_back_token(prior);
            return Err(e);
        }
        Ok(())
    }

    fn roll_back_token(&self, prior: &Session) {
        let Some(token) = prior.token.as_deref().filter(|_| prior.user.is_some()) else {
            self.wipe_storage();
            return;
        };
        let restored = serde_json::to_string(token)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(TOKEN_KEY, &raw));
        if let Err(e) = restored {
            tracing::warn!(error = %e, "failed to restore previous cached token");
            self.wipe_storage();
        }
    }

    fn wipe_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove cached session entry");
            }
        }
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<Credentials, SessionError> {
    let email = validate::normalize_email(&credentials.email)
        .ok_or(SessionError::InvalidInput("Enter a valid email address."))?;
    if credentials.password.is_empty() {
        return Err(SessionError::InvalidInput("Enter your password."));
    }
    Ok(Credentials { email, password: credentials.password.clone() })
}

/// Read both cached entries. `Ok(None)` when either is absent.
fn read_cached<S: SessionStorage + ?Sized>(storage: &S) -> Result<Option<AuthGrant>, SessionError> {
    let (Some(raw_token), Some(raw_user)) = (storage.get(TOKEN_KEY)?, storage.get(USER_KEY)?) else {
        return Ok(None);
    };
    let token: String =
        serde_json::from_str(&raw_token).map_err(|e| SessionError::CorruptCache(format!("token: {e}")))?;
    if token.trim().is_empty() {
        return Err(SessionError::CorruptCache("token: empty".to_owned()));
    }
    let user: UserProfile =
        serde_json::from_str(&raw_user).map_err(|e| SessionError::CorruptCache(format!("user: {e}")))?;
    Ok(Some(AuthGrant { token, user }))
}
