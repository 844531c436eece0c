//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthContext` is provided once by `App` and read by the route guard and
//! every page. The `SessionStore` is the single writer; the `RwSignal` is a
//! reactive mirror that `sync` refreshes after each store operation, so
//! components re-render on login, logout and revalidation.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use medportal::{
    AuthGateway, Credentials, Revalidation, Session, SessionError, SessionStorage, SessionStore, SignupFlow,
    UserProfile,
};

use crate::net::api::ApiGateway;
use crate::util::storage::BrowserStorage;

pub struct AuthContext<S = BrowserStorage, G = ApiGateway> {
    store: SessionStore<S, G>,
    session: RwSignal<Session>,
}

impl<S, G> Clone for AuthContext<S, G> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), session: self.session }
    }
}

impl<S, G> AuthContext<S, G>
where
    S: SessionStorage,
    G: AuthGateway,
{
    pub fn new(store: SessionStore<S, G>) -> Self {
        let session = RwSignal::new(store.snapshot());
        Self { store, session }
    }

    pub fn store(&self) -> &SessionStore<S, G> {
        &self.store
    }

    /// Reactive read handle for the current session.
    pub fn session(&self) -> ReadSignal<Session> {
        self.session.read_only()
    }

    /// Copy the store's snapshot into the signal.
    pub fn sync(&self) {
        self.session.set(self.store.snapshot());
    }

    /// Restore the cached session and end loading.
    pub fn restore(&self) -> Option<Revalidation> {
        let ticket = self.store.restore();
        self.sync();
        ticket
    }

    /// Background token check; failures leave the session as it was.
    pub async fn revalidate(&self, ticket: Revalidation) {
        if self.store.revalidate(ticket).await {
            log::debug!("session revalidated");
        }
        self.sync();
    }

    /// # Errors
    ///
    /// Propagates the store's login error; the signal carries its message.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, SessionError> {
        let result = self.store.login(credentials).await;
        self.sync();
        result
    }

    /// Finish sign-up with the emailed code. The signal is synced even when
    /// the caller has gone away, since the store may now hold a new account.
    ///
    /// # Errors
    ///
    /// Propagates the flow's error; the flow keeps its message.
    pub async fn verify_signup(&self, flow: &mut SignupFlow, code: &str) -> Result<UserProfile, SessionError> {
        let result = flow.verify(&self.store, code).await;
        self.sync();
        result
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.logout() {
            log::warn!("failed to clear cached session: {e}");
        }
        self.sync();
    }

    pub fn clear_error(&self) {
        self.store.clear_error();
        self.sync();
    }
}
