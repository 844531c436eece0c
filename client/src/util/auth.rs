//! Shared auth navigation helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components apply identical redirect behavior: the guard, the home
//! route and the auth pages all navigate through `install_redirect`, and the
//! targets come from the pure functions below.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use medportal::Session;
use medportal::role::{self, SIGN_IN_PATH, UNAUTHORIZED_PATH};

/// Navigate (replacing history) whenever `target` yields a destination.
pub fn install_redirect<T, F>(target: T, navigate: F)
where
    T: Fn() -> Option<String> + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(path) = target() {
            navigate(&path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Path plus query string as the router reports them.
pub fn current_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}

/// Where `/` sends a visitor once the session has resolved.
pub fn home_target(session: &Session) -> Option<&'static str> {
    if session.loading {
        return None;
    }
    match &session.user {
        None => Some(SIGN_IN_PATH),
        Some(user) => Some(user.role().map_or(UNAUTHORIZED_PATH, |r| r.dashboard_path())),
    }
}

/// Where an already signed-in visitor of the sign-in or sign-up page goes.
///
/// `None` while loading, when signed out, or when the role is unknown (the
/// dashboard lookup would send them straight back to sign-in).
pub fn signed_in_destination(session: &Session, redirect: Option<&str>) -> Option<String> {
    if session.loading {
        return None;
    }
    let user = session.user.as_ref()?;
    user.role()?;
    Some(role::post_login_redirect(redirect, Some(&user.role)))
}
