//! Route guard: decides what a navigation attempt renders.
//!
//! SYSTEM CONTEXT
//! ==============
//! Called on every render of a protected route with the latest session
//! snapshot. Decisions are never cached, so a login or logout is reflected
//! on the next render.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::role::{Role, SIGN_IN_PATH, UNAUTHORIZED_PATH};
use crate::session::Session;

/// Query parameter carrying the originally requested path to sign-in.
pub const REDIRECT_PARAM: &str = "redirect";

/// Outcome of one guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Restore has not finished; render a pending state, never redirect.
    Loading,
    /// No user; go to sign-in, remembering where the user wanted to go.
    Unauthenticated { redirect: String },
    /// Signed in without the required role.
    Unauthorized { redirect: String },
    /// Render the requested content.
    Allowed,
}

impl GuardDecision {
    /// Navigation target, if this decision redirects.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated { redirect } | Self::Unauthorized { redirect } => Some(redirect),
            Self::Loading | Self::Allowed => None,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Short state name for logs and CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Unauthenticated { .. } => "UNAUTHENTICATED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Allowed => "ALLOWED",
        }
    }
}

/// Evaluate access to `requested_path` for the given session.
#[must_use]
pub fn evaluate(session: &Session, required: Option<Role>, requested_path: &str) -> GuardDecision {
    if session.loading {
        return GuardDecision::Loading;
    }
    if session.user.is_none() {
        return GuardDecision::Unauthenticated { redirect: sign_in_redirect(requested_path) };
    }
    match required {
        Some(role) if !session.role_flags().has(role) => {
            GuardDecision::Unauthorized { redirect: UNAUTHORIZED_PATH.to_owned() }
        }
        _ => GuardDecision::Allowed,
    }
}

/// `/signin?redirect=<path>`; plain `/signin` when there is nothing worth
/// coming back to.
#[must_use]
pub fn sign_in_redirect(requested_path: &str) -> String {
    let path = requested_path.trim();
    let route = path.split(['?', '#']).next().unwrap_or(path).trim_end_matches('/');
    if route.is_empty() || route == SIGN_IN_PATH {
        return SIGN_IN_PATH.to_owned();
    }
    format!("{SIGN_IN_PATH}?{REDIRECT_PARAM}={}", encode_query_value(path))
}

/// Percent-encode everything outside RFC 3986 unreserved characters and `/`.
#[must_use]
pub fn encode_query_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
