//! Auth gateway: the seam between session operations and the REST backend.
//!
//! DESIGN
//! ======
//! `AuthGateway` is the only way the session core reaches the network, which
//! lets tests script backend behaviour with a mock. Response interpretation
//! lives in pure `parse_*` functions so every transport (reqwest natively,
//! gloo-net in the browser) applies the same contract, most importantly that
//! a sign-in without a token is a failure even on HTTP 200.
//!
//! The trait is `?Send`: the web client runs on a single-threaded event loop
//! whose fetch futures are not `Send`.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

#[cfg(feature = "http")]
pub mod http;

use serde::Deserialize;

use crate::types::{AuthGrant, Credentials, SignupRequest, UserProfile};

/// Backend paths, relative to the configured API base URL.
pub mod endpoints {
    pub const SIGN_IN: &str = "/api/auth/signin";
    pub const SIGN_UP: &str = "/api/auth/signup";
    pub const TEST_TOKEN: &str = "/api/auth/test-token";
    pub const SEND_SIGNUP_OTP: &str = "/api/auth/send-signup-otp";
    pub const VERIFY_SIGNUP_OTP: &str = "/api/auth/verify-signup-otp";
}

/// Longest plain-text error body surfaced verbatim to users.
const MAX_PLAIN_ERROR_LEN: usize = 200;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, message: Option<String> },

    /// The backend answered 2xx but the body broke the contract.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The backend explicitly refused (e.g. `success: false` on OTP calls).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// No transport exists in this build (e.g. the browser client rendered natively).
    #[error("gateway unavailable: {0}")]
    Unavailable(&'static str),
}

impl GatewayError {
    /// Message fit for showing to the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(_) => "Unable to reach the server. Check your connection and try again.".to_owned(),
            Self::Status { message: Some(message), .. } => message.clone(),
            Self::Status { status: 401 | 403, message: None } => "Your credentials were not accepted.".to_owned(),
            Self::Status { status, message: None } => format!("Request failed with status {status}."),
            Self::MalformedResponse(_) => "The server sent an unexpected response. Please try again later.".to_owned(),
            Self::Rejected(message) => message.clone(),
            Self::HttpClientBuild(_) | Self::Unavailable(_) => "Sign-in is not available right now.".to_owned(),
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Backend operations the session core depends on.
#[async_trait::async_trait(?Send)]
pub trait AuthGateway {
    /// Exchange credentials for a token and profile.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses, or a response without a token.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, GatewayError>;

    /// Create an account; same contract as [`AuthGateway::sign_in`].
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses, or a response without a token.
    async fn sign_up(&self, request: &SignupRequest) -> Result<AuthGrant, GatewayError>;

    /// Probe a token and return the profile it belongs to.
    ///
    /// # Errors
    ///
    /// Fails when the token is rejected or the backend is unreachable.
    async fn test_token(&self, token: &str) -> Result<UserProfile, GatewayError>;

    /// Ask the backend to email a sign-up OTP. Returns the server's message.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or when the backend reports `success: false`.
    async fn send_signup_otp(&self, email: &str) -> Result<String, GatewayError>;

    /// Check a sign-up OTP. Returns the server's message.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or when the code is rejected.
    async fn verify_signup_otp(&self, email: &str, code: &str) -> Result<String, GatewayError>;
}

// =============================================================================
// PARSING
// =============================================================================

/// Interpret a sign-in/sign-up body: a non-empty `token` plus profile fields.
///
/// # Errors
///
/// Returns [`GatewayError::MalformedResponse`] when the body is not JSON, the
/// token is missing or blank, or the profile fields do not parse.
pub fn parse_auth_response(body: &str) -> Result<AuthGrant, GatewayError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    let token = value
        .get("token")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GatewayError::MalformedResponse("missing token".to_owned()))?
        .to_owned();
    let user = UserProfile::deserialize(&value).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    Ok(AuthGrant { token, user })
}

/// Interpret a test-token body as a profile.
///
/// # Errors
///
/// Returns [`GatewayError::MalformedResponse`] when the profile does not parse.
pub fn parse_profile_response(body: &str) -> Result<UserProfile, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

#[derive(Deserialize)]
struct OtpResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Interpret an OTP send/verify body `{success, message}`.
///
/// # Errors
///
/// Returns [`GatewayError::Rejected`] for `success: false` and
/// [`GatewayError::MalformedResponse`] for anything unparseable.
pub fn parse_otp_response(body: &str) -> Result<String, GatewayError> {
    let parsed: OtpResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    let message = parsed.message.map(|m| m.trim().to_owned()).filter(|m| !m.is_empty());
    if parsed.success {
        Ok(message.unwrap_or_else(|| "OK".to_owned()))
    } else {
        Err(GatewayError::Rejected(
            message.unwrap_or_else(|| "The verification request was rejected.".to_owned()),
        ))
    }
}

/// Build a status error, lifting a human message out of the body when present.
#[must_use]
pub fn status_error(status: u16, body: &str) -> GatewayError {
    GatewayError::Status { status, message: error_message(body) }
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned);
    }
    if trimmed.len() <= MAX_PLAIN_ERROR_LEN && !trimmed.starts_with('<') {
        return Some(trimmed.to_owned());
    }
    None
}

/// Join a base URL and an endpoint path without doubling slashes.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
