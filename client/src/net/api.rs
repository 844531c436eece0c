//! Browser REST gateway over `gloo-net`.
//!
//! Client-side (csr): real `fetch` calls. Responses are interpreted by the
//! same `medportal::gateway` parsers the native gateway uses, so a 200 without
//! a token fails here exactly as it does in the CLI.
//! Native builds: every call fails with `GatewayError::Unavailable`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use medportal::gateway::{AuthGateway, GatewayError, join_url};
#[cfg(feature = "csr")]
use medportal::gateway::{endpoints, parse_auth_response, parse_otp_response, parse_profile_response};
use medportal::{AuthGrant, Credentials, SignupRequest, UserProfile};

/// Gateway rooted at `base_url`; an empty base means same-origin.
#[derive(Clone, Debug, Default)]
pub struct ApiGateway {
    base_url: String,
}

impl ApiGateway {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim().trim_end_matches('/').to_owned() }
    }

    /// Absolute (or same-origin) URL for an endpoint path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[cfg(any(test, feature = "csr"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(feature = "csr")]
mod fetch {
    use gloo_net::http::Request;
    use medportal::gateway::{GatewayError, status_error};
    use serde::Serialize;

    pub(super) fn post_json<T: Serialize + ?Sized>(url: &str, body: &T) -> Result<Request, GatewayError> {
        Request::post(url).json(body).map_err(|e| GatewayError::Request(e.to_string()))
    }

    pub(super) async fn read_body(request: Request) -> Result<String, GatewayError> {
        let response = request.send().await.map_err(|e| GatewayError::Request(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| GatewayError::Request(e.to_string()))?;
        if !response.ok() {
            log::debug!("auth backend returned {status}");
            return Err(status_error(status, &text));
        }
        Ok(text)
    }
}

#[cfg(feature = "csr")]
#[derive(serde::Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[cfg(feature = "csr")]
#[derive(serde::Serialize)]
struct VerifyOtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl AuthGateway for ApiGateway {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, GatewayError> {
        let request = fetch::post_json(&self.endpoint(endpoints::SIGN_IN), credentials)?;
        parse_auth_response(&fetch::read_body(request).await?)
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<AuthGrant, GatewayError> {
        let request = fetch::post_json(&self.endpoint(endpoints::SIGN_UP), request)?;
        parse_auth_response(&fetch::read_body(request).await?)
    }

    async fn test_token(&self, token: &str) -> Result<UserProfile, GatewayError> {
        let request = gloo_net::http::Request::get(&self.endpoint(endpoints::TEST_TOKEN))
            .header("Authorization", &bearer(token))
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;
        parse_profile_response(&fetch::read_body(request).await?)
    }

    async fn send_signup_otp(&self, email: &str) -> Result<String, GatewayError> {
        let url = self.endpoint(endpoints::SEND_SIGNUP_OTP);
        let request = fetch::post_json(&url, &EmailBody { email })?;
        parse_otp_response(&fetch::read_body(request).await?)
    }

    async fn verify_signup_otp(&self, email: &str, code: &str) -> Result<String, GatewayError> {
        let url = self.endpoint(endpoints::VERIFY_SIGNUP_OTP);
        let request = fetch::post_json(&url, &VerifyOtpBody { email, otp: code })?;
        parse_otp_response(&fetch::read_body(request).await?)
    }
}

#[cfg(not(feature = "csr"))]
const UNAVAILABLE: GatewayError = GatewayError::Unavailable("the web gateway only runs in the browser");

#[cfg(not(feature = "csr"))]
#[async_trait::async_trait(?Send)]
impl AuthGateway for ApiGateway {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<AuthGrant, GatewayError> {
        Err(UNAVAILABLE)
    }

    async fn sign_up(&self, _request: &SignupRequest) -> Result<AuthGrant, GatewayError> {
        Err(UNAVAILABLE)
    }

    async fn test_token(&self, _token: &str) -> Result<UserProfile, GatewayError> {
        Err(UNAVAILABLE)
    }

    async fn send_signup_otp(&self, _email: &str) -> Result<String, GatewayError> {
        Err(UNAVAILABLE)
    }

    async fn verify_signup_otp(&self, _email: &str, _code: &str) -> Result<String, GatewayError> {
        Err(UNAVAILABLE)
    }
}
