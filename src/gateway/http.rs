//! Native REST gateway over `reqwest`.
//!
//! Thin HTTP wrapper: each call sends one request, reads the body as text and
//! hands it to the shared parsers in the parent module.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use super::{AuthGateway, GatewayError, endpoints, join_url, parse_auth_response, parse_otp_response};
use super::{parse_profile_response, status_error};
use crate::config::PortalConfig;
use crate::types::{AuthGrant, Credentials, SignupRequest, UserProfile};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway with the timeouts and base URL from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &PortalConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| GatewayError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String, GatewayError> {
        let request = self.http.post(join_url(&self.base_url, path)).json(body);
        Self::read_body(request).await
    }

    async fn read_body(request: reqwest::RequestBuilder) -> Result<String, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "auth backend returned error status");
            return Err(status_error(status.as_u16(), &text));
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyOtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[async_trait::async_trait(?Send)]
impl AuthGateway for HttpGateway {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, GatewayError> {
        let body = self.post_json(endpoints::SIGN_IN, credentials).await?;
        parse_auth_response(&body)
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<AuthGrant, GatewayError> {
        let body = self.post_json(endpoints::SIGN_UP, request).await?;
        parse_auth_response(&body)
    }

    async fn test_token(&self, token: &str) -> Result<UserProfile, GatewayError> {
        let request = self
            .http
            .get(join_url(&self.base_url, endpoints::TEST_TOKEN))
            .header(AUTHORIZATION, format!("Bearer {token}"));
        let body = Self::read_body(request).await?;
        parse_profile_response(&body)
    }

    async fn send_signup_otp(&self, email: &str) -> Result<String, GatewayError> {
        let body = self.post_json(endpoints::SEND_SIGNUP_OTP, &EmailBody { email }).await?;
        parse_otp_response(&body)
    }

    async fn verify_signup_otp(&self, email: &str, code: &str) -> Result<String, GatewayError> {
        let body = self
            .post_json(endpoints::VERIFY_SIGNUP_OTP, &VerifyOtpBody { email, otp: code })
            .await?;
        parse_otp_response(&body)
    }
}
