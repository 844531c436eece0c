//! Scripted gateway and fixtures for unit tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::gateway::{AuthGateway, GatewayError};
use crate::types::{AuthGrant, Credentials, SignupRequest, UserProfile};

pub(crate) const VALID_OTP: &str = "123456";

pub(crate) fn profile(id: &str, role: &str) -> UserProfile {
    UserProfile {
        id: id.to_owned(),
        email: format!("{id}@clinic.org"),
        role: role.to_owned(),
        first_name: "Test".to_owned(),
        last_name: id.to_owned(),
    }
}

pub(crate) fn grant(token: &str, id: &str, role: &str) -> AuthGrant {
    AuthGrant { token: token.to_owned(), user: profile(id, role) }
}

pub(crate) fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: email.to_owned(),
        password: "secret1".to_owned(),
    }
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Gateway whose answers are set per test.
pub(crate) struct MockGateway {
    pub sign_in: Mutex<Result<AuthGrant, GatewayError>>,
    pub sign_up: Mutex<Result<AuthGrant, GatewayError>>,
    pub test_token: Mutex<Result<UserProfile, GatewayError>>,
    /// When set, `test_token` waits for a notification before answering.
    pub test_token_gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self {
            sign_in: Mutex::new(Ok(grant("tok-login", "p1", "ROLE_PATIENT"))),
            sign_up: Mutex::new(Ok(grant("tok-signup", "p2", "ROLE_PATIENT"))),
            test_token: Mutex::new(Ok(profile("p1", "ROLE_PATIENT"))),
            test_token_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_sign_in(self, result: Result<AuthGrant, GatewayError>) -> Self {
        *locked(&self.sign_in) = result;
        self
    }

    pub(crate) fn with_sign_up(self, result: Result<AuthGrant, GatewayError>) -> Self {
        *locked(&self.sign_up) = result;
        self
    }

    pub(crate) fn with_test_token(self, result: Result<UserProfile, GatewayError>) -> Self {
        *locked(&self.test_token) = result;
        self
    }

    pub(crate) fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.test_token_gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        locked(&self.calls).clone()
    }

    fn record(&self, call: String) {
        locked(&self.calls).push(call);
    }
}

#[async_trait::async_trait(?Send)]
impl AuthGateway for MockGateway {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthGrant, GatewayError> {
        self.record(format!("sign_in:{}", credentials.email));
        locked(&self.sign_in).clone()
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<AuthGrant, GatewayError> {
        self.record(format!("sign_up:{}", request.email));
        locked(&self.sign_up).clone()
    }

    async fn test_token(&self, token: &str) -> Result<UserProfile, GatewayError> {
        self.record(format!("test_token:{token}"));
        if let Some(gate) = &self.test_token_gate {
            gate.notified().await;
        }
        locked(&self.test_token).clone()
    }

    async fn send_signup_otp(&self, email: &str) -> Result<String, GatewayError> {
        self.record(format!("send_otp:{email}"));
        Ok("OTP sent to your email".to_owned())
    }

    async fn verify_signup_otp(&self, email: &str, code: &str) -> Result<String, GatewayError> {
        self.record(format!("verify_otp:{email}:{code}"));
        if code == VALID_OTP {
            Ok("Email verified".to_owned())
        } else {
            Err(GatewayError::Rejected("Invalid or expired OTP".to_owned()))
        }
    }
}
