//! Two-step sign-up: collect details and email an OTP, then verify the code
//! and create the account.
//!
//! DESIGN
//! ======
//! Steps are an explicit enum rather than a step counter. The details
//! collected in the first step travel inside `AwaitingVerification`, so
//! resending a code or retrying a wrong one never loses form data. Any
//! failure while verifying leaves the flow where it was.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use crate::gateway::AuthGateway;
use crate::role;
use crate::session::{SessionError, SessionStore};
use crate::storage::SessionStorage;
use crate::types::{SignupRequest, UserProfile};
use crate::validate;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupStep {
    AwaitingDetails,
    AwaitingVerification { request: SignupRequest },
    Complete { user: UserProfile },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupFlow {
    step: SignupStep,
    message: Option<String>,
}

impl Default for SignupFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupFlow {
    #[must_use]
    pub fn new() -> Self {
        Self { step: SignupStep::AwaitingDetails, message: None }
    }

    #[must_use]
    pub fn step(&self) -> &SignupStep {
        &self.step
    }

    /// Last message from the backend or from validation.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Email the code was sent to, while verifying.
    #[must_use]
    pub fn pending_email(&self) -> Option<&str> {
        match &self.step {
            SignupStep::AwaitingVerification { request } => Some(&request.email),
            _ => None,
        }
    }

    /// Validate the form and request an OTP for its email.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidStep`] outside the details step,
    /// [`SessionError::InvalidInput`] for a bad form, or the gateway error.
    /// The flow stays on the details step on any error.
    pub async fn submit_details<G: AuthGateway>(
        &mut self,
        gateway: &G,
        request: SignupRequest,
    ) -> Result<(), SessionError> {
        if self.step != SignupStep::AwaitingDetails {
            return Err(SessionError::InvalidStep);
        }
        let request = self.track(validate_request(request))?;
        let message = self.track(gateway.send_signup_otp(&request.email).await.map_err(SessionError::from))?;
        tracing::info!(email = %request.email, "sign-up OTP requested");
        self.message = Some(message);
        self.step = SignupStep::AwaitingVerification { request };
        Ok(())
    }

    /// Re-issue the OTP for the pending email, keeping the form data.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidStep`] outside the verification step,
    /// or the gateway error.
    pub async fn resend_otp<G: AuthGateway>(&mut self, gateway: &G) -> Result<(), SessionError> {
        let email = self.pending_email().ok_or(SessionError::InvalidStep)?.to_owned();
        let message = self.track(gateway.send_signup_otp(&email).await.map_err(SessionError::from))?;
        tracing::info!(%email, "sign-up OTP re-sent");
        self.message = Some(message);
        Ok(())
    }

    /// Check the code, then create the account and activate its session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidStep`] outside the verification step,
    /// [`SessionError::InvalidInput`] for a code that is not six digits, or
    /// the gateway/storage error. The flow stays on verification on any error.
    pub async fn verify<S, G>(&mut self, store: &SessionStore<S, G>, code: &str) -> Result<UserProfile, SessionError>
    where
        S: SessionStorage,
        G: AuthGateway,
    {
        let SignupStep::AwaitingVerification { request } = &self.step else {
            return Err(SessionError::InvalidStep);
        };
        let request = request.clone();
        let code = self.track(
            validate::normalize_otp(code).ok_or(SessionError::InvalidInput("Enter the 6-digit code from your email.")),
        )?;
        self.track(
            store
                .gateway()
                .verify_signup_otp(&request.email, &code)
                .await
                .map_err(SessionError::from),
        )?;
        let user = self.track(store.signup(&request).await)?;
        self.message = None;
        self.step = SignupStep::Complete { user: user.clone() };
        Ok(user)
    }

    /// Go back to the details form, returning what was entered for prefill.
    pub fn edit_details(&mut self) -> Option<SignupRequest> {
        let previous = std::mem::replace(&mut self.step, SignupStep::AwaitingDetails);
        self.message = None;
        match previous {
            SignupStep::AwaitingVerification { request } => Some(request),
            SignupStep::Complete { user } => {
                self.step = SignupStep::Complete { user };
                None
            }
            SignupStep::AwaitingDetails => None,
        }
    }

    /// Dashboard to land on once the account exists.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&'static str> {
        match &self.step {
            SignupStep::Complete { user } => Some(role::dashboard_path(Some(&user.role))),
            _ => None,
        }
    }

    fn track<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(e) = &result {
            self.message = Some(e.user_message());
        }
        result
    }
}

fn validate_request(request: SignupRequest) -> Result<SignupRequest, SessionError> {
    let first_name = request.first_name.trim().to_owned();
    let last_name = request.last_name.trim().to_owned();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(SessionError::InvalidInput("Enter your first and last name."));
    }
    let email =
        validate::normalize_email(&request.email).ok_or(SessionError::InvalidInput("Enter a valid email address."))?;
    if !validate::password_acceptable(&request.password) {
        return Err(SessionError::InvalidInput("Password must be at least 6 characters."));
    }
    Ok(SignupRequest { first_name, last_name, email, password: request.password })
}
