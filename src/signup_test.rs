use std::sync::Arc;

use super::*;
use crate::gateway::GatewayError;
use crate::storage::MemoryStorage;
use crate::test_helpers::{MockGateway, VALID_OTP, grant, signup_request};

type TestStore = SessionStore<Arc<MemoryStorage>, MockGateway>;

fn store(gateway: MockGateway) -> TestStore {
    SessionStore::new(Arc::new(MemoryStorage::new()), gateway)
}

async fn at_verification(store: &TestStore, email: &str) -> SignupFlow {
    let mut flow = SignupFlow::new();
    flow.submit_details(store.gateway(), signup_request(email)).await.unwrap();
    flow
}

// =============================================================================
// submit_details
// =============================================================================

#[tokio::test]
async fn details_send_otp_and_advance() {
    let store = store(MockGateway::new());
    let flow = at_verification(&store, " A@B.com ").await;

    assert_eq!(flow.pending_email(), Some("a@b.com"));
    assert_eq!(flow.message(), Some("OTP sent to your email"));
    assert_eq!(store.gateway().calls(), vec!["send_otp:a@b.com".to_owned()]);
}

#[tokio::test]
async fn invalid_details_stay_on_first_step() {
    let store = store(MockGateway::new());
    let mut flow = SignupFlow::new();

    let mut short_password = signup_request("a@b.com");
    short_password.password = "123".to_owned();
    let err = flow.submit_details(store.gateway(), short_password).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidInput(_)));

    let mut no_name = signup_request("a@b.com");
    no_name.first_name = "   ".to_owned();
    assert!(flow.submit_details(store.gateway(), no_name).await.is_err());

    assert!(flow.submit_details(store.gateway(), signup_request("not-an-email")).await.is_err());

    assert_eq!(flow.step(), &SignupStep::AwaitingDetails);
    assert_eq!(flow.message(), Some("Enter a valid email address."));
    assert!(store.gateway().calls().is_empty());
}

#[tokio::test]
async fn details_twice_is_invalid_step() {
    let store = store(MockGateway::new());
    let mut flow = at_verification(&store, "a@b.com").await;
    let err = flow.submit_details(store.gateway(), signup_request("c@d.com")).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidStep));
    assert_eq!(flow.pending_email(), Some("a@b.com"));
}

// =============================================================================
// resend / edit
// =============================================================================

#[tokio::test]
async fn resend_keeps_form_data() {
    let store = store(MockGateway::new());
    let mut flow = at_verification(&store, "a@b.com").await;
    flow.resend_otp(store.gateway()).await.unwrap();

    assert_eq!(store.gateway().calls(), vec!["send_otp:a@b.com".to_owned(), "send_otp:a@b.com".to_owned()]);
    let SignupStep::AwaitingVerification { request } = flow.step() else {
        panic!("expected verification step");
    };
    assert_eq!(request.first_name, "Ada");
}

#[tokio::test]
async fn resend_before_details_is_invalid_step() {
    let store = store(MockGateway::new());
    let mut flow = SignupFlow::new();
    assert!(matches!(flow.resend_otp(store.gateway()).await, Err(SessionError::InvalidStep)));
}

#[tokio::test]
async fn edit_details_returns_entered_form() {
    let store = store(MockGateway::new());
    let mut flow = at_verification(&store, "a@b.com").await;
    let request = flow.edit_details().unwrap();
    assert_eq!(request.email, "a@b.com");
    assert_eq!(flow.step(), &SignupStep::AwaitingDetails);
    assert!(flow.edit_details().is_none());
}

// =============================================================================
// verify
// =============================================================================

#[tokio::test]
async fn wrong_code_stays_on_verification_without_creating_account() {
    let store = store(MockGateway::new());
    let mut flow = at_verification(&store, "a@b.com").await;

    let err = flow.verify(&store, "000000").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid or expired OTP");
    assert_eq!(flow.message(), Some("Invalid or expired OTP"));
    assert_eq!(flow.pending_email(), Some("a@b.com"));
    assert!(!store.gateway().calls().iter().any(|c| c.starts_with("sign_up")));
    assert!(store.snapshot().user.is_none());
}

#[tokio::test]
async fn malformed_code_never_reaches_gateway() {
    let store = store(MockGateway::new());
    let mut flow = at_verification(&store, "a@b.com").await;

    let err = flow.verify(&store, "12ab").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidInput(_)));
    assert_eq!(store.gateway().calls(), vec!["send_otp:a@b.com".to_owned()]);
}

#[tokio::test]
async fn correct_code_creates_account_and_redirects_to_dashboard() {
    let store = store(MockGateway::new());
    let mut flow = at_verification(&store, "a@b.com").await;

    assert!(flow.verify(&store, "000000").await.is_err());
    let user = flow.verify(&store, " 123 456 ").await.unwrap();

    assert_eq!(user.role, "ROLE_PATIENT");
    assert!(matches!(flow.step(), SignupStep::Complete { .. }));
    assert_eq!(flow.redirect_target(), Some("/patient/dashboard"));
    assert_eq!(flow.message(), None);
    assert!(store.snapshot().is_authenticated());
    assert_eq!(
        store.gateway().calls(),
        vec![
            "send_otp:a@b.com".to_owned(),
            "verify_otp:a@b.com:000000".to_owned(),
            format!("verify_otp:a@b.com:{VALID_OTP}"),
            "sign_up:a@b.com".to_owned(),
        ]
    );
}

#[tokio::test]
async fn failed_account_creation_keeps_verification_step() {
    let gateway = MockGateway::new().with_sign_up(Err(GatewayError::Status {
        status: 409,
        message: Some("Email already registered".to_owned()),
    }));
    let store = store(gateway);
    let mut flow = at_verification(&store, "a@b.com").await;

    let err = flow.verify(&store, VALID_OTP).await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
    assert_eq!(flow.pending_email(), Some("a@b.com"));
    assert_eq!(flow.redirect_target(), None);
    assert_eq!(store.snapshot().error.as_deref(), Some("Email already registered"));
}

#[tokio::test]
async fn doctor_signup_redirects_to_doctor_dashboard() {
    let store = store(MockGateway::new().with_sign_up(Ok(grant("tok-d", "d1", "ROLE_DOCTOR"))));
    let mut flow = at_verification(&store, "doc@clinic.org").await;
    flow.verify(&store, VALID_OTP).await.unwrap();
    assert_eq!(flow.redirect_target(), Some("/doctor/dashboard"));
    assert!(flow.edit_details().is_none());
    assert!(matches!(flow.step(), SignupStep::Complete { .. }));
}

#[tokio::test]
async fn verify_before_details_is_invalid_step() {
    let store = store(MockGateway::new());
    let mut flow = SignupFlow::new();
    assert!(matches!(flow.verify(&store, VALID_OTP).await, Err(SessionError::InvalidStep)));
}
