use super::*;

// =============================================================================
// parse_auth_response
// =============================================================================

#[test]
fn auth_response_with_token_parses() {
    let body = r#"{"token":"t-1","userId":5,"email":"a@b.com","role":"ROLE_PATIENT","firstName":"A","lastName":"B"}"#;
    let grant = parse_auth_response(body).unwrap();
    assert_eq!(grant.token, "t-1");
    assert_eq!(grant.user.id, "5");
    assert_eq!(grant.user.role, "ROLE_PATIENT");
}

#[test]
fn auth_response_without_token_is_malformed() {
    let body = r#"{"userId":5,"email":"a@b.com","role":"ROLE_PATIENT"}"#;
    assert_eq!(
        parse_auth_response(body),
        Err(GatewayError::MalformedResponse("missing token".to_owned()))
    );
}

#[test]
fn auth_response_blank_or_null_token_is_malformed() {
    for body in [
        r#"{"token":"  ","userId":5,"email":"a@b.com"}"#,
        r#"{"token":null,"userId":5,"email":"a@b.com"}"#,
        r#"{"token":7,"userId":5,"email":"a@b.com"}"#,
    ] {
        assert!(matches!(parse_auth_response(body), Err(GatewayError::MalformedResponse(_))), "{body}");
    }
}

#[test]
fn auth_response_not_json_is_malformed() {
    assert!(matches!(parse_auth_response("<html>"), Err(GatewayError::MalformedResponse(_))));
}

#[test]
fn auth_response_missing_profile_fields_is_malformed() {
    assert!(matches!(
        parse_auth_response(r#"{"token":"t"}"#),
        Err(GatewayError::MalformedResponse(_))
    ));
}

// =============================================================================
// parse_profile_response / parse_otp_response
// =============================================================================

#[test]
fn profile_response_ignores_extra_token() {
    let body = r#"{"token":"t","id":3,"email":"d@b.com","role":"ROLE_DOCTOR"}"#;
    let profile = parse_profile_response(body).unwrap();
    assert_eq!(profile.id, "3");
}

#[test]
fn otp_success_returns_message() {
    assert_eq!(
        parse_otp_response(r#"{"success":true,"message":"OTP sent"}"#),
        Ok("OTP sent".to_owned())
    );
    assert_eq!(parse_otp_response(r#"{"success":true}"#), Ok("OK".to_owned()));
}

#[test]
fn otp_failure_is_rejected_with_server_message() {
    assert_eq!(
        parse_otp_response(r#"{"success":false,"message":"Invalid OTP"}"#),
        Err(GatewayError::Rejected("Invalid OTP".to_owned()))
    );
}

#[test]
fn otp_missing_success_is_malformed() {
    assert!(matches!(
        parse_otp_response(r#"{"message":"hi"}"#),
        Err(GatewayError::MalformedResponse(_))
    ));
}

// =============================================================================
// status_error / user_message
// =============================================================================

#[test]
fn status_error_lifts_json_message() {
    assert_eq!(
        status_error(400, r#"{"message":"Email already registered"}"#),
        GatewayError::Status { status: 400, message: Some("Email already registered".to_owned()) }
    );
    assert_eq!(
        status_error(500, r#"{"error":"Internal Server Error"}"#),
        GatewayError::Status { status: 500, message: Some("Internal Server Error".to_owned()) }
    );
}

#[test]
fn status_error_plain_text_and_html() {
    assert_eq!(
        status_error(401, "Bad credentials"),
        GatewayError::Status { status: 401, message: Some("Bad credentials".to_owned()) }
    );
    assert_eq!(
        status_error(502, "<html><body>Bad Gateway</body></html>"),
        GatewayError::Status { status: 502, message: None }
    );
    assert_eq!(status_error(404, ""), GatewayError::Status { status: 404, message: None });
}

#[test]
fn user_messages_cover_taxonomy() {
    assert!(GatewayError::Request("connect refused".into()).user_message().contains("Unable to reach"));
    assert_eq!(
        GatewayError::Status { status: 401, message: None }.user_message(),
        "Your credentials were not accepted."
    );
    assert_eq!(
        GatewayError::Status { status: 503, message: None }.user_message(),
        "Request failed with status 503."
    );
    assert_eq!(GatewayError::Rejected("Invalid OTP".into()).user_message(), "Invalid OTP");
    assert!(GatewayError::MalformedResponse("missing token".into()).user_message().contains("unexpected"));
}

#[test]
fn join_url_handles_slashes() {
    assert_eq!(join_url("http://h:1/", "/api/x"), "http://h:1/api/x");
    assert_eq!(join_url("http://h:1", "api/x"), "http://h:1/api/x");
    assert_eq!(join_url("", endpoints::SIGN_IN), "/api/auth/signin");
}
