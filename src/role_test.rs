use super::*;

// =============================================================================
// Role::parse
// =============================================================================

#[test]
fn parse_accepts_prefixed_and_bare_names() {
    assert_eq!(Role::parse("ROLE_PATIENT"), Some(Role::Patient));
    assert_eq!(Role::parse("DOCTOR"), Some(Role::Doctor));
    assert_eq!(Role::parse("  role_admin "), Some(Role::Admin));
}

#[test]
fn parse_rejects_unknown_and_empty() {
    assert_eq!(Role::parse(""), None);
    assert_eq!(Role::parse("ROLE_"), None);
    assert_eq!(Role::parse("ROLE_NURSE"), None);
    assert_eq!(Role::parse("ADMINISTRATOR"), None);
}

#[test]
fn as_str_round_trips_through_parse() {
    for role in Role::ALL {
        assert_eq!(Role::parse(role.as_str()), Some(role));
        assert_eq!(role.to_string(), role.as_str());
    }
}

// =============================================================================
// RoleFlags
// =============================================================================

#[test]
fn flags_set_exactly_one_for_known_role() {
    let flags = RoleFlags::from_role(Some("ROLE_DOCTOR"));
    assert!(flags.is_doctor);
    assert!(!flags.is_admin);
    assert!(!flags.is_patient);
    assert!(flags.has(Role::Doctor));
    assert!(!flags.has(Role::Admin));
}

#[test]
fn flags_empty_for_missing_or_unknown_role() {
    assert_eq!(RoleFlags::from_role(None), RoleFlags::default());
    assert_eq!(RoleFlags::from_role(Some("ROLE_JANITOR")), RoleFlags::default());
}

// =============================================================================
// Redirect targets
// =============================================================================

#[test]
fn dashboard_path_per_role() {
    assert_eq!(dashboard_path(Some("ROLE_PATIENT")), "/patient/dashboard");
    assert_eq!(dashboard_path(Some("ROLE_DOCTOR")), "/doctor/dashboard");
    assert_eq!(dashboard_path(Some("ROLE_ADMIN")), "/admin/dashboard");
}

#[test]
fn dashboard_path_unknown_role_goes_to_sign_in() {
    assert_eq!(dashboard_path(None), SIGN_IN_PATH);
    assert_eq!(dashboard_path(Some("")), SIGN_IN_PATH);
    assert_eq!(dashboard_path(Some("ROLE_SUPERUSER")), SIGN_IN_PATH);
}

#[test]
fn required_role_matches_whole_first_segment() {
    assert_eq!(required_role_for("/admin"), Some(Role::Admin));
    assert_eq!(required_role_for("/admin/users"), Some(Role::Admin));
    assert_eq!(required_role_for("/doctor/schedule?day=mon"), Some(Role::Doctor));
    assert_eq!(required_role_for("/patient/dashboard"), Some(Role::Patient));
    assert_eq!(required_role_for("/administrator"), None);
    assert_eq!(required_role_for("/signin"), None);
    assert_eq!(required_role_for("/"), None);
}

#[test]
fn post_login_redirect_prefers_preserved_path() {
    assert_eq!(
        post_login_redirect(Some("/patient/appointments?id=3"), Some("ROLE_PATIENT")),
        "/patient/appointments?id=3"
    );
}

#[test]
fn post_login_redirect_ignores_auth_pages_and_foreign_urls() {
    assert_eq!(post_login_redirect(Some("/signin"), Some("ROLE_ADMIN")), "/admin/dashboard");
    assert_eq!(post_login_redirect(Some("/signup?x=1"), Some("ROLE_ADMIN")), "/admin/dashboard");
    assert_eq!(post_login_redirect(Some("/"), Some("ROLE_DOCTOR")), "/doctor/dashboard");
    assert_eq!(post_login_redirect(Some("//evil.example"), Some("ROLE_DOCTOR")), "/doctor/dashboard");
    assert_eq!(post_login_redirect(Some("https://evil.example"), Some("ROLE_DOCTOR")), "/doctor/dashboard");
    assert_eq!(post_login_redirect(Some("   "), Some("ROLE_PATIENT")), "/patient/dashboard");
}

#[test]
fn post_login_redirect_without_role_goes_to_sign_in() {
    assert_eq!(post_login_redirect(None, None), SIGN_IN_PATH);
}
