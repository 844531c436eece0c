use super::*;
use medportal::UserProfile;

fn session_with(role: &str) -> Session {
    Session {
        token: Some("tok".to_owned()),
        user: Some(UserProfile {
            id: "u1".to_owned(),
            email: "u1@clinic.org".to_owned(),
            role: role.to_owned(),
            first_name: "Una".to_owned(),
            last_name: "One".to_owned(),
        }),
        loading: false,
        error: None,
    }
}

#[test]
fn current_path_joins_search() {
    assert_eq!(current_path("/doctor/dashboard", ""), "/doctor/dashboard");
    assert_eq!(current_path("/doctor/dashboard", "?tab=today"), "/doctor/dashboard?tab=today");
    assert_eq!(current_path("/doctor/dashboard", "tab=today"), "/doctor/dashboard?tab=today");
}

#[test]
fn home_waits_for_restore() {
    assert_eq!(home_target(&Session::pending()), None);
}

#[test]
fn home_sends_signed_out_visitors_to_sign_in() {
    assert_eq!(home_target(&Session::signed_out()), Some("/signin"));
}

#[test]
fn home_sends_users_to_their_dashboard() {
    assert_eq!(home_target(&session_with("ROLE_ADMIN")), Some("/admin/dashboard"));
    assert_eq!(home_target(&session_with("ROLE_PATIENT")), Some("/patient/dashboard"));
    assert_eq!(home_target(&session_with("ROLE_NURSE")), Some("/unauthorized"));
}

#[test]
fn signed_in_destination_prefers_preserved_path() {
    let session = session_with("ROLE_DOCTOR");
    assert_eq!(
        signed_in_destination(&session, Some("/doctor/patients/7")),
        Some("/doctor/patients/7".to_owned())
    );
    assert_eq!(signed_in_destination(&session, None), Some("/doctor/dashboard".to_owned()));
    assert_eq!(signed_in_destination(&session, Some("//evil.example")), Some("/doctor/dashboard".to_owned()));
}

#[test]
fn signed_in_destination_stays_put_when_unresolved() {
    assert_eq!(signed_in_destination(&Session::pending(), None), None);
    assert_eq!(signed_in_destination(&Session::signed_out(), Some("/admin")), None);
    assert_eq!(signed_in_destination(&session_with(""), None), None);
}
