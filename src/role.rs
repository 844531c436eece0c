//! Role resolver: role flags and redirect targets derived from a role string.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page that needs to know "where does this user belong" asks this
//! module. Nothing here is stored; flags are recomputed from the profile's
//! role string on each call so they cannot go stale.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::fmt;

/// Sign-in page, also the landing target for unknown roles.
pub const SIGN_IN_PATH: &str = "/signin";
/// Sign-up page.
pub const SIGN_UP_PATH: &str = "/signup";
/// Shown when a signed-in user lacks the role a route requires.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Portal roles known to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Patient, Self::Doctor, Self::Admin];

    /// Parse a backend role string. Accepts `ROLE_ADMIN` and bare `ADMIN`,
    /// ignoring ASCII case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match bare {
            "PATIENT" => Some(Self::Patient),
            "DOCTOR" => Some(Self::Doctor),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Canonical backend spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "ROLE_PATIENT",
            Self::Doctor => "ROLE_DOCTOR",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Default landing page after sign-in.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Patient => "/patient/dashboard",
            Self::Doctor => "/doctor/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }

    /// First path segment owned by this role's portal.
    #[must_use]
    pub const fn path_prefix(self) -> &'static str {
        match self {
            Self::Patient => "/patient",
            Self::Doctor => "/doctor",
            Self::Admin => "/admin",
        }
    }

    /// Human label for headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean role flags used for UI gating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_doctor: bool,
    pub is_patient: bool,
}

impl RoleFlags {
    /// Flags for an optional role string. Missing or unknown roles set no flag.
    #[must_use]
    pub fn from_role(raw: Option<&str>) -> Self {
        let role = raw.and_then(Role::parse);
        Self {
            is_admin: role == Some(Role::Admin),
            is_doctor: role == Some(Role::Doctor),
            is_patient: role == Some(Role::Patient),
        }
    }

    /// Whether the flag for `role` is set.
    #[must_use]
    pub const fn has(self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin,
            Role::Doctor => self.is_doctor,
            Role::Patient => self.is_patient,
        }
    }
}

/// Default dashboard for a role string; unknown or missing roles go to sign-in.
#[must_use]
pub fn dashboard_path(raw: Option<&str>) -> &'static str {
    raw.and_then(Role::parse)
        .map_or(SIGN_IN_PATH, Role::dashboard_path)
}

/// Role a path belongs to, judged by its first segment.
#[must_use]
pub fn required_role_for(path: &str) -> Option<Role> {
    Role::ALL.into_iter().find(|role| {
        path.strip_prefix(role.path_prefix())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    })
}

/// Where to go after a successful sign-in or sign-up.
///
/// A preserved local path wins unless it points back at the auth pages;
/// otherwise the role's dashboard (or sign-in for an unknown role).
#[must_use]
pub fn post_login_redirect(requested: Option<&str>, role: Option<&str>) -> String {
    if let Some(path) = requested.map(str::trim).filter(|p| is_safe_local_path(p)) {
        return path.to_owned();
    }
    dashboard_path(role).to_owned()
}

fn is_safe_local_path(path: &str) -> bool {
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return false;
    }
    let route = path.split(['?', '#']).next().unwrap_or(path);
    !matches!(route, "/" | SIGN_IN_PATH | SIGN_UP_PATH | UNAUTHORIZED_PATH)
}
