//! Wire and cache DTOs shared by the gateway, the store and the UI shells.
//!
//! DESIGN
//! ======
//! `UserProfile` is both the backend's profile shape and the cached entry in
//! local storage, so it serializes with the backend's camelCase names.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::role::{Role, RoleFlags};

/// Authenticated user as returned by sign-in, sign-up and test-token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user identifier. Numeric ids are kept in their decimal form.
    #[serde(alias = "userId", deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    /// Raw role string, e.g. `"ROLE_PATIENT"`. Empty when the backend sent none.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserProfile {
    /// Parsed role, or `None` for a missing or unknown role string.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Role flags recomputed from the current role string.
    #[must_use]
    pub fn flags(&self) -> RoleFlags {
        RoleFlags::from_role(Some(&self.role))
    }

    /// `"First Last"`, falling back to the email when both names are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.email.clone() } else { full.to_owned() }
    }
}

/// A token together with the profile it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: String,
    pub user: UserProfile,
}

/// Sign-in form payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account-creation payload collected by the sign-up form.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Accept ids sent either as JSON strings or as integers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(id) if !id.trim().is_empty() => Ok(id),
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int.to_string());
            }
            if let Some(uint) = number.as_u64() {
                return Ok(uint.to_string());
            }
            Err(D::Error::custom("expected integer id"))
        }
        _ => Err(D::Error::custom("expected non-empty string or integer id")),
    }
}
