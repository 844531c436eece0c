//! Form input normalization shared by sign-in and sign-up.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

/// OTP codes are exactly this many ASCII digits.
pub const OTP_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim and lowercase an email; `None` unless it has one `@` with text on both sides.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let mut parts = normalized.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    if local.is_empty() || domain.is_empty() || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

/// Strip whitespace from a typed OTP; `None` unless exactly six digits remain.
#[must_use]
pub fn normalize_otp(code: &str) -> Option<String> {
    let normalized: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if normalized.len() != OTP_LEN || !normalized.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn password_acceptable(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
