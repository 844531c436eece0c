//! Portal client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STATE_DIR: &str = ".medportal";
const DEFAULT_STATE_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL {0:?}: expected http:// or https://")]
    InvalidBaseUrl(String),
    #[error("invalid number for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_base_url: String,
    pub timeouts: Timeouts,
    /// Where native shells persist the session entries.
    pub state_file: PathBuf,
}

impl PortalConfig {
    /// Config pointing at `api_base_url` with default timeouts and state file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for anything but an `http(s)://` URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            timeouts: Timeouts::default(),
            state_file: default_state_file(None),
        })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `MEDPORTAL_API_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `MEDPORTAL_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MEDPORTAL_CONNECT_TIMEOUT_SECS`: default 10
    /// - `MEDPORTAL_STATE_FILE`: default `$HOME/.medportal/session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup("MEDPORTAL_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let timeouts = Timeouts {
            request_secs: parse_u64(&lookup, "MEDPORTAL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "MEDPORTAL_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let state_file = lookup("MEDPORTAL_STATE_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_state_file(lookup("HOME")), PathBuf::from);

        Ok(Self { api_base_url: normalize_base_url(&base)?, timeouts, state_file })
    }
}

fn parse_u64<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

fn default_state_file(home: Option<String>) -> PathBuf {
    let base = home
        .filter(|h| !h.trim().is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(DEFAULT_STATE_DIR).join(DEFAULT_STATE_FILE)
}
