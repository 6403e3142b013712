use std::{env, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_NWS_BASE: &str = "https://api.weather.gov";
pub const DEFAULT_GITHUB_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAIL_BASE: &str = "https://indianrailapi.com/api/v2";

const UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Read-once process configuration. Built from the environment at startup
/// and passed by reference afterwards; nothing here mutates.
#[derive(Debug, Clone)]
pub struct OpenDataConfig {
    pub nws_base: Url,
    pub github_base: Url,
    pub rail_base: Url,
    pub github_token: Option<String>,
    pub rail_api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error: config: invalid {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

impl OpenDataConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            nws_base: base_url("NWS_API_BASE", DEFAULT_NWS_BASE)?,
            github_base: base_url("GITHUB_API_BASE", DEFAULT_GITHUB_BASE)?,
            rail_base: base_url("INDIAN_RAIL_BASE_URL", DEFAULT_RAIL_BASE)?,
            github_token: non_empty(env::var("GITHUB_TOKEN").ok()),
            rail_api_key: non_empty(env::var("INDIAN_RAIL_API_KEY").ok()),
            timeout: Duration::from_secs(UPSTREAM_TIMEOUT_SECS),
        })
    }
}

fn base_url(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    // A trailing slash keeps Url::join from swallowing the last path segment.
    let normalized = if raw.ends_with('/') {
        raw
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_appends_trailing_slash() {
        let url = base_url("OPENDATA_TEST_UNSET_VAR", "https://example.com/api/v2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v2/");
        assert_eq!(
            url.join("TrainSchedule/apikey/k").unwrap().path(),
            "/api/v2/TrainSchedule/apikey/k"
        );
    }

    #[test]
    fn from_env_honors_overrides_and_rejects_invalid() {
        unsafe {
            env::set_var("NWS_API_BASE", "http://127.0.0.1:9999");
            env::remove_var("GITHUB_API_BASE");
            env::remove_var("INDIAN_RAIL_BASE_URL");
            env::remove_var("GITHUB_TOKEN");
            env::set_var("INDIAN_RAIL_API_KEY", "  ");
        }

        let config = OpenDataConfig::from_env().expect("config");
        assert_eq!(config.nws_base.as_str(), "http://127.0.0.1:9999/");
        assert_eq!(config.github_base.as_str(), "https://api.github.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        // Whitespace-only credentials count as unset.
        assert!(config.rail_api_key.is_none());

        unsafe {
            env::set_var("NWS_API_BASE", "not a url");
        }
        assert!(OpenDataConfig::from_env().is_err());

        unsafe {
            env::remove_var("NWS_API_BASE");
            env::remove_var("INDIAN_RAIL_API_KEY");
        }
    }
}
