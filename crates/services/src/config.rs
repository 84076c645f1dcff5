use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_API_BASE_URL: &str = "PORTAL_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PORTAL_REQUEST_TIMEOUT_SECS";
pub const DEFAULT_API_BASE_URL: &str = "https://dept-backend.vercel.app/api";

/// Delays the client waits on; all of them are user-facing pacing, not retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub toast: Duration,
    /// How long a finished navigation keeps absorbing duplicate triggers.
    pub navigation_grace: Duration,
    /// Pause after a fragment is injected before it is looked up again.
    pub fragment_settle: Duration,
    pub data_load_delay: Duration,
    pub startup_component_timeout: Duration,
    pub resend_cooldown_secs: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            toast: Duration::from_millis(5000),
            navigation_grace: Duration::from_millis(500),
            fragment_settle: Duration::from_millis(150),
            data_load_delay: Duration::from_millis(50),
            startup_component_timeout: Duration::from_millis(5000),
            resend_cooldown_secs: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub timings: Timings,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
            timings: Timings::default(),
        }
    }
}

impl PortalConfig {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = non_empty(ENV_API_BASE_URL) {
            config.api_base_url = normalize_base_url(&raw).ok_or(ConfigError::InvalidUrl {
                var: ENV_API_BASE_URL,
                raw,
            })?;
        }

        if let Some(raw) = non_empty(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: ENV_REQUEST_TIMEOUT_SECS,
                    raw,
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the API base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `raw` is not an http(s) URL.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(raw).ok_or_else(|| ConfigError::InvalidUrl {
            var: "--api",
            raw: raw.to_owned(),
        })?;
        Ok(self)
    }
}

/// Trimmed http(s) URL without a trailing slash.
#[must_use]
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let (scheme, remainder) = trimmed.split_once("://")?;
    if !matches!(scheme, "http" | "https") || remainder.is_empty() || remainder.starts_with('/') {
        return None;
    }
    url::Url::parse(trimmed).ok()?;
    Some(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = PortalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.timings.resend_cooldown_secs, 60);
    }

    #[test]
    fn base_url_is_normalized() {
        let config =
            PortalConfig::from_lookup(lookup(&[(ENV_API_BASE_URL, " http://localhost:4000/api/ ")]))
                .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
    }

    #[test]
    fn rejects_non_http_urls() {
        assert_eq!(normalize_base_url("ftp://x"), None);
        assert_eq!(normalize_base_url("https:///x"), None);
        assert_eq!(normalize_base_url("localhost:4000"), None);
        let err = PortalConfig::from_lookup(lookup(&[(ENV_API_BASE_URL, "nope")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn timeout_must_be_positive() {
        let err = PortalConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
        let config =
            PortalConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_SECS, "5")])).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
