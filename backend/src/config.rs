//! Portal connection settings read from the environment.

use std::time::Duration;

use anyhow::Context;
use common::polling::PollPolicy;

pub const DEFAULT_PORTAL_URL: &str = "http://localhost:6543";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub poll: PollPolicy,
}

impl PortalConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty keys use defaults, malformed
    /// numbers are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str, default: u64| -> anyhow::Result<u64> {
            match get(key) {
                Some(value) => value.parse::<u64>().with_context(|| format!("{} must be a whole number, got {:?}", key, value)),
                None => Ok(default),
            }
        };
        let defaults = PollPolicy::default();

        let base_url = get("PORTAL_URL").unwrap_or(DEFAULT_PORTAL_URL.to_string());
        let max_attempts = number("PORTAL_POLL_MAX_ATTEMPTS", defaults.max_attempts as u64)?;
        if max_attempts == 0 {
            anyhow::bail!("PORTAL_POLL_MAX_ATTEMPTS must be at least 1");
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: get("PORTAL_AUTH_TOKEN"),
            request_timeout: Duration::from_secs(number("PORTAL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?),
            poll: PollPolicy {
                interval: Duration::from_millis(number("PORTAL_POLL_INTERVAL_MS", defaults.interval.as_millis() as u64)?),
                max_attempts: u32::try_from(max_attempts).context("PORTAL_POLL_MAX_ATTEMPTS is too large")?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = PortalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_PORTAL_URL);
        assert_eq!(config.auth_token, None);
        assert_eq!(config.poll, PollPolicy::default());
    }

    #[test]
    fn reads_overrides() {
        let config = PortalConfig::from_lookup(lookup(&[
            ("PORTAL_URL", "https://portal.example.org/"),
            ("PORTAL_AUTH_TOKEN", "abc"),
            ("PORTAL_POLL_INTERVAL_MS", "250"),
            ("PORTAL_POLL_MAX_ATTEMPTS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://portal.example.org");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, 3);
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let error = PortalConfig::from_lookup(lookup(&[("PORTAL_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(error.to_string().contains("PORTAL_REQUEST_TIMEOUT_SECS"));
        assert!(PortalConfig::from_lookup(lookup(&[("PORTAL_POLL_MAX_ATTEMPTS", "0")])).is_err());
    }
}
