//! Client configuration.
//!
//! Defaults point at the hosted service. Every field can be overridden from
//! the environment, which is how the test harness is aimed at other
//! deployments.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://postup.lalabuff.ml/api/beta/";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.lalabuff.ml/token";
pub const DEFAULT_SCOPE: &str = "*";
pub const DEFAULT_CREDENTIALS_PATH: &str = ".token";

/// Where to send requests and where the credentials live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that relative API paths are joined onto.
    pub base_url: String,
    /// OAuth token endpoint used for refresh-token grants.
    pub token_url: String,
    /// Scope requested when refreshing.
    pub scope: String,
    /// Credential file read by `ApiClient::from_config`.
    pub credentials_path: PathBuf,
    /// Overall per-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token_url: token_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `POSTUP_BASE_URL`, `POSTUP_TOKEN_URL`,
    /// `POSTUP_SCOPE`, `POSTUP_TOKEN_FILE` and `POSTUP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup("POSTUP_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(token_url) = lookup("POSTUP_TOKEN_URL") {
            config.token_url = token_url;
        }
        if let Some(scope) = lookup("POSTUP_SCOPE") {
            config.scope = scope;
        }
        if let Some(path) = lookup("POSTUP_TOKEN_FILE") {
            config.credentials_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("POSTUP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::Config(format!("POSTUP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Absolute URL for a relative API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_target_hosted_service() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.scope, "*");
        assert_eq!(config.credentials_path, PathBuf::from(".token"));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn env_overrides_every_field() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("POSTUP_BASE_URL", "http://127.0.0.1:3000/api/beta"),
            ("POSTUP_TOKEN_URL", "http://127.0.0.1:3000/token"),
            ("POSTUP_SCOPE", "quests"),
            ("POSTUP_TOKEN_FILE", "/tmp/creds"),
            ("POSTUP_TIMEOUT_SECS", " 15 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000/api/beta");
        assert_eq!(config.token_url, "http://127.0.0.1:3000/token");
        assert_eq!(config.scope, "quests");
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/creds"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("POSTUP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(ref msg) if msg.contains("soon")));
    }

    #[test]
    fn url_joins_with_single_slash() {
        let config = ClientConfig::new("http://localhost:3000/api/beta/", "http://localhost:3000/token");
        assert_eq!(config.url("quests"), "http://localhost:3000/api/beta/quests");
        assert_eq!(config.url("/quests/active"), "http://localhost:3000/api/beta/quests/active");

        let config = ClientConfig::new("http://localhost:3000/api/beta", "http://localhost:3000/token");
        assert_eq!(config.url("player"), "http://localhost:3000/api/beta/player");
    }
}
