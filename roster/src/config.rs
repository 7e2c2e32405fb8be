use std::time::Duration;

use url::Url;

use crate::error::Result;

/// Default backend address (the mock JSON store listens on port 3001).
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the roster REST client.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Base URL of the REST backend exposing `/users`, `/roles`, `/properties`.
    pub api_url: String,
    /// Fixed timeout applied to every request.
    pub timeout: Duration,
    /// Bearer token sent with every request when set.
    pub auth_token: Option<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            auth_token: None,
        }
    }
}

impl RosterConfig {
    /// Config pointing at `api_url` with default timeout.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Check that `api_url` parses as an absolute URL.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let cfg = RosterConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:3001");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.auth_token.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let cfg = RosterConfig::with_api_url("localhost-without-scheme");
        assert!(cfg.validate().is_err());
    }
}
