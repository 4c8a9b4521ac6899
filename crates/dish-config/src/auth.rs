//! Authorization resolution configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_cache_ttl_secs() -> u64 {
    30 * 60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Session email that is resolved straight to `admin` without the RPC lookup.
    /// Empty disables the bypass.
    #[serde(default)]
    pub bypass_email: String,

    /// Author id written on comments when no session user is available.
    /// Must name an existing principal row.
    #[serde(default)]
    pub fallback_author_id: String,

    /// How long resolved auth data stays cached.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bypass_email: String::new(),
            fallback_author_id: String::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AuthConfig {
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn bypass_email(&self) -> Option<&str> {
        Some(self.bypass_email.as_str()).filter(|email| !email.is_empty())
    }

    pub fn has_fallback_author(&self) -> bool {
        !self.fallback_author_id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_bypass_and_fallback() {
        let config = AuthConfig::default();
        assert!(config.bypass_email().is_none());
        assert!(!config.has_fallback_author());
        assert_eq!(config.cache_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn bypass_email_is_exposed_when_set() {
        let config = AuthConfig {
            bypass_email: "ops@example.com".into(),
            ..Default::default()
        };
        assert_eq!(config.bypass_email(), Some("ops@example.com"));
    }

    #[test]
    fn whitespace_fallback_is_not_configured() {
        let config = AuthConfig {
            fallback_author_id: "   ".into(),
            ..Default::default()
        };
        assert!(!config.has_fallback_author());
    }
}
