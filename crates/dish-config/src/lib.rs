//! # dish-config
//!
//! Layered configuration loading for Snapdish using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SNAPDISH_*` prefix, `__` as separator)
//! 2. Project-level `.snapdish/config.toml`
//! 3. User-level `~/.config/snapdish/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SNAPDISH_BACKEND__URL` -> `backend.url`,
//! `SNAPDISH_AUTH__FALLBACK_AUTHOR_ID` -> `auth.fallback_author_id`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use dish_config::SnapdishConfig;
//!
//! let config = SnapdishConfig::load_with_dotenv().expect("config");
//! if config.backend.is_configured() {
//!     println!("backend: {}", config.backend.base_url());
//! }
//! ```

mod auth;
mod backend;
mod cache;
mod error;

pub use auth::AuthConfig;
pub use backend::BackendConfig;
pub use cache::CacheConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnapdishConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl SnapdishConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".snapdish/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SNAPDISH_").split("__"))
    }

    /// Reject values that would make the cache useless.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero TTL or an empty cache prefix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.default_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.default_ttl_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.auth.cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.cache_ttl_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.cache.prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache.prefix".into(),
                reason: "an empty prefix would let clear() touch foreign keys".into(),
            });
        }
        Ok(())
    }

    /// The configured comment fallback author id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if `auth.fallback_author_id` is blank.
    pub fn fallback_author_id(&self) -> Result<&str, ConfigError> {
        if self.auth.has_fallback_author() {
            Ok(&self.auth.fallback_author_id)
        } else {
            Err(ConfigError::NotConfigured {
                section: "auth.fallback_author_id".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("snapdish").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
