//! Client-side cache configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_prefix() -> String {
    "snapdish_cache_".to_string()
}

const fn default_ttl_secs() -> u64 {
    300
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Namespace prefix for every cache key in the storage file.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// TTL applied when a write does not specify one.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Schema version written with, and expected from, cache entries.
    /// Bumping it invalidates everything cached by older builds.
    #[serde(default = "default_version")]
    pub version: String,

    /// Storage file path. Empty means `<data dir>/snapdish/storage.json`.
    #[serde(default)]
    pub storage_path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            default_ttl_secs: default_ttl_secs(),
            version: default_version(),
            storage_path: String::new(),
        }
    }
}

impl CacheConfig {
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Resolved storage file path, if one can be determined.
    pub fn resolved_storage_path(&self) -> Option<PathBuf> {
        if self.storage_path.is_empty() {
            dirs::data_dir().map(|p| p.join("snapdish").join("storage.json"))
        } else {
            Some(PathBuf::from(&self.storage_path))
        }
    }
}
