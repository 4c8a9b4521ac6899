use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::clock::Clock;
use crate::entry::{CacheEntry, CacheOptions, CacheStats};
use crate::storage::Storage;

pub const DEFAULT_PREFIX: &str = "snapdish_cache_";
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Namespace and defaults for one [`CacheService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Prepended to every logical key. Keys without it are never touched.
    pub prefix: String,
    pub default_ttl: Duration,
    /// Written when `set` gets no version, expected when `get` gets none.
    pub default_version: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            default_ttl: DEFAULT_TTL,
            default_version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// TTL- and version-aware cache over a shared [`Storage`] medium.
pub struct CacheService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CacheService {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, settings: CacheSettings) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Store `data` under `key`. Failures are logged and leave prior state as it was.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T, options: CacheOptions) {
        let ttl = options.ttl.unwrap_or(self.settings.default_ttl);
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now_millis(),
            ttl: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            version: options
                .version
                .unwrap_or_else(|| self.settings.default_version.clone()),
        };

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%error, key, "failed to serialize cache entry; not cached");
                return;
            }
        };

        if let Err(error) = self.storage.set_item(&self.storage_key(key), &raw) {
            tracing::warn!(%error, key, "failed to write cache entry; not cached");
        }
    }

    /// Fetch `key` if it is present, decodable, at `expected_version` and within TTL.
    ///
    /// `expected_version` defaults to the service's default version. Entries
    /// failing any check are deleted.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str, expected_version: Option<&str>) -> Option<T> {
        let storage_key = self.storage_key(key);
        let raw = match self.storage.get_item(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!(%error, key, "cache read failed; treating as miss");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(error) => {
                tracing::debug!(%error, key, "undecodable cache entry; removing");
                self.discard(&storage_key);
                return None;
            }
        };

        let expected = expected_version.unwrap_or(&self.settings.default_version);
        if entry.version != expected {
            tracing::debug!(
                key,
                stored = %entry.version,
                expected,
                "cache entry version mismatch; removing"
            );
            self.discard(&storage_key);
            return None;
        }

        if entry.is_expired(self.clock.now_millis()) {
            tracing::debug!(key, "cache entry expired; removing");
            self.discard(&storage_key);
            return None;
        }

        Some(entry.data)
    }

    pub fn remove(&self, key: &str) {
        self.discard(&self.storage_key(key));
    }

    /// Delete every entry in this namespace.
    pub fn clear(&self) {
        for storage_key in self.namespaced_keys() {
            self.discard(&storage_key);
        }
    }

    /// Delete every entry in this namespace whose storage key contains `pattern`.
    pub fn invalidate_pattern(&self, pattern: &str) {
        let mut removed = 0_usize;
        for storage_key in self.namespaced_keys() {
            if storage_key.contains(pattern) {
                self.discard(&storage_key);
                removed += 1;
            }
        }
        tracing::debug!(pattern, removed, "invalidated cache entries");
    }

    /// `true` when `get` would return a non-null value.
    ///
    /// A stored JSON `null` counts as absent, so callers should not cache
    /// null data they need to tell apart from a miss.
    #[must_use]
    pub fn is_valid(&self, key: &str, expected_version: Option<&str>) -> bool {
        self.get::<serde_json::Value>(key, expected_version)
            .is_some_and(|value| !value.is_null())
    }

    #[must_use]
    pub fn get_stats(&self) -> CacheStats {
        let mut total_items = 0;
        let mut bytes = 0;
        for storage_key in self.namespaced_keys() {
            if let Ok(Some(raw)) = self.storage.get_item(&storage_key) {
                total_items += 1;
                bytes += raw.len();
            }
        }
        CacheStats::from_bytes(total_items, bytes)
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{key}", self.settings.prefix)
    }

    fn namespaced_keys(&self) -> Vec<String> {
        match self.storage.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.settings.prefix))
                .collect(),
            Err(error) => {
                tracing::warn!(%error, "failed to list cache keys");
                Vec::new()
            }
        }
    }

    fn discard(&self, storage_key: &str) {
        if let Err(error) = self.storage.remove_item(storage_key) {
            tracing::warn!(%error, storage_key, "failed to remove cache entry");
        }
    }
}
