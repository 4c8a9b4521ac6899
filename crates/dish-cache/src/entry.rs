use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stored form of a cached value: `{data, timestamp, ttl, version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Write time, epoch milliseconds.
    pub timestamp: i64,
    /// Validity window from `timestamp`, milliseconds.
    pub ttl: i64,
    pub version: String,
}

impl<T> CacheEntry<T> {
    /// An entry is still fresh at `now` while `now - timestamp <= ttl`.
    #[must_use]
    pub const fn is_expired(&self, now_millis: i64) -> bool {
        now_millis.saturating_sub(self.timestamp) > self.ttl
    }
}

/// Per-write overrides for [`CacheService::set`](crate::CacheService::set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub ttl: Option<Duration>,
    pub version: Option<String>,
}

impl CacheOptions {
    #[must_use]
    pub const fn ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            version: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Diagnostic snapshot of the cache namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_items: usize,
    /// Summed serialized size, formatted as `"<kb> KB"` with two decimals.
    pub cache_size: String,
    pub bytes: usize,
}

impl CacheStats {
    #[must_use]
    pub fn from_bytes(total_items: usize, bytes: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let kb = bytes as f64 / 1024.0;
        Self {
            total_items,
            cache_size: format!("{kb:.2} KB"),
            bytes,
        }
    }
}
