//! # dish-cache
//!
//! Namespaced key-value cache with per-entry TTL and version tags, layered over a
//! synchronous persistent [`Storage`] medium.
//!
//! Cache failures never surface to callers: a failed write is logged and
//! dropped, a failed or invalid read is a miss. Invalid entries (expired,
//! version mismatch, undecodable) are deleted when read.
//!
//! The service is constructed explicitly and shared through `Arc` by the
//! application's composition root.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use dish_cache::{CacheOptions, CacheService, CacheSettings, MemoryStorage, SystemClock};
//!
//! let cache = CacheService::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(SystemClock),
//!     CacheSettings::default(),
//! );
//! cache.set("k", &serde_json::json!({"x": 1}), CacheOptions::ttl(Duration::from_secs(1)));
//! let value: Option<serde_json::Value> = cache.get("k", None);
//! ```

pub mod clock;
pub mod entry;
pub mod error;
pub mod file_storage;
pub mod service;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, CacheOptions, CacheStats};
pub use error::StorageError;
pub use file_storage::FileStorage;
pub use service::{CacheService, CacheSettings, DEFAULT_PREFIX, DEFAULT_TTL, DEFAULT_VERSION};
pub use storage::{MemoryStorage, Storage};
