//! Storage error types.

use thiserror::Error;

/// Errors raised by a [`Storage`](crate::Storage) backend.
///
/// `CacheService` catches all of these; they never reach cache callers.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A write would exceed the backend's byte quota.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// The backing file exists but does not hold a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),

    /// A previous holder of the storage lock panicked.
    #[error("storage lock poisoned")]
    Poisoned,
}
