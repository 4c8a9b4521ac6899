//! Cross-cutting error types for Snapdish.
//!
//! Domain-specific errors (`StorageError`, `AuthError`, `ConfigError`) live in
//! their respective crates. The binary converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Snapdish crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (unknown role tag, malformed identifier).
    #[error("Validation error: {0}")]
    Validation(String),
}
