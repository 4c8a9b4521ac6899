use async_trait::async_trait;
use dish_core::Session;

use crate::error::AuthError;

/// Source of the current BaaS session.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// `Ok(None)` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` only on genuine transport failure.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;
}
