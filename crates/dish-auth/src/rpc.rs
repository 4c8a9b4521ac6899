//! Remote auth resolver collaborator.

use async_trait::async_trait;
use dish_core::{AuthData, UserRole};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Row returned by the remote auth resolver for one user id.
///
/// Field names are accepted in both camelCase and `snake_case`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAuthRecord {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "clientId", alias = "client_id")]
    pub client_id: Option<String>,
    #[serde(
        default,
        rename = "hasLinkedClientRecord",
        alias = "has_linked_client_record"
    )]
    pub has_linked_client_record: Option<bool>,
}

impl RemoteAuthRecord {
    /// Map into the canonical shape. The resolver never supplies a restaurant name.
    #[must_use]
    pub fn into_auth_data(self) -> AuthData {
        let role = self.role.as_deref().and_then(|tag| match tag.parse::<UserRole>() {
            Ok(role) => Some(role),
            Err(error) => {
                tracing::warn!(%error, "remote resolver returned an unknown role; treating as unresolved");
                None
            }
        });

        AuthData {
            role,
            client_id: self.client_id,
            restaurant_name: None,
            has_linked_client_record: self.has_linked_client_record.unwrap_or(false),
            error: None,
            from_cache: false,
        }
    }
}

/// Remote procedure that resolves a user's role and client linkage.
#[async_trait]
pub trait AuthRpc: Send + Sync {
    /// `Ok(None)` when the call succeeded but returned no row.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rpc` on transport or database failure.
    async fn resolve_user_auth(&self, user_id: &str) -> Result<Option<RemoteAuthRecord>, AuthError>;
}
