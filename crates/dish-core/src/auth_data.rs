//! Resolved authorization facts for a user.
//!
//! `AuthData` is what UI gates and operator commands consume. It is produced by
//! `dish-auth` and cached by `dish-cache` under `auth_data_<user_id>`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role tag attached to an auth principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Customer,
    Unset,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Unset => "unset",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            "unset" => Ok(Self::Unset),
            other => Err(CoreError::Validation(format!("unknown user role '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthData
// ---------------------------------------------------------------------------

/// Authorization facts resolved for one user id.
///
/// When `error` is set, `role` and `client_id` are always `None`. Such values are
/// handed to callers but never written to the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub role: Option<UserRole>,
    pub client_id: Option<String>,
    /// Not supplied by the remote resolver today; kept for forward compatibility.
    pub restaurant_name: Option<String>,
    pub has_linked_client_record: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on the value handed back from a cache hit. Never persisted.
    #[serde(default, skip_serializing)]
    pub from_cache: bool,
}

impl AuthData {
    /// Null-shaped result carrying a failure message.
    #[must_use]
    pub fn unresolved(error: impl Into<String>) -> Self {
        Self {
            role: None,
            client_id: None,
            restaurant_name: None,
            has_linked_client_record: false,
            error: Some(error.into()),
            from_cache: false,
        }
    }

    /// Synthetic admin identity with no client linkage.
    #[must_use]
    pub const fn admin_bypass() -> Self {
        Self {
            role: Some(UserRole::Admin),
            client_id: None,
            restaurant_name: None,
            has_linked_client_record: false,
            error: None,
            from_cache: false,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(UserRole::is_admin)
    }

    /// Mark this value as served from the cache.
    #[must_use]
    pub fn with_from_cache(mut self) -> Self {
        self.from_cache = true;
        self
    }
}
