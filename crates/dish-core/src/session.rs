use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Session returned by the BaaS session endpoint.
///
/// Any field may be missing: a session without a user, or a user without an
/// id, is a legitimate "no identifiable principal" outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// Session for a user with the given id and email.
    #[must_use]
    pub fn for_user(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user: Some(SessionUser {
                id: Some(id.into()),
                email,
            }),
            access_token: None,
        }
    }

    /// The session user's id, if present and non-empty.
    ///
    /// The id is returned verbatim. Whitespace is not trimmed, so `"  "` counts
    /// as present.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.email.as_deref())
    }
}
