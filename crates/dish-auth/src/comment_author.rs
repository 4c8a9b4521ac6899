//! Author id resolution for comment rows.
//!
//! Every comment row needs an author id that satisfies the principal foreign
//! key. The live session user wins; otherwise a configured administrative
//! principal (which must exist in the principal table) is used.

use std::sync::Arc;

use crate::session::SessionSource;

pub struct CommentAuthorResolver {
    sessions: Arc<dyn SessionSource>,
    fallback_author_id: String,
}

impl CommentAuthorResolver {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionSource>, fallback_author_id: impl Into<String>) -> Self {
        Self {
            sessions,
            fallback_author_id: fallback_author_id.into(),
        }
    }

    #[must_use]
    pub fn fallback_author_id(&self) -> &str {
        &self.fallback_author_id
    }

    /// The session user's id, or the fallback author id.
    ///
    /// A non-empty session id is returned verbatim, whitespace included. A
    /// missing session, user or id, and a failed session fetch all yield the
    /// fallback.
    pub async fn resolve_user_id(&self) -> String {
        match self.sessions.current_session().await {
            Ok(Some(session)) => {
                if let Some(id) = session.user_id() {
                    return id.to_string();
                }
                tracing::debug!("session has no user id; using fallback comment author");
            }
            Ok(None) => tracing::debug!("no session; using fallback comment author"),
            Err(error) => {
                tracing::warn!(%error, "session fetch failed; using fallback comment author");
            }
        }
        self.fallback_author_id.clone()
    }
}
