use dish_auth::{SessionSource, auth_cache_key};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
    cache_cleared_for: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session_user = None;

    if let Ok(backend) = ctx.backend() {
        match backend.current_session().await {
            Ok(Some(session)) => session_user = session.user_id().map(String::from),
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "logout: could not read session"),
        }
    }

    let stored_token = ctx.token_store.load();
    let cache_cleared_for = clear_cached_auth(ctx, session_user, stored_token.as_deref());

    ctx.token_store.delete()?;
    output(
        &AuthLogoutResponse {
            cleared: true,
            cache_cleared_for,
        },
        flags.format,
    )
}

/// Drop the signed-out user's cached auth entry.
///
/// The live session wins; an expired or rejected token still names its user
/// through the `sub` claim.
fn clear_cached_auth(
    ctx: &AppContext,
    session_user: Option<String>,
    stored_token: Option<&str>,
) -> Option<String> {
    let user_id = session_user.or_else(|| {
        stored_token.and_then(|token| dish_auth::decode_subject(token).ok())
    })?;
    ctx.cache.remove(&auth_cache_key(&user_id));
    Some(user_id)
}
