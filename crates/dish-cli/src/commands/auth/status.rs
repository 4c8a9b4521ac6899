use dish_auth::{SessionSource, TokenSource};
use serde::Serialize;

use super::resolve::ResolvedAuth;
use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    email: Option<String>,
    token_source: Option<TokenSource>,
    expires_at: Option<String>,
    auth: Option<ResolvedAuth>,
    note: Option<String>,
}

impl AuthStatusResponse {
    fn signed_out(token_source: Option<TokenSource>, note: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            email: None,
            token_source,
            expires_at: None,
            auth: None,
            note: Some(note.into()),
        }
    }
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let token_source = ctx.token_store.detect_source();
    let Ok(backend) = ctx.backend() else {
        let note = "SNAPDISH_BACKEND__URL / SNAPDISH_BACKEND__ANON_KEY not configured";
        return output(&AuthStatusResponse::signed_out(token_source, note), flags.format);
    };

    let status = match backend.current_session().await {
        Ok(Some(session)) => match session.user_id() {
            Some(user_id) => {
                let data = ctx.auth_service()?.get_user_auth_data(user_id).await;
                AuthStatusResponse {
                    authenticated: true,
                    email: session.email().map(String::from),
                    token_source,
                    expires_at: session
                        .access_token
                        .as_deref()
                        .and_then(|token| dish_auth::decode_expiry(token).ok())
                        .map(|at| at.to_rfc3339()),
                    auth: Some(ResolvedAuth::new(user_id, data)),
                    note: None,
                }
            }
            None => AuthStatusResponse::signed_out(token_source, "session has no user id"),
        },
        Ok(None) => AuthStatusResponse::signed_out(token_source, "no valid session; run `dish auth login`"),
        Err(error) => AuthStatusResponse::signed_out(token_source, error.to_string()),
    };

    output(&status, flags.format)
}
