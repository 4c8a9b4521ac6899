use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user_id: Option<String>,
    email: Option<String>,
    expires_at: Option<String>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let password = std::env::var(&args.password_env).with_context(|| {
        format!(
            "auth login: set the password in ${} (or pass --password-env)",
            args.password_env
        )
    })?;

    let backend = ctx.backend()?;
    let session = backend.sign_in_with_password(&args.email, &password).await?;
    let token = session
        .access_token
        .as_deref()
        .context("auth login: backend returned no access token")?;
    ctx.token_store.store(token)?;

    // A new login may come with a changed role.
    if let Some(user_id) = session.user_id() {
        ctx.auth_service()?.clear_auth_cache(user_id);
    }

    let expires_at = dish_auth::decode_expiry(token)
        .ok()
        .map(|at| at.to_rfc3339());

    output(
        &AuthLoginResponse {
            authenticated: true,
            user_id: session.user_id().map(String::from),
            email: session.email().map(String::from),
            expires_at,
        },
        flags.format,
    )
}
