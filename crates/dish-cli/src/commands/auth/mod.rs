mod login;
mod logout;
mod resolve;
mod status;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthClearResponse {
    cleared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

/// Handle `dish auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, ctx, flags).await,
        AuthCommands::Logout => logout::handle(ctx, flags).await,
        AuthCommands::Status => status::handle(ctx, flags).await,
        AuthCommands::Resolve(args) => resolve::handle(args, ctx, flags).await,
        AuthCommands::Clear(args) => {
            ctx.auth_service()?.clear_auth_cache(&args.user_id);
            output(
                &AuthClearResponse {
                    cleared: true,
                    user_id: Some(args.user_id.clone()),
                },
                flags.format,
            )
        }
        AuthCommands::ClearAll => {
            ctx.auth_service()?.clear_all_auth_cache();
            output(
                &AuthClearResponse {
                    cleared: true,
                    user_id: None,
                },
                flags.format,
            )
        }
    }
}
