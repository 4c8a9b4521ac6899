use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CommentCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CommentAuthorResponse {
    author_id: String,
    fallback: bool,
}

/// Handle `dish comment`.
pub async fn handle(
    action: &CommentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CommentCommands::Author => {
            let resolver = ctx.comment_author_resolver()?;
            let author_id = resolver.resolve_user_id().await;
            let fallback = author_id == resolver.fallback_author_id();
            output(
                &CommentAuthorResponse {
                    author_id,
                    fallback,
                },
                flags.format,
            )
        }
    }
}
