use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CacheCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CacheClearResponse {
    cleared: bool,
    removed: usize,
}

#[derive(Serialize)]
struct CacheInvalidateResponse {
    pattern: String,
    removed: usize,
}

/// Handle `dish cache`.
pub fn handle(action: &CacheCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CacheCommands::Stats => output(&ctx.cache.get_stats(), flags.format),
        CacheCommands::Clear => {
            let before = ctx.cache.get_stats().total_items;
            ctx.cache.clear();
            let after = ctx.cache.get_stats().total_items;
            output(
                &CacheClearResponse {
                    cleared: after == 0,
                    removed: before.saturating_sub(after),
                },
                flags.format,
            )
        }
        CacheCommands::Invalidate { pattern } => {
            let before = ctx.cache.get_stats().total_items;
            ctx.cache.invalidate_pattern(pattern);
            let after = ctx.cache.get_stats().total_items;
            output(
                &CacheInvalidateResponse {
                    pattern: pattern.clone(),
                    removed: before.saturating_sub(after),
                },
                flags.format,
            )
        }
    }
}
