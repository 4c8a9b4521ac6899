use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags).await,
        Commands::Cache { action } => commands::cache::handle(&action, ctx, flags),
        Commands::Comment { action } => commands::comment::handle(&action, ctx, flags).await,
        Commands::Schema => commands::schema::handle(flags),
    }
}
