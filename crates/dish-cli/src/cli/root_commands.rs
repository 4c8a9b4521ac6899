use clap::Subcommand;

use crate::cli::subcommands::{AuthCommands, CacheCommands, CommentCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Authentication and authorization.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Comment helpers.
    Comment {
        #[command(subcommand)]
        action: CommentCommands,
    },
    /// Print the JSON schema of resolved auth data.
    Schema,
}
