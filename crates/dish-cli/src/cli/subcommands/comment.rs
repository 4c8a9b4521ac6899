use clap::Subcommand;

/// Comment helpers.
#[derive(Clone, Debug, Subcommand)]
pub enum CommentCommands {
    /// Print the author id a new comment would be written with.
    Author,
}
