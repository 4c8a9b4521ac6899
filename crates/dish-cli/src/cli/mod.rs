use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `dish` binary.
#[derive(Debug, Parser)]
#[command(name = "dish", version, about = "Snapdish - auth cache and submission tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::subcommands::{AuthCommands, CacheCommands, CommentCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["dish", "--format", "raw", "--verbose", "schema"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn handler_flags_carry_output_format() {
        let cli = Cli::try_parse_from(["dish", "cache", "stats", "--format", "raw", "--quiet"])
            .expect("cli should parse");
        assert_eq!(cli.global_flags().format, OutputFormat::Raw);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["dish", "cache", "stats", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheCommands::Stats
            }
        ));
    }

    #[test]
    fn resolve_accepts_refresh_flag() {
        let cli = Cli::try_parse_from(["dish", "auth", "resolve", "u1", "--refresh"])
            .expect("cli should parse");

        match cli.command {
            Commands::Auth {
                action: AuthCommands::Resolve(args),
            } => {
                assert_eq!(args.user_id, "u1");
                assert!(args.refresh);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn login_defaults_password_env() {
        let cli = Cli::try_parse_from(["dish", "auth", "login", "--email", "chef@example.com"])
            .expect("cli should parse");

        match cli.command {
            Commands::Auth {
                action: AuthCommands::Login(args),
            } => assert_eq!(args.password_env, "SNAPDISH_PASSWORD"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn invalidate_requires_pattern() {
        assert!(Cli::try_parse_from(["dish", "cache", "invalidate"]).is_err());
        let cli = Cli::try_parse_from(["dish", "cache", "invalidate", "auth_data_"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheCommands::Invalidate { .. }
            }
        ));
    }

    #[test]
    fn comment_author_parses() {
        let cli = Cli::try_parse_from(["dish", "comment", "author"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Comment {
                action: CommentCommands::Author
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["dish", "--format", "xml", "schema"]).is_err());
    }
}
