use clap::{Args, Subcommand};

/// Authentication and authorization commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password and store the access token.
    Login(AuthLoginArgs),
    /// Clear the signed-in user's cached auth data and stored credentials.
    Logout,
    /// Show the current session and its resolved auth data.
    Status,
    /// Resolve role and client linkage for a user id.
    Resolve(AuthResolveArgs),
    /// Drop one user's cached auth data (logout or role change).
    Clear(AuthUserArgs),
    /// Drop every cached auth entry (after an application upgrade).
    ClearAll,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Name of the environment variable holding the password.
    #[arg(long, default_value = "SNAPDISH_PASSWORD")]
    pub password_env: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthResolveArgs {
    /// User id to resolve.
    pub user_id: String,
    /// Skip the cache and overwrite it with a fresh lookup.
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthUserArgs {
    /// User id whose cached entry should be removed.
    pub user_id: String,
}
