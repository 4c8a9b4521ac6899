use clap::Subcommand;

/// Local cache maintenance.
#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    /// Show entry count and size of the cache namespace.
    Stats,
    /// Remove every cache entry (other storage keys are kept).
    Clear,
    /// Remove cache entries whose key contains a pattern.
    Invalidate {
        /// Substring to match against cache keys.
        pattern: String,
    },
}
