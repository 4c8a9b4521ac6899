pub mod auth;
pub mod cache;
pub mod comment;

pub use auth::AuthCommands;
pub use cache::CacheCommands;
pub use comment::CommentCommands;
