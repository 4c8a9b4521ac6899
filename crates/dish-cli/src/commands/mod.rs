pub mod auth;
pub mod cache;
pub mod comment;
pub mod dispatch;
pub mod schema;
