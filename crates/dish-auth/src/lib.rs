//! # dish-auth
//!
//! Authorization resolution for Snapdish.
//!
//! - [`AuthResolutionService`]: cache-first lookup of a user's role and client
//!   linkage, with an emergency admin bypass and a remote RPC cold path
//! - [`CommentAuthorResolver`]: author id for comment rows, falling back to a
//!   configured administrative principal when no session user is available
//! - [`BackendClient`]: `reqwest` implementation of the RPC and session collaborators
//! - [`token_store`]: access token persistence (keyring, env, file)
//!
//! Nothing here returns an error for a failed resolution. Remote failures come
//! back as [`AuthData`](dish_core::AuthData) carrying `error`, and session
//! failures fall back to a well-defined identity.

pub mod comment_author;
pub mod error;
pub mod http;
pub mod resolver;
pub mod rpc;
pub mod session;
#[cfg(test)]
mod test_support;
pub mod token;
pub mod token_store;

pub use comment_author::CommentAuthorResolver;
pub use error::AuthError;
pub use http::BackendClient;
pub use resolver::{AUTH_CACHE_PREFIX, AuthResolutionService, AuthSettings, auth_cache_key};
pub use rpc::{AuthRpc, RemoteAuthRecord};
pub use session::SessionSource;
pub use token::{EXPIRY_BUFFER_SECS, decode_expiry, decode_subject, is_near_expiry};
pub use token_store::{TokenSource, TokenStore};
