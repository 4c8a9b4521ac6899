//! # dish-core
//!
//! Core types shared across the Snapdish crates.
//!
//! - [`AuthData`] and [`UserRole`]: the resolved authorization facts for a user
//! - [`Session`] and [`SessionUser`]: the shape returned by the session collaborator
//! - [`CoreError`]: cross-cutting error type

pub mod auth_data;
pub mod errors;
pub mod session;

pub use auth_data::{AuthData, UserRole};
pub use errors::CoreError;
pub use session::{Session, SessionUser};
