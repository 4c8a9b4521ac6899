use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth RPC failed: {0}")]
    Rpc(String),

    #[error("session lookup failed: {0}")]
    Session(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("keyring error: {0}")]
    KeyringError(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error("{0}")]
    Other(String),
}
