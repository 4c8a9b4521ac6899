//! Access token persistence.
//!
//! Load order: OS keyring → `SNAPDISH_AUTH__TOKEN` env → `~/.snapdish/credentials`.
//! Writes go to the keyring, falling back to the credentials file (mode 0600)
//! when no keyring is available or it does not keep the token.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "snapdish-cli";
const KEYRING_USER: &str = "session-token";
const TOKEN_ENV_VAR: &str = "SNAPDISH_AUTH__TOKEN";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Where a loaded token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    Keyring,
    Env,
    File,
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    keyring_service: Option<String>,
    read_env: bool,
    credentials_path: Option<PathBuf>,
}

impl TokenStore {
    /// The standard store: keyring, env var, then `~/.snapdish/credentials`.
    ///
    /// `SNAPDISH_KEYRING_SERVICE` overrides the keyring service name so tests
    /// never touch real credentials.
    #[must_use]
    pub fn from_env() -> Self {
        let service = std::env::var("SNAPDISH_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        Self {
            keyring_service: Some(service),
            read_env: true,
            credentials_path: dirs::home_dir()
                .map(|h| h.join(".snapdish").join(CREDENTIALS_FILE_NAME)),
        }
    }

    /// A store backed only by the given file (no keyring, no env).
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            keyring_service: None,
            read_env: false,
            credentials_path: Some(path.into()),
        }
    }

    /// Persist a token, preferring the keyring.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if both keyring and file storage fail.
    pub fn store(&self, token: &str) -> Result<(), AuthError> {
        if self.keyring_service.is_some() {
            match self.store_keyring(token) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    tracing::warn!(%error, "keyring store failed; falling back to file");
                }
            }
        }
        self.store_file(token)
    }

    #[must_use]
    pub fn load(&self) -> Option<String> {
        self.load_with_source().map(|(token, _)| token)
    }

    #[must_use]
    pub fn detect_source(&self) -> Option<TokenSource> {
        self.load_with_source().map(|(_, source)| source)
    }

    /// Remove the token from the keyring and the credentials file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if let Some(entry) = self.keyring_entry() {
            // Absent entries are fine.
            let _ = entry.delete_credential();
        }

        if let Some(path) = &self.credentials_path
            && path.exists()
        {
            fs::remove_file(path).map_err(|e| {
                AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }

    fn load_with_source(&self) -> Option<(String, TokenSource)> {
        if let Some(entry) = self.keyring_entry()
            && let Ok(token) = entry.get_password()
            && !token.is_empty()
        {
            return Some((token, TokenSource::Keyring));
        }

        if self.read_env
            && let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            return Some((token, TokenSource::Env));
        }

        self.load_file().map(|token| (token, TokenSource::File))
    }

    /// Write to the keyring and read the token back through a fresh entry.
    ///
    /// Backends without persistence (keyring's in-process mock store on
    /// platforms with no native backend) accept the write but lose it.
    fn store_keyring(&self, token: &str) -> Result<(), AuthError> {
        let entry = self
            .keyring_entry()
            .ok_or_else(|| AuthError::KeyringError("keyring unavailable".into()))?;
        entry
            .set_password(token)
            .map_err(|e| AuthError::KeyringError(format!("set password: {e}")))?;

        let stored = self
            .keyring_entry()
            .and_then(|entry| entry.get_password().ok());
        if stored.as_deref() == Some(token) {
            Ok(())
        } else {
            Err(AuthError::KeyringError(
                "token did not persist in the keyring".into(),
            ))
        }
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    fn store_file(&self, token: &str) -> Result<(), AuthError> {
        let path = self.credentials_path.as_ref().ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found; cannot store credentials".into())
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        fs::write(path, token)
            .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::TokenStoreError(format!("chmod {}: {e}", path.display()))
            })?;
        }

        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        let path = self.credentials_path.as_ref()?;
        fs::read_to_string(path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
