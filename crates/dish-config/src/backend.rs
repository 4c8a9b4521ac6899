//! BaaS backend connection configuration.

use serde::{Deserialize, Serialize};

fn default_auth_rpc_function() -> String {
    "get_user_auth_data".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project base URL (e.g. `https://abc.example.co`).
    #[serde(default)]
    pub url: String,

    /// Public anonymous API key, sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,

    /// Name of the RPC function that resolves a user's role and client link.
    #[serde(default = "default_auth_rpc_function")]
    pub auth_rpc_function: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            auth_rpc_function: default_auth_rpc_function(),
        }
    }
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
