//! `reqwest` client for the BaaS REST, RPC and auth endpoints.
//!
//! - RPC: `POST {url}/rest/v1/rpc/{function}` with `{"p_user_id": ...}`
//! - Session: `GET {url}/auth/v1/user`
//! - Login: `POST {url}/auth/v1/token?grant_type=password`
//!
//! Every request carries the anon key as `apikey`. The bearer token is the
//! signed-in user's access token when present, otherwise the anon key.

use async_trait::async_trait;
use dish_core::{Session, SessionUser};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::AuthError;
use crate::rpc::{AuthRpc, RemoteAuthRecord};
use crate::session::SessionSource;
use crate::token::{EXPIRY_BUFFER_SECS, is_near_expiry};

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    auth_rpc_function: String,
    access_token: Option<String>,
}

impl BackendClient {
    #[must_use]
    pub fn new(base_url: &str, anon_key: &str, auth_rpc_function: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            auth_rpc_function: auth_rpc_function.to_string(),
            access_token: None,
        }
    }

    /// Attach the signed-in user's access token.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    /// Email/password sign-in. Returns the new session, including its access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LoginFailed` on transport failure, a non-2xx status,
    /// or a response without an access token.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            #[serde(default)]
            user: Option<SessionUser>,
        }

        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::LoginFailed(format!("sign in: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::LoginFailed(format!(
                "sign in: HTTP {status}: {body}"
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed(format!("parse token response: {e}")))?;
        if token.access_token.is_empty() {
            return Err(AuthError::LoginFailed("token response has no access_token".into()));
        }

        Ok(Session {
            user: token.user,
            access_token: Some(token.access_token),
        })
    }
}

#[async_trait]
impl AuthRpc for BackendClient {
    async fn resolve_user_auth(&self, user_id: &str) -> Result<Option<RemoteAuthRecord>, AuthError> {
        let function = &self.auth_rpc_function;
        let url = format!("{}/rest/v1/rpc/{function}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .json(&serde_json::json!({ "p_user_id": user_id }))
            .send()
            .await
            .map_err(|e| AuthError::Rpc(format!("{function}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Rpc(format!("{function}: HTTP {status}: {body}")));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AuthError::Rpc(format!("{function}: parse response: {e}")))?;
        parse_rpc_body(body)
    }
}

#[async_trait]
impl SessionSource for BackendClient {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };
        if is_near_expiry(token, EXPIRY_BUFFER_SECS, chrono::Utc::now()) {
            tracing::warn!("stored access token is expired; run `dish auth login`");
            return Ok(None);
        }

        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Session(format!("get user: {e}")))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!(status = %resp.status(), "access token rejected; no session");
                return Ok(None);
            }
            status if !status.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                return Err(AuthError::Session(format!("get user: HTTP {status}: {body}")));
            }
            _ => {}
        }

        let user: SessionUser = resp
            .json()
            .await
            .map_err(|e| AuthError::Session(format!("parse user: {e}")))?;
        Ok(Some(Session {
            user: Some(user),
            access_token: Some(token.to_string()),
        }))
    }
}

/// Interpret an RPC response body.
///
/// `null` and `[]` are "no row"; a set-returning function's array yields its
/// first row.
fn parse_rpc_body(body: serde_json::Value) -> Result<Option<RemoteAuthRecord>, AuthError> {
    let row = match body {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Array(rows) => match rows.into_iter().next() {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(row) => row,
        },
        row => row,
    };

    serde_json::from_value(row)
        .map(Some)
        .map_err(|e| AuthError::Rpc(format!("unexpected RPC row shape: {e}")))
}
