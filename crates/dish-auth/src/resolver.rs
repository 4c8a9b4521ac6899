//! Cache-first resolution of a user's role and client linkage.
//!
//! Lookup order for [`AuthResolutionService::get_user_auth_data`]:
//!
//! ```text
//! cache hit ──────────────────────────────▶ return (from_cache = true)
//! miss → session email == bypass email ───▶ admin, cached
//!      → remote RPC ── error / no row ────▶ unresolved, NOT cached
//!                   └─ row ───────────────▶ mapped, cached
//! ```
//!
//! A hit never calls out, even if the user's role changed server-side within
//! the TTL window. Server-side enforcement is unaffected by this staleness.
//! Concurrent misses for the same user are not coalesced; the last writer wins.

use std::sync::Arc;
use std::time::Duration;

use dish_cache::{CacheOptions, CacheService};
use dish_core::AuthData;

use crate::rpc::AuthRpc;
use crate::session::SessionSource;

/// Logical cache key prefix for auth entries.
pub const AUTH_CACHE_PREFIX: &str = "auth_data_";

const NO_DATA_MESSAGE: &str = "no auth data returned for user";

/// Logical cache key for one user's auth data.
#[must_use]
pub fn auth_cache_key(user_id: &str) -> String {
    format!("{AUTH_CACHE_PREFIX}{user_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Session email resolved straight to admin. `None` disables the bypass.
    pub bypass_email: Option<String>,
    pub cache_ttl: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bypass_email: None,
            cache_ttl: Duration::from_secs(30 * 60),
        }
    }
}

pub struct AuthResolutionService {
    cache: Arc<CacheService>,
    rpc: Arc<dyn AuthRpc>,
    sessions: Arc<dyn SessionSource>,
    settings: AuthSettings,
}

impl AuthResolutionService {
    #[must_use]
    pub fn new(
        cache: Arc<CacheService>,
        rpc: Arc<dyn AuthRpc>,
        sessions: Arc<dyn SessionSource>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            cache,
            rpc,
            sessions,
            settings,
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<CacheService> {
        &self.cache
    }

    /// Resolve auth data for `user_id`, serving from cache when possible.
    pub async fn get_user_auth_data(&self, user_id: &str) -> AuthData {
        let key = auth_cache_key(user_id);
        if let Some(cached) = self.cache.get::<AuthData>(&key, None) {
            tracing::debug!(user_id, "auth data served from cache");
            return cached.with_from_cache();
        }

        if let Some(data) = self.try_emergency_bypass(user_id).await {
            return data;
        }

        self.fetch_and_cache(user_id).await
    }

    /// Always hit the remote resolver and overwrite the cache on success.
    ///
    /// For background refreshes where the caller already holds a value.
    pub async fn refresh_auth_data_silently(&self, user_id: &str) -> AuthData {
        self.fetch_and_cache(user_id).await
    }

    /// Drop one user's cached entry. Call on logout or role change only.
    pub fn clear_auth_cache(&self, user_id: &str) {
        self.cache.remove(&auth_cache_key(user_id));
    }

    /// Drop every cached auth entry. Call on application version upgrades only.
    pub fn clear_all_auth_cache(&self) {
        self.cache.invalidate_pattern(AUTH_CACHE_PREFIX);
    }

    async fn try_emergency_bypass(&self, user_id: &str) -> Option<AuthData> {
        let bypass_email = self.settings.bypass_email.as_deref()?;

        let session = match self.sessions.current_session().await {
            Ok(session) => session?,
            Err(error) => {
                tracing::warn!(%error, user_id, "bypass session lookup failed; continuing with RPC");
                return None;
            }
        };

        if session.email() != Some(bypass_email) {
            return None;
        }

        tracing::info!(user_id, "bypass identity matched; resolving as admin");
        let data = AuthData::admin_bypass();
        self.cache.set(
            &auth_cache_key(user_id),
            &data,
            CacheOptions::ttl(self.settings.cache_ttl),
        );
        Some(data)
    }

    async fn fetch_and_cache(&self, user_id: &str) -> AuthData {
        match self.rpc.resolve_user_auth(user_id).await {
            Err(error) => {
                tracing::warn!(%error, user_id, "auth RPC failed");
                AuthData::unresolved(error.to_string())
            }
            Ok(None) => {
                tracing::warn!(user_id, "auth RPC returned no data");
                AuthData::unresolved(NO_DATA_MESSAGE)
            }
            Ok(Some(record)) => {
                let data = record.into_auth_data();
                self.cache.set(
                    &auth_cache_key(user_id),
                    &data,
                    CacheOptions::ttl(self.settings.cache_ttl),
                );
                data
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rpc::RemoteAuthRecord;
    use crate::test_support::fakes::{FakeRpc, FakeSessions, RpcReply, memory_cache};
    use dish_core::UserRole;

    const BYPASS: &str = "ops@example.com";

    fn service(
        rpc: Arc<FakeRpc>,
        sessions: Arc<FakeSessions>,
        bypass_email: Option<&str>,
    ) -> (AuthResolutionService, Arc<dish_cache::ManualClock>) {
        let (cache, clock) = memory_cache();
        let settings = AuthSettings {
            bypass_email: bypass_email.map(String::from),
            ..AuthSettings::default()
        };
        (
            AuthResolutionService::new(cache, rpc, sessions, settings),
            clock,
        )
    }

    #[tokio::test]
    async fn miss_calls_rpc_and_caches_result() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);

        let data = auth.get_user_auth_data("u1").await;
        assert_eq!(data.role, Some(UserRole::Customer));
        assert_eq!(data.client_id.as_deref(), Some("client-1"));
        assert!(data.has_linked_client_record);
        assert!(data.restaurant_name.is_none());
        assert!(!data.from_cache);
        assert_eq!(rpc.calls(), 1);

        assert!(auth.cache().is_valid(&auth_cache_key("u1"), None));
    }

    #[tokio::test]
    async fn hit_short_circuits_rpc() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);

        auth.get_user_auth_data("u1").await;
        let second = auth.get_user_auth_data("u1").await;

        assert!(second.from_cache);
        assert_eq!(second.client_id.as_deref(), Some("client-1"));
        assert_eq!(rpc.calls(), 1);
    }

    #[tokio::test]
    async fn primed_cache_entry_is_served_without_rpc() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);
        auth.cache().set(
            &auth_cache_key("u1"),
            &AuthData::admin_bypass(),
            CacheOptions::default(),
        );

        let data = auth.get_user_auth_data("u1").await;
        assert!(data.from_cache);
        assert!(data.is_admin());
        assert_eq!(rpc.calls(), 0);
    }

    #[tokio::test]
    async fn stale_hit_within_ttl_ignores_server_side_change() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);
        auth.get_user_auth_data("u1").await;

        rpc.set_reply(RpcReply::Row(RemoteAuthRecord {
            role: Some("admin".into()),
            ..Default::default()
        }));

        let data = auth.get_user_auth_data("u1").await;
        assert_eq!(data.role, Some(UserRole::Customer));
        assert_eq!(rpc.calls(), 1);
    }

    #[tokio::test]
    async fn entry_expires_after_thirty_minutes() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, clock) = service(rpc.clone(), FakeSessions::none(), None);
        auth.get_user_auth_data("u1").await;

        clock.advance(Duration::from_secs(30 * 60));
        assert!(auth.get_user_auth_data("u1").await.from_cache);

        clock.advance(Duration::from_millis(1));
        assert!(!auth.get_user_auth_data("u1").await.from_cache);
        assert_eq!(rpc.calls(), 2);
    }

    #[tokio::test]
    async fn bypass_email_resolves_admin_without_rpc() {
        let rpc = FakeRpc::customer("client-1");
        let sessions = FakeSessions::user("u1", Some(BYPASS));
        let (auth, _) = service(rpc.clone(), sessions, Some(BYPASS));

        let data = auth.get_user_auth_data("u1").await;
        assert_eq!(
            data,
            AuthData {
                role: Some(UserRole::Admin),
                client_id: None,
                restaurant_name: None,
                has_linked_client_record: false,
                error: None,
                from_cache: false,
            }
        );
        assert_eq!(rpc.calls(), 0);

        let again = auth.get_user_auth_data("u1").await;
        assert!(again.from_cache);
        assert!(again.is_admin());
    }

    #[tokio::test]
    async fn other_email_falls_through_to_rpc() {
        let rpc = FakeRpc::customer("client-1");
        let sessions = FakeSessions::user("u1", Some("chef@example.com"));
        let (auth, _) = service(rpc.clone(), sessions, Some(BYPASS));

        let data = auth.get_user_auth_data("u1").await;
        assert_eq!(data.role, Some(UserRole::Customer));
        assert_eq!(rpc.calls(), 1);
    }

    #[tokio::test]
    async fn bypass_session_failure_is_swallowed() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::failing("offline"), Some(BYPASS));

        let data = auth.get_user_auth_data("u1").await;
        assert!(!data.is_error());
        assert_eq!(rpc.calls(), 1);
    }

    #[tokio::test]
    async fn no_bypass_configured_skips_session_lookup() {
        let sessions = FakeSessions::user("u1", Some(BYPASS));
        let (auth, _) = service(FakeRpc::customer("c"), sessions.clone(), None);

        auth.get_user_auth_data("u1").await;
        assert_eq!(sessions.calls(), 0);
    }

    #[tokio::test]
    async fn rpc_failure_is_not_cached_and_retries() {
        let rpc = FakeRpc::new(RpcReply::Fail("connection reset".into()));
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);

        let first = auth.get_user_auth_data("u1").await;
        assert!(first.role.is_none());
        assert!(first.client_id.is_none());
        assert!(first.error.as_deref().is_some_and(|e| e.contains("connection reset")));

        let second = auth.get_user_auth_data("u1").await;
        assert!(!second.from_cache);
        assert_eq!(rpc.calls(), 2);
    }

    #[tokio::test]
    async fn empty_rpc_result_is_distinct_and_uncached() {
        let rpc = FakeRpc::new(RpcReply::Empty);
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);

        let data = auth.get_user_auth_data("u1").await;
        assert_eq!(data.error.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(!auth.cache().is_valid(&auth_cache_key("u1"), None));

        auth.get_user_auth_data("u1").await;
        assert_eq!(rpc.calls(), 2);
    }

    #[tokio::test]
    async fn refresh_skips_cache_and_overwrites() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);
        auth.get_user_auth_data("u1").await;

        rpc.set_reply(RpcReply::Row(RemoteAuthRecord {
            role: Some("admin".into()),
            client_id: None,
            has_linked_client_record: Some(false),
        }));
        let refreshed = auth.refresh_auth_data_silently("u1").await;
        assert!(refreshed.is_admin());
        assert!(!refreshed.from_cache);
        assert_eq!(rpc.calls(), 2);

        let next = auth.get_user_auth_data("u1").await;
        assert!(next.from_cache);
        assert!(next.is_admin());
        assert_eq!(rpc.calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_entry() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);
        auth.get_user_auth_data("u1").await;

        rpc.set_reply(RpcReply::Fail("timeout".into()));
        assert!(auth.refresh_auth_data_silently("u1").await.is_error());

        let next = auth.get_user_auth_data("u1").await;
        assert!(next.from_cache);
        assert_eq!(next.client_id.as_deref(), Some("client-1"));
    }

    #[tokio::test]
    async fn clear_auth_cache_removes_one_user() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);
        auth.get_user_auth_data("u1").await;
        auth.get_user_auth_data("u2").await;

        auth.clear_auth_cache("u1");

        assert!(!auth.get_user_auth_data("u1").await.from_cache);
        assert!(auth.get_user_auth_data("u2").await.from_cache);
        assert_eq!(rpc.calls(), 3);
    }

    #[tokio::test]
    async fn clear_all_auth_cache_leaves_other_entries() {
        let rpc = FakeRpc::customer("client-1");
        let (auth, _) = service(rpc.clone(), FakeSessions::none(), None);
        auth.get_user_auth_data("u1").await;
        auth.get_user_auth_data("u2").await;
        auth.cache().set("dashboard_counts", &3, CacheOptions::default());

        auth.clear_all_auth_cache();

        assert!(!auth.cache().is_valid(&auth_cache_key("u1"), None));
        assert!(!auth.cache().is_valid(&auth_cache_key("u2"), None));
        assert!(auth.cache().is_valid("dashboard_counts", None));
    }
}
