use std::sync::Arc;

use anyhow::Context;
use dish_auth::{
    AuthResolutionService, AuthSettings, BackendClient, CommentAuthorResolver, TokenStore,
};
use dish_cache::{CacheService, CacheSettings, FileStorage, MemoryStorage, Storage, SystemClock};
use dish_config::SnapdishConfig;

/// Shared application resources initialized once at startup.
///
/// This is the only place a `CacheService` is built; every service receives
/// the same instance.
pub struct AppContext {
    pub config: SnapdishConfig,
    pub cache: Arc<CacheService>,
    pub token_store: TokenStore,
    backend: Option<Arc<BackendClient>>,
}

impl AppContext {
    pub fn init(config: SnapdishConfig) -> anyhow::Result<Self> {
        let storage = open_storage(&config);
        let cache = Arc::new(CacheService::new(
            storage,
            Arc::new(SystemClock),
            CacheSettings {
                prefix: config.cache.prefix.clone(),
                default_ttl: config.cache.default_ttl(),
                default_version: config.cache.version.clone(),
            },
        ));

        let token_store = TokenStore::from_env();
        let backend = config.backend.is_configured().then(|| {
            Arc::new(
                BackendClient::new(
                    config.backend.base_url(),
                    &config.backend.anon_key,
                    &config.backend.auth_rpc_function,
                )
                .with_access_token(token_store.load()),
            )
        });

        Ok(Self {
            config,
            cache,
            token_store,
            backend,
        })
    }

    /// The BaaS client.
    pub fn backend(&self) -> anyhow::Result<Arc<BackendClient>> {
        self.backend.clone().context(
            "backend is not configured; set SNAPDISH_BACKEND__URL and SNAPDISH_BACKEND__ANON_KEY",
        )
    }

    pub fn auth_service(&self) -> anyhow::Result<AuthResolutionService> {
        let backend = self.backend()?;
        let settings = AuthSettings {
            bypass_email: self.config.auth.bypass_email().map(String::from),
            cache_ttl: self.config.auth.cache_ttl(),
        };
        Ok(AuthResolutionService::new(
            Arc::clone(&self.cache),
            backend.clone(),
            backend,
            settings,
        ))
    }

    pub fn comment_author_resolver(&self) -> anyhow::Result<CommentAuthorResolver> {
        let fallback = self
            .config
            .fallback_author_id()
            .context("comment author fallback is required")?
            .to_string();
        Ok(CommentAuthorResolver::new(self.backend()?, fallback))
    }
}

/// Open the persistent storage file, degrading to in-memory storage if it is
/// unusable so cache problems never block a command.
fn open_storage(config: &SnapdishConfig) -> Arc<dyn Storage> {
    let Some(path) = config.cache.resolved_storage_path() else {
        tracing::warn!("no data directory found; cache will not persist between runs");
        return Arc::new(MemoryStorage::new());
    };

    match FileStorage::open(&path) {
        Ok(storage) => Arc::new(storage),
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "cache storage unusable; using in-memory cache");
            Arc::new(MemoryStorage::new())
        }
    }
}
