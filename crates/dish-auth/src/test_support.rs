//! Shared test utilities for dish-auth unit tests.

pub(crate) mod fakes {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use dish_cache::{CacheService, CacheSettings, ManualClock, MemoryStorage};
    use dish_core::Session;

    use crate::error::AuthError;
    use crate::rpc::{AuthRpc, RemoteAuthRecord};
    use crate::session::SessionSource;

    /// What the fake resolver answers with.
    #[derive(Debug, Clone)]
    pub enum RpcReply {
        Row(RemoteAuthRecord),
        Empty,
        Fail(String),
    }

    /// Remote resolver that records calls and replays a configurable reply.
    pub struct FakeRpc {
        reply: Mutex<RpcReply>,
        calls: AtomicUsize,
    }

    impl FakeRpc {
        pub fn new(reply: RpcReply) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(reply),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn customer(client_id: &str) -> Arc<Self> {
            Self::new(RpcReply::Row(RemoteAuthRecord {
                role: Some("customer".into()),
                client_id: Some(client_id.into()),
                has_linked_client_record: Some(true),
            }))
        }

        pub fn set_reply(&self, reply: RpcReply) {
            *self.reply.lock().expect("reply lock") = reply;
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthRpc for FakeRpc {
        async fn resolve_user_auth(
            &self,
            _user_id: &str,
        ) -> Result<Option<RemoteAuthRecord>, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply.lock().expect("reply lock").clone() {
                RpcReply::Row(record) => Ok(Some(record)),
                RpcReply::Empty => Ok(None),
                RpcReply::Fail(message) => Err(AuthError::Rpc(message)),
            }
        }
    }

    /// Session source with a fixed outcome.
    pub struct FakeSessions {
        outcome: Result<Option<Session>, String>,
        calls: AtomicUsize,
    }

    impl FakeSessions {
        pub fn none() -> Arc<Self> {
            Self::with(Ok(None))
        }

        pub fn user(id: &str, email: Option<&str>) -> Arc<Self> {
            Self::with(Ok(Some(Session::for_user(id, email.map(String::from)))))
        }

        pub fn failing(message: &str) -> Arc<Self> {
            Self::with(Err(message.to_string()))
        }

        pub fn with(outcome: Result<Option<Session>, String>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionSource for FakeSessions {
        async fn current_session(&self) -> Result<Option<Session>, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map_err(AuthError::Session)
        }
    }

    /// In-memory cache driven by a manual clock.
    pub fn memory_cache() -> (Arc<CacheService>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let cache = CacheService::new(
            Arc::new(MemoryStorage::new()),
            clock.clone(),
            CacheSettings::default(),
        );
        (Arc::new(cache), clock)
    }
}
