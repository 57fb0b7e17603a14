use crate::{
    config::Config,
    identity::{IdentityProvider, Sessions, StaticIdentityProvider},
    models::Post,
    store::{MemoryStore, PostStore, StoreError},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval, timeout},
};
use tracing::debug;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cheap to clone: every field is behind an `Arc`.
///
/// There is no per-user state here. Who is signed in travels with each
/// request as a session cookie; `sessions` only verifies it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub sessions: Arc<Sessions>,
    pub config: Arc<Config>,
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn PostStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let sessions = Sessions::new(provider, config.jwt_secret.clone(), config.session_ttl);
        let login_limiter = RateLimiter::keyed(Quota::per_minute(config.login_attempts_per_minute));

        Self {
            store,
            sessions: Arc::new(sessions),
            config: Arc::new(config),
            login_limiter: Arc::new(login_limiter),
        }
    }

    /// State with the in-memory store and the accounts listed in `config`.
    pub fn from_config(config: Config) -> Self {
        let provider = StaticIdentityProvider::new(config.users.clone());
        Self::new(config, Arc::new(MemoryStore::new()), Arc::new(provider))
    }

    /// Drop limiter entries for emails whose quota has fully replenished.
    pub fn sweep_login_limiter(&self) {
        self.login_limiter.retain_recent();
        self.login_limiter.shrink_to_fit();
    }

    /// Sweep the login limiter every `every` until the runtime shuts down.
    pub fn spawn_login_limiter_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(every);
            loop {
                ticker.tick().await;
                state.sweep_login_limiter();
                debug!(tracked = state.login_limiter.len(), "login limiter swept");
            }
        })
    }

    pub async fn list_posts(&self, limit: Option<usize>) -> Result<Vec<Post>, StoreError> {
        timeout(self.config.upstream_timeout, self.store.list(limit))
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    pub async fn append_post(&self, post: Post) -> Result<(), StoreError> {
        timeout(self.config.upstream_timeout, self.store.append(post))
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}
