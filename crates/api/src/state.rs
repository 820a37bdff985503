use std::sync::Arc;

use carlton_core::auth::SessionTokens;
use carlton_core::store::ContentStore;
use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn ContentStore>,
    /// Present when running against PostgreSQL; used by the health check.
    pool: Option<PgPool>,
    config: AppConfig,
    tokens: SessionTokens,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, pool: Option<PgPool>, config: AppConfig) -> Self {
        let tokens = SessionTokens::new(
            &config.jwt_secret,
            chrono::Duration::seconds(config.session_ttl_secs),
        );
        Self {
            inner: Arc::new(InnerState {
                store,
                pool,
                config,
                tokens,
            }),
        }
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.inner.store.as_ref()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.inner.tokens
    }
}
