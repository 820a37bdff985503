pub mod cors;
pub mod request_tracing;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::AppConfig;

/// Wrap the router in the HTTP layers every route shares.
pub fn apply(router: Router, config: &AppConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(request_tracing::trace_layer())
        .layer(cors::cors_layer())
}
