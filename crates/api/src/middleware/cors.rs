use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The public site and the admin run on other origins. Credentials travel
/// in the `Authorization` header, never cookies, so any origin is allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
