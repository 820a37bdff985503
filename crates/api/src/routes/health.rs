use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check. Verifies database connectivity when a database is configured.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let Some(pool) = state.pool() else {
        return Ok(Json(json!({ "status": "ok", "database": "memory" })));
    };

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| {
            crate::error::ApiError::Internal(format!("database health check failed: {e}"))
        })?;

    Ok(Json(json!({
        "status": "ok",
        "database": "connected",
    })))
}

/// Lightweight ping. No database check.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
