use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use carlton_core::section::validate::{validate_new_section, validate_section_update};
use carlton_core::section::{GlobalSection, NewGlobalSection, SectionFilter, SectionUpdate};
use carlton_core::store::SectionStore;

use crate::auth::Editor;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, PathId};
use crate::state::AppState;

/// Bilingual page-section routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/globalSections",
            get(list_sections).post(create_section),
        )
        .route("/api/globalSections/key/{key}", get(get_section_by_key))
        .route(
            "/api/globalSections/{id}",
            get(get_section).put(update_section).delete(delete_section),
        )
}

fn not_found() -> ApiError {
    ApiError::NotFound("Section not found".to_string())
}

async fn list_sections(
    State(state): State<AppState>,
    Query(filter): Query<SectionFilter>,
) -> ApiResult<Json<Vec<GlobalSection>>> {
    Ok(Json(state.store().list_sections(&filter).await?))
}

async fn get_section(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<GlobalSection>> {
    let section = state.store().find_section(id).await?.ok_or_else(not_found)?;
    Ok(Json(section))
}

async fn get_section_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GlobalSection>> {
    let section = state
        .store()
        .find_section_by_key(&key)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(section))
}

async fn create_section(
    State(state): State<AppState>,
    Editor(actor): Editor,
    JsonBody(section): JsonBody<NewGlobalSection>,
) -> ApiResult<(StatusCode, Json<GlobalSection>)> {
    validate_new_section(&section)?;
    let created = state.store().insert_section(section).await?;
    tracing::info!(%actor, section = %created.section_key, "section created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Whole-document replacement. A `version` in the body must match the
/// stored one or the write is refused with 409.
async fn update_section(
    State(state): State<AppState>,
    Editor(actor): Editor,
    PathId(id): PathId,
    JsonBody(update): JsonBody<SectionUpdate>,
) -> ApiResult<Json<GlobalSection>> {
    validate_section_update(&update)?;
    if update.version.is_none() {
        tracing::debug!(%actor, %id, "unversioned section update, last write wins");
    }
    let updated = state
        .store()
        .update_section(id, update)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(
        %actor,
        section = %updated.section_key,
        version = updated.version,
        "section updated"
    );
    Ok(Json(updated))
}

async fn delete_section(
    State(state): State<AppState>,
    Editor(actor): Editor,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    if !state.store().delete_section(id).await? {
        return Err(not_found());
    }
    tracing::info!(%actor, %id, "section deleted");
    Ok(StatusCode::NO_CONTENT)
}
