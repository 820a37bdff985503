use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use carlton_core::auth::PasswordManager;
use carlton_core::store::UserStore;
use carlton_core::user::validate::{normalize_email, validate_new_user, validate_user_update};
use carlton_core::user::{NewUser, User, UserChanges, UserDraft, UserUpdate};

use crate::auth::Admin;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, PathId};
use crate::state::AppState;

/// Account management. Every verb requires an administrator.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

async fn list_users(State(state): State<AppState>, _: Admin) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store().list_users().await?))
}

async fn get_user(
    State(state): State<AppState>,
    _: Admin,
    PathId(id): PathId,
) -> ApiResult<Json<User>> {
    let user = state.store().find_user(id).await?.ok_or_else(not_found)?;
    Ok(Json(user))
}

async fn create_user(
    State(state): State<AppState>,
    Admin(actor): Admin,
    JsonBody(body): JsonBody<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_new_user(&body)?;
    let draft = UserDraft {
        email: normalize_email(&body.email),
        name: body.name.trim().to_string(),
        role: body.role.unwrap_or_default(),
        password_hash: PasswordManager::hash_password(&body.password)?,
    };
    let user = state.store().insert_user(draft).await?;
    tracing::info!(%actor, user_id = %user.id, role = %user.role, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Admin(actor): Admin,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UserUpdate>,
) -> ApiResult<Json<User>> {
    validate_user_update(&body)?;
    let password_hash = body
        .password
        .as_deref()
        .map(PasswordManager::hash_password)
        .transpose()?;
    let changes = UserChanges {
        email: body.email.as_deref().map(normalize_email),
        name: body.name.map(|name| name.trim().to_string()),
        role: body.role,
        password_hash,
    };
    let user = state
        .store()
        .update_user(id, changes)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(%actor, user_id = %user.id, role = %user.role, "user updated");
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Admin(actor): Admin,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    if !state.store().delete_user(id).await? {
        return Err(not_found());
    }
    tracing::info!(%actor, user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
