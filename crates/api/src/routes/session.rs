use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use carlton_core::auth::{PasswordError, PasswordManager};
use carlton_core::store::UserStore;
use carlton_core::user::validate::{normalize_email, validate_new_user};
use carlton_core::user::{NewUser, Role, User, UserDraft};
use serde::{Deserialize, Serialize};

use crate::auth::MaybeSession;
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::state::AppState;

/// Login, self-registration and the permission probe.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

impl SessionResponse {
    fn open(state: &AppState, user: User) -> ApiResult<Self> {
        Ok(Self {
            token: state.tokens().issue(&user)?,
            expires_in: state.tokens().ttl().num_seconds(),
            user,
        })
    }
}

/// What the caller may do, as decided by the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: Option<User>,
    pub role: Option<Role>,
    pub can_edit: bool,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let email = normalize_email(&body.email);
    let Some(user) = state.store().find_user_by_email(&email).await? else {
        tracing::info!(%email, "login for unknown account");
        return Err(invalid_credentials());
    };

    let verified = match PasswordManager::verify_password(&body.password, &user.password_hash) {
        Ok(verified) => verified,
        Err(PasswordError::MalformedHash(reason)) => {
            tracing::warn!(user_id = %user.id, %reason, "stored password hash is unusable");
            false
        }
        Err(err) => return Err(err.into()),
    };
    if !verified {
        tracing::info!(user_id = %user.id, "login with wrong password");
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = %user.id, role = %user.role, "session opened");
    Ok(Json(SessionResponse::open(&state, user)?))
}

/// Self-service sign-up. The account is always a viewer; an admin
/// promotes it through the users API.
async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewUser>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    validate_new_user(&body)?;
    let draft = UserDraft {
        email: normalize_email(&body.email),
        name: body.name.trim().to_string(),
        role: Role::Viewer,
        password_hash: PasswordManager::hash_password(&body.password)?,
    };
    let user = state.store().insert_user(draft).await?;
    tracing::info!(user_id = %user.id, "account registered");
    Ok((StatusCode::CREATED, Json(SessionResponse::open(&state, user)?)))
}

async fn me(MaybeSession(principal): MaybeSession) -> Json<MeResponse> {
    let response = match principal {
        Some(principal) => MeResponse {
            role: Some(principal.role()),
            can_edit: principal.role().can_edit(),
            user: principal.user().cloned(),
        },
        None => MeResponse {
            user: None,
            role: None,
            can_edit: false,
        },
    };
    Json(response)
}
