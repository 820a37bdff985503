//! Bearer-token authentication for write routes.
//!
//! A request is authenticated by either a session token issued at login
//! (checked against the stored user on every request, so deleting a user or
//! demoting them takes effect immediately) or the optional static
//! `ADMIN_TOKEN` service token.

use std::fmt;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use carlton_core::store::UserStore;
use carlton_core::user::{Role, User};
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

/// Who is making the request.
#[derive(Debug, Clone)]
pub enum Principal {
    /// Holder of the static service token.
    Service,
    User(User),
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::Service => Role::Admin,
            Principal::User(user) => user.role,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Service => None,
            Principal::User(user) => Some(user),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Service => f.write_str("service-token"),
            Principal::User(user) => write!(f, "user:{}", user.id),
        }
    }
}

/// The bearer credential, if the `Authorization` header carries a usable one.
/// A missing or undecodable header reads as no token.
async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()?;
    let token = bearer.token().trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

async fn authenticate(state: &AppState, token: &str) -> Result<Principal, ApiError> {
    if let Some(service_token) = &state.config().admin_token {
        if tokens_match(token, service_token) {
            return Ok(Principal::Service);
        }
    }

    let claims = state.tokens().verify(token).map_err(|err| {
        tracing::debug!("rejected bearer token: {err}");
        ApiError::Forbidden("Invalid or expired token".to_string())
    })?;

    match state.store().find_user(claims.sub).await? {
        Some(user) => Ok(Principal::User(user)),
        None => Err(ApiError::Forbidden("Account no longer exists".to_string())),
    }
}

async fn required_principal(parts: &mut Parts, state: &AppState) -> Result<Principal, ApiError> {
    let token = bearer_token(parts, state)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;
    authenticate(state, &token).await
}

/// Any authenticated principal allowed to change content and resources.
#[derive(Debug, Clone)]
pub struct Editor(pub Principal);

impl FromRequestParts<AppState> for Editor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let principal = required_principal(parts, state).await?;
        if !principal.role().can_edit() {
            return Err(ApiError::Forbidden("Editing requires an editor account".to_string()));
        }
        Ok(Self(principal))
    }
}

/// An authenticated principal allowed to manage user accounts.
#[derive(Debug, Clone)]
pub struct Admin(pub Principal);

impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let principal = required_principal(parts, state).await?;
        if !principal.role().can_manage_users() {
            return Err(ApiError::Forbidden("Administrator access required".to_string()));
        }
        Ok(Self(principal))
    }
}

/// The caller's session if a valid token was presented, `None` otherwise.
/// Never rejects; used where anonymous access gets a degraded answer.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let Some(token) = bearer_token(parts, state).await else {
            return Ok(Self(None));
        };
        match authenticate(state, &token).await {
            Ok(principal) => Ok(Self(Some(principal))),
            Err(ApiError::Forbidden(_)) => Ok(Self(None)),
            Err(other) => Err(other),
        }
    }
}
