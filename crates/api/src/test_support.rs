//! In-process harness for router tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use carlton_core::auth::PasswordManager;
use carlton_core::store::{MemoryStore, UserStore};
use carlton_core::user::{Role, User, UserDraft};
use serde_json::Value;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

pub const SERVICE_TOKEN: &str = "test-service-token";
pub const TEST_PASSWORD: &str = "motdepasse-42";

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()), None, AppConfig::for_tests());
        let router = build_router(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Stores a user with [`TEST_PASSWORD`] and returns it with a session token.
    pub async fn user_with_role(&self, email: &str, role: Role) -> (User, String) {
        let draft = UserDraft {
            email: email.to_string(),
            name: String::new(),
            role,
            password_hash: PasswordManager::hash_password(TEST_PASSWORD).unwrap(),
        };
        let user = self.state.store().insert_user(draft).await.unwrap();
        let token = self.state.tokens().issue(&user).unwrap();
        (user, token)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    request(Method::GET, uri, None, None)
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
