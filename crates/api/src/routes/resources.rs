use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use carlton_core::resource::{ResourceKind, ResourceRecord};
use carlton_core::store::ResourceStore;
use serde_json::Value;

use crate::auth::Editor;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, PathId};
use crate::state::AppState;

/// Five-verb routes for every catalogue family: public reads, editor writes.
pub fn routes() -> Router<AppState> {
    ResourceKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(family_routes(kind)))
}

fn family_routes(kind: ResourceKind) -> Router<AppState> {
    let collection = format!("/api/{}", kind.path());
    let item = format!("/api/{}/{{id}}", kind.path());

    Router::new()
        .route(
            &collection,
            get(move |state: State<AppState>| list(kind, state)).post(
                move |state: State<AppState>, editor: Editor, body: JsonBody<Value>| {
                    create(kind, state, editor, body)
                },
            ),
        )
        .route(
            &item,
            get(move |state: State<AppState>, id: PathId| find(kind, state, id))
                .put(
                    move |state: State<AppState>,
                          editor: Editor,
                          id: PathId,
                          body: JsonBody<Value>| update(kind, state, editor, id, body),
                )
                .delete(
                    move |state: State<AppState>, editor: Editor, id: PathId| {
                        remove(kind, state, editor, id)
                    },
                ),
        )
}

fn not_found(kind: ResourceKind) -> ApiError {
    ApiError::NotFound(format!("{} not found", kind.label()))
}

async fn list(
    kind: ResourceKind,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ResourceRecord>>> {
    Ok(Json(state.store().list_resources(kind).await?))
}

async fn find(
    kind: ResourceKind,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<ResourceRecord>> {
    let record = state
        .store()
        .find_resource(kind, id)
        .await?
        .ok_or_else(|| not_found(kind))?;
    Ok(Json(record))
}

async fn create(
    kind: ResourceKind,
    State(state): State<AppState>,
    Editor(actor): Editor,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<(StatusCode, Json<ResourceRecord>)> {
    let data = kind.schema().validate_create(&body)?;
    let record = state.store().insert_resource(kind, data).await?;
    tracing::info!(%actor, resource = kind.path(), id = %record.id, "resource created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update(
    kind: ResourceKind,
    State(state): State<AppState>,
    Editor(actor): Editor,
    PathId(id): PathId,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Json<ResourceRecord>> {
    let changes = kind.schema().validate_patch(&body)?;
    let record = state
        .store()
        .update_resource(kind, id, changes)
        .await?
        .ok_or_else(|| not_found(kind))?;
    tracing::info!(%actor, resource = kind.path(), %id, "resource updated");
    Ok(Json(record))
}

async fn remove(
    kind: ResourceKind,
    State(state): State<AppState>,
    Editor(actor): Editor,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    if !state.store().delete_resource(kind, id).await? {
        return Err(not_found(kind));
    }
    tracing::info!(%actor, resource = kind.path(), %id, "resource deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use carlton_core::resource::ResourceKind;
    use carlton_core::user::Role;
    use serde_json::json;
    use uuid::Uuid;

    use crate::test_support::{get, request, TestApp, SERVICE_TOKEN};

    #[tokio::test]
    async fn room_without_name_is_a_validation_error() {
        let app = TestApp::new();
        let (status, body) = app
            .send(request(
                Method::POST,
                "/api/rooms",
                Some(SERVICE_TOKEN),
                Some(json!({"price": 150, "capacity": 2})),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["error"]["errors"].as_array().unwrap();
        assert!(!errors.is_empty());
        assert_eq!(errors[0]["field"], "name");
    }

    #[tokio::test]
    async fn deleting_unknown_room_is_not_found() {
        let app = TestApp::new();
        let uri = format!("/api/rooms/{}", Uuid::now_v7());
        let (status, body) = app
            .send(request(Method::DELETE, &uri, Some(SERVICE_TOKEN), None))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Room not found");
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let app = TestApp::new();
        let (status, created) = app
            .send(request(
                Method::POST,
                "/api/restaurants",
                Some(SERVICE_TOKEN),
                Some(json!({"name": "Le Bistrot", "cuisine": "Française"})),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/restaurants/{}", created["id"].as_str().unwrap());

        let (status, updated) = app
            .send(request(
                Method::PUT,
                &uri,
                Some(SERVICE_TOKEN),
                Some(json!({"capacity": 80})),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Le Bistrot");
        assert_eq!(updated["capacity"], 80);

        let (status, list) = app.send(get("/api/restaurants")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(request(Method::DELETE, &uri, Some(SERVICE_TOKEN), None))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn every_family_is_routed() {
        let app = TestApp::new();
        for kind in ResourceKind::ALL {
            let (status, body) = app.send(get(&format!("/api/{}", kind.path()))).await;
            assert_eq!(status, StatusCode::OK, "{}", kind.path());
            assert_eq!(body, json!([]));
        }
    }

    #[tokio::test]
    async fn reads_are_public_writes_are_not() {
        let app = TestApp::new();
        let body = json!({"name": "Piscine"});
        let (status, _) = app
            .send(request(Method::POST, "/api/facilities", None, Some(body)))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, viewer_token) = app.user_with_role("guest@example.com", Role::Viewer).await;
        let (status, _) = app
            .send(request(
                Method::POST,
                "/api/facilities",
                Some(&viewer_token),
                Some(json!({"name": "Piscine"})),
            ))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn editors_may_write() {
        let app = TestApp::new();
        let (_, token) = app.user_with_role("editor@carlton.mg", Role::Editor).await;
        let (status, created) = app
            .send(request(
                Method::POST,
                "/api/galleries",
                Some(&token),
                Some(json!({"title": "Piscine", "images": ["/uploads/pool.jpg"]})),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["images"][0], "/uploads/pool.jpg");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::new();
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/rooms")
            .header("authorization", format!("Bearer {SERVICE_TOKEN}"))
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let (status, body) = app.send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["errors"][0]["field"], "body");
    }
}
