//! In-process notes server for HTTP client tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use notekeeper_client::api::HttpNotesApi;
use notekeeper_client::credential::{BearerToken, CredentialHandle};

pub const VALID_TOKEN: &str = "test-token";

/// Requests observed by the test server.
#[derive(Debug, Default)]
pub struct Recorded {
    pub requests: usize,
    pub note_queries: Vec<HashMap<String, String>>,
    pub bodies: Vec<Value>,
}

pub type Shared = Arc<Mutex<Recorded>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid token" })),
    )
        .into_response()
}

fn note_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": "body",
        "category_id": null,
        "category_name": null,
        "is_archived": false,
        "created_at": "2024-03-04T10:15:00.000Z",
    })
}

async fn list_notes(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    state.lock().unwrap().note_queries.push(query);
    Json(json!({ "notes": [note_json(1, "Go basics"), note_json(2, "Rust intro")] }))
        .into_response()
}

async fn get_note(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Note not found" })))
            .into_response();
    }
    Json(json!({ "note": note_json(id, "Fetched") })).into_response()
}

async fn stats(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "stats": { "total": 2, "archived": 0 } })).into_response()
}

async fn create_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    let garbled = body["title"] == "garbled";
    state.lock().unwrap().bodies.push(body);
    if garbled {
        return (StatusCode::CREATED, "<html>created</html>").into_response();
    }
    (StatusCode::CREATED, Json(json!({ "noteId": 42 }))).into_response()
}

async fn update_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    state.lock().unwrap().bodies.push(body);
    StatusCode::OK.into_response()
}

async fn delete_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Note not found" })))
            .into_response();
    }
    Json(json!({ "message": "Note deleted" })).into_response()
}

async fn archive_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    StatusCode::OK.into_response()
}

async fn list_categories(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "categories": [{ "id": 1, "name": "Work" }] })).into_response()
}

async fn write_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    state.lock().unwrap().bodies.push(body);
    StatusCode::CREATED.into_response()
}

async fn rename_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    write_category(State(state), headers, Json(body)).await
}

async fn delete_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/stats", get(stats))
        .route(
            "/api/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/api/notes/{id}/archive", put(archive_note))
        .route("/api/notes/{id}/unarchive", put(archive_note))
        .route("/api/categories", get(list_categories).post(write_category))
        .route(
            "/api/categories/{id}",
            put(rename_category).delete(delete_category),
        )
        .with_state(state)
}

/// Start the test server on an ephemeral port and return its `/api` base URL.
pub async fn spawn_server() -> (String, Shared) {
    let state = Shared::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), state)
}

/// Build a client pointed at `base_url` with the given token.
pub fn client(base_url: &str, token: Option<&str>) -> HttpNotesApi {
    HttpNotesApi::with_client(
        reqwest::Client::new(),
        base_url,
        CredentialHandle::fixed(token.map(BearerToken::new)),
    )
}
