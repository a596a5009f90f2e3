//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers), adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/skills", get(http::http_get_skills))
        .route("/api/v1/assessments", post(http::http_post_start))
        .route(
            "/api/v1/assessments/:id",
            get(http::http_get_assessment).delete(http::http_delete_assessment),
        )
        .route("/api/v1/assessments/:id/answer", post(http::http_post_answer))
        .route("/api/v1/assessments/:id/next_skill", post(http::http_post_next_skill))
        .route("/api/v1/assessments/:id/summary", get(http::http_get_summary))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;

    fn app(dir: &std::path::Path) -> Router {
        let cfg = AppConfig { results_dir: dir.to_path_buf(), ..AppConfig::default() };
        build_router(Arc::new(AppState::from_config(cfg)))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn health_and_skills() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let (status, body) = call(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        let (_, body) = call(&app, "GET", "/api/v1/skills", None).await;
        assert_eq!(body["skills"], json!(["general"]));
        assert_eq!(body["default_tier"], "middle");
    }

    /// Index of a wrong option for the pending question (the key is never sent to clients).
    async fn wrong_index(state: &AppState, id: uuid::Uuid) -> usize {
        let map = state.candidacies.read().await;
        let pending = map[&id].session().pending_question().unwrap();
        pending.question.options.iter().position(|o| !o.is_answer_key).unwrap()
    }

    #[tokio::test]
    async fn fresher_double_miss_fails_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig { results_dir: dir.path().to_path_buf(), ..AppConfig::default() };
        let state = Arc::new(AppState::from_config(cfg));
        let app = build_router(state.clone());

        let (status, body) =
            call(&app, "POST", "/api/v1/assessments", Some(json!({ "account": "Ana", "tier": "fresher" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["current_level"], "F3");
        assert!(body["question"]["options"][0].is_string(), "answer key must not leak");
        let id: uuid::Uuid = body["id"].as_str().unwrap().parse().unwrap();
        let answer_uri = format!("/api/v1/assessments/{id}/answer");

        let idx = wrong_index(&state, id).await;
        let (_, body) = call(&app, "POST", &answer_uri, Some(json!({ "selectedIndex": idx }))).await;
        assert_eq!(body["correct"], false);
        assert_eq!(body["assessment"]["current_level"], "F1");

        let idx = wrong_index(&state, id).await;
        let (status, body) = call(&app, "POST", &answer_uri, Some(json!({ "selectedIndex": idx }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["finished"], true);
        assert_eq!(body["failed"], true);
        assert_eq!(body["final_label"], "LEVELF0");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let (status, _) = call(&app, "POST", &answer_uri, Some(json!({ "selectedIndex": 0 }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/assessments/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "GET", &format!("/api/v1/assessments/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn error_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) =
            call(&app, "POST", "/api/v1/assessments", Some(json!({ "account": "ana", "tier": "wizard" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");

        let missing = uuid::Uuid::new_v4();
        let (status, _) = call(&app, "GET", &format!("/api/v1/assessments/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = call(&app, "POST", "/api/v1/assessments", Some(json!({ "account": "ana" }))).await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) =
            call(&app, "POST", &format!("/api/v1/assessments/{id}/answer"), Some(json!({ "selectedIndex": 7 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "data_integrity");

        let (status, body) = call(&app, "POST", &format!("/api/v1/assessments/{id}/next_skill"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "invalid_state");

        let (status, body) = call(&app, "GET", &format!("/api/v1/assessments/{id}/summary"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!([]));
    }
}
