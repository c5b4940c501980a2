#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use tollgate_api::config::ServerConfig;
use tollgate_api::router::build_app_router;
use tollgate_api::state::AppState;
use tollgate_core::{AuthConfig, HashCost, LogNotifier, MemorySessionStore, SessionManager};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-signing-key";

/// Build a test `ServerConfig` with safe defaults.
///
/// Proxy headers are trusted so tests can pick the client IP per request,
/// and hashing runs at the minimum Argon2 cost.
pub fn test_config() -> ServerConfig {
    let mut auth = AuthConfig::new(TEST_SECRET);
    auth.hash_cost = HashCost::minimal();
    auth.access_token_ttl = Duration::minutes(15);

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        trust_proxy_headers: true,
        auth,
    }
}

/// Build the full application router backed by an in-memory session store.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let sessions = SessionManager::new(
        &config.auth,
        Arc::new(MemorySessionStore::new()),
        Arc::new(LogNotifier),
    )
    .expect("test auth config should be valid");

    let state = AppState {
        config: Arc::new(config),
        sessions: Arc::new(sessions),
    };
    build_app_router(state).expect("test CORS origins are valid")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request through the router without binding a socket.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    client_ip: Option<&str>,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ip) = client_ip {
        builder = builder.header("x-forwarded-for", ip);
    }
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None, None).await
}

/// Issue a token pair for `guid` from `ip` and return the JSON body.
pub async fn issue(app: Router, guid: &str, ip: &str) -> serde_json::Value {
    let uri = format!("/api/v1/auth/token?guid={guid}");
    let response = send(app, Method::POST, &uri, Some(ip), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Call the refresh endpoint for `guid` from `ip`.
pub async fn refresh(app: Router, guid: &str, ip: &str, refresh_token: &str) -> Response {
    let uri = format!("/api/v1/auth/refresh?guid={guid}");
    let body = serde_json::json!({ "refresh_token": refresh_token });
    send(app, Method::POST, &uri, Some(ip), None, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
