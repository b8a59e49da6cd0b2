#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use dronefleet_api::config::ServerConfig;
use dronefleet_api::router::build_app_router;
use dronefleet_api::state::AppState;
use dronefleet_db::store::MemoryFleetStore;

/// Build a test `ServerConfig` with safe defaults and a short lock wait.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        load_lock_timeout_ms: 100,
        battery_audit_interval_secs: 300,
        database_url: None,
    }
}

/// Build the full application router on a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with_store(Arc::new(MemoryFleetStore::new()))
}

/// Build the full application router on the given store, so a test can
/// reach into it (e.g. to hold a drone lock).
pub fn build_test_app_with_store(store: Arc<MemoryFleetStore>) -> Router {
    let config = test_config();
    let state = AppState::new(store, config.clone());
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with an arbitrary body, e.g. malformed JSON.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a drone and return its id.
pub async fn create_drone(app: &Router, serial: &str, battery: i64) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/drones",
        serde_json::json!({
            "serial_number": serial,
            "model": "Heavyweight",
            "weight_limit": 500,
            "battery_capacity": battery,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "drone registration failed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Register a medication and return its id.
pub async fn create_medication(app: &Router, code: &str, weight: f64) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/medications",
        serde_json::json!({
            "name": code.to_lowercase(),
            "weight": weight,
            "code": code,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "medication registration failed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
