//! Integration tests for loading medications onto drones.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, create_drone, create_medication, get, post_json};
use dronefleet_db::store::MemoryFleetStore;
use serde_json::json;

fn load_uri(drone_id: i64) -> String {
    format!("/api/v1/drones/{drone_id}/medications")
}

#[tokio::test]
async fn load_returns_201_and_marks_drone_loaded() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "SBGH00123", 100).await;
    let med = create_medication(&app, "PAR_00123", 12.0).await;

    let response = post_json(app.clone(), &load_uri(drone), json!({ "medications": [med] })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let data = &body_json(response).await["data"];
    assert_eq!(data["status"], "loaded");
    assert_eq!(data["state"], "LOADED");
    assert_eq!(data["current_medication_weight"], 12.0);
    assert_eq!(data["medications"][0]["id"], med);

    let json = body_json(get(app, &load_uri(drone)).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["code"], "PAR_00123");
}

#[tokio::test]
async fn low_battery_returns_not_modified() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "LOW", 10).await;
    let med = create_medication(&app, "MED_1", 5.0).await;

    let response = post_json(app.clone(), &load_uri(drone), json!({ "medications": [med] })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["status"], "not_modified");
    assert_eq!(data["reason"], "unhealthy_battery");
    assert_eq!(data["state"], "IDLE");

    let json = body_json(get(app, &load_uri(drone)).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_drone_returns_drone_unavailable() {
    let app = common::build_test_app();

    let response = post_json(app, &load_uri(999), json!({ "medications": [1] })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DRONE_UNAVAILABLE");
    assert_eq!(
        json["error"],
        "Requested drone not available (IDLE) or does not exist"
    );
}

#[tokio::test]
async fn loaded_drone_cannot_be_loaded_again() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "D1", 100).await;
    let a = create_medication(&app, "A_1", 10.0).await;
    let b = create_medication(&app, "B_1", 10.0).await;

    post_json(app.clone(), &load_uri(drone), json!({ "medications": [a] })).await;
    let response = post_json(app, &load_uri(drone), json!({ "medications": [b] })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "DRONE_UNAVAILABLE");
}

#[tokio::test]
async fn over_limit_items_skipped_and_invalid_id_truncates() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "D1", 100).await;
    let heavy = create_medication(&app, "HEAVY", 450.0).await;
    let big = create_medication(&app, "BIG", 100.0).await;
    let small = create_medication(&app, "SMALL", 40.0).await;
    let after = create_medication(&app, "AFTER", 1.0).await;

    let response = post_json(
        app,
        &load_uri(drone),
        json!({ "medications": [heavy, big, small, 4242, after] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let data = &body_json(response).await["data"];
    let ids: Vec<i64> = data["medications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![heavy, small]);
    assert_eq!(data["current_medication_weight"], 490.0);
}

#[tokio::test]
async fn nothing_fits_returns_not_modified() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "D1", 100).await;
    let huge = create_medication(&app, "HUGE", 900.0).await;

    let response = post_json(app, &load_uri(drone), json!({ "medications": [huge] })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["reason"], "nothing_accepted");
}

#[tokio::test]
async fn missing_medications_field_rejected() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "D1", 100).await;

    let response = post_json(app, &load_uri(drone), json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["errors"]["medications"][0],
        "This field is required."
    );
}

#[tokio::test]
async fn wrongly_typed_medication_ids_rejected() {
    let app = common::build_test_app();
    let drone = create_drone(&app, "D1", 100).await;

    let response = post_json(app, &load_uri(drone), json!({ "medications": ["one"] })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn held_drone_lock_returns_503() {
    let store = Arc::new(MemoryFleetStore::new());
    let app = common::build_test_app_with_store(Arc::clone(&store));
    let drone = create_drone(&app, "D1", 100).await;
    let med = create_medication(&app, "MED_1", 1.0).await;

    let _guard = store.lock_drone(drone, Duration::from_secs(1)).await.unwrap();
    let response = post_json(app, &load_uri(drone), json!({ "medications": [med] })).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "CONTENTION");
}

#[tokio::test]
async fn loaded_medications_unknown_drone_returns_404() {
    let app = common::build_test_app();
    let response = get(app, &load_uri(77)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
