//! Integration tests for medication registration and the catalog listing.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_medication, get, post_json, post_raw};
use serde_json::json;

#[tokio::test]
async fn register_medication_returns_201() {
    let app = common::build_test_app();

    let response = post_json(
        app,
        "/api/v1/medications",
        json!({
            "name": "Paracetamol-500",
            "weight": 12,
            "code": "PAR_00123",
            "image": "images/par.png",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["code"], "PAR_00123");
    assert_eq!(json["data"]["weight"], 12.0);
    assert_eq!(json["data"]["image"], "images/par.png");
}

#[tokio::test]
async fn numeric_string_weight_accepted() {
    let app = common::build_test_app();

    let response = post_json(
        app,
        "/api/v1/medications",
        json!({ "name": "Paracetamol", "weight": "12", "code": "PAR_00123" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["weight"], 12.0);
}

#[tokio::test]
async fn non_numeric_weight_reported_on_field() {
    let app = common::build_test_app();

    let response = post_json(
        app,
        "/api/v1/medications",
        json!({ "name": "Paracetamol", "weight": "twelve", "code": "lower" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"]["weight"][0], "A valid number is required.");
    assert!(json["errors"]["code"].is_array());
}

#[tokio::test]
async fn malformed_body_returns_400_json() {
    let app = common::build_test_app();

    for (content_type, body) in [
        ("application/json", "{\"name\": "),
        ("application/json", "42"),
        ("text/plain", "name=Paracetamol"),
    ] {
        let response = post_raw(app.clone(), "/api/v1/medications", content_type, body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn lowercase_code_rejected_with_field_error() {
    let app = common::build_test_app();

    let response = post_json(
        app,
        "/api/v1/medications",
        json!({ "name": "aspirin", "weight": 10, "code": "asp_01" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["errors"]["code"].is_array());
    assert!(json["errors"].get("name").is_none());
}

#[tokio::test]
async fn missing_fields_all_reported() {
    let app = common::build_test_app();

    let response = post_json(app, "/api/v1/medications", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    for field in ["name", "weight", "code"] {
        assert_eq!(json["errors"][field][0], "This field is required.", "{field}");
    }
}

#[tokio::test]
async fn duplicate_code_returns_409() {
    let app = common::build_test_app();
    create_medication(&app, "PAR_00123", 12.0).await;

    let response = post_json(
        app,
        "/api/v1/medications",
        json!({ "name": "other", "weight": 3, "code": "PAR_00123" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn catalog_defaults_to_five_per_page() {
    let app = common::build_test_app();
    for i in 0..7 {
        create_medication(&app, &format!("MED_{i}"), 1.0).await;
    }

    let json = body_json(get(app.clone(), "/api/v1/medications").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["page_size"], 5);
    assert_eq!(json["pagination"]["total"], 7);
    assert_eq!(json["pagination"]["total_pages"], 2);

    let json = body_json(get(app, "/api/v1/medications?page=2").await).await;
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["MED_5", "MED_6"]);
}
