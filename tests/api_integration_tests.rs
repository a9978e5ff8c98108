//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint against a fresh
//! cache, including expiration, projection, and the persist/reload cycle.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shardcache::{api::create_router, AppState, Cache};
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, Cache, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::new(
        10,
        Duration::from_secs(1),
        10,
        dir.path().join("cacheData.json"),
    );
    let app = create_router(AppState::new(cache.clone()));
    (app, cache, dir)
}

async fn execute(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// == Ping ==

#[tokio::test]
async fn test_ping() {
    let (app, _, _dir) = create_test_app();

    let (status, body) = execute(&app, "GET", "/api/v1/ping", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": "ping"}));
}

// == String Values With Expiration ==

#[tokio::test]
async fn test_put_and_get_string_with_expire() {
    let (app, _, _dir) = create_test_app();

    let (status, body) = execute(
        &app,
        "PUT",
        "/api/v1/values/sixthMonth?expire=20",
        Some(json!("June")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": "June"}));

    let (status, body) = execute(&app, "GET", "/api/v1/values/sixthMonth", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": "June"}));

    let (status, body) = execute(&app, "GET", "/api/v1/ttl/sixthMonth", None).await;
    assert_eq!(status, StatusCode::OK);
    let ttl = body["value"].as_i64().unwrap();
    assert!(ttl > 0 && ttl <= 20, "ttl out of range: {}", ttl);
}

// == Dictionary Projection ==

#[tokio::test]
async fn test_put_and_get_dict() {
    let (app, _, _dir) = create_test_app();
    let planets = json!({"planet1": "Mercury", "planet2": "Venus", "planet3": "Earth"});

    let (status, _) = execute(&app, "PUT", "/api/v1/values/planets", Some(planets)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        execute(&app, "GET", "/api/v1/values/planets?dictKey=planet1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": "Mercury"}));

    let (status, body) =
        execute(&app, "GET", "/api/v1/values/planets?dictKey=planet9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Dictionary item not found");
}

#[tokio::test]
async fn test_dict_projection_on_non_dict() {
    let (app, _, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/scalar", Some(json!("x"))).await;

    let (status, body) = execute(&app, "GET", "/api/v1/values/scalar?dictKey=a", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Indicated value is not dictionary");
}

// == List Projection ==

#[tokio::test]
async fn test_put_and_get_list() {
    let (app, _, _dir) = create_test_app();
    let cars = json!(["Toyota", "Opel", "Ford"]);

    let (status, _) = execute(&app, "PUT", "/api/v1/values/cars", Some(cars)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = execute(&app, "GET", "/api/v1/values/cars?listIndex=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": "Opel"}));
}

#[tokio::test]
async fn test_list_index_validation() {
    let (app, _, _dir) = create_test_app();

    execute(
        &app,
        "PUT",
        "/api/v1/values/cars",
        Some(json!(["Toyota", "Opel"])),
    )
    .await;

    let (status, body) = execute(&app, "GET", "/api/v1/values/cars?listIndex=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid `listIndex` param. Number required");

    let (status, _) = execute(&app, "GET", "/api/v1/values/cars?listIndex=9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_projection_on_non_list() {
    let (app, _, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/scalar", Some(json!(42))).await;

    let (status, body) = execute(&app, "GET", "/api/v1/values/scalar?listIndex=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Indicated value is not list");
}

#[tokio::test]
async fn test_list_index_precedence_over_dict_key() {
    let (app, _, _dir) = create_test_app();

    execute(
        &app,
        "PUT",
        "/api/v1/values/cars",
        Some(json!(["Toyota", "Opel"])),
    )
    .await;

    let (status, body) = execute(
        &app,
        "GET",
        "/api/v1/values/cars?listIndex=0&dictKey=planet1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": "Toyota"}));
}

// == Invalid Payloads ==

#[tokio::test]
async fn test_put_invalid_expire_param() {
    let (app, _, _dir) = create_test_app();

    let (status, body) = execute(
        &app,
        "PUT",
        "/api/v1/values/key?expire=soon",
        Some(json!("v")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid expire value");
}

#[tokio::test]
async fn test_put_invalid_json_body() {
    let (app, _, _dir) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/values/key")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Invalid payload request");
}

#[tokio::test]
async fn test_expire_invalid_body() {
    let (app, _, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/key", Some(json!("v"))).await;

    let (status, body) = execute(
        &app,
        "PUT",
        "/api/v1/expire/key",
        Some(json!("not a number")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid payload request");
}

// == Delete ==

#[tokio::test]
async fn test_delete() {
    let (app, _, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/cars", Some(json!(["Toyota"]))).await;

    let (status, body) = execute(&app, "DELETE", "/api/v1/values/cars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Cache item deleted"}));

    let (status, _) = execute(&app, "GET", "/api/v1/values/cars", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = execute(&app, "DELETE", "/api/v1/values/cars", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Expire Endpoint And TTL ==

#[tokio::test]
async fn test_expire_and_check_ttl() {
    let (app, _, _dir) = create_test_app();

    execute(
        &app,
        "PUT",
        "/api/v1/values/tempString",
        Some(json!("temp string value")),
    )
    .await;

    let (status, body) = execute(&app, "PUT", "/api/v1/expire/tempString", Some(json!(10))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "The timeout was set"}));

    let (status, body) = execute(&app, "GET", "/api/v1/ttl/tempString", None).await;
    assert_eq!(status, StatusCode::OK);
    let ttl = body["value"].as_i64().unwrap();
    assert!(ttl > 0 && ttl <= 10, "ttl out of range: {}", ttl);
}

#[tokio::test]
async fn test_ttl_without_expiration_is_minus_one() {
    let (app, _, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/forever", Some(json!(1))).await;

    let (status, body) = execute(&app, "GET", "/api/v1/ttl/forever", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": -1}));
}

#[tokio::test]
async fn test_expire_nonexistent_key() {
    let (app, _, _dir) = create_test_app();

    let (status, body) = execute(&app, "PUT", "/api/v1/expire/nonExistent", Some(json!(10))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Cache item not found");
}

#[tokio::test]
async fn test_ttl_nonexistent_key() {
    let (app, _, _dir) = create_test_app();

    let (status, _) = execute(&app, "GET", "/api/v1/ttl/nonExistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Expiration End To End ==

#[tokio::test]
async fn test_value_expires() {
    let (app, _, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/x?expire=1", Some(json!("v"))).await;

    let (status, _) = execute(&app, "GET", "/api/v1/values/x", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    let (status, _) = execute(&app, "GET", "/api/v1/values/x", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = execute(&app, "GET", "/api/v1/ttl/x", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Persist And Reload ==

#[tokio::test]
async fn test_persist_and_reload_cycle() {
    let (app, cache, _dir) = create_test_app();

    execute(&app, "PUT", "/api/v1/values/month", Some(json!("June"))).await;
    execute(
        &app,
        "PUT",
        "/api/v1/values/planets",
        Some(json!({"planet1": "Mercury"})),
    )
    .await;

    let (status, body) = execute(&app, "POST", "/api/v1/persist", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Cache Data persisted"}));

    // Wipe the in-memory state out from under the server.
    cache.clear().await;
    let (_, body) = execute(&app, "GET", "/api/v1/keys", None).await;
    assert_eq!(body["value"].as_array().unwrap().len(), 0);

    let (status, body) = execute(&app, "POST", "/api/v1/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Cache Data reloaded"}));

    let (status, body) = execute(&app, "GET", "/api/v1/keys", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut keys: Vec<&str> = body["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["month", "planets"]);

    let (_, body) = execute(&app, "GET", "/api/v1/values/month", None).await;
    assert_eq!(body, json!({"value": "June"}));
}

#[tokio::test]
async fn test_reload_without_snapshot_is_server_error() {
    let (app, _, _dir) = create_test_app();

    let (status, body) = execute(&app, "POST", "/api/v1/reload", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
