//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each HTTP endpoint.

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;

use memstash::api::create_router;
use memstash::cache::{self, CacheStore};
use memstash::AppState;

// == Helper Functions ==

fn create_test_app() -> Router {
    let state = AppState::new(
        cache::shared(CacheStore::new(100)),
        PathBuf::from("unused.json"),
    );
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_key(key: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/keys/{key}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_key(key: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/keys/{key}"))
        .body(Body::empty())
        .unwrap()
}

// == POST /keys/{key} ==

#[tokio::test]
async fn test_set_endpoint_created() {
    let app = create_test_app();

    let response = app
        .oneshot(post_key("test_key", r#"{"value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["key"], "test_key");
}

#[tokio::test]
async fn test_set_endpoint_invalid_body() {
    let app = create_test_app();

    let response = app
        .oneshot(post_key("test_key", r#"{"not_value": 3}"#))
        .await
        .unwrap();

    // Missing "value" field fails body extraction
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == GET /keys/{key} ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(post_key("get_key", r#"{"value":"get_value"}"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::CREATED);

    let get_response = app.oneshot(get_key("get_key")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_key("nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_ttl_expiry_end_to_end() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(post_key("foo", r#"{"value":"bar","ttl":1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Immediately readable
    let response = app.clone().oneshot(get_key("foo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "foo");
    assert_eq!(json["value"], "bar");

    // Gone once the TTL elapses
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let response = app.oneshot(get_key("foo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == DELETE /keys/{key} ==

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(post_key("doomed", r#"{"value":"v"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/keys/doomed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["key"], "doomed");

    // Deleting again is a 404
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/keys/doomed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == GET /keys ==

#[tokio::test]
async fn test_list_keys_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(post_key("a", r#"{"value":"1"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_key("b", r#"{"value":"2"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(Request::builder().uri("/keys").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 2);
    // Most recently written first
    assert_eq!(json["keys"][0], "b");
    assert_eq!(json["keys"][1], "a");
}

// == GET /stats ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(post_key("hit_me", r#"{"value":"v"}"#))
        .await
        .unwrap();
    app.clone().oneshot(get_key("hit_me")).await.unwrap();
    app.clone().oneshot(get_key("missing")).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["keys"], 1);
    assert_eq!(json["capacity"], 100);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["evictions"], 0);
}

// == POST /save, POST /load ==

#[tokio::test]
async fn test_save_load_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(
        cache::shared(CacheStore::new(100)),
        dir.path().join("memstash_data.json"),
    );
    let app = create_router(state.clone());

    app.clone()
        .oneshot(post_key("x", r#"{"value":"X"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/save")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "OK");

    state.store.lock().await.clear();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/load")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_key("x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "X");
}

// == GET /health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
