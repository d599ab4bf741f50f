//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use kvcache::{api::create_router, AppState, FnFetcher, KeyValueStore, MemoryBackend};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Builds a router whose page fetcher answers `<html>{url}</html>`, fails
/// for URLs containing "fail", and counts its invocations.
fn create_test_app() -> (Router, Arc<AtomicUsize>) {
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = invocations.clone();
    let fetcher = FnFetcher::new("get_page", move |url: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        if url.contains("fail") {
            anyhow::bail!("cannot reach {}", url);
        }
        Ok(format!("<html>{}</html>", url))
    });

    let store = KeyValueStore::new(Arc::new(MemoryBackend::new()));
    let state = AppState::new(store, Arc::new(fetcher), Duration::from_secs(10));
    (create_router(state), invocations)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn store_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/store")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Store / Get Endpoint Tests ==

#[tokio::test]
async fn test_store_and_get_string() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, store_request(r#"{"value":"hello"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"].as_str().unwrap(), key);
    assert_eq!(json["value"].as_str().unwrap(), "hello");
}

#[tokio::test]
async fn test_store_and_get_integer() {
    let (app, _) = create_test_app();

    let (_, json) = send(&app, store_request(r#"{"value":42}"#)).await;
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}?as=integer", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"].as_i64().unwrap(), 42);
}

#[tokio::test]
async fn test_get_integer_of_text_is_unprocessable() {
    let (app, _) = create_test_app();

    let (_, json) = send(&app, store_request(r#"{"value":"hello"}"#)).await;
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}?as=integer", key))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("not an integer"));

    // Entry is left intact
    let (status, _) = send(&app, get(&format!("/get/{}", key))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_not_found() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/get/nonexistent_key")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_store_invalid_json() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(store_request(r#"{"not_value":1}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_store_integer_bounds() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, store_request(r#"{"value":9223372036854775807}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let key = json["key"].as_str().unwrap().to_string();
    let (_, json) = send(&app, get(&format!("/get/{}?as=string", key))).await;
    assert_eq!(json["value"], "9223372036854775807");

    // Beyond i64: rejected, nothing stored
    let (status, json) = send(&app, store_request(r#"{"value":18446744073709551615}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("out of range"));

    let (_, history) = send(&app, get("/history/KeyValueStore.put")).await;
    assert_eq!(history["records"].as_array().unwrap().len(), 1);
}

// == Page Endpoint Tests ==

#[tokio::test]
async fn test_page_is_cached() {
    let (app, invocations) = create_test_app();

    let (status, first) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["content"].as_str().unwrap(), "<html>http://example.com</html>");
    assert_eq!(first["access_count"].as_i64().unwrap(), 1);

    let (status, second) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["content"], first["content"]);
    assert_eq!(second["access_count"].as_i64().unwrap(), 2);

    assert_eq!(invocations.load(Ordering::SeqCst), 1);

    let (_, count) = send(&app, get("/count?url=http://example.com")).await;
    assert_eq!(count["access_count"].as_i64().unwrap(), 2);
}

#[tokio::test]
async fn test_page_failure_is_bad_gateway() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/page?url=http://fail.example")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("cannot reach"));

    let (_, history) = send(&app, get("/history/get_page")).await;
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["failed"], true);

    let (_, stats) = send(&app, get("/stats")).await;
    assert_eq!(stats["failures"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn test_page_missing_url_is_client_error() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/page")).await.unwrap();

    assert!(response.status().is_client_error());
}

// == History / Replay Endpoint Tests ==

#[tokio::test]
async fn test_history_and_replay_of_store() {
    let (app, _) = create_test_app();

    let mut keys = Vec::new();
    for body in [r#"{"value":"foo"}"#, r#"{"value":"bar"}"#, r#"{"value":42}"#] {
        let (_, json) = send(&app, store_request(body)).await;
        keys.push(json["key"].as_str().unwrap().to_string());
    }

    let (status, history) = send(&app, get("/history/KeyValueStore.put")).await;
    assert_eq!(status, StatusCode::OK);
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["sequence"].as_u64().unwrap(), i as u64 + 1);
        assert_eq!(record["output"].as_str().unwrap(), keys[i]);
    }

    let (status, replay) = send(&app, get("/replay/KeyValueStore.put")).await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = replay["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l.as_str().unwrap())
        .collect();
    assert_eq!(lines[0], "KeyValueStore.put was called 3 times");
    assert_eq!(lines[1], format!(r#"KeyValueStore.put(*("foo")) -> {}"#, keys[0]));
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_replay_unknown_operation() {
    let (app, _) = create_test_app();

    let (status, replay) = send(&app, get("/replay/never_called")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replay["lines"][0], "never_called was called 0 times");
}

// == Keys / Flush Endpoint Tests ==

#[tokio::test]
async fn test_keys_and_flush() {
    let (app, _) = create_test_app();
    send(&app, get("/page?url=http://example.com")).await;

    let (_, json) = send(&app, get("/keys?pattern=cache:*")).await;
    let keys = json["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0], "cache:http://example.com");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/flush")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, json) = send(&app, get("/keys")).await;
    assert!(json["keys"].as_array().unwrap().is_empty());
}

// == Stats / Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _) = create_test_app();
    send(&app, get("/page?url=http://a.example")).await;
    send(&app, get("/page?url=http://a.example")).await;

    let (status, json) = send(&app, get("/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
