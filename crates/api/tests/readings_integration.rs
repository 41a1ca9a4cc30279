//! Integration tests for the readings endpoints
//!
//! Exercises routing, status mapping, and the create/delete broadcast path
//! against an in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use sonda_api::{AppState, build_router};
use sonda_live::{LiveHub, RecordEvent};
use sonda_store::ReadingStore;

async fn test_app() -> (Router, AppState) {
    let store = Arc::new(ReadingStore::open_memory().await.unwrap());
    let live = Arc::new(LiveHub::new());
    let state = AppState::new(store, live);

    (build_router(state.clone()), state)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Seed one reading through the API and return its stored form
async fn seed(app: &Router, name: &str, kind: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/readings",
            json!({"name": name, "kind": kind, "value": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_returns_stored_reading() {
    let (app, state) = test_app().await;
    let (_id, mut rx) = state.live.subscribe().unwrap();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/readings",
            json!({"name": "temp1", "kind": "sensor", "value": 21.5, "unit": "C"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;

    // Store-assigned identity and timestamp
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["timestamp"].as_str().is_some());
    assert_eq!(body["name"], "temp1");
    assert_eq!(body["kind"], "sensor");
    assert_eq!(body["value"], 21.5);
    assert_eq!(body["unit"], "C");

    // A subscriber connected at call time observes exactly one created event
    let event = rx.recv().await.unwrap();
    match event.as_ref() {
        RecordEvent::RecordCreated(r) => assert_eq!(r.id, body["id"].as_str().unwrap()),
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_create_malformed_body_is_bad_request() {
    let (app, _state) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/readings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_against_unavailable_store_is_bad_request() {
    let state = AppState::new(
        Arc::new(ReadingStore::unavailable()),
        Arc::new(LiveHub::new()),
    );
    let app = build_router(state);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/readings",
            json!({"name": "temp1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "INVALID_INPUT");
}

// ============================================================================
// List / Get
// ============================================================================

#[tokio::test]
async fn test_list_includes_created_readings() {
    let (app, _state) = test_app().await;

    let created = seed(&app, "temp1", "sensor").await;

    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/readings"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_get_returns_reading() {
    let (app, _state) = test_app().await;
    let created = seed(&app, "temp1", "sensor").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/v1/readings/{}", id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (app, _state) = test_app().await;

    let response = app
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/readings/nonexistent-id",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_against_unavailable_store_is_server_error() {
    let state = AppState::new(
        Arc::new(ReadingStore::unavailable()),
        Arc::new(LiveHub::new()),
    );
    let app = build_router(state);

    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/readings"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_exact_match_per_field() {
    let (app, _state) = test_app().await;
    seed(&app, "temp1", "sensor").await;
    seed(&app, "temp2", "sensor").await;
    seed(&app, "valve1", "actuator").await;

    // By name
    let response = app
        .clone()
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/readings/search?name=temp1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "temp1");

    // By kind
    let response = app
        .clone()
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/readings/search?kind=sensor",
        ))
        .await
        .unwrap();
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);

    // Conjunction of both
    let response = app
        .clone()
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/readings/search?kind=sensor&name=temp2",
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "temp2");

    // No filters at all
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/readings/search"))
        .await
        .unwrap();
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_empty_param_differs_from_absent() {
    let (app, _state) = test_app().await;
    seed(&app, "", "sensor").await;
    seed(&app, "temp1", "sensor").await;

    // Explicit empty string matches only the empty-named reading
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/readings/search?name="))
        .await
        .unwrap();
    let body = response_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "");

    // Omitting the parameter leaves the field unfiltered
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/readings/search"))
        .await
        .unwrap();
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_no_matches_is_empty_ok() {
    let (app, _state) = test_app().await;
    seed(&app, "temp1", "sensor").await;

    let response = app
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/readings/search?kind=actuator",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_json(response).await.as_array().unwrap().is_empty());
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_replaces_fields_preserving_id() {
    let (app, state) = test_app().await;
    let created = seed(&app, "temp1", "sensor").await;
    let id = created["id"].as_str().unwrap();

    let (_sub, mut rx) = state.live.subscribe().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/readings/{}", id),
            json!({"name": "valve1", "value": "open"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["name"], "valve1");
    assert_eq!(body["value"], "open");
    // Full replacement: the old kind is gone
    assert_eq!(body["kind"], Value::Null);

    // The read model reflects exactly the new fields
    let response = app
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/v1/readings/{}", id),
        ))
        .await
        .unwrap();
    assert_eq!(response_json(response).await, body);

    // Updates emit no live event
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let (app, _state) = test_app().await;

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/readings/nonexistent-id",
            json!({"name": "temp1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_and_broadcasts_prior_state() {
    let (app, state) = test_app().await;
    let created = seed(&app, "temp1", "sensor").await;
    let id = created["id"].as_str().unwrap();

    let (_sub, mut rx) = state.live.subscribe().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::DELETE,
            &format!("/api/v1/readings/{}", id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "reading deleted");

    // Gone from the store
    let response = app
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/v1/readings/{}", id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Exactly one deletion notice carrying the pre-deletion state
    let event = rx.recv().await.unwrap();
    match event.as_ref() {
        RecordEvent::RecordDeleted(r) => {
            assert_eq!(r.id, id);
            assert_eq!(r.name.as_deref(), Some("temp1"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (app, state) = test_app().await;
    let (_sub, mut rx) = state.live.subscribe().unwrap();

    let response = app
        .oneshot(empty_request(
            Method::DELETE,
            "/api/v1/readings/nonexistent-id",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(rx.try_recv().is_err());
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_status() {
    let (app, _state) = test_app().await;

    let response = app
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "available");
}
