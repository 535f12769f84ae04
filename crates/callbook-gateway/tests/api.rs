// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests for the contact API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use callbook_config::model::CallbookConfig;
use callbook_contacts::ContactService;
use callbook_gateway::build_router;
use callbook_gateway::server::GatewayState;
use callbook_test_utils::{MemoryContactStore, StoreOp, TestHarness, contact, day};

async fn router_with(store: Arc<MemoryContactStore>) -> Router {
    let service = ContactService::new(store, &CallbookConfig::default());
    build_router(GatewayState::new(Arc::new(service), Duration::from_secs(5)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn mario(date: &str, overwrite: bool) -> Value {
    json!({
        "name": "Mario Rossi",
        "phone": "333 123 4567",
        "email": "mario.rossi@example.it",
        "nextCallDate": date,
        "timesCalled": 2,
        "description": "<p>call after lunch</p>",
        "overwrite": overwrite,
    })
}

#[tokio::test]
async fn check_free_name_is_ok() {
    let app = router_with(Arc::new(MemoryContactStore::new())).await;
    let (status, body) = send(app, get("/api/contacts?name=Mario%20Rossi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn check_taken_name_is_conflict_with_contact() {
    let store = Arc::new(
        MemoryContactStore::with_contacts([contact("Mario Rossi", day(2024, 1, 2))]).await,
    );
    let app = router_with(store).await;
    let (status, body) = send(app, get("/api/contacts?name=Mario%20Rossi")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "conflict");
    assert_eq!(body["contact"]["name"], "Mario Rossi");
    assert_eq!(body["contact"]["nextCallDate"], "2024-01-02");
}

#[tokio::test]
async fn submit_conflict_then_overwrite() {
    let store = Arc::new(
        MemoryContactStore::with_contacts([contact("Mario Rossi", day(2024, 1, 2))]).await,
    );
    let app = router_with(store.clone()).await;

    let request = post_json("/api/contacts", mario("2024-03-01", false));
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["contact"]["nextCallDate"], "2024-01-02");

    let (status, body) = send(app, post_json("/api/contacts", mario("2024-03-01", true))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "created");
    assert_eq!(body["contact"]["nextCallDate"], "2024-03-01");
    assert_eq!(body["contact"]["timesCalled"], 2);
    assert_eq!(body["contact"]["description"], "<p>call after lunch</p>");

    let rows = store.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].contact.next_call_date, day(2024, 3, 1));
}

#[tokio::test]
async fn submit_invalid_contact_lists_fields() {
    let store = Arc::new(MemoryContactStore::new());
    let app = router_with(store.clone()).await;
    let (status, body) = send(
        app,
        post_json(
            "/api/contacts",
            json!({ "name": "A", "phone": "123", "email": "x", "timesCalled": -1 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "validation_error");
    assert_eq!(body["errors"].as_array().unwrap().len(), 5);
    assert_eq!(store.total_calls().await, 0);
}

#[tokio::test]
async fn non_integer_times_called_is_a_field_error() {
    for bad in [json!(1.5), json!(true), json!(1e20), json!(-3)] {
        let store = Arc::new(MemoryContactStore::new());
        let app = router_with(store.clone()).await;
        let mut body = mario("2024-03-01", false);
        body["timesCalled"] = bad.clone();

        let (status, body) = send(app, post_json("/api/contacts", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["status"], "validation_error");
        assert_eq!(body["errors"], json!([{
            "field": "timesCalled",
            "message": "times called must be a non-negative integer",
        }]));
        assert_eq!(store.total_calls().await, 0);
    }
}

#[tokio::test]
async fn wrongly_typed_body_is_a_validation_error() {
    let store = Arc::new(MemoryContactStore::new());
    let app = router_with(store.clone()).await;
    let mut body = mario("2024-03-01", false);
    body["name"] = json!(42);

    let (status, body) = send(app.clone(), post_json("/api/contacts", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("42"));

    let broken = Request::builder()
        .method("POST")
        .uri("/api/contacts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(app, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "validation_error");
    assert_eq!(store.total_calls().await, 0);
}

#[tokio::test]
async fn submit_storage_failure_is_500() {
    let store = Arc::new(MemoryContactStore::new());
    store.fail_next(StoreOp::Insert).await;
    let app = router_with(store).await;
    let (status, body) = send(app, post_json("/api/contacts", mario("2024-03-01", false))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "storage_error");
}

#[tokio::test]
async fn daily_counts_are_dense() {
    let existing = [contact("Mario", day(2024, 1, 2))];
    let store = Arc::new(MemoryContactStore::with_contacts(existing).await);
    let app = router_with(store).await;
    let (status, body) = send(
        app,
        get("/api/contacts/daily-counts?anchor=2024-01-01&windowDays=3"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "date": "2024-01-01", "count": 0 },
            { "date": "2024-01-02", "count": 1 },
            { "date": "2024-01-03", "count": 0 },
            { "date": "2024-01-04", "count": 0 },
        ])
    );
}

#[tokio::test]
async fn daily_counts_reject_bad_input() {
    let app = router_with(Arc::new(MemoryContactStore::new())).await;
    let (status, _) = send(
        app.clone(),
        get("/api/contacts/daily-counts?anchor=yesterday"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app,
        get("/api/contacts/daily-counts?anchor=2024-01-01&windowDays=5000"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("5000"));
}

#[tokio::test]
async fn day_contacts_are_exact() {
    let store = Arc::new(
        MemoryContactStore::with_contacts([
            contact("Anna", day(2024, 1, 1)),
            contact("Mario", day(2024, 1, 2)),
            contact("Luigi", day(2024, 1, 3)),
        ])
        .await,
    );
    let app = router_with(store).await;
    let (status, body) = send(app, get("/api/day-contacts?date=2024-01-02")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mario"]);
}

#[tokio::test]
async fn health_reports_store_state() {
    let app = router_with(Arc::new(MemoryContactStore::new())).await;
    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn sqlite_backed_router_round_trip() {
    let harness = TestHarness::builder().build().await.unwrap();
    let service = ContactService::new(harness.dyn_store(), &harness.config);
    let app = build_router(GatewayState::new(Arc::new(service), Duration::from_secs(5)));

    let (status, _) = send(
        app.clone(),
        post_json("/api/contacts", mario("2024-01-02", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        app.clone(),
        post_json("/api/contacts", mario("2024-01-02", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(app, get("/api/day-contacts?date=2024-01-02")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
