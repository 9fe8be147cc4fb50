//! JSON file backend through the service layer.
//!
//! State written by one process must be read back by the next one pointed at
//! the same data directory.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use axum::body::Body;
use axum::http::{Request, StatusCode};
use boxoffice::services::{NewEvent, TicketPurchase};
use boxoffice::{AppState, build_router, seed};
use boxoffice_core::{CollectionStore, JsonFileStore};
use boxoffice_testing::test_clock;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn state_at(dir: &Path) -> AppState {
    let store: Arc<dyn CollectionStore> = Arc::new(JsonFileStore::new(dir));
    AppState::new(store, Arc::new(test_clock()))
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let state = state_at(dir.path());
        let services = &state.services;
        services.users.register("alice", "secret").await.unwrap();
        services
            .events
            .create(NewEvent {
                event_name: "Concert".to_string(),
                tickets_for_sale: Some(10),
                username: "alice".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        services
            .tickets
            .buy(TicketPurchase {
                username: "alice".to_string(),
                password: "secret".to_string(),
                event_name: "CONCERT".to_string(),
                quantity: Some(4),
            })
            .await
            .unwrap();
    }

    let restarted = state_at(dir.path());
    let events = restarted.services.events.list().await.unwrap();
    assert_eq!(events[0].tickets_for_sale, 6);

    let summary = restarted.services.receipts.summary("alice").await.unwrap();
    assert_eq!(summary.total_tickets_bought, 1);
    assert_eq!(summary.tickets_sum, 4);

    assert_eq!(
        restarted.services.users.register("Alice", "x").await.unwrap_err().code(),
        "CONFLICT"
    );
}

#[tokio::test]
async fn test_collections_are_plain_json_arrays() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = state_at(dir.path());
    state.services.users.register("alice", "secret").await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    let users: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(
        users,
        serde_json::json!([{"username": "alice", "password": "secret"}])
    );
}

#[tokio::test]
async fn test_seed_does_not_overwrite_existing_products() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("products.json"), "[]").unwrap();

    let state = state_at(dir.path());
    seed::seed_demo_products(&state.services.products).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("products.json")).unwrap();
    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn test_corrupt_collection_is_internal_error_without_details() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("events.json"), "{ definitely not an array").unwrap();

    let app = build_router(state_at(dir.path()));
    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["message"], "An internal error occurred");
}
