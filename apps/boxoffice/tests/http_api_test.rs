//! HTTP API integration tests.
//!
//! Drives the full router (middleware, extractors, error mapping) with
//! `tower::ServiceExt::oneshot` over an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
#![allow(clippy::too_many_lines)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use boxoffice::{AppState, build_router, seed};
use boxoffice_core::types::{Event, Receipt, User};
use boxoffice_testing::fixtures::SeededStore;
use boxoffice_testing::{Fixture, test_clock};
use boxoffice_web::CORRELATION_ID_HEADER;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn router(fixture: &SeededStore) -> Router {
    build_router(AppState::new(Arc::clone(&fixture.store), Arc::new(test_clock())))
}

async fn with_users_and_events() -> (Router, SeededStore) {
    let fixture = Fixture::new()
        .with_users(vec![User::new("alice", "secret"), User::new("bob", "pw")])
        .with_events(vec![Event::new("Concert", 10, "alice")])
        .build()
        .await
        .expect("fixture");
    (router(&fixture), fixture)
}

async fn with_demo_products() -> Router {
    let fixture = Fixture::new().build().await.expect("fixture");
    let state = AppState::new(Arc::clone(&fixture.store), Arc::new(test_clock()));
    seed::seed_demo_products(&state.services.products)
        .await
        .expect("seed");
    build_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ============================================================================
// Service endpoints
// ============================================================================

#[tokio::test]
async fn test_banner_and_health() {
    let (app, _fixture) = with_users_and_events().await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Box office API is running");

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_responses_carry_correlation_id() {
    let (app, _fixture) = with_users_and_events().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
}

#[tokio::test]
async fn test_unknown_route_is_not_found_with_error_body() {
    let (app, _fixture) = with_users_and_events().await;

    let (status, body) = send(&app, "GET", "/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_register_hides_password() {
    let (app, fixture) = with_users_and_events().await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/register",
        Some(json!({"username": "carol", "password": "hunter2"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"message": "User registered successfully", "user": {"username": "carol"}})
    );
    assert_eq!(fixture.users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_duplicate_username_is_conflict_and_not_stored() {
    let (app, fixture) = with_users_and_events().await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/register",
        Some(json!({"username": "ALICE", "password": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    let users = fixture.users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users.iter().filter(|u| u.username.eq_ignore_ascii_case("alice")).count(), 1);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let (app, _fixture) = with_users_and_events().await;

    let (status, body) = send(&app, "POST", "/users/register", Some(json!({"username": "dave"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: password");
}

#[tokio::test]
async fn test_malformed_body_uses_error_body() {
    let (app, _fixture) = with_users_and_events().await;

    let request = Request::builder()
        .method("POST")
        .uri("/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

// ============================================================================
// Events and tickets
// ============================================================================

#[tokio::test]
async fn test_event_creation_flow() {
    let (app, _fixture) = with_users_and_events().await;

    let (status, body) = send(
        &app,
        "POST",
        "/events/creator",
        Some(json!({"eventName": "Opera", "ticketsForSale": 50, "username": "alice", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = send(
        &app,
        "POST",
        "/events/creator",
        Some(json!({"eventName": "Opera", "ticketsForSale": 50, "username": "alice", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event created successfully");
    assert_eq!(
        body["event"],
        json!({"eventName": "Opera", "ticketsForSale": 50, "createdBy": "alice"})
    );

    let (status, _) = send(
        &app,
        "POST",
        "/events/creator",
        Some(json!({"eventName": "concert", "ticketsForSale": 5, "username": "bob", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_ticket_purchase_and_summary() {
    let (app, fixture) = with_users_and_events().await;
    let buy = |quantity: u32| {
        json!({"username": "bob", "password": "pw", "eventName": "concert", "quantity": quantity})
    };

    let (status, body) = send(&app, "POST", "/users/tickets/buy", Some(buy(2))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remainingTickets"], 8);
    assert_eq!(
        body["receipt"],
        json!({"userName": "bob", "eventName": "Concert", "ticketsBought": 2})
    );

    let (status, _) = send(&app, "POST", "/users/tickets/buy", Some(buy(3))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/users/tickets/buy", Some(buy(6))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "BUSINESS_RULE_VIOLATION");

    assert_eq!(fixture.events().await.unwrap()[0].tickets_for_sale, 5);
    assert_eq!(
        fixture.receipts().await.unwrap(),
        vec![Receipt::new("bob", "Concert", 2), Receipt::new("bob", "Concert", 3)]
    );

    let (status, body) = send(&app, "GET", "/users/bob/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalTicketsBought": 2,
            "ticketsSum": 5,
            "events": ["Concert", "Concert"],
            "averageTicketsPerEvent": 2.5
        })
    );
}

#[tokio::test]
async fn test_purchase_failures_map_to_distinct_statuses() {
    let (app, _fixture) = with_users_and_events().await;

    let cases = [
        (
            json!({"username": "bob", "password": "pw", "eventName": "Concert"}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"username": "bob", "password": "PW", "eventName": "Concert", "quantity": 1}),
            StatusCode::UNAUTHORIZED,
        ),
        (
            json!({"username": "bob", "password": "pw", "eventName": "Ballet", "quantity": 1}),
            StatusCode::NOT_FOUND,
        ),
        (
            json!({"username": "bob", "password": "pw", "eventName": "Concert", "quantity": 11}),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (body, expected) in cases {
        let (status, _) = send(&app, "POST", "/users/tickets/buy", Some(body)).await;
        assert_eq!(status, expected);
    }
}

#[tokio::test]
async fn test_summary_without_receipts_is_zero() {
    let (app, _fixture) = with_users_and_events().await;

    let (status, body) = send(&app, "GET", "/users/nobody/summary", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalTicketsBought"], 0);
    assert_eq!(body["averageTicketsPerEvent"], 0.0);
}

#[tokio::test]
async fn test_comments_default_to_empty() {
    let (app, _fixture) = with_users_and_events().await;

    let (status, body) = send(&app, "GET", "/comments", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_listing_and_lookup() {
    let app = with_demo_products().await;

    let (status, body) = send(&app, "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);

    let (_, body) = send(&app, "GET", "/api/products?inStock=true&sortBy=price-asc", None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mouse", "Desk Chair", "Laptop"]);

    let (status, body) = send(&app, "GET", "/api/products/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Desk Chair");
    assert_eq!(body["data"]["createdAt"], "2025-01-01T00:00:00Z");

    let (status, _) = send(&app, "GET", "/api/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/products/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = with_demo_products().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Keyboard", "price": 59.5, "stock": 0, "category": "Electronics"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 5);
    assert_eq!(body["warnings"], json!(["Product created with zero stock"]));

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "keyboard", "price": 10, "stock": 1, "category": "Electronics"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "PUT", "/api/products/5", Some(json!({"stock": 8}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], 8);

    let (status, body) = send(
        &app,
        "POST",
        "/api/products/5/purchase",
        Some(json!({"quantity": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalPrice"], 238.0);
    assert_eq!(body["warnings"], json!(["Low stock warning: Only 4 items remaining"]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/products/5/purchase",
        Some(json!({"quantity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Insufficient stock. Available: 4, Requested: 5");

    let (status, body) = send(
        &app,
        "POST",
        "/api/products/5/restock",
        Some(json!({"quantity": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["added"], 10);
    assert_eq!(body["data"]["newTotal"], 14);

    let (status, body) = send(
        &app,
        "POST",
        "/api/products/5/restock",
        Some(json!({"quantity": 9_990})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Stock cannot exceed 10,000 units");

    let (status, body) = send(&app, "DELETE", "/api/products/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warnings"], json!(["Deleting product with 14 items in stock"]));

    let (status, _) = send(&app, "GET", "/api/products/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_reports() {
    let app = with_demo_products().await;

    let (status, body) = send(&app, "GET", "/api/products/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalProducts"], 4);
    assert_eq!(body["data"]["outOfStockProducts"], 1);
    assert_eq!(body["data"]["lowStockProducts"], 1);

    let (status, body) = send(&app, "GET", "/api/products/search?q=mo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, _) = send(&app, "GET", "/api/products/search?q=m", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/products/category/furniture", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, "GET", "/api/products/category/Toys", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No products found in category: Toys");
}

#[tokio::test]
async fn test_member_directory() {
    let fixture = Fixture::new().build().await.expect("fixture");
    let app = router(&fixture);

    let (status, body) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({"name": "John Doe", "email": "John@Example.com", "age": 30, "city": "Lisbon"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Member created successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], "john@example.com");
    assert!(body["data"]["createdAt"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({"name": "Jane Smith", "email": "jane@example.com", "age": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({"name": "Johnny", "email": "JOHN@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");

    let (status, body) = send(&app, "POST", "/api/members", Some(json!({"name": "Nobody"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name and email are required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({"name": "Bad", "email": "bad@nowhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");

    let (status, body) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({"name": "Old", "email": "old@example.com", "age": 151})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Age must be a number between 0 and 150");

    let (status, body) = send(&app, "GET", "/api/members?search=jane", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, "GET", "/api/members?minAge=26&maxAge=40", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "John Doe");
    assert_eq!(body["count"], 1);

    let (status, _) = send(&app, "GET", "/api/members?minAge=old", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PUT", "/api/members/2", Some(json!({"city": "Porto"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Porto");
    assert_eq!(body["data"]["age"], 25);

    let (status, body) = send(&app, "GET", "/api/members/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalMembers"], 2);
    assert_eq!(body["data"]["averageAge"], 27.5);
    assert_eq!(body["data"]["cities"], json!(["Lisbon", "Porto"]));

    let (status, body) = send(&app, "DELETE", "/api/members/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "John Doe");

    let (status, body) = send(&app, "GET", "/api/members/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Member 1 not found");

    let (status, body) = send(&app, "GET", "/api/members/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid member ID");

    assert_eq!(fixture.members().await.expect("members").len(), 1);
}
