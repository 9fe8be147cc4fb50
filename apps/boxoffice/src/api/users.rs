//! User endpoints:
//! - POST /users/register
//! - POST /users/tickets/buy
//! - GET /users/:username/summary

use crate::server::state::AppState;
use crate::services::TicketPurchase;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use boxoffice_core::types::{PurchaseSummary, Receipt};
use boxoffice_web::{JsonBody, WebResult};
use serde::{Deserialize, Serialize};

/// Registration body. Missing fields deserialize as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

/// Public view of a user; never carries the password.
#[derive(Debug, Serialize)]
pub struct UserView {
    /// Login name
    pub username: String,
}

/// Registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Outcome
    pub message: &'static str,
    /// The new user
    pub user: UserView,
}

/// Ticket purchase response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyTicketsResponse {
    /// Outcome
    pub message: &'static str,
    /// The recorded receipt
    pub receipt: Receipt,
    /// Tickets left for the event
    pub remaining_tickets: u32,
}

/// Register a user.
///
/// ```bash
/// curl -X POST http://localhost:8000/users/register \
///   -H "Content-Type: application/json" \
///   -d '{"username":"alice","password":"secret"}'
/// ```
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> WebResult<(StatusCode, Json<RegisterResponse>)> {
    let user = state
        .services
        .users
        .register(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user: UserView {
                username: user.username,
            },
        }),
    ))
}

/// Buy tickets for an event.
pub async fn buy_tickets(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TicketPurchase>,
) -> WebResult<Json<BuyTicketsResponse>> {
    let outcome = state.services.tickets.buy(request).await?;

    Ok(Json(BuyTicketsResponse {
        message: "Tickets purchased successfully",
        receipt: outcome.receipt,
        remaining_tickets: outcome.remaining_tickets,
    }))
}

/// Purchase summary for one user.
pub async fn summary(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> WebResult<Json<PurchaseSummary>> {
    Ok(Json(state.services.receipts.summary(&username).await?))
}
