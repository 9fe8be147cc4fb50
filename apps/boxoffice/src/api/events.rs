//! Event endpoints:
//! - POST /events/creator
//! - GET /events

use super::ListResponse;
use crate::server::state::AppState;
use crate::services::NewEvent;
use axum::{Json, extract::State};
use boxoffice_core::types::Event;
use boxoffice_web::{JsonBody, WebResult};
use serde::Serialize;

/// Event creation response.
#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    /// Outcome
    pub message: &'static str,
    /// The new event
    pub event: Event,
}

/// Create an event as an authenticated user.
///
/// ```bash
/// curl -X POST http://localhost:8000/events/creator \
///   -H "Content-Type: application/json" \
///   -d '{"eventName":"Concert","ticketsForSale":100,"username":"alice","password":"secret"}'
/// ```
pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NewEvent>,
) -> WebResult<Json<CreateEventResponse>> {
    let event = state.services.events.create(request).await?;

    Ok(Json(CreateEventResponse {
        message: "Event created successfully",
        event,
    }))
}

/// List events with their remaining inventory.
pub async fn list_events(State(state): State<AppState>) -> WebResult<Json<ListResponse<Event>>> {
    Ok(Json(state.services.events.list().await?.into()))
}
