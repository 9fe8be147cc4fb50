//! GET /comments

use crate::server::state::AppState;
use axum::{Json, extract::State};
use boxoffice_web::WebResult;
use serde_json::Value;

/// Stored comments, passed through as-is.
pub async fn list_comments(State(state): State<AppState>) -> WebResult<Json<Vec<Value>>> {
    Ok(Json(state.services.comments.list().await?))
}
