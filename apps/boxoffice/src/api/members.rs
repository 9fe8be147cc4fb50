//! Member directory endpoints under `/api/members`.
//!
//! - GET / - list with `search`, `minAge`, `maxAge` filters
//! - GET /stats - directory statistics
//! - GET /:id, PUT /:id, DELETE /:id
//! - POST / - create

use super::{DataResponse, ListResponse};
use crate::server::state::AppState;
use crate::services::members::{MemberFilters, MemberStats, MemberUpdate, NewMember, parse_id};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use boxoffice_core::types::Member;
use boxoffice_web::{JsonBody, WebResult};

/// List members.
pub async fn list_members(
    State(state): State<AppState>,
    Query(filters): Query<MemberFilters>,
) -> WebResult<Json<ListResponse<Member>>> {
    Ok(Json(state.services.members.list(&filters).await?.into()))
}

/// Directory statistics.
pub async fn member_stats(
    State(state): State<AppState>,
) -> WebResult<Json<DataResponse<MemberStats>>> {
    Ok(Json(DataResponse::new(state.services.members.stats().await?)))
}

/// One member.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<DataResponse<Member>>> {
    let id = parse_id(&id)?;
    Ok(Json(DataResponse::new(state.services.members.get(id).await?)))
}

/// Create a member.
pub async fn create_member(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewMember>,
) -> WebResult<(StatusCode, Json<DataResponse<Member>>)> {
    let member = state.services.members.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(member).with_message("Member created successfully")),
    ))
}

/// Update some fields of a member.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<MemberUpdate>,
) -> WebResult<Json<DataResponse<Member>>> {
    let id = parse_id(&id)?;
    let member = state.services.members.update(id, update).await?;

    Ok(Json(DataResponse::new(member).with_message("Member updated successfully")))
}

/// Delete a member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<DataResponse<Member>>> {
    let id = parse_id(&id)?;
    let member = state.services.members.delete(id).await?;

    Ok(Json(DataResponse::new(member).with_message("Member deleted successfully")))
}
