//! Fallback for requests that match no route.

use crate::error::AppError;
use axum::http::{Method, Uri};

/// Reject an unmatched request with the standard 404 error body.
///
/// Install with `Router::fallback(route_not_found)`.
#[allow(clippy::unused_async)]
pub async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::not_found(format!("Route {method} {uri} not found"))
}
