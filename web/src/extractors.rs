//! Request body extraction with [`AppError`] rejections.

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON request body.
///
/// Behaves like [`axum::Json`] but a malformed or mistyped body is rejected
/// as a 400 `BAD_REQUEST` with the standard error body, instead of axum's
/// plain-text rejection.
///
/// # Example
///
/// ```ignore
/// async fn handler(JsonBody(request): JsonBody<BuyTicketsRequest>) -> WebResult<Json<Receipt>> {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::bad_request(rejection.body_text()))
            }
        }
    }
}
