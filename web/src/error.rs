//! HTTP rendering of failures.
//!
//! [`AppError`] is the only error a handler returns. Every [`DomainError`]
//! reaches it through one `From` impl, so a given kind of failure always
//! leaves the server with the same status and `code`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use boxoffice_core::DomainError;
use serde::Serialize;
use std::fmt;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error returned by handlers, rendered as `{"code": "...", "message": "..."}`.
///
/// ```ignore
/// async fn show(Path(id): Path<String>) -> Result<Json<Product>, AppError> {
///     let product = products.get(parse_id(&id)?).await?;
///     Ok(Json(product))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    /// Logged on 5xx, never sent to the client.
    source: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// 400, malformed or incomplete input.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// 401, credentials did not match a registered user.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// 404
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// 409, a name already taken (case-insensitively).
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, "CONFLICT", message)
    }

    /// 422, e.g. not enough tickets or stock.
    #[must_use]
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "BUSINESS_RULE_VIOLATION",
            message,
        )
    }

    /// 500 with a generic message.
    #[must_use]
    pub fn internal() -> Self {
        Self::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            INTERNAL_MESSAGE,
        )
    }

    /// Status the response is sent with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code, one per status.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Message shown to the client.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| -> &(dyn std::error::Error + 'static) { e.as_ref() })
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(code = self.code, error = %source, "Request failed"),
                None => tracing::error!(code = self.code, "Request failed"),
            }
        }

        let body = ErrorBody {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => Self::bad_request(message),
            DomainError::Unauthorized => Self::unauthorized(err.to_string()),
            DomainError::NotFound(message) => Self::not_found(message),
            DomainError::Conflict(message) => Self::conflict(message),
            DomainError::BusinessRule(message) => Self::business_rule(message),
            DomainError::Storage(_) => Self::internal().with_source(anyhow::Error::new(err)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = AppError::bad_request("Missing required fields: quantity");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Missing required fields: quantity");
    }

    #[test]
    fn test_domain_errors_map_to_distinct_statuses() {
        let cases = [
            (DomainError::validation("missing"), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::not_found("Event", "x"), StatusCode::NOT_FOUND),
            (DomainError::conflict("dup"), StatusCode::CONFLICT),
            (DomainError::business_rule("sold out"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::storage("disk"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            let code = domain.code();
            let err = AppError::from(domain);
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = AppError::from(DomainError::storage("cannot write /srv/data/users.json"));
        assert_eq!(err.message(), INTERNAL_MESSAGE);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::from(DomainError::not_found("Event", "Concert"));
        assert_eq!(err.message(), "Event Concert not found");
    }

    #[tokio::test]
    async fn test_rendered_body_shape() {
        let response = AppError::conflict("Username already exists").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": "CONFLICT", "message": "Username already exists"})
        );
    }
}
