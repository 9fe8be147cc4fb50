//! Axum integration for the box office services.
//!
//! This crate is the imperative shell around the services:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON bodies
//! │  - Request parsing (JsonBody)           │  ← Correlation IDs
//! │  - Error → status mapping (AppError)    │  ← Request spans
//! ├─────────────────────────────────────────┤
//! │         Services                        │
//! │  - Validation and business rules        │  ← DomainError
//! │  - Serialized read-modify-write         │  ← CollectionLocks
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use boxoffice_web::{AppError, JsonBody};
//! use axum::{Router, routing::post, Json};
//!
//! async fn register(
//!     State(state): State<AppState>,
//!     JsonBody(request): JsonBody<RegisterRequest>,
//! ) -> Result<Json<RegisterResponse>, AppError> {
//!     let user = state.users.register(request.username, request.password).await?;
//!     Ok(Json(RegisterResponse::from(user)))
//! }
//!
//! let app = Router::new()
//!     .route("/users/register", post(register))
//!     .layer(correlation_id_layer())
//!     .with_state(app_state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::JsonBody;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
