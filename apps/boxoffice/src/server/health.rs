//! Health and banner endpoints.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
}

/// Health check endpoint.
///
/// Returns 200 OK while the process is serving. It does not touch storage.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Root banner response.
#[derive(Serialize)]
pub struct BannerResponse {
    /// Greeting
    pub message: &'static str,
    /// Service version
    pub version: &'static str,
}

/// `GET /`
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Box office API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}
