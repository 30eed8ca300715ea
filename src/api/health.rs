//! Liveness and health endpoints

use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Human-readable message
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process can answer
    pub status: String,
    /// Server time of the check
    pub timestamp: DateTime<Utc>,
    /// Crate version
    pub version: String,
}

/// GET / - Liveness message
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Contact List API is running!".to_string(),
    })
}

/// GET /health - Health status with the current timestamp
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
