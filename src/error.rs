//! Error types and error handling for the application
//!
//! All errors implement `IntoResponse` so handlers can return them directly.
//! Bodies carry a `detail` message, which is what the frontend reads.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Contact with the given ID was not found
    #[error("Contact not found: {0}")]
    ContactNotFound(i64),

    /// Another contact already uses this email
    #[error("Email already exists: {0}")]
    EmailConflict(String),

    /// Request payload failed validation
    #[error("Invalid contact: {0}")]
    Validation(String),

    /// The database rejected or failed the operation
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ContactNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailConflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "detail": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
