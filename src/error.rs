// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::recognition::RecognitionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// A unit id that is not in the catalog. Never grants XP.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// The recognition service returned no candidates.
    #[error("No species found")]
    NoMatchFound,

    /// The recognition service failed or timed out. Retryable.
    #[error("Recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Whether the client may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::ServiceUnavailable(_))
    }
}

impl From<RecognitionError> for AppError {
    fn from(err: RecognitionError) -> Self {
        if err.is_retryable() {
            AppError::ServiceUnavailable(err.to_string())
        } else {
            AppError::BadRequest(err.to_string())
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::UnknownUnit(id) => (
                StatusCode::BAD_REQUEST,
                "unknown_unit",
                Some(format!("Unit {} is not in the catalog", id)),
            ),
            AppError::NoMatchFound => (StatusCode::NOT_FOUND, "no_species_found", None),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error = %msg, "Recognition service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
