// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image upload route for species identification.

use crate::error::{AppError, Result};
use crate::models::IdentificationResult;
use crate::services::recognition::check_content_type;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Identification routes. The body limit applies to this route only.
pub fn routes(max_image_bytes: usize) -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/users/{user_id}/identify",
        post(identify).layer(DefaultBodyLimit::max(max_image_bytes)),
    )
}

#[derive(Deserialize)]
struct IdentifyQuery {
    /// Unit the user was practicing, if any
    unit_id: Option<String>,
}

/// Only image bodies are forwarded. A missing content type is left to the
/// recognition service to sniff.
fn image_content_type(headers: &HeaderMap) -> Result<Option<String>> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(None);
    };
    let content_type = value
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Content-Type header".to_string()))?;

    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "Expected an image body, got {}",
            content_type
        )));
    }
    check_content_type(content_type)?;
    Ok(Some(content_type.to_string()))
}

/// Identify the species in an uploaded photo and apply the XP reward.
async fn identify(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<IdentifyQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IdentificationResult>> {
    let content_type = image_content_type(&headers)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("Empty image".to_string()));
    }

    let result = state
        .progression
        .submit_identification(
            &user_id,
            params.unit_id.as_deref(),
            body.to_vec(),
            content_type.as_deref(),
        )
        .await?;

    Ok(Json(result))
}
