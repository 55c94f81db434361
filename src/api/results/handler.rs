// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Artifact retrieval endpoint handlers

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::storage::DetectionRecord;

/// GET /results/json - List artifact ids with a stored detection record
pub async fn list_records_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = state.store.list_records().await?;
    debug!("Listing {} stored detection records", ids.len());
    Ok(Json(ids))
}

/// GET /results/json/:id - Fetch one stored detection record
///
/// # Errors
/// - 404 Not Found: the id is not a known artifact
/// - 500 Internal Server Error: the stored record could not be read
pub async fn get_record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetectionRecord>, ApiError> {
    let id = parse_artifact_id(&id)?;

    let record = state
        .store
        .get_record(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No detection record for artifact {id}")))?;

    Ok(Json(record))
}

/// GET /results/images - List artifact ids with a stored annotated image
pub async fn list_images_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = state.store.list_images().await?;
    debug!("Listing {} stored annotated images", ids.len());
    Ok(Json(ids))
}

/// GET /results/images/:id - Fetch one stored annotated image as JPEG
///
/// # Errors
/// - 404 Not Found: the id is not a known artifact
/// - 500 Internal Server Error: the stored image could not be read
pub async fn get_image_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_artifact_id(&id)?;

    let bytes = state
        .store
        .get_image(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No annotated image for artifact {id}")))?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

/// Ids are server-minted UUIDs; reject anything else before touching the
/// filesystem.
fn parse_artifact_id(raw: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ApiError::NotFound(format!("No artifact {raw}")))
}
