// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload endpoint handler

use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::Multipart;
use tracing::info;

use super::response::UploadResponse;
use crate::api::detect::handler::run_upload;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::multipart::extract_image_field;
use crate::storage::DetectionRecord;
use crate::vision::{annotate, classify_with_mode, encode_jpeg, VEHICLE_CLASS_SET};

/// Filename recorded when the client form did not carry one
const FALLBACK_FILENAME: &str = "upload.jpg";

/// POST /upload - Detect, classify, and persist the results
///
/// Runs the detection pipeline, stores the annotated image and the detection
/// record under a fresh artifact id, and reports where to find them. The
/// client filename is kept as metadata only; the generated id keys the
/// stored artifacts, so identically named uploads never overwrite each
/// other.
///
/// # Request
/// - `image`: Image file field (required)
///
/// # Response
/// - `artifact_id`: Server-generated id for the stored artifacts
/// - `filename`: Original client filename
/// - `image_url`: Route serving the stored annotated image
/// - `occupied`, `vehicle_count`, `detections`: The classification result
///
/// # Errors
/// - 400 Bad Request: missing image field or undecodable image bytes
/// - 503 Service Unavailable: detection model not loaded
/// - 500 Internal Server Error: inference, encoding, or persistence failed
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // 1. Pull the image field out of the form
    let upload = extract_image_field(multipart).await?;
    let filename = upload
        .filename
        .clone()
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

    // 2. Run the pipeline against the shared detector
    let run = run_upload(&state, &upload.bytes)?;

    // 3. Render and encode the annotated image
    let annotated = annotate(&run.image, &run.detections);
    let jpeg = encode_jpeg(&annotated)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode annotated image: {e}")))?;

    // 4. Classify and mint the record
    let (width, height) = run.image.dimensions();
    let result = classify_with_mode(
        run.detections,
        &VEHICLE_CLASS_SET,
        state.config.occupancy_mode,
    );
    let record = DetectionRecord::new(filename, width, height, &result);

    // 5. Persist both artifacts under the generated id
    state.store.put(&record, &jpeg).await?;

    info!(
        "Upload stored as artifact {} ({} detections, {} vehicles)",
        record.artifact_id,
        record.detections.len(),
        record.vehicle_count
    );

    // 6. Report back
    Ok(Json(UploadResponse::new(&record)))
}

/// GET /upload - wrong-method fallback, bounce back to the upload form
pub async fn upload_redirect_handler() -> Redirect {
    Redirect::to("/")
}
