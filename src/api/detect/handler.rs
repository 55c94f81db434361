// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handlers

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Json;
use axum_extra::extract::Multipart;
use tracing::{debug, info, warn};

use super::response::DetectResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::multipart::extract_image_field;
use crate::api::pages;
use crate::vision::{
    annotate, classify_with_mode, encode_jpeg, run_detection, DetectionRun, VEHICLE_CLASS_SET,
};

/// POST /api/detect - Detect objects in an uploaded image
///
/// Accepts a multipart form with an `image` file field and returns the raw
/// detection list over the normalized image.
///
/// # Request
/// - `image`: Image file field (required); PNG, JPG, WebP, GIF, BMP, TIFF
///
/// # Response
/// - `detections`: Detected objects with class id, label, confidence, bbox
/// - `image`: Width and height of the normalized image the boxes refer to
/// - `inference_time_ms`: Inference time in milliseconds
///
/// # Errors
/// - 400 Bad Request: missing image field or undecodable image bytes
/// - 503 Service Unavailable: detection model not loaded
/// - 500 Internal Server Error: inference failed
pub async fn api_detect_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetectResponse>, ApiError> {
    // 1. Pull the image field out of the form
    let upload = extract_image_field(multipart).await?;
    debug!("Detection request: {} byte upload", upload.bytes.len());

    // 2. Run the pipeline against the shared detector
    let run = run_upload(&state, &upload.bytes)?;

    info!(
        "Detection complete: {} objects in {}ms",
        run.detections.len(),
        run.inference_time_ms
    );

    // 3. Shape the wire response
    Ok(Json(DetectResponse::new(
        &run.detections,
        run.image.width(),
        run.image.height(),
        run.inference_time_ms,
    )))
}

/// POST /detect - Browser detection flow
///
/// Same pipeline as /api/detect, but answers with an HTML page embedding
/// the annotated image as a base64 data URI plus a textual detection dump.
///
/// # Errors
/// - 400 Bad Request: missing image field or undecodable image bytes
/// - 503 Service Unavailable: detection model not loaded
/// - 500 Internal Server Error: inference or JPEG encoding failed
pub async fn detect_page_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    // 1. Pull the image field out of the form
    let upload = extract_image_field(multipart).await?;

    // 2. Run the pipeline against the shared detector
    let run = run_upload(&state, &upload.bytes)?;

    // 3. Render the annotated image
    let annotated = annotate(&run.image, &run.detections);
    let jpeg = encode_jpeg(&annotated)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode annotated image: {e}")))?;

    // 4. Classify and build the page
    let result = classify_with_mode(
        run.detections,
        &VEHICLE_CLASS_SET,
        state.config.occupancy_mode,
    );

    info!(
        "Browser detection complete: {} ({} vehicles)",
        result.estado(),
        result.vehicle_count
    );

    Ok(Html(pages::detection_page(&jpeg, &result)))
}

/// GET /detect - wrong-method fallback, bounce back to the upload form
pub async fn detect_redirect_handler() -> Redirect {
    Redirect::to("/")
}

/// Shared decode, normalize, detect pass used by every upload endpoint
pub(crate) fn run_upload(state: &AppState, bytes: &[u8]) -> Result<DetectionRun, ApiError> {
    let detector = state.detector.as_ref().ok_or_else(|| {
        warn!("Detection requested but no model is loaded");
        ApiError::ModelUnavailable
    })?;

    run_detection(
        detector.as_ref(),
        bytes,
        state.config.max_edge,
        state.config.max_upload_bytes,
    )
    .map_err(|e| {
        warn!("Detection pipeline failed: {}", e);
        ApiError::from(e)
    })
}
