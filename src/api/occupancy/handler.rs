// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Occupancy endpoint handler

use axum::extract::State;
use axum::Json;
use axum_extra::extract::Multipart;
use tracing::info;

use super::response::OccupancyResponse;
use crate::api::detect::handler::run_upload;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::multipart::extract_image_field;
use crate::vision::{classify_with_mode, VEHICLE_CLASS_SET};

/// POST /api/occupancy - Parking occupancy signal for an uploaded image
///
/// Runs the detection pipeline and reduces the result to the occupancy
/// signal. The detection list rides along so callers can audit the decision.
///
/// # Request
/// - `image`: Image file field (required)
///
/// # Response
/// - `occupied` / `estado`: The occupancy flag, boolean and legacy text form
/// - `vehicle_count`: Detections whose class is in the vehicle set
/// - `vehicle_classes`: The class ids counted as vehicles
/// - `detections`: All detections the signal was derived from
///
/// # Errors
/// - 400 Bad Request: missing image field or undecodable image bytes
/// - 503 Service Unavailable: detection model not loaded
/// - 500 Internal Server Error: inference failed
pub async fn occupancy_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OccupancyResponse>, ApiError> {
    // 1. Pull the image field out of the form
    let upload = extract_image_field(multipart).await?;

    // 2. Run the pipeline against the shared detector
    let run = run_upload(&state, &upload.bytes)?;

    // 3. Reduce to the occupancy signal
    let result = classify_with_mode(
        run.detections,
        &VEHICLE_CLASS_SET,
        state.config.occupancy_mode,
    );

    info!(
        "Occupancy: {} ({} of {} detections in vehicle classes)",
        result.estado(),
        result.vehicle_count,
        result.detections.len()
    );

    Ok(Json(OccupancyResponse::new(&result)))
}
